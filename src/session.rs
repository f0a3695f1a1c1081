use crate::interpreter::{SystemContext, TreeWalkInterpreter};
use crate::lexer::Lexer;
use crate::parser::{ParseOutput, Parser};
use std::io::BufRead;

/// Error counts from one [`Session::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunReport {
    pub lexical_errors: usize,
    pub parse_errors: usize,
    pub runtime_errors: usize,
}

impl RunReport {
    pub fn had_error(&self) -> bool {
        self.had_static_error() || self.had_runtime_error()
    }

    /// Tokenization or parse errors.
    pub fn had_static_error(&self) -> bool {
        self.lexical_errors > 0 || self.parse_errors > 0
    }

    pub fn had_runtime_error(&self) -> bool {
        self.runtime_errors > 0
    }
}

/// Scans, parses and executes source buffers against one long lived global
/// environment.
#[derive(Debug, Default)]
pub struct Session {
    interpreter: TreeWalkInterpreter,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every diagnostic goes to `context` as soon as it is produced. Whatever
    /// parsed is executed even when other parts of the source had errors.
    pub fn run<C: SystemContext>(&mut self, source: &str, context: &mut C) -> RunReport {
        let _span = tracing::debug_span!("run", bytes = source.len()).entered();

        let scanned = Lexer::new(source).scan_all();
        for error in scanned.errors.iter() {
            context.report(error, source);
        }

        let ParseOutput { statements, errors } = Parser::new(source, &scanned.tokens).parse();
        for error in errors.iter() {
            context.report(error, source);
        }

        let runtime_errors = self.interpreter.execute(&statements, source, context);

        RunReport {
            lexical_errors: scanned.errors.len(),
            parse_errors: errors.len(),
            runtime_errors: runtime_errors.len(),
        }
    }
}

/// Reads one line of interactive input without its line terminator. Bytes
/// that are not valid UTF-8 become U+FFFD. Returns `None` at end of input.
pub fn read_line<R: BufRead>(input: &mut R) -> std::io::Result<Option<String>> {
    let mut buffer = Vec::new();
    if input.read_until(b'\n', &mut buffer)? == 0 {
        return Ok(None);
    }
    if buffer.ends_with(b"\n") {
        buffer.pop();
        if buffer.ends_with(b"\r") {
            buffer.pop();
        }
    }
    Ok(Some(String::from_utf8_lossy(&buffer).into_owned()))
}
