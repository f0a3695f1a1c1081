use crate::interpreter::error::RuntimeError;
use crate::lexer::{LexicalError, Location};
use crate::parser::ParserError;
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::path::PathBuf;
use thiserror::Error;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";
const ARIADNE_WRITE_MSG: &str = "Write into buffer should not fail.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Tokenization,
    Parse,
    Runtime,
    Memory,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Tokenization => "Tokenization Error",
            Self::Parse => "Parse Error",
            Self::Runtime => "Runtime Error",
            Self::Memory => "Memory Error",
        };
        write!(f, "{name}")
    }
}

/// Common view over every reportable error. `Display` gives the single line
/// form, e.g. `Parse Error [line 1:5]: Expected SEMICOLON but got ENDFILE.`
pub trait Diagnostic: std::error::Error {
    fn category(&self) -> ErrorCategory;
    fn code(&self) -> &'static str;
    /// Position of the offending source text. Fatal errors have none.
    fn location(&self) -> Option<Location>;
    /// The message without the category and position prefix.
    fn message(&self) -> String;
}

impl Diagnostic for LexicalError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Tokenization
    }

    fn code(&self) -> &'static str {
        LexicalError::code(self)
    }

    fn location(&self) -> Option<Location> {
        Some(self.location)
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl Diagnostic for ParserError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Parse
    }

    fn code(&self) -> &'static str {
        ParserError::code(self)
    }

    fn location(&self) -> Option<Location> {
        Some(self.location)
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl Diagnostic for RuntimeError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Runtime
    }

    fn code(&self) -> &'static str {
        RuntimeError::code(self)
    }

    fn location(&self) -> Option<Location> {
        Some(self.location)
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }
}

#[derive(Debug, Error)]
pub enum FatalErrorKind {
    #[error("Couldn't read source file '{}'", .path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An error that ends the process instead of being recorded.
#[derive(Debug, Error)]
#[error("Memory Error : {kind}")]
pub struct FatalError {
    #[source]
    pub kind: FatalErrorKind,
}

impl FatalError {
    pub fn unreadable_source(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            kind: FatalErrorKind::UnreadableSource {
                path: path.into(),
                source,
            },
        }
    }
}

impl Diagnostic for FatalError {
    fn category(&self) -> ErrorCategory {
        ErrorCategory::Memory
    }

    fn code(&self) -> &'static str {
        match self.kind {
            FatalErrorKind::UnreadableSource { .. } => "FA001",
        }
    }

    fn location(&self) -> Option<Location> {
        None
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Interface for turning diagnostics into text.
pub trait DiagnosticRenderer {
    fn render(&self, diagnostic: &dyn Diagnostic, source: &str) -> String;
}

/// The single line `<Kind> [line L:C]: <message>` form.
pub struct BasicRenderer;

impl DiagnosticRenderer for BasicRenderer {
    fn render(&self, diagnostic: &dyn Diagnostic, _source: &str) -> String {
        format!("{diagnostic}")
    }
}

/// Source snippets with the offending span underlined.
pub struct PrettyRenderer {
    name: String,
}

impl PrettyRenderer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl DiagnosticRenderer for PrettyRenderer {
    fn render(&self, diagnostic: &dyn Diagnostic, source: &str) -> String {
        let Some(location) = diagnostic.location() else {
            return format!("{diagnostic}");
        };
        let path: &str = &self.name;
        let range = location.span.range();
        let mut output = std::io::Cursor::new(Vec::new());
        Report::build(ReportKind::Error, (path, range.clone()))
            .with_code(diagnostic.code())
            .with_message(format!("{} at {location}", diagnostic.category()))
            .with_label(
                Label::new((path, range))
                    .with_message(diagnostic.message())
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(source)), &mut output)
            .expect(ARIADNE_WRITE_MSG);
        String::from_utf8(output.into_inner()).expect(ARIADNE_MSG)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosticStyle {
    #[default]
    Basic,
    Pretty,
}
