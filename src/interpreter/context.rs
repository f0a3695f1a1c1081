use super::SystemContext;
use crate::diagnostic::{
    BasicRenderer, Diagnostic, DiagnosticRenderer, DiagnosticStyle, PrettyRenderer,
};

/// Program output to stdout, diagnostics to stderr.
pub struct StdioContext {
    renderer: Box<dyn DiagnosticRenderer>,
}

impl StdioContext {
    pub fn new(style: DiagnosticStyle, name: &str) -> Self {
        let renderer: Box<dyn DiagnosticRenderer> = match style {
            DiagnosticStyle::Basic => Box::new(BasicRenderer),
            DiagnosticStyle::Pretty => Box::new(PrettyRenderer::new(name)),
        };
        Self { renderer }
    }
}

impl Default for StdioContext {
    fn default() -> Self {
        Self {
            renderer: Box::new(BasicRenderer),
        }
    }
}

impl SystemContext for StdioContext {
    fn writeln(&mut self, text: &str) {
        println!("{text}");
    }

    fn report(&mut self, diagnostic: &dyn Diagnostic, source: &str) {
        let rendered = self.renderer.render(diagnostic, source);
        eprintln!("{}", rendered.trim_end());
    }
}

/// Captures output and single line diagnostics in memory.
#[derive(Debug, Default)]
pub struct BufferedContext {
    buffer: String,
    diagnostics: Vec<String>,
}

impl BufferedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_output(&self) -> &str {
        &self.buffer
    }

    pub fn get_diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn into_data(self) -> String {
        self.buffer
    }

    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.buffer, self.diagnostics)
    }
}

impl SystemContext for BufferedContext {
    fn writeln(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }

    fn report(&mut self, diagnostic: &dyn Diagnostic, source: &str) {
        self.diagnostics.push(BasicRenderer.render(diagnostic, source));
    }
}
