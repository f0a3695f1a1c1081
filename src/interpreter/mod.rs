pub mod context;
pub mod environment;
pub mod error;
mod tree;
pub mod value;

use crate::diagnostic::Diagnostic;
pub use tree::TreeWalkInterpreter;

/// Where a program's output and diagnostics go.
pub trait SystemContext {
    /// Writes one line of program output.
    fn writeln(&mut self, text: &str);
    /// Reports a diagnostic raised while processing `source`.
    fn report(&mut self, diagnostic: &dyn Diagnostic, source: &str);
}
