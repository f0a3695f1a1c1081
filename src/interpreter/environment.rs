use super::value::Value;
use compact_str::CompactString;
use std::collections::HashMap;

/// Lexically nested scope frames. The last frame is the innermost; the first
/// is the global frame and lives as long as the environment itself.
///
/// Frames form a strict stack: a block pushes exactly one frame on entry and
/// pops it on exit, so lookups walk from the innermost frame outward.
#[derive(Debug, Clone)]
pub struct Environment {
    frames: Vec<HashMap<CompactString, Value>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    /// Number of live frames, the global frame included.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn enter_scope(&mut self) {
        self.frames.push(HashMap::new());
        tracing::trace!(depth = self.depth(), "entered scope");
    }

    /// Discards the innermost frame. The global frame is never popped.
    pub fn exit_scope(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
        tracing::trace!(depth = self.depth(), "exited scope");
    }

    /// Binds `name` in the innermost frame, overwriting a binding of the same
    /// name in that frame only.
    pub fn declare(&mut self, name: &str, value: Value) {
        tracing::trace!(name, %value, "declare");
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), value);
        }
    }

    pub fn access(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Rebinds the nearest existing `name`. Returns `None` if no frame binds it.
    pub fn assign(&mut self, name: &str, value: Value) -> Option<()> {
        let slot = self
            .frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(name))?;
        *slot = value;
        Some(())
    }
}
