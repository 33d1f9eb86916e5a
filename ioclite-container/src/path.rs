//! In-flight resolution path.
//!
//! Every top-level resolve starts an empty path. Each destination is pushed
//! before its constructor runs and popped once it is built, so the path is
//! always the chain of destinations currently under construction on this
//! call stack. Meeting a destination that is already on the path means the
//! graph loops back on itself.

use tracing::warn;

use crate::error::{CircularDependencyError, IocError, Result};
use crate::key::TypeKey;

#[derive(Debug)]
pub(crate) struct ResolutionPath {
    stack: Vec<TypeKey>,
    max_depth: usize,
}

impl ResolutionPath {
    pub fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            max_depth,
        }
    }

    /// Pushes `key`.
    ///
    /// # Errors
    /// - [`IocError::CircularDependency`] if `key` is already being built.
    ///   The chain runs from its first occurrence back to `key`.
    /// - [`IocError::DepthExceeded`] if the path is already `max_depth` long.
    pub fn enter(&mut self, key: &TypeKey) -> Result<()> {
        if let Some(start) = self.stack.iter().position(|k| k == key) {
            let mut chain = self.stack[start..].to_vec();
            chain.push(*key);

            warn!(cycle = ?chain, "Circular dependency detected");
            return Err(IocError::CircularDependency(CircularDependencyError { chain }));
        }

        if self.stack.len() >= self.max_depth {
            warn!(depth = self.stack.len(), key = %key, "Resolution depth exceeded");
            return Err(IocError::DepthExceeded {
                depth: self.max_depth,
            });
        }

        self.stack.push(*key);
        Ok(())
    }

    /// Pops the innermost destination.
    pub fn leave(&mut self) {
        self.stack.pop();
    }

    /// The destination currently being built, if any.
    pub fn last(&self) -> Option<TypeKey> {
        self.stack.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
