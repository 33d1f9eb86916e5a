//! Singleton instance cache.
//!
//! One [`OnceCell`] per closed destination type. The map shard lock is
//! released before the cell is initialised, so a constructor may resolve
//! other singletons (which touch the same map) while its own cell is being
//! filled. Concurrent first resolutions of the same type block on that
//! type's cell, and exactly one of them runs the constructor.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::error::Result;
use crate::instance::Instance;

#[derive(Debug, Default)]
pub(crate) struct InstanceCache {
    cells: DashMap<TypeId, Arc<OnceCell<Instance>>>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached instance for `type_id`, building it with
    /// `construct` on first use.
    ///
    /// A failed construction leaves nothing behind, so the next call
    /// tries again.
    pub fn get_or_try_insert(
        &self,
        type_id: TypeId,
        type_name: &'static str,
        construct: impl FnOnce() -> Result<Instance>,
    ) -> Result<Instance> {
        if let Some(instance) = self.get(&type_id) {
            trace!(ty = type_name, "Singleton cache hit");
            return Ok(instance);
        }

        let cell = self.cell(type_id);
        let instance = cell.get_or_try_init(|| {
            let instance = construct()?;
            debug!(ty = type_name, "Cached singleton");
            Ok(instance)
        })?;
        Ok(instance.clone())
    }

    /// Returns the cached instance without building anything.
    pub fn get(&self, type_id: &TypeId) -> Option<Instance> {
        self.cells.get(type_id).and_then(|cell| cell.value().get().cloned())
    }

    /// Number of constructed singletons.
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|entry| entry.value().get().is_some()).count()
    }

    fn cell(&self, type_id: TypeId) -> Arc<OnceCell<Instance>> {
        // clone out so the shard guard drops before construction starts
        self.cells
            .entry(type_id)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .value()
            .clone()
    }
}
