//! Catalog of closed generic instantiations.
//!
//! Closing an open destination such as `SqlRepository<_>` over the
//! arguments of a request such as `dyn Repository<Employee>` cannot
//! instantiate a generic at runtime. The catalog answers it instead: it
//! indexes every described instantiation by its definition and argument
//! types.

use std::any::TypeId;
use std::collections::HashMap;

use tracing::{debug, trace};

use crate::descriptor::TypeInfo;
use crate::key::GenericDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct InstantiationKey {
    definition: GenericDefinition,
    arguments: Vec<TypeId>,
}

/// Index of described closed generic types.
#[derive(Debug, Default)]
pub(crate) struct TypeCatalog {
    instantiations: HashMap<InstantiationKey, TypeInfo>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `info` if it is a generic instantiation.
    ///
    /// Returns `false` for non-generic types, which are never looked up here.
    pub fn describe(&mut self, info: &TypeInfo) -> bool {
        let Some(generic) = info.generic() else {
            return false;
        };

        let key = InstantiationKey {
            definition: generic.definition,
            arguments: generic.argument_ids(),
        };

        debug!(
            definition = %generic.definition,
            instantiation = info.type_name(),
            "Described generic instantiation"
        );
        self.instantiations.insert(key, info.clone());
        true
    }

    /// Finds `definition` instantiated over `arguments`.
    pub fn close(&self, definition: GenericDefinition, arguments: &[TypeInfo]) -> Option<&TypeInfo> {
        let key = InstantiationKey {
            definition,
            arguments: arguments.iter().map(TypeInfo::type_id).collect(),
        };

        let found = self.instantiations.get(&key);
        trace!(definition = %definition, found = found.is_some(), "Closing generic definition");
        found
    }

    pub fn len(&self) -> usize {
        self.instantiations.len()
    }
}
