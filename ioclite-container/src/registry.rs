//! Binding registry.
//!
//! The registry maps a source [`TypeKey`] to exactly one [`Binding`].
//! It is filled by the [`ContainerBuilder`](crate::container::ContainerBuilder)
//! and becomes read-only once the container is built.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::catalog::TypeCatalog;
use crate::descriptor::TypeInfo;
use crate::error::{DuplicateRegistrationError, IocError};
use crate::key::{GenericDefinition, TypeKey};
use crate::lifetime::{ConstructorStrategy, Lifetime};

/// What a binding resolves to.
#[derive(Debug, Clone)]
pub enum Destination {
    /// A closed concrete type, used as is.
    Closed(TypeInfo),
    /// An open generic definition, closed over the request's type arguments.
    Open(GenericDefinition),
}

impl Destination {
    pub fn key(&self) -> TypeKey {
        match self {
            Destination::Closed(info) => info.key(),
            Destination::Open(def) => TypeKey::Open(*def),
        }
    }
}

/// A configured mapping from a source type to a destination.
///
/// Source and destination never change once registered. Lifetime and
/// strategy can only be changed through the
/// [`BindingHandle`](crate::container::BindingHandle) while the container
/// is still being built.
#[derive(Debug, Clone)]
pub struct Binding {
    source: TypeKey,
    destination: Destination,
    lifetime: Lifetime,
    strategy: ConstructorStrategy,
}

impl Binding {
    /// New binding with the default policy: singleton, largest constructor.
    pub fn new(source: TypeKey, destination: Destination) -> Self {
        Self {
            source,
            destination,
            lifetime: Lifetime::default(),
            strategy: ConstructorStrategy::default(),
        }
    }

    pub fn source(&self) -> TypeKey {
        self.source
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    pub fn strategy(&self) -> ConstructorStrategy {
        self.strategy
    }

    pub(crate) fn set_lifetime(&mut self, lifetime: Lifetime) {
        self.lifetime = lifetime;
    }

    pub(crate) fn set_strategy(&mut self, strategy: ConstructorStrategy) {
        self.strategy = strategy;
    }
}

/// Stores all bindings plus the catalog used to close open destinations.
#[derive(Debug)]
pub(crate) struct Registry {
    bindings: HashMap<TypeKey, Binding>,
    catalog: TypeCatalog,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            catalog: TypeCatalog::new(),
        }
    }

    /// Stores `binding` under its source key and returns it for adjustment.
    ///
    /// Closed generic destinations are recorded in the catalog as well.
    ///
    /// # Errors
    /// Returns [`IocError::DuplicateRegistration`] if the source key is
    /// already bound and `allow_override` is false.
    pub fn register(&mut self, binding: Binding, allow_override: bool) -> Result<&mut Binding, IocError> {
        let key = binding.source;

        if !allow_override && self.bindings.contains_key(&key) {
            return Err(IocError::DuplicateRegistration(DuplicateRegistrationError { key }));
        }

        if let Destination::Closed(info) = &binding.destination {
            self.catalog.describe(info);
        }

        debug!(
            source = %key,
            destination = %binding.destination.key(),
            lifetime = %binding.lifetime,
            "Registered binding"
        );

        Ok(self.bindings.entry(key).insert_entry(binding).into_mut())
    }

    /// Records a closed generic instantiation for open destinations.
    pub fn describe(&mut self, info: &TypeInfo) -> bool {
        self.catalog.describe(info)
    }

    /// Exact lookup by source key.
    pub fn get(&self, key: &TypeKey) -> Option<&Binding> {
        let binding = self.bindings.get(key);
        trace!(key = %key, found = binding.is_some(), "Binding lookup");
        binding
    }

    /// Lookup by unbound generic definition.
    pub fn get_open(&self, definition: &GenericDefinition) -> Option<&Binding> {
        self.get(&TypeKey::Open(*definition))
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Returns the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// All bound source keys.
    pub fn registered_keys(&self) -> Vec<TypeKey> {
        self.bindings.keys().copied().collect()
    }
}
