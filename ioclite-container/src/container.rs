//! # The Container
//!
//! Holds the bindings, resolves requested types into object graphs and
//! owns the singleton cache.
//!
//! # Architecture
//! ```text
//! ContainerBuilder  ──build()──>  Container
//!   bind / bind_open                 │
//!   describe                   resolve / resolve_type
//!                                    │
//!                   exact binding ─> open binding ─> self-construction
//!                                    │
//!                          constructor ─> parameters (recursive)
//! ```
//!
//! # Examples
//! ```rust
//! use std::sync::Arc;
//! use ioclite_container::prelude::*;
//!
//! trait Logger: Send + Sync {
//!     fn log(&self, msg: &str) -> String;
//! }
//!
//! impl Injectable for dyn Logger {
//!     fn type_info() -> TypeInfo {
//!         TypeInfo::interface::<Self>().build()
//!     }
//! }
//!
//! struct ConsoleLogger;
//!
//! impl Logger for ConsoleLogger {
//!     fn log(&self, msg: &str) -> String {
//!         format!("[console] {msg}")
//!     }
//! }
//!
//! impl Injectable for ConsoleLogger {
//!     fn type_info() -> TypeInfo {
//!         TypeInfo::concrete::<Self>()
//!             .constructor(Constructor::new(|_| Ok(ConsoleLogger)))
//!             .implements::<dyn Logger>(|this| this)
//!             .build()
//!     }
//! }
//!
//! struct UserService {
//!     logger: Arc<dyn Logger>,
//! }
//!
//! impl Injectable for UserService {
//!     fn type_info() -> TypeInfo {
//!         TypeInfo::concrete::<Self>()
//!             .constructor(
//!                 Constructor::new(|args| Ok(UserService { logger: args.next()? }))
//!                     .param::<dyn Logger>(),
//!             )
//!             .build()
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let mut builder = Container::builder();
//! builder.bind::<dyn Logger>().to::<ConsoleLogger>()?;
//! let container = builder.build();
//!
//! // UserService is not bound: it is concrete, so it builds itself.
//! let service = container.resolve::<UserService>()?;
//! assert_eq!(service.logger.log("hi"), "[console] hi");
//!
//! let a = container.resolve::<dyn Logger>()?;
//! let b = container.resolve::<dyn Logger>()?;
//! assert!(Arc::ptr_eq(&a, &b));
//! # Ok(())
//! # }
//! ```

use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use ioclite_support::rendering::suggest_similar;
use tracing::{debug, info, instrument, trace};

use crate::cache::InstanceCache;
use crate::descriptor::{Injectable, TypeInfo};
use crate::error::{IocError, Result, UnresolvableTypeError};
use crate::instance::{Arguments, Instance};
use crate::key::{GenericDefinition, TypeKey};
use crate::lifetime::{ConstructorStrategy, Lifetime};
use crate::path::ResolutionPath;
use crate::registry::{Binding, Destination, Registry};

/// Default limit on nested constructions in one resolve call.
pub const DEFAULT_MAX_DEPTH: usize = 256;

const MAX_SUGGESTIONS: usize = 3;

/// Builder-level settings, carried by the built [`Container`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerOptions {
    /// Let a second binding for the same source replace the first.
    pub allow_override: bool,
    /// Maximum number of destinations under construction at once.
    pub max_depth: usize,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            allow_override: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ============================================================
// ContainerBuilder
// ============================================================

/// Collects bindings, then freezes them into a [`Container`].
///
/// Options are set by value first, bindings are added through `&mut`:
///
/// ```rust,ignore
/// let mut builder = Container::builder().allow_override(true).max_depth(64);
/// builder.bind::<dyn Logger>().to::<SqlServerLogger>()?.as_transient();
/// builder.bind_open(repository).to_open(sql_repository)?;
/// builder.describe::<SqlRepository<Employee>>();
/// let container = builder.build();
/// ```
#[derive(Debug)]
pub struct ContainerBuilder {
    registry: Registry,
    options: ContainerOptions,
}

impl ContainerBuilder {
    fn new() -> Self {
        Self {
            registry: Registry::new(),
            options: ContainerOptions::default(),
        }
    }

    /// Allow a later binding for the same source to replace an earlier one.
    ///
    /// Off by default: a second binding fails with
    /// [`IocError::DuplicateRegistration`].
    pub fn allow_override(mut self, allow: bool) -> Self {
        self.options.allow_override = allow;
        self
    }

    /// Limit on nested constructions per resolve call.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = depth;
        self
    }

    /// Starts a binding for the closed source type `S`.
    pub fn bind<S: ?Sized + Injectable>(&mut self) -> BindingTarget<'_> {
        self.bind_type(S::type_info())
    }

    /// Starts a binding for a source described at runtime.
    pub fn bind_type(&mut self, source: TypeInfo) -> BindingTarget<'_> {
        BindingTarget {
            builder: self,
            source,
        }
    }

    /// Starts a binding for an open generic definition.
    pub fn bind_open(&mut self, source: GenericDefinition) -> OpenBindingTarget<'_> {
        OpenBindingTarget {
            builder: self,
            source,
        }
    }

    /// Records `T` so open destinations can be closed to it.
    ///
    /// Closed bindings record their destination on their own; this is
    /// for instantiations only reached through an open binding.
    pub fn describe<T: ?Sized + Injectable>(&mut self) -> &mut Self {
        if !self.registry.describe(&T::type_info()) {
            debug!(ty = type_name::<T>(), "Skipped describing non-generic type");
        }
        self
    }

    /// Freezes the bindings into an immutable container.
    #[instrument(skip(self), name = "container_build")]
    pub fn build(self) -> Container {
        info!(
            registered = self.registry.len(),
            described = self.registry.catalog().len(),
            "Building container"
        );

        Container {
            registry: self.registry,
            cache: InstanceCache::new(),
            options: self.options,
        }
    }

    fn register(&mut self, binding: Binding) -> Result<BindingHandle<'_>> {
        let binding = self.registry.register(binding, self.options.allow_override)?;
        Ok(BindingHandle { binding })
    }
}

/// First half of a closed binding, returned by [`ContainerBuilder::bind`].
pub struct BindingTarget<'a> {
    builder: &'a mut ContainerBuilder,
    source: TypeInfo,
}

impl<'a> BindingTarget<'a> {
    /// Binds the source to destination `D`.
    ///
    /// # Errors
    /// [`IocError::DuplicateRegistration`] if the source is already bound
    /// and overriding is off.
    pub fn to<D: ?Sized + Injectable>(self) -> Result<BindingHandle<'a>> {
        self.to_type(D::type_info())
    }

    /// Binds the source to a destination described at runtime.
    pub fn to_type(self, destination: TypeInfo) -> Result<BindingHandle<'a>> {
        let Self { builder, source } = self;
        builder.register(Binding::new(source.key(), Destination::Closed(destination)))
    }
}

/// First half of an open binding, returned by [`ContainerBuilder::bind_open`].
pub struct OpenBindingTarget<'a> {
    builder: &'a mut ContainerBuilder,
    source: GenericDefinition,
}

impl<'a> OpenBindingTarget<'a> {
    /// Binds the open source to an open destination. Each request for a
    /// closed instantiation of the source is served by the same
    /// instantiation of the destination.
    pub fn to_open(self, destination: GenericDefinition) -> Result<BindingHandle<'a>> {
        let Self { builder, source } = self;
        builder.register(Binding::new(TypeKey::Open(source), Destination::Open(destination)))
    }
}

/// Adjusts a freshly stored binding.
///
/// Only obtainable from the builder, so a binding's policy can no longer
/// change once the container resolves anything.
pub struct BindingHandle<'a> {
    binding: &'a mut Binding,
}

impl BindingHandle<'_> {
    /// One shared instance per closed destination type.
    pub fn as_singleton(self) -> Self {
        self.binding.set_lifetime(Lifetime::Singleton);
        self
    }

    /// A fresh instance on every resolve.
    pub fn as_transient(self) -> Self {
        self.binding.set_lifetime(Lifetime::Transient);
        self
    }

    /// Picks which constructor builds the destination.
    pub fn with_constructor_strategy(self, strategy: ConstructorStrategy) -> Self {
        self.binding.set_strategy(strategy);
        self
    }

    /// The stored binding, as adjusted so far.
    pub fn binding(&self) -> &Binding {
        self.binding
    }
}

// ═══════════════════════════════════════════
// Container
// ═══════════════════════════════════════════

/// Immutable, thread-safe resolver.
///
/// Created by [`ContainerBuilder::build()`]. Each container has its own
/// singleton cache.
pub struct Container {
    registry: Registry,
    cache: InstanceCache,
    options: ContainerOptions,
}

/// How one request will be served.
struct Plan {
    destination: TypeInfo,
    lifetime: Lifetime,
    strategy: ConstructorStrategy,
}

impl Container {
    /// Create a new builder.
    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    /// Resolves `T` and returns it as a shared handle.
    ///
    /// ```rust,ignore
    /// let logger: Arc<dyn Logger> = container.resolve::<dyn Logger>()?;
    /// ```
    pub fn resolve<T: ?Sized + Injectable>(&self) -> Result<Arc<T>> {
        let requested = T::type_info();
        let instance = self.resolve_type(&requested)?;

        instance.downcast::<T>().ok_or_else(|| {
            IocError::construction(
                requested.key(),
                format!(
                    "Type mismatch: resolved {}, expected {}",
                    instance.type_name(),
                    type_name::<T>()
                ),
            )
        })
    }

    /// Resolves a type described at runtime.
    pub fn resolve_type(&self, requested: &TypeInfo) -> Result<Instance> {
        let mut path = ResolutionPath::new(self.options.max_depth);
        self.resolve_in(requested, &mut path)
    }

    /// Exact binding for `key`.
    pub fn lookup(&self, key: &TypeKey) -> Option<&Binding> {
        self.registry.get(key)
    }

    /// Binding for an open generic definition.
    pub fn lookup_open(&self, definition: &GenericDefinition) -> Option<&Binding> {
        self.registry.get_open(definition)
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Options the container was built with.
    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    fn resolve_in(&self, requested: &TypeInfo, path: &mut ResolutionPath) -> Result<Instance> {
        trace!(ty = requested.type_name(), depth = path.depth(), "Resolving");

        let Plan {
            destination,
            lifetime,
            strategy,
        } = self.plan(requested, path)?;

        path.enter(&destination.key())?;
        let built = if lifetime.is_cached() {
            self.cache.get_or_try_insert(destination.type_id(), destination.type_name(), || {
                self.construct(&destination, strategy, path)
            })
        } else {
            self.construct(&destination, strategy, path)
        };
        path.leave();

        self.upcast(requested, &destination, built?)
    }

    /// Picks the destination, lifetime and strategy for `requested`.
    fn plan(&self, requested: &TypeInfo, path: &ResolutionPath) -> Result<Plan> {
        if let Some(binding) = self.registry.get(&requested.key()) {
            trace!(ty = requested.type_name(), "Using exact binding");
            return self.plan_binding(binding, requested);
        }

        if let Some(generic) = requested.generic() {
            if let Some(binding) = self.registry.get_open(&generic.definition) {
                trace!(
                    ty = requested.type_name(),
                    definition = %generic.definition,
                    "Using open binding"
                );
                return self.plan_binding(binding, requested);
            }
        }

        if requested.is_concrete() {
            trace!(ty = requested.type_name(), "Constructing unbound concrete type");
            return Ok(Plan {
                destination: requested.clone(),
                lifetime: Lifetime::Transient,
                strategy: ConstructorStrategy::LargestParameterList,
            });
        }

        Err(IocError::Unresolvable(UnresolvableTypeError {
            requested: requested.key(),
            required_by: path.last(),
            suggestions: self.find_suggestions(requested),
        }))
    }

    fn plan_binding(&self, binding: &Binding, requested: &TypeInfo) -> Result<Plan> {
        let destination = match binding.destination() {
            Destination::Closed(info) => info.clone(),
            Destination::Open(definition) => self.close(*definition, requested)?,
        };

        Ok(Plan {
            destination,
            lifetime: binding.lifetime(),
            strategy: binding.strategy(),
        })
    }

    /// Closes an open destination over the type arguments of `requested`.
    fn close(&self, definition: GenericDefinition, requested: &TypeInfo) -> Result<TypeInfo> {
        let generic = requested.generic();
        let arguments = generic.map(|g| g.arguments.as_slice()).unwrap_or_default();

        self.registry
            .catalog()
            .close(definition, arguments)
            .cloned()
            .ok_or_else(|| IocError::UnknownInstantiation {
                definition,
                arguments: generic.map(|g| g.argument_names()).unwrap_or_default(),
            })
    }

    fn construct(
        &self,
        destination: &TypeInfo,
        strategy: ConstructorStrategy,
        path: &mut ResolutionPath,
    ) -> Result<Instance> {
        let constructors = destination.constructors();
        let counts: Vec<usize> = constructors.iter().map(|c| c.parameters().len()).collect();

        let constructor = strategy
            .select(&counts)
            .and_then(|index| constructors.get(index))
            .ok_or_else(|| IocError::construction(destination.key(), "no public constructor"))?;

        trace!(
            ty = destination.type_name(),
            parameters = constructor.parameters().len(),
            strategy = %strategy,
            "Selected constructor"
        );

        let mut arguments = Vec::with_capacity(constructor.parameters().len());
        for parameter in constructor.parameters() {
            arguments.push(self.resolve_in(&parameter.type_info(), path)?);
        }

        constructor
            .invoke(Arguments::new(arguments))
            .map_err(|source| IocError::construction(destination.key(), source))
    }

    /// Hands the destination instance out as the requested type.
    fn upcast(&self, requested: &TypeInfo, destination: &TypeInfo, instance: Instance) -> Result<Instance> {
        if requested == destination {
            return Ok(instance);
        }

        let upcast = destination.upcast_target(requested).ok_or_else(|| {
            IocError::construction(
                destination.key(),
                format!(
                    "{} does not declare .implements::<{}>()",
                    destination.type_name(),
                    requested.type_name()
                ),
            )
        })?;

        upcast.apply(&instance).ok_or_else(|| {
            IocError::construction(
                destination.key(),
                format!("constructor produced {}", instance.type_name()),
            )
        })
    }

    fn find_suggestions(&self, requested: &TypeInfo) -> Vec<String> {
        let names: Vec<&str> = self
            .registry
            .registered_keys()
            .iter()
            .map(TypeKey::type_name)
            .collect();

        suggest_similar(requested.type_name(), &names, MAX_SUGGESTIONS)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("registered", &self.registry.len())
            .field("singletons", &self.cache.len())
            .field("options", &self.options)
            .finish()
    }
}

// ═══════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════

pub mod prelude {
    pub use super::{BindingHandle, Container, ContainerBuilder, ContainerOptions};
    pub use crate::descriptor::{Constructor, Injectable, TypeInfo};
    pub use crate::error::{BoxError, IocError, Result};
    pub use crate::instance::{Arguments, Instance};
    pub use crate::key::{GenericDefinition, TypeKey, Unbound};
    pub use crate::lifetime::{ConstructorStrategy, Lifetime};
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
