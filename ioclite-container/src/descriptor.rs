//! Runtime type descriptors.
//!
//! The resolver needs to know, for any type it meets, whether the type is
//! abstract, which generic definition it instantiates, which constructors
//! it exposes and which interfaces it can be handed out as. Rust keeps none
//! of that at runtime, so every participating type describes itself through
//! [`Injectable::type_info`].
//!
//! # Examples
//! ```
//! use std::sync::Arc;
//! use ioclite_container::descriptor::{Constructor, Injectable, TypeInfo};
//!
//! trait Logger: Send + Sync {}
//!
//! impl Injectable for dyn Logger {
//!     fn type_info() -> TypeInfo {
//!         TypeInfo::interface::<Self>().build()
//!     }
//! }
//!
//! struct ConsoleLogger;
//! impl Logger for ConsoleLogger {}
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
//! let info = ConsoleLogger::type_info();
//! assert!(info.is_concrete());
//! assert_eq!(info.constructors().len(), 1);
//! assert!(info.upcast_target(&<dyn Logger>::type_info()).is_some());
//! ```

use std::any::{TypeId, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::BoxError;
use crate::instance::{Arguments, Instance};
use crate::key::{GenericDefinition, TypeKey};

/// A type the container can reason about.
///
/// Implement it for concrete types (structs) and for interfaces
/// (`dyn Trait`). Interfaces must have `Send + Sync` as supertraits so
/// that `Arc<dyn Trait>` can be shared across threads.
pub trait Injectable: Send + Sync + 'static {
    fn type_info() -> TypeInfo;
}

type InvokeFn = Arc<dyn Fn(&mut Arguments) -> Result<Instance, BoxError> + Send + Sync>;
type UpcastFn = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

/// Whether a type can be instantiated directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// A trait object or other interface. Never constructed.
    Abstract,
    /// A type with constructors.
    Concrete,
}

/// The generic definition a closed type instantiates, and its arguments.
#[derive(Clone, Debug)]
pub struct GenericArguments {
    pub definition: GenericDefinition,
    pub arguments: Vec<TypeInfo>,
}

impl GenericArguments {
    /// `TypeId`s of the arguments, in order.
    pub fn argument_ids(&self) -> Vec<TypeId> {
        self.arguments.iter().map(TypeInfo::type_id).collect()
    }

    /// Names of the arguments, in order.
    pub fn argument_names(&self) -> Vec<&'static str> {
        self.arguments.iter().map(TypeInfo::type_name).collect()
    }
}

/// One declared constructor parameter.
///
/// The descriptor of the parameter type is fetched lazily, so types may
/// refer to each other in their constructors.
#[derive(Clone, Copy)]
pub struct Parameter {
    type_name: &'static str,
    describe: fn() -> TypeInfo,
}

impl Parameter {
    /// Parameter of type `T`.
    pub fn of<T: ?Sized + Injectable>() -> Self {
        Self {
            type_name: type_name::<T>(),
            describe: T::type_info,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Descriptor of the parameter type.
    pub fn type_info(&self) -> TypeInfo {
        (self.describe)()
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter({})", self.type_name)
    }
}

/// A typed constructor: an ordered parameter list plus the code that
/// builds `T` from the resolved arguments.
///
/// The closure must take the arguments in the order they were declared
/// with [`param`](Constructor::param).
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use ioclite_container::descriptor::{Constructor, Injectable, TypeInfo};
///
/// struct Clock;
/// struct Ledger;
///
/// impl Injectable for Clock {
///     fn type_info() -> TypeInfo {
///         TypeInfo::concrete::<Self>().constructor(Constructor::new(|_| Ok(Clock))).build()
///     }
/// }
///
/// impl Injectable for Ledger {
///     fn type_info() -> TypeInfo {
///         TypeInfo::concrete::<Self>().constructor(Constructor::new(|_| Ok(Ledger))).build()
///     }
/// }
///
/// struct Billing {
///     clock: Arc<Clock>,
///     ledger: Arc<Ledger>,
/// }
///
/// let ctor = Constructor::new(|args| {
///     Ok(Billing {
///         clock: args.next()?,
///         ledger: args.next()?,
///     })
/// })
/// .param::<Clock>()
/// .param::<Ledger>();
///
/// assert_eq!(ctor.parameters().len(), 2);
/// ```
pub struct Constructor<T> {
    parameters: Vec<Parameter>,
    invoke: Arc<dyn Fn(&mut Arguments) -> Result<T, BoxError> + Send + Sync>,
}

impl<T: Send + Sync + 'static> Constructor<T> {
    pub fn new(invoke: impl Fn(&mut Arguments) -> Result<T, BoxError> + Send + Sync + 'static) -> Self {
        Self {
            parameters: Vec::new(),
            invoke: Arc::new(invoke),
        }
    }

    /// Declares the next parameter.
    pub fn param<P: ?Sized + Injectable>(mut self) -> Self {
        self.parameters.push(Parameter::of::<P>());
        self
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn erase(self) -> ConstructorInfo {
        let invoke = self.invoke;
        ConstructorInfo {
            parameters: self.parameters,
            invoke: Arc::new(move |args: &mut Arguments| {
                invoke(args).map(|value| Instance::new(Arc::new(value)))
            }),
        }
    }
}

impl<T: Default + Send + Sync + 'static> Default for Constructor<T> {
    /// Parameterless constructor backed by `T::default()`.
    fn default() -> Self {
        Self::new(|_| Ok(T::default()))
    }
}

/// A constructor with its output type erased.
#[derive(Clone)]
pub struct ConstructorInfo {
    parameters: Vec<Parameter>,
    invoke: InvokeFn,
}

impl ConstructorInfo {
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Runs the constructor with already resolved arguments.
    pub fn invoke(&self, mut arguments: Arguments) -> Result<Instance, BoxError> {
        (self.invoke)(&mut arguments)
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// A declared conversion from a concrete type to one of its interfaces.
#[derive(Clone)]
pub struct Upcast {
    target: TypeId,
    target_name: &'static str,
    cast: UpcastFn,
}

impl Upcast {
    pub fn target_name(&self) -> &'static str {
        self.target_name
    }

    /// Converts an instance of the concrete type; `None` if `instance`
    /// holds something else.
    pub fn apply(&self, instance: &Instance) -> Option<Instance> {
        (self.cast)(instance)
    }
}

impl fmt::Debug for Upcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Upcast({})", self.target_name)
    }
}

struct Descriptor {
    type_id: TypeId,
    type_name: &'static str,
    kind: TypeKind,
    generic: Option<GenericArguments>,
    constructors: Vec<ConstructorInfo>,
    upcasts: Vec<Upcast>,
}

/// Runtime descriptor of a closed type. Cheap to clone.
#[derive(Clone)]
pub struct TypeInfo(Arc<Descriptor>);

impl TypeInfo {
    /// Descriptor of `T`, as reported by its [`Injectable`] impl.
    pub fn of<T: ?Sized + Injectable>() -> Self {
        T::type_info()
    }

    /// Starts describing a concrete type.
    pub fn concrete<T: Send + Sync + 'static>() -> TypeInfoBuilder<T> {
        TypeInfoBuilder::new(TypeKind::Concrete)
    }

    /// Starts describing an interface.
    pub fn interface<T: ?Sized + Send + Sync + 'static>() -> TypeInfoBuilder<T> {
        TypeInfoBuilder::new(TypeKind::Abstract)
    }

    pub fn type_id(&self) -> TypeId {
        self.0.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name
    }

    /// Closed registry key for this type.
    pub fn key(&self) -> TypeKey {
        TypeKey::from_raw(self.0.type_id, self.0.type_name)
    }

    pub fn kind(&self) -> TypeKind {
        self.0.kind
    }

    pub fn is_concrete(&self) -> bool {
        self.0.kind == TypeKind::Concrete
    }

    /// The generic definition and arguments, for generic instantiations.
    pub fn generic(&self) -> Option<&GenericArguments> {
        self.0.generic.as_ref()
    }

    /// Public constructors in declaration order.
    pub fn constructors(&self) -> &[ConstructorInfo] {
        &self.0.constructors
    }

    /// Declared conversion to `target`, if any.
    pub fn upcast_target(&self, target: &TypeInfo) -> Option<&Upcast> {
        self.0.upcasts.iter().find(|u| u.target == target.type_id())
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.0.type_id == other.0.type_id
    }
}

impl Eq for TypeInfo {}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_name", &self.0.type_name)
            .field("kind", &self.0.kind)
            .field("generic", &self.0.generic)
            .field("constructors", &self.0.constructors.len())
            .field("upcasts", &self.0.upcasts)
            .finish()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.type_name)
    }
}

/// Builder returned by [`TypeInfo::concrete`] and [`TypeInfo::interface`].
pub struct TypeInfoBuilder<T: ?Sized> {
    kind: TypeKind,
    generic: Option<GenericArguments>,
    constructors: Vec<ConstructorInfo>,
    upcasts: Vec<Upcast>,
    _type: PhantomData<fn() -> Box<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> TypeInfoBuilder<T> {
    fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            generic: None,
            constructors: Vec::new(),
            upcasts: Vec::new(),
            _type: PhantomData,
        }
    }

    /// Marks `T` as an instantiation of `definition` over `arguments`.
    pub fn generic(mut self, definition: GenericDefinition, arguments: Vec<TypeInfo>) -> Self {
        self.generic = Some(GenericArguments {
            definition,
            arguments,
        });
        self
    }

    pub fn build(self) -> TypeInfo {
        TypeInfo(Arc::new(Descriptor {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            kind: self.kind,
            generic: self.generic,
            constructors: self.constructors,
            upcasts: self.upcasts,
        }))
    }
}

impl<T: Send + Sync + 'static> TypeInfoBuilder<T> {
    /// Adds a public constructor.
    pub fn constructor(mut self, constructor: Constructor<T>) -> Self {
        self.constructors.push(constructor.erase());
        self
    }

    /// Declares that `T` can be handed out as `I`.
    ///
    /// `cast` is normally the unsizing coercion `|this| this`.
    pub fn implements<I: ?Sized + Send + Sync + 'static>(
        mut self,
        cast: impl Fn(Arc<T>) -> Arc<I> + Send + Sync + 'static,
    ) -> Self {
        self.upcasts.push(Upcast {
            target: TypeId::of::<I>(),
            target_name: type_name::<I>(),
            cast: Arc::new(move |instance: &Instance| {
                instance
                    .downcast::<T>()
                    .map(|this| Instance::new(cast(this)))
            }),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Unbound;

    trait Shape: Send + Sync {
        fn sides(&self) -> u32;
    }

    impl Injectable for dyn Shape {
        fn type_info() -> TypeInfo {
            TypeInfo::interface::<Self>().build()
        }
    }

    #[derive(Default)]
    struct Square;

    impl Shape for Square {
        fn sides(&self) -> u32 {
            4
        }
    }

    impl Injectable for Square {
        fn type_info() -> TypeInfo {
            TypeInfo::concrete::<Self>()
                .constructor(Constructor::default())
                .implements::<dyn Shape>(|this| this)
                .build()
        }
    }

    struct Boxed<T>(PhantomData<T>);

    impl<T: Injectable> Injectable for Boxed<T> {
        fn type_info() -> TypeInfo {
            TypeInfo::concrete::<Self>()
                .generic(GenericDefinition::of::<Boxed<Unbound>>(), vec![T::type_info()])
                .constructor(Constructor::new(|_| Ok(Boxed(PhantomData))))
                .build()
        }
    }

    #[test]
    fn interface_is_abstract_without_constructors() {
        let info = <dyn Shape>::type_info();
        assert_eq!(info.kind(), TypeKind::Abstract);
        assert!(info.constructors().is_empty());
        assert!(info.generic().is_none());
    }

    #[test]
    fn concrete_type_is_described() {
        let info = TypeInfo::of::<Square>();
        assert!(info.is_concrete());
        assert_eq!(info.key(), TypeKey::of::<Square>());
        assert_eq!(info.constructors().len(), 1);
        assert!(info.constructors()[0].parameters().is_empty());
    }

    #[test]
    fn constructor_invocation_yields_instance() {
        let info = TypeInfo::of::<Square>();
        let instance = info.constructors()[0].invoke(Arguments::new(vec![])).unwrap();
        assert!(instance.is::<Square>());
    }

    #[test]
    fn upcast_converts_to_interface() {
        let info = TypeInfo::of::<Square>();
        let upcast = info.upcast_target(&<dyn Shape>::type_info()).unwrap();

        let concrete = Instance::new(Arc::new(Square));
        let shape = upcast.apply(&concrete).unwrap().downcast::<dyn Shape>().unwrap();
        assert_eq!(shape.sides(), 4);

        assert!(upcast.apply(&Instance::new(Arc::new(1u8))).is_none());
    }

    #[test]
    fn upcast_keeps_identity() {
        let info = TypeInfo::of::<Square>();
        let upcast = info.upcast_target(&<dyn Shape>::type_info()).unwrap();

        let concrete = Instance::new(Arc::new(Square));
        let a = upcast.apply(&concrete).unwrap().downcast::<dyn Shape>().unwrap();
        let b = upcast.apply(&concrete).unwrap().downcast::<dyn Shape>().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn missing_upcast_is_none() {
        let info = <dyn Shape>::type_info();
        assert!(info.upcast_target(&TypeInfo::of::<Square>()).is_none());
    }

    #[test]
    fn generic_arguments_are_recorded() {
        let info = TypeInfo::of::<Boxed<Square>>();
        let generic = info.generic().unwrap();

        assert_eq!(generic.definition, GenericDefinition::of::<Boxed<Unbound>>());
        assert_eq!(generic.argument_ids(), vec![TypeId::of::<Square>()]);
        assert!(generic.argument_names()[0].contains("Square"));
    }

    #[test]
    fn parameters_are_described_lazily() {
        let ctor = Constructor::new(|args| {
            let _shape: Arc<dyn Shape> = args.next()?;
            Ok(Square)
        })
        .param::<dyn Shape>();

        let param = ctor.parameters()[0];
        assert!(param.type_name().contains("Shape"));
        assert_eq!(param.type_info(), <dyn Shape>::type_info());
    }
}
