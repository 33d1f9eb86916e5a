//! Type identification keys.
//!
//! [`TypeKey`] identifies a registry entry. It is either a closed type,
//! keyed by its [`TypeId`], or an open generic definition, keyed by a
//! [`GenericDefinition`]. The two kinds never compare equal, so an open
//! binding and a binding for one of its closed instantiations can coexist.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Placeholder for an unbound type parameter.
///
/// Used to name a generic definition through one of its instantiations:
/// `GenericDefinition::of::<dyn Repository<Unbound>>()`. It is never
/// constructed.
pub enum Unbound {}

/// Identity of an unbound generic type definition such as
/// `Repository<_>` or `SqlRepository<_>`.
///
/// # Examples
/// ```
/// use ioclite_container::key::{GenericDefinition, Unbound};
///
/// struct SqlRepository<T>(std::marker::PhantomData<T>);
///
/// let def = GenericDefinition::of::<SqlRepository<Unbound>>();
/// assert_eq!(def, GenericDefinition::of::<SqlRepository<Unbound>>());
/// assert_ne!(def, GenericDefinition::of::<Vec<Unbound>>());
/// ```
#[derive(Clone, Copy)]
pub struct GenericDefinition {
    type_id: TypeId,
    type_name: &'static str,
}

impl GenericDefinition {
    /// Creates the definition identified by the marker type `M`.
    #[inline]
    pub fn of<M: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            type_name: type_name::<M>(),
        }
    }

    /// Returns the name of the marker type.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for GenericDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for GenericDefinition {}

impl Hash for GenericDefinition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for GenericDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GenericDefinition({})", self.type_name)
    }
}

impl fmt::Display for GenericDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)
    }
}

/// Uniquely identifies a registry entry.
///
/// # Examples
/// ```
/// use ioclite_container::key::TypeKey;
///
/// let key = TypeKey::of::<String>();
/// assert_eq!(key.type_name(), "alloc::string::String");
/// assert!(!key.is_open());
/// ```
#[derive(Clone, Copy)]
pub enum TypeKey {
    /// A fully parameterized type.
    Closed {
        type_id: TypeId,
        type_name: &'static str,
    },
    /// An unbound generic definition.
    Open(GenericDefinition),
}

impl TypeKey {
    /// Creates a closed key for type `T`.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey::Closed {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// Creates a closed key from a raw [`TypeId`] and type name.
    #[inline]
    pub fn from_raw(type_id: TypeId, type_name: &'static str) -> Self {
        TypeKey::Closed { type_id, type_name }
    }

    /// Returns the human-readable type name.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        match self {
            TypeKey::Closed { type_name, .. } => *type_name,
            TypeKey::Open(def) => def.type_name(),
        }
    }

    /// Returns `true` for an open generic definition.
    #[inline]
    pub fn is_open(&self) -> bool {
        matches!(self, TypeKey::Open(_))
    }
}

impl From<GenericDefinition> for TypeKey {
    fn from(def: GenericDefinition) -> Self {
        TypeKey::Open(def)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeKey::Closed { type_id: a, .. }, TypeKey::Closed { type_id: b, .. }) => a == b,
            (TypeKey::Open(a), TypeKey::Open(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            TypeKey::Closed { type_id, .. } => {
                0u8.hash(state);
                type_id.hash(state);
            }
            TypeKey::Open(def) => {
                1u8.hash(state);
                def.hash(state);
            }
        }
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKey::Closed { type_name, .. } => write!(f, "TypeKey({type_name})"),
            TypeKey::Open(def) => write!(f, "TypeKey(open {})", def.type_name()),
        }
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::marker::PhantomData;

    struct Employee;
    struct SqlRepository<T>(PhantomData<T>);

    #[test]
    fn key_of_type() {
        let key = TypeKey::of::<Employee>();
        assert!(key.type_name().contains("Employee"));
        assert!(!key.is_open());
    }

    #[test]
    fn key_equality_same_type() {
        assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
    }

    #[test]
    fn key_inequality_different_types() {
        assert_ne!(TypeKey::of::<String>(), TypeKey::of::<i32>());
    }

    #[test]
    fn closed_instantiations_differ() {
        assert_ne!(
            TypeKey::of::<SqlRepository<Employee>>(),
            TypeKey::of::<SqlRepository<String>>()
        );
    }

    #[test]
    fn open_and_closed_never_equal() {
        let def = GenericDefinition::of::<SqlRepository<Unbound>>();
        let open = TypeKey::from(def);
        let closed = TypeKey::of::<SqlRepository<Unbound>>();

        assert!(open.is_open());
        assert_ne!(open, closed);
    }

    #[test]
    fn key_in_hashmap() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(TypeKey::of::<String>(), "string");
        map.insert(TypeKey::Open(GenericDefinition::of::<Vec<Unbound>>()), "vec");

        assert_eq!(map.get(&TypeKey::of::<String>()), Some(&"string"));
        assert_eq!(
            map.get(&TypeKey::Open(GenericDefinition::of::<Vec<Unbound>>())),
            Some(&"vec")
        );
        assert_eq!(map.get(&TypeKey::of::<bool>()), None);
    }

    #[test]
    fn unsized_type_key() {
        trait Logger {}
        let key = TypeKey::of::<dyn Logger>();
        assert!(key.type_name().contains("Logger"));
    }
}
