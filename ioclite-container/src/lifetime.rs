//! Lifetime policies and constructor-selection strategies.
//!
//! Both are stored on a [`Binding`](crate::registry::Binding) and read
//! every time the binding is resolved.

use std::fmt;

/// Defines how long a resolved instance lives inside the container.
///
/// # Examples
/// ```
/// use ioclite_container::lifetime::Lifetime;
///
/// assert_eq!(Lifetime::default(), Lifetime::Singleton);
/// assert!(Lifetime::Singleton.is_cached());
/// assert!(!Lifetime::Transient.is_cached());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// One instance per closed destination type.
    ///
    /// Built on first resolve and handed out until the container is dropped.
    #[default]
    Singleton,

    /// A fresh instance on every resolve. Never cached.
    Transient,
}

impl Lifetime {
    /// Returns `true` if instances of this lifetime go into the cache.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Lifetime::Singleton)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Singleton => write!(f, "Singleton"),
            Lifetime::Transient => write!(f, "Transient"),
        }
    }
}

/// Picks one constructor when a destination declares several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConstructorStrategy {
    /// The constructor with the most parameters.
    #[default]
    LargestParameterList,

    /// The constructor with the fewest parameters.
    SmallestParameterList,
}

impl ConstructorStrategy {
    /// Returns the position of the selected item in `parameter_counts`.
    ///
    /// Ties go to the earliest entry, so the choice is stable for a
    /// given declaration order.
    pub fn select(&self, parameter_counts: &[usize]) -> Option<usize> {
        let mut order: Vec<usize> = (0..parameter_counts.len()).collect();
        match self {
            ConstructorStrategy::LargestParameterList => {
                order.sort_by(|&a, &b| parameter_counts[b].cmp(&parameter_counts[a]))
            }
            ConstructorStrategy::SmallestParameterList => {
                order.sort_by(|&a, &b| parameter_counts[a].cmp(&parameter_counts[b]))
            }
        }
        order.first().copied()
    }
}

impl fmt::Display for ConstructorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructorStrategy::LargestParameterList => write!(f, "LargestParameterList"),
            ConstructorStrategy::SmallestParameterList => write!(f, "SmallestParameterList"),
        }
    }
}
