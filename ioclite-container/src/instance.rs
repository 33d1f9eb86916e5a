//! Type-erased resolved values and constructor argument lists.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use crate::error::ArgumentError;

/// A resolved value with its static type erased.
///
/// Holds an `Arc<T>` behind `dyn Any`, so cloning an `Instance` never
/// copies the value: every clone and every [`downcast`](Instance::downcast)
/// points at the same object.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use ioclite_container::instance::Instance;
///
/// let instance = Instance::new(Arc::new(7u32));
/// let a = instance.downcast::<u32>().unwrap();
/// let b = instance.clone().downcast::<u32>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert!(instance.downcast::<i64>().is_none());
/// ```
#[derive(Clone)]
pub struct Instance {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Instance {
    /// Wraps a shared value.
    pub fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            value: Arc::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Returns the shared value if this instance holds a `T`.
    pub fn downcast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.value.downcast_ref::<Arc<T>>().cloned()
    }

    /// Returns `true` if this instance holds a `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.value.is::<Arc<T>>()
    }

    /// Name of the type held.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance({})", self.type_name)
    }
}

/// Resolved constructor arguments, in declaration order.
///
/// Handed to a constructor closure, which takes them one by one with
/// [`next`](Arguments::next).
#[derive(Debug)]
pub struct Arguments {
    values: Vec<Instance>,
    cursor: usize,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Instance>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Takes the next argument as an `Arc<T>`.
    ///
    /// # Errors
    /// [`ArgumentError::Exhausted`] when every declared argument has
    /// already been taken, [`ArgumentError::TypeMismatch`] when the next
    /// argument is not a `T`.
    pub fn next<T: ?Sized + 'static>(&mut self) -> Result<Arc<T>, ArgumentError> {
        let index = self.cursor;
        let value = self.values.get(index).ok_or(ArgumentError::Exhausted {
            index,
            available: self.values.len(),
            expected: type_name::<T>(),
        })?;

        let typed = value.downcast::<T>().ok_or(ArgumentError::TypeMismatch {
            index,
            expected: type_name::<T>(),
            actual: value.type_name(),
        })?;

        self.cursor += 1;
        Ok(typed)
    }

    /// Number of arguments not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len() - self.cursor
    }
}
