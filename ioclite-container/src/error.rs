//! Error types for ioclite container operations.
//!
//! Every failure names the type it is about by its full Rust path,
//! and most carry a hint on how to fix the registration.

use std::fmt;

use ioclite_support::rendering::{render_chain, shorten_type_name};

use crate::key::{GenericDefinition, TypeKey};

/// Boxed error returned by constructors and wrapped by
/// [`IocError::ConstructionFailed`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all ioclite operations.
#[derive(Debug, thiserror::Error)]
pub enum IocError {
    /// No binding, no open generic match, and the type is abstract.
    #[error("{}", .0)]
    Unresolvable(UnresolvableTypeError),

    /// The selected constructor failed, or the destination could not be
    /// built or handed out as the requested type.
    #[error("Failed to construct {ty}: {source}")]
    ConstructionFailed {
        ty: TypeKey,
        #[source]
        source: BoxError,
    },

    /// The same source type was bound twice while overriding is disabled.
    #[error("{}", .0)]
    DuplicateRegistration(DuplicateRegistrationError),

    /// A destination was requested again while it was still being built.
    #[error("{}", .0)]
    CircularDependency(CircularDependencyError),

    /// The resolution path grew past the configured maximum depth.
    #[error("Resolution depth {depth} exceeded")]
    DepthExceeded { depth: usize },

    /// An open destination could not be closed over the requested
    /// type arguments because that instantiation was never described.
    #[error(
        "Instantiation of {definition} over <{}> is unknown\n  Hint: call .describe::<T>() for the closed destination type",
        .arguments.join(", ")
    )]
    UnknownInstantiation {
        definition: GenericDefinition,
        arguments: Vec<&'static str>,
    },
}

impl IocError {
    pub(crate) fn construction(ty: TypeKey, source: impl Into<BoxError>) -> Self {
        IocError::ConstructionFailed {
            ty,
            source: source.into(),
        }
    }
}

/// Error when a requested type cannot be resolved.
#[derive(Debug)]
pub struct UnresolvableTypeError {
    /// The type that was requested.
    pub requested: TypeKey,
    /// The destination whose constructor asked for it, if any.
    pub required_by: Option<TypeKey>,
    /// Registered source types with similar names.
    pub suggestions: Vec<String>,
}

impl fmt::Display for UnresolvableTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type {} is not configured", self.requested)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  Required by: {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: Did you forget to call .bind::<{}>()?",
            shorten_type_name(self.requested.type_name())
        )
    }
}

/// Error when a construction chain comes back to a type it is still building.
///
/// The chain starts and ends with the repeated destination.
#[derive(Debug)]
pub struct CircularDependencyError {
    pub chain: Vec<TypeKey>,
}

impl fmt::Display for CircularDependencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .chain
            .iter()
            .map(|k| shorten_type_name(k.type_name()))
            .collect();

        write!(f, "Circular dependency detected:\n  {}", render_chain(&names))?;
        write!(
            f,
            "\n  Hint: Break the cycle by removing one of these constructor parameters"
        )
    }
}

/// Error when a source type is bound a second time.
#[derive(Debug)]
pub struct DuplicateRegistrationError {
    pub key: TypeKey,
}

impl fmt::Display for DuplicateRegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type already registered: {}", self.key)?;
        write!(
            f,
            "\n  Hint: Enable .allow_override(true) on the builder to let the last binding win"
        )
    }
}

/// Errors raised while a constructor pulls its resolved arguments.
#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    #[error("constructor asked for argument #{index} ({expected}) but only {available} were declared")]
    Exhausted {
        index: usize,
        available: usize,
        expected: &'static str,
    },

    #[error("argument #{index} is {actual}, not {expected}")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Convenient Result type for ioclite operations.
pub type Result<T> = std::result::Result<T, IocError>;
