//! # ioclite — a small inversion-of-control container
//!
//! Binds abstract request types to concrete destinations and builds
//! object graphs through constructor injection, with singleton and
//! transient lifetimes and open generic bindings.

pub use ioclite_container::*;
pub use ioclite_support::*;
