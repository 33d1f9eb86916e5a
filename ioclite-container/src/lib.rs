//! Core container implementation for ioclite.
//!
//! Types describe themselves through [`Injectable`]; the [`Container`]
//! maps requested types to destinations and builds them through their
//! constructors, recursively.

mod cache;
mod catalog;
pub mod container;
pub mod descriptor;
pub mod error;
pub mod instance;
pub mod key;
pub mod lifetime;
mod path;
pub mod registry;

pub use container::{prelude, Container, ContainerBuilder, ContainerOptions};
pub use descriptor::{Constructor, Injectable, TypeInfo};
pub use error::{IocError, Result};
pub use instance::{Arguments, Instance};
pub use key::{GenericDefinition, TypeKey, Unbound};
pub use lifetime::{ConstructorStrategy, Lifetime};
