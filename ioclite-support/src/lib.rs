//! # ioclite Support
//!
//! Helpers shared by the ioclite crates.
//!
//! This crate provides:
//! - Rendering of resolution chains and type names for error messages
//! - "Did you mean" suggestions for unresolvable types

pub mod rendering;
