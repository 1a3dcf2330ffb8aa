//! Core types for charmony.
//!
//! This module contains the foundational types shared by the flag builder
//! and the header writer:
//! - Compiler flag dialects
//! - Shared-library flavors and the naming-collaborator interface

pub mod dialect;
pub mod shlib;

pub use dialect::Dialect;
pub use shlib::{SharedLibKind, SharedLibNames};
