//! Charmony - compiler-flag and generated-header engine for C capability probing
//!
//! This crate provides the two core components of a build-time capability
//! prober: dialect-aware construction of compiler/linker invocation flags,
//! and transactional accumulation of probe results into a single portable
//! `charmony.h` configuration header.
//!
//! Actual compiler invocation, platform detection, and shared-library
//! naming live in the driver program; they reach this crate through the
//! narrow interfaces in [`core`](crate::core).

pub mod core;
pub mod error;
pub mod flags;
pub mod util;
pub mod writer;

/// Stub collaborators for charmony unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides fixed-name stand-ins for the external
/// shared-library-naming collaborator.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{Dialect, SharedLibKind, SharedLibNames};
pub use crate::error::{Error, Result};
pub use crate::flags::FlagBuilder;
pub use crate::writer::{ConfigWriter, CHARMONY_H};
