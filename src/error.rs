//! Typed errors for flag construction and header writing.
//!
//! Unrecoverable conditions surface as values rather than process
//! aborts; the driver decides whether to terminate.

use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by [`FlagBuilder`](crate::flags::FlagBuilder) and
/// [`ConfigWriter`](crate::writer::ConfigWriter).
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// The active dialect has no flag mapping for a correctness-critical
    /// operation. Continuing would silently mis-build the probe, so the
    /// whole run must stop.
    #[error("don't know how to {operation} with '{compiler}'")]
    #[diagnostic(
        code(charmony::flags::unsupported),
        help("probe with a compiler whose flag dialect supports this operation")
    )]
    Unsupported {
        /// Human-readable name of the requested operation.
        operation: &'static str,
        /// Identifier of the offending compiler, as reported by the driver.
        compiler: String,
    },

    /// The generated-header resource could not be created, written, or
    /// closed cleanly.
    #[error("can't {action} '{}'", path.display())]
    #[diagnostic(code(charmony::writer::io))]
    Io {
        /// What was being attempted ("create", "write to", "close").
        action: &'static str,
        /// Path of the generated header.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An operation was called outside its place in the writer lifecycle.
    #[error("{operation} called {state}")]
    #[diagnostic(
        code(charmony::writer::usage),
        help("drive the writer in order: open, then start/end each module, then close")
    )]
    Usage {
        /// The operation that was invoked.
        operation: &'static str,
        /// Description of the offending lifecycle state.
        state: &'static str,
    },
}
