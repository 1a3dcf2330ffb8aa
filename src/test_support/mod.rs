//! Stub collaborators for charmony unit tests.
//!
//! The shared-library-naming collaborator lives in the driver; tests
//! stand it in with fixed Unix-style names so flag output is exact and
//! host-independent.

use crate::core::SharedLibNames;

/// A shared library with predictable Unix-style filenames.
///
/// `StubSharedLib::new("probe", "1.2.0", "1")` reports itself as
/// `libprobe.so.1.2.0`, import library `probe.lib`, soname
/// `libprobe.so.1`.
#[derive(Debug, Clone)]
pub struct StubSharedLib {
    name: String,
    version: String,
    major_version: String,
}

impl StubSharedLib {
    /// Create a stub library with the given name and version strings.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        major_version: impl Into<String>,
    ) -> Self {
        StubSharedLib {
            name: name.into(),
            version: version.into(),
            major_version: major_version.into(),
        }
    }
}

impl SharedLibNames for StubSharedLib {
    fn filename(&self) -> String {
        format!("lib{}.so.{}", self.name, self.version)
    }

    fn implib_filename(&self) -> String {
        format!("{}.lib", self.name)
    }

    fn major_version_filename(&self) -> String {
        format!("lib{}.so.{}", self.name, self.major_version)
    }

    fn version(&self) -> &str {
        &self.version
    }
}
