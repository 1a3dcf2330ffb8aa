//! Shared-library flavors and the naming-collaborator interface.

/// The platform's shared-library flavor.
///
/// Derived from the file extension reported by the driver's
/// operating-system layer. GNU-dialect flag choices branch on this:
/// Mach-O dylibs, ELF shared objects, and PE DLLs all want different
/// compile and link flags from the same compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SharedLibKind {
    /// Mach-O dynamic library (macOS, `.dylib`).
    Dylib,
    /// ELF shared object (`.so`).
    So,
    /// PE dynamic-link library (Windows and MinGW, `.dll`).
    Dll,
    /// Anything else; flavor-specific flags degrade to no-ops.
    Other,
}

impl SharedLibKind {
    /// Classify a shared-library file extension, with or without the
    /// leading dot.
    pub fn from_extension(ext: &str) -> Self {
        match ext.strip_prefix('.').unwrap_or(ext) {
            "dylib" => SharedLibKind::Dylib,
            "so" => SharedLibKind::So,
            "dll" => SharedLibKind::Dll,
            _ => SharedLibKind::Other,
        }
    }
}

/// Names for one shared library, supplied by the driver.
///
/// The flag builder never computes filenames itself; linking against a
/// library and tagging it with a version both go through this interface.
pub trait SharedLibNames {
    /// The platform shared-library filename (e.g. `libfoo.so.1.2.0`).
    fn filename(&self) -> String;

    /// The import-library filename consumed by Windows-style linkers
    /// (e.g. `foo.lib`).
    fn implib_filename(&self) -> String;

    /// The filename truncated to the major version (e.g. `libfoo.so.1`),
    /// used as the soname.
    fn major_version_filename(&self) -> String;

    /// The full version string (e.g. `1.2.0`).
    fn version(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(SharedLibKind::from_extension(".dylib"), SharedLibKind::Dylib);
        assert_eq!(SharedLibKind::from_extension(".so"), SharedLibKind::So);
        assert_eq!(SharedLibKind::from_extension(".dll"), SharedLibKind::Dll);
        assert_eq!(SharedLibKind::from_extension(".sl"), SharedLibKind::Other);
    }

    #[test]
    fn test_kind_from_extension_without_dot() {
        assert_eq!(SharedLibKind::from_extension("so"), SharedLibKind::So);
        assert_eq!(SharedLibKind::from_extension("dll"), SharedLibKind::Dll);
    }
}
