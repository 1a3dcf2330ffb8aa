//! Compiler flag dialects.

/// The command-line flag syntax family of a compiler/linker.
///
/// The dialect is supplied by the driver's compiler-detection layer and
/// fixed for the lifetime of a [`FlagBuilder`](crate::flags::FlagBuilder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Microsoft Visual C++ (`cl.exe`/`link.exe` style flags).
    Msvc,
    /// GCC/Clang style flags.
    Gnu,
    /// Sun Studio style flags.
    SunStudio,
    /// Fallback for compilers that only speak the POSIX c99/cc options.
    Posix,
}

impl Dialect {
    /// Get the dialect name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Msvc => "msvc",
            Dialect::Gnu => "gnu",
            Dialect::SunStudio => "sun-studio",
            Dialect::Posix => "posix",
        }
    }
}
