//! Dialect-aware construction of compiler and linker flag strings.
//!
//! A [`FlagBuilder`] accumulates the flags for exactly one compiler or
//! linker invocation. Every operation appends tokens in the spelling the
//! active dialect expects, deliberately appends nothing when the dialect
//! has no use for the flag, or fails when skipping the flag would
//! silently mis-build the probe.
//!
//! The per-operation `match` blocks below are the single source of truth
//! for dialect spelling. Spacing is part of the contract: `/Fo<file>`
//! concatenates while `-o <file>` takes a separator, and downstream
//! build files depend on the difference.

use crate::core::{Dialect, SharedLibKind, SharedLibNames};
use crate::error::{Error, Result};
use crate::util::push_joined;

/// Minimum Sun toolchain version with `-xldscope` support (Sun Studio 8).
const SUN_LDSCOPE_MIN_VERSION: u32 = 0x550;

/// Accumulates dialect-correct flags for one compiler or linker run.
///
/// The dialect, the compiler identifier (used only in error messages),
/// and the platform shared-library flavor are fixed at construction and
/// come from the driver's detection layers.
#[derive(Debug, Clone)]
pub struct FlagBuilder {
    dialect: Dialect,
    compiler: String,
    shlib_kind: SharedLibKind,
    sun_c_version: Option<u32>,
    accumulated: String,
}

impl FlagBuilder {
    /// Create an empty builder for the given dialect.
    pub fn new(dialect: Dialect, compiler: impl Into<String>, shlib_kind: SharedLibKind) -> Self {
        FlagBuilder {
            dialect,
            compiler: compiler.into(),
            shlib_kind,
            sun_c_version: None,
            accumulated: String::new(),
        }
    }

    /// Record the Sun toolchain version number (e.g. `0x550`).
    ///
    /// Only consulted by [`hide_symbols`](Self::hide_symbols) under the
    /// Sun Studio dialect; unset means "too old for `-xldscope`".
    pub fn with_sun_c_version(mut self, version: u32) -> Self {
        self.sun_c_version = Some(version);
        self
    }

    /// The dialect this builder spells flags for.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// The accumulated flag string.
    pub fn as_str(&self) -> &str {
        &self.accumulated
    }

    /// Append a pre-formatted flag, space-separating it from any flags
    /// already accumulated.
    pub fn append(&mut self, flag: &str) {
        push_joined(&mut self.accumulated, " ", flag);
    }

    /// Reset the accumulated string to empty.
    pub fn clear(&mut self) {
        self.accumulated.clear();
    }

    fn unsupported(&self, operation: &'static str) -> Error {
        Error::Unsupported {
            operation,
            compiler: self.compiler.clone(),
        }
    }

    /// Compile to an object file at `filename`.
    pub fn set_output_obj(&mut self, filename: &str) {
        let flag = match self.dialect {
            Dialect::Msvc => format!("/c /Fo{filename}"),
            _ => format!("-c -o {filename}"),
        };
        self.append(&flag);
    }

    /// Compile and link to an executable at `filename`.
    pub fn set_output_exe(&mut self, filename: &str) {
        let flag = match self.dialect {
            Dialect::Msvc => format!("/Fe{filename}"),
            _ => format!("-o {filename}"),
        };
        self.append(&flag);
    }

    /// Define a preprocessor macro, optionally with a value.
    pub fn add_define(&mut self, name: &str, value: Option<&str>) {
        let define = match self.dialect {
            Dialect::Msvc => "/D",
            _ => "-D ",
        };
        let flag = match value {
            Some(value) => format!("{define}{name}={value}"),
            None => format!("{define}{name}"),
        };
        self.append(&flag);
    }

    /// Add a header search directory.
    pub fn add_include_dir(&mut self, dir: &str) {
        let include = match self.dialect {
            Dialect::Msvc => "/I ",
            _ => "-I ",
        };
        self.append(&format!("{include}{dir}"));
    }

    /// Turn on optimization.
    pub fn enable_optimization(&mut self) {
        let flag = match self.dialect {
            Dialect::Msvc => "/O2",
            Dialect::Gnu => "-O2",
            Dialect::SunStudio => "-xO4",
            Dialect::Posix => "-O 1",
        };
        self.append(flag);
    }

    /// Turn on debugging symbols, where the dialect has a flag for it.
    pub fn enable_debugging(&mut self) {
        if matches!(self.dialect, Dialect::Gnu | Dialect::SunStudio) {
            self.append("-g");
        }
    }

    /// Disable strict-aliasing optimizations.
    ///
    /// MSVC never performs them, so this is a no-op there; a dialect
    /// where we can neither disable nor rule them out is an error.
    pub fn disable_strict_aliasing(&mut self) -> Result<()> {
        match self.dialect {
            Dialect::Msvc => Ok(()),
            Dialect::Gnu => {
                self.append("-fno-strict-aliasing");
                Ok(())
            }
            Dialect::SunStudio => {
                self.append("-xalias_level=any");
                Ok(())
            }
            Dialect::Posix => Err(self.unsupported("disable strict aliasing")),
        }
    }

    /// Treat warnings as errors.
    pub fn set_warnings_as_errors(&mut self) -> Result<()> {
        let flag = match self.dialect {
            Dialect::Msvc => "/WX",
            Dialect::Gnu => "-Werror",
            Dialect::SunStudio => "-errwarn=%all",
            Dialect::Posix => return Err(self.unsupported("set warnings as errors")),
        };
        self.append(flag);
        Ok(())
    }

    /// Compile objects destined for a shared library.
    pub fn compile_shared_lib(&mut self) {
        let flag = match self.dialect {
            Dialect::Msvc => "/MD",
            Dialect::Gnu => match self.shlib_kind {
                SharedLibKind::Dylib => "-fno-common",
                SharedLibKind::So => "-fPIC",
                // MinGW needs no PIC flag; unknown flavors get nothing.
                SharedLibKind::Dll | SharedLibKind::Other => return,
            },
            Dialect::SunStudio => "-KPIC",
            Dialect::Posix => return,
        };
        self.append(flag);
    }

    /// Restrict symbol visibility to explicitly exported ones.
    pub fn hide_symbols(&mut self) {
        match self.dialect {
            Dialect::Gnu => {
                if self.shlib_kind != SharedLibKind::Dll {
                    self.append("-fvisibility=hidden");
                }
            }
            Dialect::SunStudio => {
                if self
                    .sun_c_version
                    .is_some_and(|version| version >= SUN_LDSCOPE_MIN_VERSION)
                {
                    self.append("-xldscope=hidden");
                }
            }
            Dialect::Msvc | Dialect::Posix => {}
        }
    }

    /// Link the output as a shared library.
    pub fn link_shared_lib(&mut self) -> Result<()> {
        let flag = match self.dialect {
            Dialect::Msvc => "/DLL",
            Dialect::Gnu => match self.shlib_kind {
                SharedLibKind::Dylib => "-dynamiclib",
                _ => "-shared",
            },
            Dialect::SunStudio => "-G",
            Dialect::Posix => return Err(self.unsupported("link a shared library")),
        };
        self.append(flag);
        Ok(())
    }

    /// Tag the shared library being linked with its version.
    ///
    /// Dylibs record the full version, ELF shared objects get a soname;
    /// dialects and flavors with no versioning flag append nothing.
    pub fn set_shared_lib_version(&mut self, lib: &dyn SharedLibNames) {
        match self.dialect {
            Dialect::Gnu => match self.shlib_kind {
                SharedLibKind::Dylib => {
                    self.append(&format!("-current_version {}", lib.version()));
                }
                SharedLibKind::So => {
                    self.append(&format!("-Wl,-soname,{}", lib.major_version_filename()));
                }
                SharedLibKind::Dll | SharedLibKind::Other => {}
            },
            Dialect::SunStudio => {
                self.append(&format!("-h {}", lib.major_version_filename()));
            }
            Dialect::Msvc | Dialect::Posix => {}
        }
    }

    /// Name the linker's output file.
    pub fn set_link_output(&mut self, filename: &str) {
        let output = match self.dialect {
            Dialect::Msvc => "/OUT:",
            _ => "-o ",
        };
        self.append(&format!("{output}{filename}"));
    }

    /// Add a library search directory.
    pub fn add_library_path(&mut self, directory: &str) {
        let lib_path = match self.dialect {
            Dialect::Msvc => {
                if directory == "." {
                    // The MS linker searches the current directory by default.
                    return;
                }
                "/LIBPATH:"
            }
            _ => "-L ",
        };
        self.append(&format!("{lib_path}{directory}"));
    }

    /// Link against a shared library built by this probe run.
    ///
    /// MSVC links through the import library; everyone else links the
    /// shared object itself.
    pub fn add_shared_lib(&mut self, lib: &dyn SharedLibNames) {
        let filename = match self.dialect {
            Dialect::Msvc => lib.implib_filename(),
            _ => lib.filename(),
        };
        self.append(&filename);
    }

    /// Link against a system library by bare name.
    pub fn add_external_lib(&mut self, library: &str) {
        let flag = match self.dialect {
            Dialect::Msvc => format!("{library}.lib"),
            _ => format!("-l {library}"),
        };
        self.append(&flag);
    }

    /// Instrument for code coverage.
    pub fn enable_code_coverage(&mut self) -> Result<()> {
        match self.dialect {
            Dialect::Gnu => {
                self.append("--coverage");
                Ok(())
            }
            _ => Err(self.unsupported("enable code coverage")),
        }
    }
}
