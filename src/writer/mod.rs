//! Transactional writer for the generated configuration header.
//!
//! A [`ConfigWriter`] owns the lifecycle of one `charmony.h`: it opens
//! the file with a do-not-edit banner and inclusion guard, queues the
//! declarations each probe module reports, flushes them as one block
//! (namespaced lines first, then the derived short-name aliases) when
//! the module ends, and closes the guard at the end of the run.
//!
//! The writer is an ordinary owned value; independent writers can
//! coexist, each bound to its own output directory. Calls must follow
//! the lifecycle `open -> (start module -> adds -> end module)* -> close`
//! and anything out of order fails with [`Error::Usage`] rather than
//! corrupting the header.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::mem;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Fixed filename of the generated header.
pub const CHARMONY_H: &str = "charmony.h";

/// Banner and inclusion-guard opener, written right after any prelude.
const HEADER_PREAMBLE: &str = "\
/* Header file auto-generated by charmony.
 * DO NOT EDIT THIS FILE!!
 */

#ifndef H_CHARMONY
#define H_CHARMONY 1

";

/// Inclusion-guard closer.
const HEADER_POSTAMBLE: &str = "#endif /* H_CHARMONY */\n\n";

/// Opener for a short-name alias block. `CHAZ_USE_SHORT_NAMES` is the
/// legacy spelling of the toggle and stays honored.
const SHORT_NAMES_OPEN: &str =
    "\n#if defined(CHY_USE_SHORT_NAMES) || defined(CHAZ_USE_SHORT_NAMES)\n";

/// Closer for a short-name alias block.
const SHORT_NAMES_CLOSE: &str = "#endif /* USE_SHORT_NAMES */\n";

/// One queued finding, flushed at module end.
///
/// Queue order is emission order; the header reads in the order modules
/// reported their results.
#[derive(Debug, Clone)]
enum Declaration {
    Define {
        name: String,
        value: Option<String>,
    },
    Typedef {
        underlying: String,
        alias: String,
    },
    SysInclude(String),
    LocalInclude(String),
}

/// Classify a symbol for namespace-prefix selection.
///
/// Any ASCII lowercase letter anywhere makes the symbol lowercase;
/// everything else, including symbols with no letters at all, counts as
/// uppercase.
fn symbol_is_uppercase(sym: &str) -> bool {
    !sym.chars().any(|c| c.is_ascii_lowercase())
}

/// The namespace prefix for a symbol: `CHY_` or `chy_`.
fn prefix_for(sym: &str) -> &'static str {
    if symbol_is_uppercase(sym) {
        "CHY_"
    } else {
        "chy_"
    }
}

/// Accumulates probe results into the generated `charmony.h`.
#[derive(Debug, Default)]
pub struct ConfigWriter {
    out: Option<BufWriter<File>>,
    path: PathBuf,
    pending: Vec<Declaration>,
    in_module: bool,
    closed: bool,
}

impl ConfigWriter {
    /// Create a writer with all state reset, ready for `open_header`.
    pub fn new() -> Self {
        ConfigWriter::default()
    }

    /// Path of the generated header, once opened.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lifecycle-state description for operations that need the header
    /// open.
    fn closed_or_unopened(&self) -> &'static str {
        if self.closed {
            "after the header was closed"
        } else {
            "before the header was opened"
        }
    }

    /// Write `text` to the open header.
    fn emit(&mut self, operation: &'static str, text: &str) -> Result<()> {
        let result = match self.out.as_mut() {
            Some(out) => out.write_all(text.as_bytes()),
            None => {
                return Err(Error::Usage {
                    operation,
                    state: self.closed_or_unopened(),
                })
            }
        };
        result.map_err(|source| Error::Io {
            action: "write to",
            path: self.path.clone(),
            source,
        })
    }

    fn require_in_module(&self, operation: &'static str) -> Result<()> {
        if self.in_module {
            Ok(())
        } else if self.out.is_none() {
            Err(Error::Usage {
                operation,
                state: self.closed_or_unopened(),
            })
        } else {
            Err(Error::Usage {
                operation,
                state: "outside a probe module",
            })
        }
    }

    /// Create `<dir>/charmony.h`, truncating any previous file, and write
    /// the optional prelude, the do-not-edit banner, and the guard open.
    pub fn open_header(&mut self, dir: &Path, prelude: Option<&str>) -> Result<()> {
        if self.closed {
            return Err(Error::Usage {
                operation: "open_header",
                state: "after the header was closed",
            });
        }
        if self.out.is_some() {
            return Err(Error::Usage {
                operation: "open_header",
                state: "while the header is already open",
            });
        }

        let path = dir.join(CHARMONY_H);
        let file = File::create(&path).map_err(|source| Error::Io {
            action: "create",
            path: path.clone(),
            source,
        })?;
        self.path = path;
        self.out = Some(BufWriter::new(file));
        tracing::debug!("writing {}", self.path.display());

        if let Some(prelude) = prelude {
            self.emit("open_header", prelude)?;
        }
        self.emit("open_header", HEADER_PREAMBLE)
    }

    /// The open header as a raw sink, for collaborators that write
    /// pre-formatted text themselves.
    ///
    /// Bypasses the declaration queue and its ordering guarantees.
    pub fn raw_sink(&mut self) -> Result<&mut dyn Write> {
        let state = self.closed_or_unopened();
        match self.out.as_mut() {
            Some(out) => Ok(out),
            None => Err(Error::Usage {
                operation: "raw_sink",
                state,
            }),
        }
    }

    /// Write formatted text to the header immediately and unconditionally.
    pub fn append_raw(&mut self, text: &str) -> Result<()> {
        self.emit("append_raw", text)
    }

    /// Begin a probe module: emit its comment banner and open the
    /// declaration queue.
    pub fn start_module(&mut self, name: &str) -> Result<()> {
        if self.in_module {
            return Err(Error::Usage {
                operation: "start_module",
                state: "while another module is still open",
            });
        }
        tracing::info!("running {} module", name);
        self.emit("start_module", &format!("\n/* {name} */\n"))?;
        debug_assert!(self.pending.is_empty());
        self.in_module = true;
        Ok(())
    }

    /// Queue a `#define`, optionally with a value.
    pub fn add_define(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        self.require_in_module("add_define")?;
        self.pending.push(Declaration::Define {
            name: name.to_string(),
            value: value.map(str::to_string),
        });
        Ok(())
    }

    /// Queue a `typedef` of `underlying` under the namespaced `alias`.
    pub fn add_typedef(&mut self, underlying: &str, alias: &str) -> Result<()> {
        self.require_in_module("add_typedef")?;
        self.pending.push(Declaration::Typedef {
            underlying: underlying.to_string(),
            alias: alias.to_string(),
        });
        Ok(())
    }

    /// Queue a `#include <...>`.
    pub fn add_sys_include(&mut self, header: &str) -> Result<()> {
        self.require_in_module("add_sys_include")?;
        self.pending
            .push(Declaration::SysInclude(header.to_string()));
        Ok(())
    }

    /// Queue a `#include "..."`.
    pub fn add_local_include(&mut self, header: &str) -> Result<()> {
        self.require_in_module("add_local_include")?;
        self.pending
            .push(Declaration::LocalInclude(header.to_string()));
        Ok(())
    }

    /// End the module: flush queued declarations in insertion order, then
    /// the derived short-name block, then discard the queue.
    pub fn end_module(&mut self) -> Result<()> {
        self.require_in_module("end_module")?;
        let pending = mem::take(&mut self.pending);

        for decl in &pending {
            let line = match decl {
                Declaration::Define { name, value } => {
                    let prefix = prefix_for(name);
                    match value {
                        Some(value) => format!("#define {prefix}{name} {value}\n"),
                        None => format!("#define {prefix}{name}\n"),
                    }
                }
                Declaration::Typedef { underlying, alias } => {
                    let prefix = prefix_for(alias);
                    format!("typedef {underlying} {prefix}{alias};\n")
                }
                Declaration::SysInclude(header) => format!("#include <{header}>\n"),
                Declaration::LocalInclude(header) => format!("#include \"{header}\"\n"),
            };
            self.emit("end_module", &line)?;
        }

        self.emit("end_module", SHORT_NAMES_OPEN)?;
        for decl in &pending {
            // Includes have no short name; a symbol that already spells
            // its own target would redefine itself and is skipped.
            let (sym, target) = match decl {
                Declaration::Define { name, value } => (name, value.as_deref()),
                Declaration::Typedef { underlying, alias } => (alias, Some(underlying.as_str())),
                Declaration::SysInclude(_) | Declaration::LocalInclude(_) => continue,
            };
            if target == Some(sym.as_str()) {
                continue;
            }
            let prefix = prefix_for(sym);
            self.emit("end_module", &format!("  #define {sym} {prefix}{sym}\n"))?;
        }
        self.emit("end_module", SHORT_NAMES_CLOSE)?;
        self.emit("end_module", "\n")?;

        self.in_module = false;
        Ok(())
    }

    /// Open a short-name alias block outside the queue mechanism.
    ///
    /// Pairs with [`end_short_names`](Self::end_short_names) around
    /// `shorten_*` calls or raw alias lines.
    pub fn start_short_names(&mut self) -> Result<()> {
        self.emit("start_short_names", SHORT_NAMES_OPEN)
    }

    /// Close a short-name alias block.
    pub fn end_short_names(&mut self) -> Result<()> {
        self.emit("end_short_names", SHORT_NAMES_CLOSE)
    }

    /// Write one short-name alias line for a macro written via
    /// [`append_raw`](Self::append_raw).
    pub fn shorten_macro(&mut self, sym: &str) -> Result<()> {
        self.emit("shorten_macro", &format!("  #define {sym} CHY_{sym}\n"))
    }

    /// Write one short-name alias line for a typedef written via
    /// [`append_raw`](Self::append_raw).
    pub fn shorten_typedef(&mut self, sym: &str) -> Result<()> {
        self.emit("shorten_typedef", &format!("  #define {sym} chy_{sym}\n"))
    }

    /// Write one short-name alias line for a function written via
    /// [`append_raw`](Self::append_raw).
    pub fn shorten_function(&mut self, sym: &str) -> Result<()> {
        self.emit("shorten_function", &format!("  #define {sym} chy_{sym}\n"))
    }

    /// Write the guard close, flush, and release the header.
    pub fn close_header(&mut self) -> Result<()> {
        if self.in_module {
            return Err(Error::Usage {
                operation: "close_header",
                state: "while a module is still open",
            });
        }
        self.emit("close_header", HEADER_POSTAMBLE)?;
        if let Some(mut out) = self.out.take() {
            if let Err(source) = out.flush() {
                return Err(Error::Io {
                    action: "close",
                    path: self.path.clone(),
                    source,
                });
            }
        }
        self.closed = true;
        tracing::debug!("finished {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_symbol_classification() {
        assert!(symbol_is_uppercase("FOO_BAR"));
        assert!(!symbol_is_uppercase("foo_bar"));
        assert!(symbol_is_uppercase("A1"));
        assert!(!symbol_is_uppercase("a1"));
        assert!(!symbol_is_uppercase("Mixed_Case"));
    }

    #[test]
    fn test_letterless_symbols_classify_uppercase() {
        // With no letters there is no lowercase to find, so symbols of
        // digits and underscores get CHY_.
        assert!(symbol_is_uppercase("123"));
        assert!(symbol_is_uppercase("_"));
        assert!(symbol_is_uppercase(""));
    }

    #[test]
    fn test_add_before_open_is_usage_error() {
        let mut writer = ConfigWriter::new();
        let err = writer.add_define("HAS_FOO", None).unwrap_err();
        assert!(matches!(err, Error::Usage { .. }));
        assert_eq!(
            err.to_string(),
            "add_define called before the header was opened"
        );
    }

    #[test]
    fn test_add_outside_module_is_usage_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut writer = ConfigWriter::new();
        writer.open_header(tmp.path(), None).unwrap();
        let err = writer.add_typedef("int", "my_int").unwrap_err();
        assert_eq!(err.to_string(), "add_typedef called outside a probe module");
    }

    #[test]
    fn test_nested_start_module_is_usage_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut writer = ConfigWriter::new();
        writer.open_header(tmp.path(), None).unwrap();
        writer.start_module("Integers").unwrap();
        let err = writer.start_module("Floats").unwrap_err();
        assert_eq!(
            err.to_string(),
            "start_module called while another module is still open"
        );
    }

    #[test]
    fn test_end_module_without_start_is_usage_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut writer = ConfigWriter::new();
        writer.open_header(tmp.path(), None).unwrap();
        let err = writer.end_module().unwrap_err();
        assert_eq!(err.to_string(), "end_module called outside a probe module");
    }

    #[test]
    fn test_close_inside_module_is_usage_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut writer = ConfigWriter::new();
        writer.open_header(tmp.path(), None).unwrap();
        writer.start_module("Integers").unwrap();
        let err = writer.close_header().unwrap_err();
        assert_eq!(
            err.to_string(),
            "close_header called while a module is still open"
        );
    }

    #[test]
    fn test_reopen_is_usage_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut writer = ConfigWriter::new();
        writer.open_header(tmp.path(), None).unwrap();
        let err = writer.open_header(tmp.path(), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "open_header called while the header is already open"
        );
    }

    #[test]
    fn test_operations_after_close_are_usage_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let mut writer = ConfigWriter::new();
        writer.open_header(tmp.path(), None).unwrap();
        writer.close_header().unwrap();

        let err = writer.start_module("Integers").unwrap_err();
        assert_eq!(
            err.to_string(),
            "start_module called after the header was closed"
        );
        let err = writer.open_header(tmp.path(), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "open_header called after the header was closed"
        );
        assert!(writer.raw_sink().is_err());
    }

    #[test]
    fn test_open_header_create_failure_is_io_error() {
        let mut writer = ConfigWriter::new();
        let err = writer
            .open_header(Path::new("/no/such/directory"), None)
            .unwrap_err();
        assert!(matches!(err, Error::Io { action: "create", .. }));
    }

    #[test]
    fn test_two_writers_are_independent() {
        let tmp_a = tempfile::tempdir().unwrap();
        let tmp_b = tempfile::tempdir().unwrap();
        let mut a = ConfigWriter::new();
        let mut b = ConfigWriter::new();
        a.open_header(tmp_a.path(), None).unwrap();
        b.open_header(tmp_b.path(), None).unwrap();
        a.start_module("OnlyInA").unwrap();
        a.add_define("HAS_A", None).unwrap();
        a.end_module().unwrap();
        a.close_header().unwrap();
        b.close_header().unwrap();

        let text_a = std::fs::read_to_string(tmp_a.path().join(CHARMONY_H)).unwrap();
        let text_b = std::fs::read_to_string(tmp_b.path().join(CHARMONY_H)).unwrap();
        assert!(text_a.contains("#define CHY_HAS_A"));
        assert!(!text_b.contains("HAS_A"));
    }
}
