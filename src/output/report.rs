//! Line-oriented report sink.
//!
//! Every reported path becomes one `"<value>\t<path>"` line on the output
//! stream. Per-path failures become `"rustdu: <path>: <error>"` lines on the
//! warning stream unless warnings are suppressed. On Unix, paths are written
//! as their raw bytes, so names that are not valid UTF-8 come out unchanged.

use std::io::{self, Write};
use std::path::Path;

use super::format::{render, DisplayMode};
use crate::scanner::{ScanError, Usage};

/// Prefix of every warning line.
pub const WARNING_CONTEXT: &str = "rustdu";

/// Writes report lines and warnings to two streams.
#[derive(Debug)]
pub struct Reporter<O: Write, E: Write> {
    out: O,
    err: E,
    suppress_warnings: bool,
    silent: bool,
}

impl<O: Write, E: Write> Reporter<O, E> {
    /// Create a reporter writing lines to `out` and warnings to `err`.
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            suppress_warnings: false,
            silent: false,
        }
    }

    /// Drop warning lines instead of writing them.
    #[must_use]
    pub fn with_suppressed_warnings(mut self, suppress: bool) -> Self {
        self.suppress_warnings = suppress;
        self
    }

    /// Drop report lines instead of writing them.
    #[must_use]
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Write one report line.
    ///
    /// # Errors
    ///
    /// Returns any error from the output stream.
    pub fn line(&mut self, value: Usage, mode: DisplayMode, path: &Path) -> io::Result<()> {
        if self.silent {
            return Ok(());
        }
        write!(self.out, "{}\t", render(value, mode))?;
        write_path(&mut self.out, path)?;
        self.out.write_all(b"\n")
    }

    /// Report a recoverable failure.
    ///
    /// # Errors
    ///
    /// Returns any error from the warning stream.
    pub fn warn(&mut self, error: &ScanError) -> io::Result<()> {
        log::debug!("Soft failure: {error}");
        if self.suppress_warnings {
            return Ok(());
        }
        write!(self.err, "{WARNING_CONTEXT}: ")?;
        write_path(&mut self.err, error.path())?;
        writeln!(self.err, ": {}", error.message())
    }

    /// Flush both streams.
    ///
    /// # Errors
    ///
    /// Returns the first flush error.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }

    /// Recover the underlying streams.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

#[cfg(unix)]
fn write_path<W: Write>(w: &mut W, path: &Path) -> io::Result<()> {
    use std::os::unix::ffi::OsStrExt;
    w.write_all(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
fn write_path<W: Write>(w: &mut W, path: &Path) -> io::Result<()> {
    write!(w, "{}", path.display())
}
