//! Disk usage accumulation over a directory tree.
//!
//! # Overview
//!
//! [`Walker::accumulate`] walks a path with [`walkdir`] in pre-order,
//! following symbolic links, and folds the quantized sizes of everything
//! below it into a single total. Directories are entered at most once per
//! run: each one's (device, inode) identity goes into an
//! [`IdentityCache`], and an identity that is already present is a cycle
//! break. This keeps symlink loops and hard-linked directories from
//! recursing forever or being counted twice.
//!
//! Partial sums live on a stack indexed by depth. When the walk comes back
//! up to a shallower depth, every deeper directory is finished: its line is
//! printed and its total folded into its parent. `walkdir` caps the number
//! of directory handles held open at once, so nesting depth is bounded by
//! memory, not by the file descriptor limit.
//!
//! # Output order
//!
//! Lines are emitted in post-order: every line for a directory's contents
//! precedes the directory's own line. Sibling order is whatever the
//! filesystem enumerates.
//!
//! # Errors
//!
//! Paths that cannot be stat'ed, read or enumerated produce a warning and
//! count as zero. Only allocation failure, output errors and interruption
//! abort the walk.
//!
//! # Example
//!
//! ```no_run
//! use rustdu::output::Reporter;
//! use rustdu::scanner::{UsageOptions, Walker};
//! use std::path::Path;
//!
//! let options = UsageOptions { show_all: true, ..Default::default() };
//! let mut walker = Walker::new(options, Reporter::new(std::io::stdout(), std::io::stderr()));
//! let total = walker.report(Path::new("/var/log")).unwrap();
//! println!("{total:?}");
//! ```

use std::collections::TryReserveError;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::identity::{CacheError, IdentityCache};
use super::quantize::quantize;
use super::{ScanError, StatEntry, Usage, UsageOptions};
use crate::output::Reporter;

/// Directory handles `walkdir` keeps open before buffering the oldest.
const MAX_OPEN_DIRS: usize = 32;

/// Fatal errors that stop a walk.
#[derive(thiserror::Error, Debug)]
pub enum UsageError {
    /// The identity cache could not grow.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The read-mode buffer could not be allocated.
    #[error("failed to allocate {size}-byte read buffer")]
    ReadBuffer {
        /// Requested buffer size (the block size)
        size: u64,
        /// The allocator error
        #[source]
        source: TryReserveError,
    },

    /// A report line or warning could not be written.
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),

    /// Shutdown was requested while walking.
    #[error("interrupted")]
    Interrupted,
}

/// Counters collected over a walker's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Non-directory objects measured
    pub files: u64,
    /// Directories entered
    pub directories: u64,
    /// Directories skipped because their identity was already visited
    pub cycles_skipped: u64,
    /// Soft failures reported
    pub warnings: u64,
}

/// A directory whose subtree is still being walked.
struct Pending {
    path: PathBuf,
    entry: StatEntry,
    depth: usize,
    total: u64,
}

/// Computes rolled-up disk usage and reports it as it goes.
///
/// One walker holds one identity cache for its whole lifetime, so a
/// directory reached again from a later operand is not counted twice.
#[derive(Debug)]
pub struct Walker<O: Write, E: Write> {
    options: UsageOptions,
    reporter: Reporter<O, E>,
    cache: IdentityCache,
    stats: WalkStats,
    shutdown_flag: Option<Arc<AtomicBool>>,
    read_buf: Vec<u8>,
}

impl<O: Write, E: Write> Walker<O, E> {
    /// Create a walker with an empty identity cache.
    ///
    /// The reporter's warning suppression and silence are set from
    /// `options`.
    pub fn new(options: UsageOptions, reporter: Reporter<O, E>) -> Self {
        let reporter = reporter
            .with_suppressed_warnings(options.suppress_warnings)
            .with_silent(options.read_contents);
        Self {
            options,
            reporter,
            cache: IdentityCache::new(),
            stats: WalkStats::default(),
            shutdown_flag: None,
            read_buf: Vec::new(),
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// The flag is polled before every directory entry.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Identity cache shared by every operand of this walker.
    #[must_use]
    pub fn cache(&self) -> &IdentityCache {
        &self.cache
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Consume the walker and return its reporter.
    pub fn into_reporter(self) -> Reporter<O, E> {
        self.reporter
    }

    /// Accumulate `path` and write its own line after all lines below it.
    ///
    /// # Errors
    ///
    /// See [`accumulate`](Self::accumulate).
    pub fn report(&mut self, path: &Path) -> Result<Usage, UsageError> {
        let usage = self.accumulate(path)?;
        self.reporter.line(usage, self.options.mode, path)?;
        self.reporter.flush()?;
        log::debug!(
            "{}: {} files, {} directories, {} cycles skipped, {} warnings",
            path.display(),
            self.stats.files,
            self.stats.directories,
            self.stats.cycles_skipped,
            self.stats.warnings
        );
        Ok(usage)
    }

    /// Compute the usage of `path` without printing its own line.
    ///
    /// Lines for files (with `show_all`) and subdirectories (unless
    /// `summary_only`) are still written as they complete. The operand
    /// itself is always walked, even if an earlier operand already
    /// visited it; only the directories below it are deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError`] on allocation failure, output failure or
    /// interruption. Unreadable paths are warnings, not errors.
    pub fn accumulate(&mut self, path: &Path) -> Result<Usage, UsageError> {
        let mut walk = WalkDir::new(path)
            .follow_links(true)
            .max_open(MAX_OPEN_DIRS)
            .into_iter();
        let mut stack: Vec<Pending> = Vec::new();
        let mut operand: Option<(StatEntry, u64)> = None;

        loop {
            self.check_shutdown()?;
            let Some(next) = walk.next() else { break };

            let dent = match next {
                Ok(dent) => dent,
                Err(err) => {
                    self.walk_error(err, path, &stack)?;
                    continue;
                }
            };
            let depth = dent.depth();
            self.unwind(&mut stack, depth)?;

            let entry = match dent.metadata() {
                Ok(metadata) => StatEntry::from_metadata(&metadata),
                Err(err) => {
                    self.walk_error(err, path, &stack)?;
                    continue;
                }
            };

            if !entry.is_dir {
                let bytes = self.measure_file(dent.path(), &entry)?;
                if depth == 0 {
                    operand = Some((entry, bytes));
                    continue;
                }
                if self.options.show_all {
                    let usage = self.options.view_of(&entry, bytes);
                    self.reporter.line(usage, self.options.mode, dent.path())?;
                }
                if let Some(parent) = stack.last_mut() {
                    parent.total = parent.total.saturating_add(bytes);
                }
                continue;
            }

            if depth == 0 {
                self.enter_operand(&entry)?;
            } else if !self.enter(dent.path(), &entry)? {
                walk.skip_current_dir();
                continue;
            }
            stack.push(Pending {
                path: dent.into_path(),
                entry,
                depth,
                total: 0,
            });
        }

        self.unwind(&mut stack, 1)?;
        if let Some(root) = stack.pop() {
            operand = Some((root.entry, root.total));
        }

        Ok(match operand {
            Some((entry, bytes)) => self.options.view_of(&entry, bytes),
            None => Usage::zero(self.options.view),
        })
    }

    /// Finish every directory below the operand at `depth` or deeper.
    fn unwind(&mut self, stack: &mut Vec<Pending>, depth: usize) -> Result<(), UsageError> {
        while stack.len() > 1 && stack.last().is_some_and(|p| p.depth >= depth) {
            let Some(done) = stack.pop() else { break };
            if let Some(parent) = stack.last_mut() {
                parent.total = parent.total.saturating_add(done.total);
            }
            self.finish_dir(&done.path, &done.entry, done.total)?;
        }
        Ok(())
    }

    /// Turn a `walkdir` failure into a warning, or count a loop.
    fn walk_error(
        &mut self,
        err: walkdir::Error,
        operand: &Path,
        stack: &[Pending],
    ) -> Result<(), UsageError> {
        let path = err.path().unwrap_or(operand).to_path_buf();
        if err.loop_ancestor().is_some() {
            log::debug!("Skipping symlink back to an ancestor: {}", path.display());
            self.stats.cycles_skipped += 1;
            return Ok(());
        }
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other("directory walk failed"));
        let open_dir = stack.last().map(|p| p.path.as_path());
        self.warn(&scan_error(path, source, open_dir))
    }

    fn measure_file(&mut self, path: &Path, entry: &StatEntry) -> Result<u64, UsageError> {
        self.stats.files += 1;
        if self.options.read_contents {
            self.read_file(path)?;
        }
        Ok(quantize(entry.size, self.options.block_size))
    }

    /// Record the operand directory without treating a repeat as a cycle.
    fn enter_operand(&mut self, entry: &StatEntry) -> Result<(), UsageError> {
        if let Some(identity) = entry.identity {
            self.cache.mark_seen(identity)?;
        }
        self.stats.directories += 1;
        Ok(())
    }

    /// Record a directory in the identity cache.
    ///
    /// Returns `false` if it was already visited.
    fn enter(&mut self, path: &Path, entry: &StatEntry) -> Result<bool, UsageError> {
        if let Some(identity) = entry.identity {
            if self.cache.check_and_mark(identity)? {
                log::debug!("Skipping already visited directory: {}", path.display());
                self.stats.cycles_skipped += 1;
                return Ok(false);
            }
        }
        self.stats.directories += 1;
        Ok(true)
    }

    fn finish_dir(&mut self, path: &Path, entry: &StatEntry, bytes: u64) -> Result<(), UsageError> {
        if self.options.summary_only {
            return Ok(());
        }
        let usage = self.options.view_of(entry, bytes);
        self.reporter.line(usage, self.options.mode, path)?;
        Ok(())
    }

    /// Read a file to the end in block-size chunks and discard its contents.
    fn read_file(&mut self, path: &Path) -> Result<(), UsageError> {
        if self.read_buf.is_empty() {
            let size = self.options.block_size.get();
            let len = usize::try_from(size).unwrap_or(usize::MAX);
            self.read_buf
                .try_reserve_exact(len)
                .map_err(|source| UsageError::ReadBuffer { size, source })?;
            self.read_buf.resize(len, 0);
        }
        if let Err(source) = drain(path, &mut self.read_buf) {
            self.warn(&ScanError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }

    fn warn(&mut self, error: &ScanError) -> Result<(), UsageError> {
        self.stats.warnings += 1;
        self.reporter.warn(error)?;
        Ok(())
    }

    fn check_shutdown(&self) -> Result<(), UsageError> {
        if self
            .shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
        {
            log::debug!("Walker: Shutdown requested, stopping traversal");
            return Err(UsageError::Interrupted);
        }
        Ok(())
    }
}

/// Classify a failure on `path`: enumerating the directory still open on
/// the stack, or stat'ing anything else.
fn scan_error(path: PathBuf, source: io::Error, open_dir: Option<&Path>) -> ScanError {
    if open_dir == Some(path.as_path()) {
        ScanError::ReadDir { path, source }
    } else {
        ScanError::Stat { path, source }
    }
}

/// Read `path` to the end, `buf.len()` bytes at a time.
fn drain(path: &Path, buf: &mut [u8]) -> io::Result<()> {
    let mut file = File::open(path)?;
    loop {
        match file.read(buf) {
            Ok(0) => return Ok(()),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
}
