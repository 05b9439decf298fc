//! Scanner module for disk usage accumulation.
//!
//! This module provides functionality for:
//! - Stat snapshots of filesystem objects ([`StatEntry`])
//! - Cycle detection via (device, inode) identities ([`IdentityCache`])
//! - Block quantization of file sizes ([`quantize`])
//! - Post-order directory accumulation ([`Walker`])
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`identity`]: Bucketed cache of visited directory identities
//! - [`quantize`]: Rounding byte counts up to a block multiple
//! - [`walker`]: `walkdir`-driven traversal that folds subtree totals
//!
//! # Example
//!
//! ```no_run
//! use rustdu::output::Reporter;
//! use rustdu::scanner::{UsageOptions, Walker};
//! use std::path::Path;
//!
//! let reporter = Reporter::new(std::io::stdout(), std::io::stderr());
//! let mut walker = Walker::new(UsageOptions::default(), reporter);
//! walker.report(Path::new(".")).unwrap();
//! ```

pub mod identity;
pub mod quantize;
pub mod walker;

use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::output::DisplayMode;

// Re-export main types
pub use identity::{CacheError, IdentityCache, BUCKET_COUNT};
pub use quantize::{quantize, BlockSize};
pub use walker::{UsageError, WalkStats, Walker};

/// The (device, serial number) pair naming a filesystem object.
///
/// Two paths with the same identity refer to the same object, whether they
/// were reached through a hard link or by re-entering a directory through
/// a symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    /// Device the object lives on
    pub device: u64,
    /// Inode (file serial number) on that device
    pub inode: u64,
}

impl FileIdentity {
    /// Create an identity from raw device and inode numbers.
    #[must_use]
    pub const fn new(device: u64, inode: u64) -> Self {
        Self { device, inode }
    }

    /// Extract the identity from file metadata.
    ///
    /// Returns `None` on platforms that do not expose device/inode numbers.
    #[cfg(unix)]
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self::new(metadata.dev(), metadata.ino()))
    }

    #[cfg(not(unix))]
    #[must_use]
    pub fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }
}

/// Stat snapshot of a single filesystem object.
///
/// Captured once by the walker and discarded after the object has been
/// folded into its parent's total.
#[derive(Debug, Clone)]
pub struct StatEntry {
    /// Whether the object (after following symlinks) is a directory
    pub is_dir: bool,
    /// Length in bytes as reported by the filesystem
    pub size: u64,
    /// Modification time, seconds since the Unix epoch
    pub modified: i64,
    /// Access time, seconds since the Unix epoch
    pub accessed: i64,
    /// Device/inode identity, if the platform provides one
    pub identity: Option<FileIdentity>,
}

impl StatEntry {
    /// Stat `path`, following symbolic links.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Stat`] if the path cannot be stat'ed, including
    /// dangling symlinks.
    pub fn stat(path: &Path) -> Result<Self, ScanError> {
        std::fs::metadata(path)
            .map(|m| Self::from_metadata(&m))
            .map_err(|source| ScanError::Stat {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Build a snapshot from already-fetched metadata.
    #[must_use]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            is_dir: metadata.is_dir(),
            size: metadata.len(),
            modified: epoch_seconds(metadata.modified()),
            accessed: epoch_seconds(metadata.accessed()),
            identity: FileIdentity::from_metadata(metadata),
        }
    }

    /// Inode number, or 0 when the platform has none.
    #[must_use]
    pub fn inode(&self) -> u64 {
        self.identity.map_or(0, |id| id.inode)
    }

    /// Timestamp selected by `time`.
    #[must_use]
    pub fn time(&self, time: TimeSelector) -> i64 {
        match time {
            TimeSelector::Modified => self.modified,
            TimeSelector::Accessed => self.accessed,
        }
    }
}

fn epoch_seconds(time: io::Result<SystemTime>) -> i64 {
    let Ok(time) = time else {
        return 0;
    };
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        Err(e) => i64::try_from(e.duration().as_secs()).map_or(i64::MIN, |s| -s),
    }
}

/// The quantity reported for a visited node.
///
/// Which variant is produced is fixed by [`View`] when the walk is
/// configured; summation always happens on byte totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    /// Quantized byte total
    Bytes(u64),
    /// The node's own inode number
    InodeId(u64),
    /// The node's own modification or access time (epoch seconds)
    Timestamp(i64),
}

impl Usage {
    /// The zero value for `view`, used for paths that could not be stat'ed.
    #[must_use]
    pub fn zero(view: View) -> Self {
        match view {
            View::Size => Self::Bytes(0),
            View::Inode => Self::InodeId(0),
            View::Time => Self::Timestamp(0),
        }
    }
}

/// Which quantity each reported node shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// Rolled-up quantized size
    #[default]
    Size,
    /// The node's inode number
    Inode,
    /// The node's modification or access time
    Time,
}

/// Which timestamp [`View::Time`] reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeSelector {
    /// Last modification time
    #[default]
    Modified,
    /// Last access time
    Accessed,
}

/// Options for one accumulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageOptions {
    /// Allocation granularity sizes are rounded up to
    pub block_size: BlockSize,
    /// How byte totals are rendered
    pub mode: DisplayMode,
    /// Which quantity is reported per node
    pub view: View,
    /// Timestamp used by [`View::Time`]
    pub time: TimeSelector,
    /// Print a line for every file, not just directories
    pub show_all: bool,
    /// Only print the line for each operand
    pub summary_only: bool,
    /// Do not print per-path warnings
    pub suppress_warnings: bool,
    /// Read every file's contents and print nothing
    pub read_contents: bool,
}

impl Default for UsageOptions {
    fn default() -> Self {
        Self {
            block_size: BlockSize::KIB,
            mode: DisplayMode::default(),
            view: View::Size,
            time: TimeSelector::Modified,
            show_all: false,
            summary_only: false,
            suppress_warnings: false,
            read_contents: false,
        }
    }
}

impl UsageOptions {
    /// Apply the view selector to a node's byte total.
    #[must_use]
    pub fn view_of(&self, entry: &StatEntry, bytes: u64) -> Usage {
        match self.view {
            View::Size => Usage::Bytes(bytes),
            View::Inode => Usage::InodeId(entry.inode()),
            View::Time => Usage::Timestamp(entry.time(self.time)),
        }
    }
}

/// Recoverable, per-path failures.
///
/// These are reported as warnings and the affected path contributes zero
/// to any enclosing total.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The path could not be stat'ed.
    #[error("{}: {}", .path.display(), system_message(.source))]
    Stat {
        /// Path that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A directory could not be opened or enumerated.
    #[error("{}: {}", .path.display(), system_message(.source))]
    ReadDir {
        /// Directory that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A file's contents could not be read.
    #[error("{}: {}", .path.display(), system_message(.source))]
    Read {
        /// File that failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    /// Path the failure refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Stat { path, .. } | Self::ReadDir { path, .. } | Self::Read { path, .. } => path,
        }
    }

    /// The system's description of the failure, without the path.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Stat { source, .. } | Self::ReadDir { source, .. } | Self::Read { source, .. } => {
                system_message(source)
            }
        }
    }

    /// Kind of the underlying I/O error.
    #[must_use]
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            Self::Stat { source, .. } | Self::ReadDir { source, .. } | Self::Read { source, .. } => {
                source.kind()
            }
        }
    }
}

/// The system's error text without Rust's `(os error N)` suffix.
fn system_message(err: &io::Error) -> String {
    let text = err.to_string();
    match text.rfind(" (os error ") {
        Some(idx) => text[..idx].to_string(),
        None => text,
    }
}
