//! Output formatting for disk usage reports.
//!
//! This module provides:
//! - [`format`]: pure rendering of a [`Usage`](crate::scanner::Usage) in a [`DisplayMode`]
//! - [`report`]: the [`Reporter`] sink that writes report lines and warnings
//!
//! # Example
//!
//! ```
//! use rustdu::output::{DisplayMode, Reporter, Unit};
//! use rustdu::scanner::Usage;
//! use std::path::Path;
//!
//! let mut reporter = Reporter::new(Vec::new(), Vec::new());
//! reporter
//!     .line(Usage::Bytes(2048), DisplayMode::Fixed(Unit::KIB), Path::new("dir"))
//!     .unwrap();
//! let (out, _) = reporter.into_inner();
//! assert_eq!(out, b"2\tdir\n");
//! ```

pub mod format;
pub mod report;

// Re-export main types
pub use format::{render, DisplayMode, Unit, PREFIXES};
pub use report::{Reporter, WARNING_CONTEXT};
