//! Structured error handling and exit codes.

use serde::Serialize;

use crate::config::ConfigError;
use crate::scanner::{CacheError, UsageError};

/// Exit codes for the rustdu binary.
///
/// - 0: Success (per-path warnings do not change this)
/// - 1: General error (invalid configuration, cache allocation failure, output failure)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Every operand was reported.
    Success = 0,
    /// A fatal error stopped the run.
    GeneralError = 1,
    /// Interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DU000",
            Self::GeneralError => "DU001",
            Self::Interrupted => "DU130",
        }
    }

    /// Exit code for a fatal error returned by [`run_app`](crate::run_app).
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<UsageError>() {
            Some(UsageError::Interrupted) => Self::Interrupted,
            _ => Self::GeneralError,
        }
    }
}

/// Broad category of a fatal error, for machine consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid flags, config file or environment
    Config,
    /// The identity cache could not grow
    Allocation,
    /// Writing the report failed
    Output,
    /// Ctrl+C
    Interrupted,
    /// Anything else
    Other,
}

impl ErrorKind {
    /// Classify an error from [`run_app`](crate::run_app).
    #[must_use]
    pub fn of(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<ConfigError>().is_some() {
            return Self::Config;
        }
        if err.downcast_ref::<CacheError>().is_some() {
            return Self::Allocation;
        }
        match err.downcast_ref::<UsageError>() {
            Some(UsageError::Cache(_) | UsageError::ReadBuffer { .. }) => Self::Allocation,
            Some(UsageError::Output(_)) => Self::Output,
            Some(UsageError::Interrupted) => Self::Interrupted,
            None => Self::Other,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DU001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Error category
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            kind: ErrorKind::of(err),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
