//! rustdu - Disk Usage Accumulator
//!
//! Computes rolled-up storage consumption per subtree with cycle-safe
//! traversal, block quantization and selectable display units.
//!
//! # Modules
//!
//! - [`scanner`]: stat snapshots, identity cache, quantizer and walker
//! - [`output`]: value rendering and the report sink
//! - [`config`]: layered configuration and flag resolution
//! - [`cli`]: command-line definitions
//! - [`error`]: exit codes and structured errors
//! - [`logging`], [`signal`]: ambient process setup

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod signal;

use std::io::{self, BufWriter, Write};

use anyhow::Result;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::Reporter;
use crate::scanner::Walker;
use crate::signal::ShutdownHandler;

/// Run rustdu against the real stdout/stderr.
///
/// # Errors
///
/// Returns an error for invalid configuration, cache allocation failure,
/// output failure or interruption. Per-path failures are warnings only.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    let shutdown = signal::install_handler()?;

    let stdout = io::stdout();
    let stderr = io::stderr();
    run_with(&cli, BufWriter::new(stdout.lock()), stderr.lock(), &shutdown)
}

/// Run rustdu writing the report to `out` and warnings to `err`.
///
/// All operands share one identity cache, so a directory reached again
/// from a later operand is not counted twice.
///
/// # Errors
///
/// See [`run_app`].
pub fn run_with<O: Write, E: Write>(
    cli: &Cli,
    out: O,
    err: E,
    shutdown: &ShutdownHandler,
) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;
    let options = config.resolve(cli)?;
    log::debug!("Resolved options: {options:?}");

    let reporter = Reporter::new(out, err);
    let mut walker = Walker::new(options, reporter).with_shutdown_flag(shutdown.get_flag());

    for path in &cli.paths {
        walker.report(path)?;
    }

    let stats = walker.stats();
    log::info!(
        "Walked {} files in {} directories ({} cycles skipped, {} warnings)",
        stats.files,
        stats.directories,
        stats.cycles_skipped,
        stats.warnings
    );
    log::debug!("Identity cache holds {} directories", walker.cache().len());
    Ok(ExitCode::Success)
}
