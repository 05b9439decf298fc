//! Command-line interface definitions for rustdu.
//!
//! The flags follow the classic single-letter `du` set. `-h` selects
//! auto-scaled output, so help is only available as `--help`.
//!
//! # Example
//!
//! ```bash
//! # Per-directory usage in 1024-byte units
//! rustdu ~/src
//!
//! # Every file, exact byte counts
//! rustdu -n ~/src
//!
//! # One auto-scaled total per operand
//! rustdu -sh /var/log /tmp
//!
//! # 4 KiB blocks, reported in MiB with fractions
//! rustdu -b 4k -e -p M ~/src
//! ```

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Summarize disk usage of each FILE, recursively for directories.
#[derive(Debug, Parser)]
#[command(name = "rustdu")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Report every file, not just directories
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Round file sizes up to multiples of SIZE (e.g. 512, 4k, 0x1000)
    #[arg(short = 'b', long = "block-size", value_name = "SIZE", conflicts_with = "bytes")]
    pub block_size: Option<String>,

    /// Print fractional units with six significant digits
    #[arg(short = 'e', long = "float")]
    pub float: bool,

    /// Do not print warnings about unreadable paths
    #[arg(short = 'f', long = "no-warnings")]
    pub no_warnings: bool,

    /// Auto-scale values with k, M, G, ... prefixes
    #[arg(short = 'h', long = "human")]
    pub human: bool,

    /// Report every file in exact bytes (implies -a, block size 1, unit 1)
    #[arg(short = 'n', long = "bytes", conflicts_with = "prefix")]
    pub bytes: bool,

    /// Report in units of PFX (k, M, G, T, P, E; empty for bytes)
    #[arg(short = 'p', long = "prefix", value_name = "PFX")]
    pub prefix: Option<String>,

    /// Report each path's inode number (hexadecimal) instead of its size
    #[arg(short = 'q', long = "inode")]
    pub inode: bool,

    /// Read every file to the end and print nothing
    #[arg(short = 'r', long = "read")]
    pub read: bool,

    /// Only report a total for each FILE operand
    #[arg(short = 's', long = "summarize")]
    pub summarize: bool,

    /// Report modification times instead of sizes
    #[arg(short = 't', long = "time")]
    pub time: bool,

    /// Report access times instead of sizes (implies -t)
    #[arg(short = 'u', long = "atime")]
    pub atime: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Configuration file (default: rustdu.toml in the config directory)
    #[arg(long, value_name = "PATH", env = "RUSTDU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,

    /// Files and directories to measure
    #[arg(value_name = "FILE", default_value = ".")]
    pub paths: Vec<PathBuf>,
}
