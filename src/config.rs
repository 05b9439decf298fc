//! Layered configuration.
//!
//! Settings are merged from, lowest priority first:
//!
//! 1. Built-in defaults (1024-byte blocks and units, warnings on)
//! 2. A TOML file: `--config PATH`, or `rustdu.toml` in the platform config
//!    directory if it exists
//! 3. `RUSTDU_*` environment variables (`RUSTDU_BLOCK_SIZE=4k`)
//! 4. Command-line flags
//!
//! ```toml
//! block_size = "4k"
//! prefix = "M"
//! suppress_warnings = true
//! human = false
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::output::{DisplayMode, Unit};
use crate::scanner::{BlockSize, TimeSelector, UsageOptions, View};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "RUSTDU_";

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "rustdu.toml";

/// Invalid configuration. Always fatal.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The block size could not be parsed.
    #[error("invalid block size {0:?}")]
    InvalidBlockSize(String),

    /// The block size was zero.
    #[error("block size must be at least 1")]
    ZeroBlockSize,

    /// The display prefix is not in the prefix table.
    #[error("unknown suffix {0}")]
    UnknownPrefix(String),

    /// The display unit for a prefix overflows 64 bits.
    #[error("display unit for prefix {0} is too large")]
    PrefixTooLarge(String),

    /// An explicitly named config file does not exist.
    #[error("config file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// The config file or environment could not be parsed.
    #[error("failed to load configuration: {0}")]
    Load(Box<figment::Error>),
}

/// A block size as written in a config file or environment variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeSetting {
    /// Plain number of bytes
    Bytes(u64),
    /// Block-size syntax, e.g. `"4k"` or `"0x1000"`
    Spec(String),
}

impl SizeSetting {
    /// Resolve to a block size.
    ///
    /// # Errors
    ///
    /// See [`parse_block_size`].
    pub fn block_size(&self) -> Result<BlockSize, ConfigError> {
        match self {
            Self::Bytes(n) => BlockSize::new(*n).ok_or(ConfigError::ZeroBlockSize),
            Self::Spec(s) => parse_block_size(s),
        }
    }
}

/// Settings that can come from a file or the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Block size sizes are rounded up to
    #[serde(default)]
    pub block_size: Option<SizeSetting>,
    /// Display unit prefix (`""`, `k`, `M`, ...)
    #[serde(default)]
    pub prefix: Option<String>,
    /// Do not print per-path warnings
    #[serde(default)]
    pub suppress_warnings: bool,
    /// Auto-scale output with magnitude prefixes
    #[serde(default)]
    pub human: bool,
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] or [`ConfigError::Load`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if !p.exists() => return Err(ConfigError::MissingFile(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path().filter(|p| p.exists()),
        };

        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = &file {
            log::debug!("Loading config from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// `rustdu.toml` in the platform-specific config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "rustdu", "rustdu")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Combine this configuration with command-line flags.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an invalid block size or prefix.
    pub fn resolve(&self, cli: &Cli) -> Result<UsageOptions, ConfigError> {
        let block_size = if cli.bytes {
            BlockSize::BYTE
        } else if let Some(spec) = &cli.block_size {
            parse_block_size(spec)?
        } else if let Some(setting) = &self.block_size {
            setting.block_size()?
        } else {
            BlockSize::default()
        };

        let view = if cli.inode {
            View::Inode
        } else if cli.time || cli.atime {
            View::Time
        } else {
            View::Size
        };
        let time = if cli.atime {
            TimeSelector::Accessed
        } else {
            TimeSelector::Modified
        };

        let human = cli.human || self.human;
        let unit = match cli.prefix.as_deref().or(self.prefix.as_deref()) {
            Some(prefix) => parse_prefix(prefix)?,
            None if cli.bytes || human || view != View::Size => Unit::BYTE,
            None => Unit::KIB,
        };
        let mode = if human {
            DisplayMode::AutoScale(unit)
        } else if cli.float {
            DisplayMode::Float(unit)
        } else {
            DisplayMode::Fixed(unit)
        };

        Ok(UsageOptions {
            block_size,
            mode,
            view,
            time,
            show_all: cli.all || cli.bytes,
            summary_only: cli.summarize,
            suppress_warnings: cli.no_warnings || self.suppress_warnings,
            read_contents: cli.read,
        })
    }
}

/// Parse block-size syntax.
///
/// A number in C notation (`0x` hex, leading `0` octal, else decimal;
/// 1 if there are no digits at all) followed by any number of `k`
/// suffixes, each multiplying by 1024.
///
/// # Examples
///
/// ```
/// use rustdu::config::parse_block_size;
///
/// assert_eq!(parse_block_size("512").unwrap().get(), 512);
/// assert_eq!(parse_block_size("4k").unwrap().get(), 4096);
/// assert_eq!(parse_block_size("k").unwrap().get(), 1024);
/// assert_eq!(parse_block_size("0x200").unwrap().get(), 512);
/// ```
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBlockSize`] for trailing garbage or
/// overflow and [`ConfigError::ZeroBlockSize`] for zero.
pub fn parse_block_size(spec: &str) -> Result<BlockSize, ConfigError> {
    let invalid = || ConfigError::InvalidBlockSize(spec.to_string());
    let s = spec.trim();

    let (body, radix) = if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (rest, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };

    let split = body
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(body.len());
    let (digits, suffix) = body.split_at(split);

    let mut value = if digits.is_empty() {
        match radix {
            16 => return Err(invalid()),
            8 => 0,
            _ => 1,
        }
    } else {
        u64::from_str_radix(digits, radix).map_err(|_| invalid())?
    };

    for c in suffix.chars() {
        if c != 'k' {
            return Err(invalid());
        }
        value = value.checked_mul(1024).ok_or_else(invalid)?;
    }

    BlockSize::new(value).ok_or(ConfigError::ZeroBlockSize)
}

/// Display unit for a prefix name.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPrefix`] or [`ConfigError::PrefixTooLarge`].
pub fn parse_prefix(prefix: &str) -> Result<Unit, ConfigError> {
    Unit::from_prefix(prefix).map_err(|e| match e {
        Some(_) => ConfigError::PrefixTooLarge(prefix.to_string()),
        None => ConfigError::UnknownPrefix(prefix.to_string()),
    })
}
