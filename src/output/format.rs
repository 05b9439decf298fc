//! Rendering accumulated values as text.
//!
//! Byte totals are shown in one of three modes over a display unit:
//!
//! | Mode        | Output for 1536 bytes, unit 1024 |
//! |-------------|----------------------------------|
//! | `Fixed`     | `2` (ceiling of value / unit)    |
//! | `Float`     | `1.5`                            |
//! | `AutoScale` | `1.5k` (with unit 1)             |
//!
//! Inode numbers and timestamps are never scaled and always render raw.

use std::fmt;
use std::num::NonZeroU64;

use crate::scanner::Usage;

/// Magnitude prefixes in powers of 1024, smallest first.
pub const PREFIXES: [&str; 9] = ["", "k", "M", "G", "T", "P", "E", "Z", "Y"];

/// Significant digits used by the floating modes.
pub const SIGNIFICANT_DIGITS: usize = 6;

/// Bytes per reported unit, at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unit(NonZeroU64);

impl Unit {
    /// One byte per unit.
    pub const BYTE: Self = Self(NonZeroU64::MIN);

    /// 1024 bytes per unit.
    pub const KIB: Self = match NonZeroU64::new(1024) {
        Some(n) => Self(n),
        None => unreachable!(),
    };

    /// Create a unit; `None` for zero.
    #[must_use]
    pub const fn new(bytes: u64) -> Option<Self> {
        match NonZeroU64::new(bytes) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Unit for a prefix from [`PREFIXES`], matched case-insensitively.
    ///
    /// Returns `Err(None)` for an unknown prefix and `Err(Some(index))` if
    /// the prefix is known but `1024^index` does not fit in 64 bits.
    pub fn from_prefix(prefix: &str) -> Result<Self, Option<usize>> {
        let index = PREFIXES
            .iter()
            .position(|p| p.eq_ignore_ascii_case(prefix))
            .ok_or(None)?;
        let exp = u32::try_from(index).map_err(|_| Some(index))?;
        1024u64
            .checked_pow(exp)
            .and_then(Self::new)
            .ok_or(Some(index))
    }

    /// Bytes per unit.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::KIB
    }
}

/// How byte totals are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Whole units, rounded up
    Fixed(Unit),
    /// Fractional units with six significant digits
    Float(Unit),
    /// Fractional units scaled by 1024 with a magnitude prefix
    AutoScale(Unit),
    /// The value as-is
    Raw,
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self::Fixed(Unit::KIB)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(u) => write!(f, "fixed/{}", u.get()),
            Self::Float(u) => write!(f, "float/{}", u.get()),
            Self::AutoScale(u) => write!(f, "autoscale/{}", u.get()),
            Self::Raw => write!(f, "raw"),
        }
    }
}

/// Render `value` for display.
///
/// Inode numbers render as lowercase hexadecimal and timestamps as decimal
/// seconds, whatever `mode` says.
///
/// # Examples
///
/// ```
/// use rustdu::output::{render, DisplayMode, Unit};
/// use rustdu::scanner::Usage;
///
/// assert_eq!(render(Usage::Bytes(1023), DisplayMode::AutoScale(Unit::BYTE)), "1023");
/// assert_eq!(render(Usage::Bytes(1024), DisplayMode::AutoScale(Unit::BYTE)), "1k");
/// assert_eq!(render(Usage::Bytes(3072), DisplayMode::Fixed(Unit::KIB)), "3");
/// ```
#[must_use]
pub fn render(value: Usage, mode: DisplayMode) -> String {
    match value {
        Usage::Bytes(bytes) => render_bytes(bytes, mode),
        Usage::InodeId(inode) => format!("{inode:x}"),
        Usage::Timestamp(secs) => secs.to_string(),
    }
}

fn render_bytes(bytes: u64, mode: DisplayMode) -> String {
    match mode {
        DisplayMode::Fixed(unit) => bytes.div_ceil(unit.get()).to_string(),
        DisplayMode::Float(unit) => format_significant(ratio(bytes, unit), SIGNIFICANT_DIGITS),
        DisplayMode::AutoScale(unit) => {
            let mut value = ratio(bytes, unit);
            let mut scale = 0;
            while value.abs() >= 1024.0 && scale < PREFIXES.len() - 1 {
                scale += 1;
                value /= 1024.0;
            }
            format!(
                "{}{}",
                format_significant(value, SIGNIFICANT_DIGITS),
                PREFIXES[scale]
            )
        }
        DisplayMode::Raw => bytes.to_string(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(bytes: u64, unit: Unit) -> f64 {
    bytes as f64 / unit.get() as f64
}

/// Format `value` with `digits` significant digits, C `%g` style.
///
/// Trailing zeros are dropped; exponent notation is used when the decimal
/// exponent is below -4 or at least `digits`.
///
/// ```
/// use rustdu::output::format::format_significant;
///
/// assert_eq!(format_significant(1.5, 6), "1.5");
/// assert_eq!(format_significant(2.0 / 3.0, 6), "0.666667");
/// assert_eq!(format_significant(1234567.0, 6), "1.23457e+06");
/// ```
#[must_use]
pub fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = digits.max(1);

    // Round to the requested precision first; the exponent can change
    // (9.999995 -> 1.00000e1).
    let sci = format!("{:.*e}", digits - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    let max_exp = i32::try_from(digits).unwrap_or(i32::MAX);
    if exp < -4 || exp >= max_exp {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.unsigned_abs())
    } else {
        let decimals = usize::try_from(max_exp - 1 - exp).unwrap_or(0);
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
