//! Block quantization of byte counts.
//!
//! Files occupy whole allocation blocks on disk, so a file's usage is its
//! length rounded up to a multiple of the block size. A block size of 1
//! reports exact byte counts.

use std::fmt;
use std::num::NonZeroU64;

/// A block size of at least one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockSize(NonZeroU64);

impl BlockSize {
    /// Exact byte accounting: no rounding.
    pub const BYTE: Self = Self(NonZeroU64::MIN);

    /// The default block size of 1024 bytes.
    pub const KIB: Self = match NonZeroU64::new(1024) {
        Some(n) => Self(n),
        None => unreachable!(),
    };

    /// Create a block size; `None` for zero.
    #[must_use]
    pub const fn new(bytes: u64) -> Option<Self> {
        match NonZeroU64::new(bytes) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Block size in bytes.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        Self::KIB
    }
}

impl fmt::Display for BlockSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Round `raw` up to the nearest multiple of `block_size`.
///
/// Saturates at the largest block multiple representable in a `u64`.
///
/// # Examples
///
/// ```
/// use rustdu::scanner::{quantize, BlockSize};
///
/// assert_eq!(quantize(0, BlockSize::KIB), 0);
/// assert_eq!(quantize(1, BlockSize::KIB), 1024);
/// assert_eq!(quantize(1025, BlockSize::KIB), 2048);
/// assert_eq!(quantize(1025, BlockSize::BYTE), 1025);
/// ```
#[must_use]
pub fn quantize(raw: u64, block_size: BlockSize) -> u64 {
    let block = u128::from(block_size.get());
    if block == 1 {
        return raw;
    }
    let rounded = u128::from(raw).div_ceil(block) * block;
    u64::try_from(rounded).unwrap_or(u64::MAX / block_size.get() * block_size.get())
}
