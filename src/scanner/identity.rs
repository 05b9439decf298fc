//! Identity cache for cycle-safe directory traversal.
//!
//! # Overview
//!
//! A directory can be reached more than once: through a symlink that points
//! back at an ancestor, through a bind mount, or on filesystems that allow
//! hard-linked directories. The walker records the (device, inode) identity
//! of every directory it descends into and refuses to descend into the same
//! identity twice. This both guarantees termination and keeps a subtree from
//! being counted more than once.
//!
//! # Layout
//!
//! Identities are spread over [`BUCKET_COUNT`] buckets by `inode mod
//! BUCKET_COUNT`. Each bucket is a vector scanned linearly; its capacity
//! starts at 8 and grows by half each time it fills. Entries are never
//! removed.
//!
//! # Example
//!
//! ```
//! use rustdu::scanner::{FileIdentity, IdentityCache};
//!
//! let mut cache = IdentityCache::new();
//! let id = FileIdentity::new(1, 42);
//!
//! assert!(!cache.has_seen(id));
//! cache.mark_seen(id).unwrap();
//! assert!(cache.has_seen(id));
//! ```

use std::collections::TryReserveError;

use super::FileIdentity;

/// Number of buckets. Must be a power of two.
pub const BUCKET_COUNT: usize = 256;

const INITIAL_BUCKET_CAPACITY: usize = 8;

/// Errors raised by the identity cache.
///
/// These are fatal: traversal cannot continue safely without cycle
/// protection.
#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    /// A bucket could not grow to hold another identity.
    #[error("identity cache allocation failed (bucket {bucket}, {requested} entries)")]
    Allocation {
        /// Index of the bucket that failed to grow
        bucket: usize,
        /// Capacity that was requested
        requested: usize,
        /// The allocator error
        #[source]
        source: TryReserveError,
    },
}

/// Remembers directory identities already visited during one traversal.
///
/// # Thread Safety
///
/// `IdentityCache` is NOT thread-safe. The walker owns one per traversal.
#[derive(Debug)]
pub struct IdentityCache {
    buckets: Vec<Vec<FileIdentity>>,
    len: usize,
}

impl Default for IdentityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityCache {
    /// Create an empty cache. Buckets allocate lazily on first insert.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: vec![Vec::new(); BUCKET_COUNT],
            len: 0,
        }
    }

    /// Bucket index for an identity.
    #[must_use]
    pub fn bucket_index(identity: FileIdentity) -> usize {
        // BUCKET_COUNT is a power of two, so masking is `mod`.
        (identity.inode & (BUCKET_COUNT as u64 - 1)) as usize
    }

    /// Whether `identity` has been marked during this traversal.
    #[must_use]
    pub fn has_seen(&self, identity: FileIdentity) -> bool {
        self.buckets[Self::bucket_index(identity)].contains(&identity)
    }

    /// Record `identity` as visited. Marking an identity twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Allocation`] if the bucket cannot grow.
    pub fn mark_seen(&mut self, identity: FileIdentity) -> Result<(), CacheError> {
        let index = Self::bucket_index(identity);
        let bucket = &mut self.buckets[index];
        if bucket.contains(&identity) {
            return Ok(());
        }

        if bucket.len() == bucket.capacity() {
            let capacity = bucket.capacity();
            let requested = if capacity == 0 {
                INITIAL_BUCKET_CAPACITY
            } else {
                capacity + capacity / 2
            };
            bucket
                .try_reserve_exact(requested - bucket.len())
                .map_err(|source| CacheError::Allocation {
                    bucket: index,
                    requested,
                    source,
                })?;
        }

        bucket.push(identity);
        self.len += 1;
        Ok(())
    }

    /// Check `identity` and record it in one step.
    ///
    /// Returns `true` if it had already been seen.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Allocation`] if the bucket cannot grow.
    pub fn check_and_mark(&mut self, identity: FileIdentity) -> Result<bool, CacheError> {
        if self.has_seen(identity) {
            return Ok(true);
        }
        self.mark_seen(identity)?;
        Ok(false)
    }

    /// Number of distinct identities recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of identities held by one bucket.
    #[must_use]
    pub fn bucket_len(&self, index: usize) -> usize {
        self.buckets.get(index).map_or(0, Vec::len)
    }

    /// Allocated capacity of one bucket.
    #[must_use]
    pub fn bucket_capacity(&self, index: usize) -> usize {
        self.buckets.get(index).map_or(0, Vec::capacity)
    }
}
