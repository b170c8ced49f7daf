//! Error types for cache operations.
//!
//! A lookup that finds nothing is not an error: [`MruCache::get`] reports a
//! miss by returning `None`. The variants here cover the two things that can
//! genuinely go wrong, running out of memory while growing the cache and
//! finding the internal structures out of step with each other.
//!
//! [`MruCache::get`]: crate::MruCache::get

extern crate alloc;

use alloc::string::String;
use thiserror::Error;

/// Errors reported by fallible cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The index or the recency ring could not grow to hold a new entry.
    ///
    /// Returned by [`MruCache::try_set`](crate::MruCache::try_set). The cache
    /// is left exactly as it was before the call.
    #[error("failed to reserve space for {additional} more cache entries")]
    AllocationFailed {
        /// Number of entries the cache tried to make room for
        additional: usize,
    },

    /// The hash index and the recency ring disagree.
    ///
    /// Returned by [`MruCache::verify_integrity`](crate::MruCache::verify_integrity).
    #[error("cache structure corrupted: {reason}")]
    Corrupted {
        /// Description of the first violated invariant
        reason: String,
    },
}

/// Result type for cache operations.
pub type Result<T> = core::result::Result<T, CacheError>;
