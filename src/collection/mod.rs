//! Collection traversal.
//!
//! Provides:
//! - Jittered rate limiting of API calls
//! - Walking paginated collections into flat record lists
//! - Expanding followed authors into their works

pub mod expander;
pub mod fetcher;
pub mod rate_limit;

#[cfg(test)]
pub(crate) mod testing;

pub use expander::{ExpandedAuthor, Following, FollowingExpander};
pub use fetcher::{Collected, CollectionFetcher};
pub use rate_limit::RateLimiter;
