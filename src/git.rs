//! Git operations and repository management.

pub mod diff;
pub mod repository;

pub use diff::{ExcludeMatcher, StagedDiff};
pub use repository::GitRepository;

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;
