//! Filesystem module.
//!
//! Provides:
//! - Destination directory layout
//! - Filename derivation and sanitization

pub mod naming;
pub mod paths;

pub use naming::{asset_filename, author_dir_name, sanitize_title};
pub use paths::{author_dir, bookmarks_dir, ensure_dir, plan_record, DestinationPlan};
