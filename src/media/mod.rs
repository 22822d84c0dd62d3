//! Media module for record representation and normalization.

pub mod item;
pub mod parser;

pub use item::{AuthorRecord, MediaRecord};
pub use parser::{normalize_author, normalize_illust};
