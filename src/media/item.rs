//! Normalized record types.

/// One discoverable work.
///
/// `assets` is never empty and lists the pages in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRecord {
    /// Stable identity within a collection.
    pub id: u64,

    /// Display title; may contain path-unsafe characters.
    pub title: String,

    /// Remote asset locators, one per page.
    pub assets: Vec<String>,
}

/// One followed creator and the works listed for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRecord {
    pub id: u64,
    pub display_name: String,
    /// Account identifier; may contain path-unsafe characters.
    pub handle: String,
    pub works: Vec<MediaRecord>,
}
