//! API response type definitions.
//!
//! Fields are optional wherever the service is known to omit them, so a
//! single odd item does not fail the decoding of a whole page. Turning these
//! into well-formed records is the job of [`crate::media::parser`].

use serde::Deserialize;

/// Error body returned by the service on non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// Error details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetails {
    #[serde(default)]
    pub user_message: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub reason: String,
}

impl ErrorDetails {
    /// The most descriptive human message available.
    pub fn human_message(&self) -> &str {
        [&self.user_message, &self.message, &self.reason]
            .into_iter()
            .find(|m| !m.is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A page of works (bookmarks or an author's works).
///
/// The service may answer with status 200 and only an `error` object, so
/// the item list is optional here and checked by the client.
#[derive(Debug, Deserialize)]
pub struct IllustsResponse {
    pub illusts: Option<Vec<RawIllust>>,
    pub next_url: Option<String>,
    pub error: Option<ErrorDetails>,
}

/// A page of followed authors.
#[derive(Debug, Deserialize)]
pub struct UserPreviewsResponse {
    pub user_previews: Option<Vec<RawUserPreview>>,
    pub next_url: Option<String>,
    pub error: Option<ErrorDetails>,
}

/// User detail response, used to verify a session.
#[derive(Debug, Deserialize)]
pub struct UserDetailResponse {
    pub user: RawUser,
}

/// A work as returned by the service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIllust {
    pub id: Option<u64>,
    pub title: Option<String>,
    #[serde(default)]
    pub image_urls: ImageUrls,
    #[serde(default)]
    pub meta_single_page: MetaSinglePage,
    #[serde(default)]
    pub meta_pages: Vec<MetaPage>,
}

/// Image URL set at several sizes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageUrls {
    pub square_medium: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub original: Option<String>,
}

/// Single-page original image location.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaSinglePage {
    pub original_image_url: Option<String>,
}

/// One page of a multi-page work.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetaPage {
    #[serde(default)]
    pub image_urls: ImageUrls,
}

/// A followed author entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUserPreview {
    pub user: Option<RawUser>,
}

/// Author account information.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawUser {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub account: Option<String>,
}
