//! Normalization of raw service items into records.

use crate::api::types::{RawIllust, RawUserPreview};
use crate::error::{Error, Result};
use crate::media::item::{AuthorRecord, MediaRecord};

/// Normalize a raw work.
///
/// A non-empty multi-page list wins; otherwise the single original image is
/// used, falling back to the large rendition. Title and id pass through.
pub fn normalize_illust(raw: &RawIllust) -> Result<MediaRecord> {
    let id = raw
        .id
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::MalformedResponse("work without id".to_string()))?;

    let assets = if raw.meta_pages.is_empty() {
        let single = raw
            .meta_single_page
            .original_image_url
            .as_ref()
            .or(raw.image_urls.large.as_ref())
            .ok_or_else(|| {
                Error::MalformedResponse(format!("work {} has no asset location", id))
            })?;
        vec![single.clone()]
    } else {
        raw.meta_pages
            .iter()
            .enumerate()
            .map(|(page, meta)| {
                meta.image_urls.original.clone().ok_or_else(|| {
                    Error::MalformedResponse(format!(
                        "work {} page {} has no original image",
                        id, page
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?
    };

    Ok(MediaRecord {
        id,
        title: raw.title.clone().unwrap_or_default(),
        assets,
    })
}

/// Normalize a followed-author entry. Works are fetched separately.
pub fn normalize_author(raw: &RawUserPreview) -> Result<AuthorRecord> {
    let user = raw
        .user
        .as_ref()
        .ok_or_else(|| Error::MalformedResponse("author entry without user".to_string()))?;

    let id = user
        .id
        .filter(|id| *id > 0)
        .ok_or_else(|| Error::MalformedResponse("author without id".to_string()))?;

    Ok(AuthorRecord {
        id,
        display_name: user.name.clone().unwrap_or_default(),
        handle: user.account.clone().unwrap_or_default(),
        works: Vec::new(),
    })
}
