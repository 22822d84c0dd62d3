//! Filename derivation for synced assets.

use crate::error::{Error, Result};
use crate::media::{AuthorRecord, MediaRecord};

/// Stand-in for `/` in titles and author names (full-width solidus).
pub const SLASH_SUBSTITUTE: char = '／';

/// Make a display string safe to embed in a single path component.
///
/// `/` becomes a full-width slash so titles never create subdirectories.
/// NUL, which no filesystem accepts, becomes `_`.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' => SLASH_SUBSTITUTE,
            '\0' => '_',
            c => c,
        })
        .collect()
}

/// Suffix of an asset URL used in its local filename.
///
/// Takes the last path segment and keeps what follows its last `_`,
/// e.g. `.../12345_p0.jpg` → `p0.jpg`.
pub fn asset_suffix(url: &str) -> Result<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let basename = path.rsplit('/').next().unwrap_or(path);
    let suffix = basename.rsplit('_').next().unwrap_or(basename);

    if suffix.is_empty() || suffix == "." || suffix == ".." {
        return Err(Error::InvalidFilename(format!(
            "Cannot derive a filename from asset URL: '{}'",
            url
        )));
    }

    Ok(suffix.to_string())
}

/// Local filename of one asset: `{id}_{title}_{suffix}`.
pub fn asset_filename(record: &MediaRecord, url: &str) -> Result<String> {
    Ok(format!(
        "{}_{}_{}",
        record.id,
        sanitize_title(&record.title),
        asset_suffix(url)?
    ))
}

/// Directory name of a followed author: `{id}_{name}_{handle}`.
pub fn author_dir_name(author: &AuthorRecord) -> Result<String> {
    let name = sanitize_title(&format!(
        "{}_{}_{}",
        author.id, author.display_name, author.handle
    ));

    if name == "." || name == ".." {
        return Err(Error::InvalidFilename(format!(
            "Invalid author directory name: '{}'",
            name
        )));
    }

    Ok(name)
}
