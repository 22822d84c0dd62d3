//! Destination directories and per-record plans.

use std::path::{Path, PathBuf};

use crate::config::SyncJob;
use crate::error::Result;
use crate::fs::naming::{asset_filename, author_dir_name};
use crate::media::{AuthorRecord, MediaRecord};

/// Resolved filesystem target for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationPlan {
    pub dir: PathBuf,
    /// `(asset url, filename)` in page order.
    pub files: Vec<(String, String)>,
}

/// Plan where each asset of `record` goes under `dir`.
pub fn plan_record(dir: &Path, record: &MediaRecord) -> Result<DestinationPlan> {
    let files = record
        .assets
        .iter()
        .map(|url| Ok((url.clone(), asset_filename(record, url)?)))
        .collect::<Result<Vec<_>>>()?;

    Ok(DestinationPlan {
        dir: dir.to_path_buf(),
        files,
    })
}

/// `<root>/bookmarks`.
pub fn bookmarks_dir(root: &Path) -> PathBuf {
    root.join(SyncJob::Bookmarks.folder_name())
}

/// `<root>/following/<id>_<name>_<handle>`.
pub fn author_dir(root: &Path, author: &AuthorRecord) -> Result<PathBuf> {
    Ok(root
        .join(SyncJob::Following.folder_name())
        .join(author_dir_name(author)?))
}

/// Ensure a directory exists, creating parents as needed.
pub async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}
