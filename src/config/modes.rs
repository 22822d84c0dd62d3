//! Sync job and collection option definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Independently selectable sync jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncJob {
    /// Works bookmarked by the account.
    Bookmarks,
    /// Works of every followed author.
    Following,
}

impl SyncJob {
    /// Name of the destination subtree under the save directory.
    pub fn folder_name(&self) -> &'static str {
        match self {
            SyncJob::Bookmarks => "bookmarks",
            SyncJob::Following => "following",
        }
    }
}

impl fmt::Display for SyncJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder_name())
    }
}

impl FromStr for SyncJob {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bookmarks" => Ok(SyncJob::Bookmarks),
            "following" => Ok(SyncJob::Following),
            _ => Err(format!("Unknown sync job: {}", s)),
        }
    }
}

/// Visibility of bookmarks and follows to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Restrict {
    #[default]
    Public,
    Private,
}

impl fmt::Display for Restrict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Restrict::Public => write!(f, "public"),
            Restrict::Private => write!(f, "private"),
        }
    }
}

/// Kind of works listed for a followed author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorksType {
    #[default]
    Illust,
    Manga,
}

impl fmt::Display for WorksType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorksType::Illust => write!(f, "illust"),
            WorksType::Manga => write!(f, "manga"),
        }
    }
}
