//! Configuration structures and loading logic.

use crate::api::RetryConfig;
use crate::config::modes::{Restrict, SyncJob, WorksType};
use crate::error::{Error, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Folder created under the home directory when no save directory is set.
const DEFAULT_SAVE_FOLDER: &str = "pbd";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,

    #[serde(default)]
    pub options: OptionsConfig,
}

/// Account configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Bearer access token, obtained outside this tool.
    #[serde(default)]
    pub access_token: String,

    /// Numeric id of the account whose collections are synced.
    #[serde(default)]
    pub user_id: u64,
}

/// Sync options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Root directory for synced files.
    #[serde(default)]
    pub save_directory: Option<PathBuf>,

    /// Jobs to run, in order.
    #[serde(default = "default_jobs")]
    pub jobs: Vec<SyncJob>,

    /// Which bookmarks and follows to read.
    #[serde(default)]
    pub bookmark_restrict: Restrict,

    /// Kind of works listed for followed authors.
    #[serde(default)]
    pub works_type: WorksType,

    /// Maximum concurrent requests for downloads and author fetches.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Retries of a single failed request on network errors.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base backoff delay between retries.
    #[serde(default = "default_retry_base_delay")]
    pub retry_base_delay_secs: u64,

    /// Fixed part of the delay between API calls.
    #[serde(default = "default_rate_limit_base")]
    pub rate_limit_base_ms: u64,

    /// Random part of the delay between API calls.
    #[serde(default = "default_rate_limit_spread")]
    pub rate_limit_spread_ms: u64,

    /// Keep syncing other authors when one author's works cannot be fetched.
    #[serde(default = "default_true")]
    pub isolate_author_failures: bool,

    /// Skip assets whose file already exists instead of overwriting them.
    #[serde(default)]
    pub skip_existing: bool,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            save_directory: None,
            jobs: default_jobs(),
            bookmark_restrict: Restrict::default(),
            works_type: WorksType::default(),
            concurrency: default_concurrency(),
            max_retries: default_max_retries(),
            retry_base_delay_secs: default_retry_base_delay(),
            rate_limit_base_ms: default_rate_limit_base(),
            rate_limit_spread_ms: default_rate_limit_spread(),
            isolate_author_failures: true,
            skip_existing: false,
            show_downloads: true,
        }
    }
}

fn default_jobs() -> Vec<SyncJob> {
    vec![SyncJob::Following, SyncJob::Bookmarks]
}

fn default_concurrency() -> usize {
    4
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_base_delay() -> u64 {
    2
}

fn default_rate_limit_base() -> u64 {
    100
}

fn default_rate_limit_spread() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the effective save directory.
    pub fn save_directory(&self) -> PathBuf {
        self.options
            .save_directory
            .clone()
            .unwrap_or_else(default_save_directory)
    }

    /// Jobs to run, deduplicated, in configured order.
    pub fn jobs(&self) -> Vec<SyncJob> {
        let mut jobs = Vec::new();
        for job in &self.options.jobs {
            if !jobs.contains(job) {
                jobs.push(*job);
            }
        }
        jobs
    }

    /// Request retry settings.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.options.max_retries,
            base_delay_secs: self.options.retry_base_delay_secs,
            max_delay_secs: RetryConfig::default().max_delay_secs,
        }
    }

    /// Fixed and random parts of the delay between API calls.
    pub fn rate_limit(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.options.rate_limit_base_ms),
            Duration::from_millis(self.options.rate_limit_spread_ms),
        )
    }
}

/// `<home>/pbd`, or `./pbd` when no home directory is known.
fn default_save_directory() -> PathBuf {
    UserDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_SAVE_FOLDER))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_FOLDER))
}
