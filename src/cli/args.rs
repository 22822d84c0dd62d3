//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{parse_user_id, Config, Restrict, SyncJob, WorksType};
use crate::error::Result;

/// Pixiv collection sync CLI.
#[derive(Parser, Debug)]
#[command(
    name = "pixiv-sync",
    version,
    about = "Sync bookmarked and followed-author works from Pixiv",
    long_about = "Download every bookmarked work and every work of every followed author \
                  into a local directory tree.\n\n\
                  Bookmarks land in <dir>/bookmarks, followed authors in \
                  <dir>/following/<id>_<name>_<account>."
)]
pub struct Args {
    /// Sync bookmarked works.
    #[arg(short, long)]
    pub bookmarks: bool,

    /// Sync works of followed authors.
    #[arg(short, long)]
    pub following: bool,

    /// Base directory for synced files.
    #[arg(short = 'd', long = "directory")]
    pub save_directory: Option<PathBuf>,

    /// Access token.
    #[arg(short, long, env = "PIXIV_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Your user id or profile URL.
    #[arg(short, long, env = "PIXIV_USER_ID")]
    pub user: Option<String>,

    /// Read private bookmarks and follows instead of public ones.
    #[arg(long)]
    pub private: bool,

    /// Kind of works to list for followed authors.
    #[arg(long, value_enum)]
    pub works_type: Option<WorksTypeArg>,

    /// Maximum concurrent requests.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Skip assets that already exist on disk.
    #[arg(long)]
    pub skip_existing: bool,

    /// Abort the following job when any single author fails.
    #[arg(long)]
    pub strict_authors: bool,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI works type argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WorksTypeArg {
    Illust,
    Manga,
}

impl From<WorksTypeArg> for WorksType {
    fn from(arg: WorksTypeArg) -> Self {
        match arg {
            WorksTypeArg::Illust => WorksType::Illust,
            WorksTypeArg::Manga => WorksType::Manga,
        }
    }
}

impl Args {
    /// Jobs explicitly selected on the command line, if any.
    pub fn selected_jobs(&self) -> Vec<SyncJob> {
        let mut jobs = Vec::new();
        if self.following {
            jobs.push(SyncJob::Following);
        }
        if self.bookmarks {
            jobs.push(SyncJob::Bookmarks);
        }
        jobs
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) -> Result<()> {
        let jobs = self.selected_jobs();
        if !jobs.is_empty() {
            config.options.jobs = jobs;
        }

        if let Some(token) = self.token {
            config.account.access_token = token;
        }

        if let Some(user) = self.user {
            config.account.user_id = parse_user_id(&user)?;
        }

        if let Some(dir) = self.save_directory {
            config.options.save_directory = Some(dir);
        }

        if let Some(works_type) = self.works_type {
            config.options.works_type = works_type.into();
        }

        if let Some(concurrency) = self.concurrency {
            config.options.concurrency = concurrency;
        }

        // Boolean flags (only override if set to non-default)
        if self.private {
            config.options.bookmark_restrict = Restrict::Private;
        }

        if self.skip_existing {
            config.options.skip_existing = true;
        }

        if self.strict_authors {
            config.options.isolate_author_failures = false;
        }

        if self.quiet {
            config.options.show_downloads = false;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("pixiv-sync").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_job_flags_override_config_jobs() {
        let mut config = Config::default();
        parse(&["--bookmarks"]).merge_into_config(&mut config).unwrap();
        assert_eq!(config.jobs(), vec![SyncJob::Bookmarks]);
    }

    #[test]
    fn test_no_job_flags_keep_config_jobs() {
        let mut config = Config::default();
        parse(&[]).merge_into_config(&mut config).unwrap();
        assert_eq!(config.jobs(), vec![SyncJob::Following, SyncJob::Bookmarks]);
    }

    #[test]
    fn test_user_accepts_profile_url() {
        let mut config = Config::default();
        parse(&["--user", "https://www.pixiv.net/users/4321", "--private", "--quiet"])
            .merge_into_config(&mut config)
            .unwrap();
        assert_eq!(config.account.user_id, 4321);
        assert_eq!(config.options.bookmark_restrict, Restrict::Private);
        assert!(!config.options.show_downloads);
    }

    #[test]
    fn test_invalid_user_is_rejected() {
        let mut config = Config::default();
        assert!(parse(&["--user", "nobody"])
            .merge_into_config(&mut config)
            .is_err());
    }
}
