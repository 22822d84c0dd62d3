//! Running the selected sync jobs.

use std::path::PathBuf;
use std::sync::Arc;

use indicatif::ProgressBar;
use tokio_util::sync::CancellationToken;

use crate::api::{GalleryClient, RetryConfig};
use crate::collection::{CollectionFetcher, RateLimiter};
use crate::config::{Config, Restrict, SyncJob, WorksType};
use crate::download::bookmarks::sync_bookmarks;
use crate::download::following::sync_following;
use crate::download::pipeline::DownloadPipeline;
use crate::download::state::{JobReport, JobState, JobStats, RunSummary};
use crate::error::Error;
use crate::output::create_spinner;

/// Settings shared by every job of a run.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub user_id: u64,
    pub root: PathBuf,
    /// Visibility of the bookmarks and follows to read.
    pub restrict: Restrict,
    pub works_type: WorksType,
    pub concurrency: usize,
    pub isolate_author_failures: bool,
    pub skip_existing: bool,
    pub show_progress: bool,
    pub retry: RetryConfig,
}

impl SyncSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            user_id: config.account.user_id,
            root: config.save_directory(),
            restrict: config.options.bookmark_restrict,
            works_type: config.options.works_type,
            concurrency: config.options.concurrency,
            isolate_author_failures: config.options.isolate_author_failures,
            skip_existing: config.options.skip_existing,
            show_progress: config.options.show_downloads,
            retry: config.retry_config(),
        }
    }
}

/// Everything a job driver needs.
pub struct SyncContext<'a> {
    pub client: &'a dyn GalleryClient,
    pub fetcher: CollectionFetcher,
    pub settings: SyncSettings,
}

impl<'a> SyncContext<'a> {
    /// A download pipeline configured for this run.
    pub fn pipeline(&self) -> DownloadPipeline<'a> {
        DownloadPipeline::new(self.client, self.fetcher.cancel_token().clone())
            .retry(self.settings.retry.clone())
            .concurrency(self.settings.concurrency)
            .skip_existing(self.settings.skip_existing)
            .show_progress(self.settings.show_progress)
    }

    /// Spinner shown while a collection is fetched; hidden when progress is off.
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.settings.show_progress {
            create_spinner(message)
        } else {
            ProgressBar::hidden()
        }
    }
}

/// Runs jobs one after another, each to a terminal state.
///
/// A failed job does not stop the ones after it; an interrupt does.
pub struct SyncOrchestrator<'a> {
    ctx: SyncContext<'a>,
}

impl<'a> SyncOrchestrator<'a> {
    pub fn new(
        client: &'a dyn GalleryClient,
        settings: SyncSettings,
        limiter: Arc<RateLimiter>,
        cancel: CancellationToken,
    ) -> Self {
        let fetcher = CollectionFetcher::new(limiter, settings.retry.clone(), cancel);
        Self {
            ctx: SyncContext {
                client,
                fetcher,
                settings,
            },
        }
    }

    /// Run `jobs` in order and collect their reports.
    pub async fn run(&self, jobs: &[SyncJob]) -> RunSummary {
        let mut summary = RunSummary::default();

        for &job in jobs {
            let report = self.run_job(job).await;
            summary.add_report(report);

            if summary.interrupted {
                tracing::debug!("Interrupted, skipping remaining jobs");
                break;
            }
        }

        summary
    }

    /// Run a single job from `NotStarted` to `Done` or `Failed`.
    pub async fn run_job(&self, job: SyncJob) -> JobReport {
        let mut state = JobState::default();
        let mut stats = JobStats::default();

        tracing::info!("Starting {} job", job);

        let result = match job {
            SyncJob::Bookmarks => sync_bookmarks(&self.ctx, &mut state, &mut stats).await,
            SyncJob::Following => sync_following(&self.ctx, &mut state, &mut stats).await,
        };

        let error = match result {
            Ok(()) => None,
            Err(e) => {
                if let Err(transition) = state.advance(JobState::Failed) {
                    tracing::debug!("{}", transition);
                    state = JobState::Failed;
                }
                match &e {
                    Error::Interrupted => tracing::info!("{} job interrupted", job),
                    e => tracing::error!("{} job failed: {}", job, e),
                }
                Some(e)
            }
        };

        JobReport {
            job,
            state,
            stats,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CollectionRef;
    use crate::collection::testing::{illust, multi_page_illust, user_preview, FakeGallery};

    const ME: u64 = 1;

    fn settings(root: &std::path::Path) -> SyncSettings {
        SyncSettings {
            user_id: ME,
            root: root.to_path_buf(),
            restrict: Restrict::Public,
            works_type: WorksType::Illust,
            concurrency: 2,
            isolate_author_failures: true,
            skip_existing: false,
            show_progress: false,
            retry: RetryConfig::none(),
        }
    }

    fn bookmarks_ref() -> CollectionRef {
        CollectionRef::Bookmarks {
            user_id: ME,
            restrict: Restrict::Public,
        }
    }

    fn following_ref() -> CollectionRef {
        CollectionRef::Following {
            user_id: ME,
            restrict: Restrict::Public,
        }
    }

    fn works_ref(user_id: u64) -> CollectionRef {
        CollectionRef::UserWorks {
            user_id,
            works_type: WorksType::Illust,
        }
    }

    fn orchestrator<'a>(
        gallery: &'a FakeGallery,
        settings: SyncSettings,
        cancel: CancellationToken,
    ) -> SyncOrchestrator<'a> {
        SyncOrchestrator::new(gallery, settings, Arc::new(RateLimiter::disabled()), cancel)
    }

    fn following_gallery() -> FakeGallery {
        FakeGallery::default()
            .with_user_pages(
                following_ref(),
                vec![vec![
                    user_preview(10, "Alice", "alice"),
                    user_preview(20, "B/ob", "bob"),
                ]],
            )
            .with_illust_pages(
                works_ref(20),
                vec![vec![illust(200, "b", "http://x/200_p0.png")]],
            )
    }

    #[tokio::test]
    async fn test_bookmarks_job_writes_all_pages() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = FakeGallery::default().with_illust_pages(
            bookmarks_ref(),
            vec![
                vec![illust(1, "a/b", "http://x/1_p0.jpg")],
                vec![multi_page_illust(
                    2,
                    "c",
                    &["http://x/2_p0.jpg", "http://x/2_p1.jpg"],
                )],
            ],
        );

        let report = orchestrator(&gallery, settings(tmp.path()), CancellationToken::new())
            .run_job(SyncJob::Bookmarks)
            .await;

        assert_eq!(report.state, JobState::Done);
        assert!(report.error.is_none());
        assert_eq!(report.stats.records, 2);
        assert_eq!(report.stats.assets_written, 3);

        let dir = tmp.path().join("bookmarks");
        assert!(dir.join("1_a／b_p0.jpg").is_file());
        assert!(dir.join("2_c_p0.jpg").is_file());
        assert!(dir.join("2_c_p1.jpg").is_file());
    }

    #[tokio::test]
    async fn test_isolated_author_failure_still_writes_siblings() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = following_gallery()
            .failing(works_ref(10), || Error::Network("connection reset".into()));

        let report = orchestrator(&gallery, settings(tmp.path()), CancellationToken::new())
            .run_job(SyncJob::Following)
            .await;

        assert_eq!(report.state, JobState::Done);
        assert_eq!(report.stats.authors, 2);
        assert_eq!(report.stats.authors_failed, 1);
        assert!(!report.is_clean());
        assert!(tmp
            .path()
            .join("following")
            .join("20_B／ob_bob")
            .join("200_b_p0.png")
            .is_file());
        assert!(!tmp.path().join("following").join("10_Alice_alice").exists());
    }

    #[tokio::test]
    async fn test_strict_author_failure_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = following_gallery()
            .failing(works_ref(10), || Error::Network("connection reset".into()));
        let mut settings = settings(tmp.path());
        settings.isolate_author_failures = false;

        let report = orchestrator(&gallery, settings, CancellationToken::new())
            .run_job(SyncJob::Following)
            .await;

        assert_eq!(report.state, JobState::Failed);
        assert!(matches!(report.error, Some(Error::Network(_))));
        assert!(!tmp.path().join("following").exists());
    }

    #[tokio::test]
    async fn test_quota_fails_only_the_affected_job() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = following_gallery().failing(bookmarks_ref(), || Error::QuotaExceeded {
            code: "rate_limit".into(),
            message: "Rate Limit".into(),
        });

        let summary = orchestrator(&gallery, settings(tmp.path()), CancellationToken::new())
            .run(&[SyncJob::Bookmarks, SyncJob::Following])
            .await;

        assert_eq!(summary.reports.len(), 2);
        assert_eq!(summary.reports[0].state, JobState::Failed);
        assert!(matches!(
            summary.reports[0].error,
            Some(Error::QuotaExceeded { .. })
        ));
        assert_eq!(summary.reports[1].state, JobState::Done);
        assert_eq!(summary.totals.assets_written, 1);
        assert!(!summary.interrupted);
    }

    #[tokio::test]
    async fn test_interrupt_stops_remaining_jobs() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = following_gallery();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let summary = orchestrator(&gallery, settings(tmp.path()), cancel)
            .run(&[SyncJob::Following, SyncJob::Bookmarks])
            .await;

        assert!(summary.interrupted);
        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.reports[0].state, JobState::Failed);
        assert!(gallery.page_requests().is_empty());
    }

    #[tokio::test]
    async fn test_private_restrict_reaches_following_listing() {
        let tmp = tempfile::tempdir().unwrap();
        let private_following = CollectionRef::Following {
            user_id: ME,
            restrict: Restrict::Private,
        };
        let gallery = FakeGallery::default()
            .with_user_pages(private_following, vec![vec![user_preview(20, "Bob", "bob")]])
            .with_illust_pages(
                works_ref(20),
                vec![vec![illust(200, "b", "http://x/200_p0.png")]],
            );
        let mut settings = settings(tmp.path());
        settings.restrict = Restrict::Private;

        let report = orchestrator(&gallery, settings, CancellationToken::new())
            .run_job(SyncJob::Following)
            .await;

        assert_eq!(report.state, JobState::Done);
        assert_eq!(gallery.page_requests()[0], private_following);
        assert!(!gallery.page_requests().contains(&following_ref()));
        assert_eq!(report.stats.assets_written, 1);
    }

    #[tokio::test]
    async fn test_empty_bookmarks_complete() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = FakeGallery::default();

        let report = orchestrator(&gallery, settings(tmp.path()), CancellationToken::new())
            .run_job(SyncJob::Bookmarks)
            .await;

        assert_eq!(report.state, JobState::Done);
        assert_eq!(report.stats.records, 0);
        assert!(report.is_clean());
    }
}
