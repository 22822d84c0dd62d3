//! Materializing records as files.

use std::path::{Path, PathBuf};

use futures::{stream, StreamExt};
use indicatif::ProgressBar;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;

use crate::api::retry::{classify, retry_with_backoff, RetryConfig};
use crate::api::GalleryClient;
use crate::download::state::JobStats;
use crate::error::{Error, Result};
use crate::fs::{ensure_dir, plan_record, sanitize_title};
use crate::media::MediaRecord;
use crate::output::{create_asset_bar, record_progress_line};

/// Suffix of files still being written.
const PART_SUFFIX: &str = ".part";

/// What happened to one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetOutcome {
    Written,
    Skipped,
}

/// One asset scheduled for download.
struct AssetTask<'r> {
    record: &'r MediaRecord,
    record_index: usize,
    page: usize,
    url: String,
    path: PathBuf,
}

/// Downloads every asset of a record list into one directory.
pub struct DownloadPipeline<'a> {
    client: &'a dyn GalleryClient,
    retry: RetryConfig,
    cancel: CancellationToken,
    concurrency: usize,
    skip_existing: bool,
    show_progress: bool,
}

impl<'a> DownloadPipeline<'a> {
    pub fn new(client: &'a dyn GalleryClient, cancel: CancellationToken) -> Self {
        Self {
            client,
            retry: RetryConfig::default(),
            cancel,
            concurrency: 1,
            skip_existing: false,
            show_progress: false,
        }
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Leave files that already exist untouched instead of overwriting them.
    pub fn skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Download all assets of `records` into `dest`, creating it if needed.
    ///
    /// Filenames are fixed before any download starts, so concurrency never
    /// changes which file an asset lands in. The first asset failure (after
    /// request-level retries) aborts the remaining downloads and is returned
    /// once they have cleaned up.
    pub async fn run(&self, records: &[MediaRecord], dest: &Path) -> Result<JobStats> {
        ensure_dir(dest).await?;

        let mut stats = JobStats {
            records: records.len() as u64,
            ..Default::default()
        };

        let mut tasks = Vec::new();
        for (record_index, record) in records.iter().enumerate() {
            let plan = match plan_record(dest, record) {
                Ok(plan) => plan,
                Err(e) => {
                    tracing::warn!("Skipping {} ({}): {}", record.title, record.id, e);
                    stats.malformed_skipped += 1;
                    continue;
                }
            };

            for (page, (url, filename)) in plan.files.into_iter().enumerate() {
                tasks.push(AssetTask {
                    record,
                    record_index,
                    page,
                    url,
                    path: plan.dir.join(filename),
                });
            }
        }

        let bar = if self.show_progress {
            let label = dest.file_name().unwrap_or_default().to_string_lossy();
            create_asset_bar(tasks.len() as u64, &label)
        } else {
            ProgressBar::hidden()
        };
        let total = records.len();

        // Cancelled on the first failure so in-flight downloads wind down
        // and clean up before `run` returns.
        let abort = self.cancel.child_token();

        let mut downloads = stream::iter(tasks)
            .map(|task| {
                if task.page == 0 {
                    let line = record_progress_line(
                        task.record_index,
                        total,
                        &sanitize_title(&task.record.title),
                        task.record.id,
                    );
                    if self.show_progress {
                        bar.println(line);
                    } else {
                        tracing::debug!("{}", line);
                    }
                }
                let bar = &bar;
                let abort = &abort;
                async move {
                    let outcome = self.download_asset(&task.url, &task.path, abort).await;
                    bar.inc(1);
                    outcome
                }
            })
            .buffer_unordered(self.concurrency);

        let mut failure = None;
        while let Some(outcome) = downloads.next().await {
            match outcome {
                Ok(AssetOutcome::Written) => stats.assets_written += 1,
                Ok(AssetOutcome::Skipped) => stats.assets_skipped += 1,
                Err(e) => {
                    if failure.is_none() {
                        abort.cancel();
                        failure = Some(e);
                    }
                }
            }
        }

        if let Some(e) = failure {
            bar.abandon();
            return Err(e);
        }

        bar.finish_and_clear();
        Ok(stats)
    }

    async fn download_asset(
        &self,
        url: &str,
        path: &Path,
        abort: &CancellationToken,
    ) -> Result<AssetOutcome> {
        if abort.is_cancelled() {
            return Err(Error::Interrupted);
        }

        if self.skip_existing && tokio::fs::try_exists(path).await? {
            tracing::debug!("Skipping existing file: {}", path.display());
            return Ok(AssetOutcome::Skipped);
        }

        let bytes = retry_with_backoff(&self.retry, abort, classify, || {
            self.write_asset(url, path, abort)
        })
        .await?;
        tracing::debug!("Downloaded {} ({} bytes)", path.display(), bytes);

        Ok(AssetOutcome::Written)
    }

    /// Stream one asset into a temporary file, then move it into place.
    ///
    /// The temporary file is removed on any failure, including an abort
    /// while the body is still arriving.
    async fn write_asset(
        &self,
        url: &str,
        path: &Path,
        abort: &CancellationToken,
    ) -> Result<u64> {
        let part = part_path(path);

        let result = tokio::select! {
            result = self.stream_to_file(url, &part, path) => result,
            _ = abort.cancelled() => Err(Error::Interrupted),
        };

        if result.is_err() {
            if let Err(e) = tokio::fs::remove_file(&part).await {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Failed to remove {}: {}", part.display(), e);
                }
            }
        }

        result
    }

    async fn stream_to_file(&self, url: &str, part: &Path, path: &Path) -> Result<u64> {
        let mut stream = self.client.fetch_asset(url).await?;
        let mut file = File::create(part).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        drop(file);
        tokio::fs::rename(part, path).await?;
        Ok(written)
    }
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(PART_SUFFIX);
    path.with_file_name(name)
}
