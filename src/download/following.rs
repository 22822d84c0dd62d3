//! Followed-authors job.

use crate::collection::FollowingExpander;
use crate::download::orchestrator::SyncContext;
use crate::download::state::{JobState, JobStats};
use crate::error::Result;
use crate::fs::{author_dir, author_dir_name};
use crate::output::author_progress_line;

/// Write every work of every followed author under
/// `<root>/following/<id>_<name>_<handle>`.
///
/// All authors are expanded before the first download starts. An author
/// whose works could not be listed is counted as failed and skipped; with
/// isolation disabled the expander fails the whole job instead.
pub async fn sync_following(
    ctx: &SyncContext<'_>,
    state: &mut JobState,
    stats: &mut JobStats,
) -> Result<()> {
    let settings = &ctx.settings;
    state.advance(JobState::Fetching)?;

    tracing::info!(
        "Fetching {} follows of user {}...",
        settings.restrict,
        settings.user_id
    );

    let spinner = ctx.spinner("Fetching followed authors and their works...");
    let following = FollowingExpander::new(ctx.client, &ctx.fetcher)
        .restrict(settings.restrict)
        .works_type(settings.works_type)
        .concurrency(settings.concurrency)
        .isolate_failures(settings.isolate_author_failures)
        .expand(settings.user_id)
        .await;
    spinner.finish_and_clear();
    let following = following?;

    stats.malformed_skipped += following.malformed;
    stats.authors = following.authors.len() as u64;
    stats.authors_failed = following.failed_count() as u64;

    state.advance(JobState::Downloading)?;
    let pipeline = ctx.pipeline();
    let total = following.authors.len();

    for (index, expanded) in following.authors.iter().enumerate() {
        let author = &expanded.author;

        if let Some(e) = &expanded.failure {
            tracing::warn!("Skipping {} ({}): {}", author.display_name, author.id, e);
            continue;
        }

        let dir = author_dir(&settings.root, author)?;
        let line = author_progress_line(index, total, &author_dir_name(author)?);
        if settings.show_progress {
            println!("{}", line);
        } else {
            tracing::debug!("{}", line);
        }

        let written = pipeline.run(&author.works, &dir).await?;
        stats.absorb(&written);
    }

    state.advance(JobState::Done)?;
    Ok(())
}
