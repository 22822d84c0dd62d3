//! Bookmarks job.

use crate::api::CollectionRef;
use crate::download::orchestrator::SyncContext;
use crate::download::state::{JobState, JobStats};
use crate::error::Result;
use crate::fs::bookmarks_dir;

/// Fetch the caller's bookmarked works and write them under `<root>/bookmarks`.
pub async fn sync_bookmarks(
    ctx: &SyncContext<'_>,
    state: &mut JobState,
    stats: &mut JobStats,
) -> Result<()> {
    let settings = &ctx.settings;
    state.advance(JobState::Fetching)?;

    tracing::info!(
        "Fetching {} bookmarks of user {}...",
        settings.restrict,
        settings.user_id
    );

    let collection = CollectionRef::Bookmarks {
        user_id: settings.user_id,
        restrict: settings.restrict,
    };
    let spinner = ctx.spinner("Fetching bookmarks...");
    let collected = ctx.fetcher.fetch_works(ctx.client, collection).await;
    spinner.finish_and_clear();
    let collected = collected?;
    stats.malformed_skipped += collected.malformed;

    tracing::info!(
        "Found {} bookmarked works across {} pages",
        collected.records.len(),
        collected.pages
    );

    state.advance(JobState::Downloading)?;
    let written = ctx
        .pipeline()
        .run(&collected.records, &bookmarks_dir(&settings.root))
        .await?;
    stats.absorb(&written);

    state.advance(JobState::Done)?;
    Ok(())
}
