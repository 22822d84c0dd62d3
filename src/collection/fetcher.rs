//! Walking a paginated collection to completion.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::retry::{classify, retry_with_backoff, RetryConfig};
use crate::api::{CollectionRef, GalleryClient, Page, PageCursor};
use crate::collection::rate_limit::RateLimiter;
use crate::error::{Error, Result};
use crate::media::{normalize_author, normalize_illust, AuthorRecord, MediaRecord};

/// Records gathered from one collection walk.
#[derive(Debug, Clone)]
pub struct Collected<R> {
    /// Normalized records, in service page-then-item order.
    pub records: Vec<R>,
    /// Items dropped because they could not be normalized.
    pub malformed: u64,
    /// Pages fetched.
    pub pages: u64,
}

impl<R> Default for Collected<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            malformed: 0,
            pages: 0,
        }
    }
}

/// Walks paginated collections with pacing, retry and cancellation.
#[derive(Clone)]
pub struct CollectionFetcher {
    limiter: Arc<RateLimiter>,
    retry: RetryConfig,
    cancel: CancellationToken,
}

impl CollectionFetcher {
    pub fn new(limiter: Arc<RateLimiter>, retry: RetryConfig, cancel: CancellationToken) -> Self {
        Self {
            limiter,
            retry,
            cancel,
        }
    }

    /// Shared rate limiter.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Cancellation token observed between pages.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Walk a collection from the start until the service reports no next page.
    ///
    /// Every page after the first is preceded by one rate limiter wait. Each
    /// page fetch is retried on transient errors; any other error ends the
    /// walk and the partial accumulation is dropped. Items that fail to
    /// normalize are logged and skipped.
    pub async fn fetch_all<T, R, F, Fut, N>(&self, fetch: F, normalize: N) -> Result<Collected<R>>
    where
        F: Fn(PageCursor) -> Fut,
        Fut: Future<Output = Result<Page<T>>>,
        N: Fn(&T) -> Result<R>,
    {
        let mut collected = Collected::default();
        let mut cursor = PageCursor::Start;

        loop {
            if self.cancel.is_cancelled() {
                return Err(Error::Interrupted);
            }

            let page = retry_with_backoff(&self.retry, &self.cancel, classify, || {
                fetch(cursor.clone())
            })
            .await?;
            collected.pages += 1;

            for item in &page.items {
                match normalize(item) {
                    Ok(record) => collected.records.push(record),
                    Err(Error::MalformedResponse(reason)) => {
                        tracing::warn!("Skipping malformed item: {}", reason);
                        collected.malformed += 1;
                    }
                    Err(e) => return Err(e),
                }
            }

            match page.next {
                Some(next) => {
                    tracing::debug!(
                        "Page {} done ({} records so far)",
                        collected.pages,
                        collected.records.len()
                    );
                    cursor = next;
                    self.limiter.wait().await;
                }
                None => break,
            }
        }

        Ok(collected)
    }

    /// Fetch every work of a works collection.
    pub async fn fetch_works(
        &self,
        client: &dyn GalleryClient,
        collection: CollectionRef,
    ) -> Result<Collected<MediaRecord>> {
        self.fetch_all(
            |cursor| async move { client.fetch_illust_page(&collection, &cursor).await },
            normalize_illust,
        )
        .await
    }

    /// Fetch every entry of a followed-authors collection.
    pub async fn fetch_authors(
        &self,
        client: &dyn GalleryClient,
        collection: CollectionRef,
    ) -> Result<Collected<AuthorRecord>> {
        self.fetch_all(
            |cursor| async move { client.fetch_user_page(&collection, &cursor).await },
            normalize_author,
        )
        .await
    }
}
