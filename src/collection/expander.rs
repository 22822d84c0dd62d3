//! Two-level traversal: followed authors, then each author's works.

use futures::{stream, StreamExt};

use crate::api::{CollectionRef, GalleryClient};
use crate::collection::fetcher::{Collected, CollectionFetcher};
use crate::config::{Restrict, WorksType};
use crate::error::{Error, Result};
use crate::media::{AuthorRecord, MediaRecord};

/// Outcome of fetching one author's works.
#[derive(Debug)]
pub struct ExpandedAuthor {
    /// The author; `works` is empty when `failure` is set.
    pub author: AuthorRecord,
    /// Why the works could not be fetched, when isolation kept the run going.
    pub failure: Option<Error>,
}

/// Result of a following expansion.
#[derive(Debug, Default)]
pub struct Following {
    /// Authors in service order.
    pub authors: Vec<ExpandedAuthor>,
    /// Items dropped during normalization, across all walks.
    pub malformed: u64,
}

impl Following {
    /// Number of authors whose works could not be fetched.
    pub fn failed_count(&self) -> usize {
        self.authors.iter().filter(|a| a.failure.is_some()).count()
    }
}

/// Builds the followed-authors → works structure.
pub struct FollowingExpander<'a> {
    client: &'a dyn GalleryClient,
    fetcher: &'a CollectionFetcher,
    restrict: Restrict,
    works_type: WorksType,
    concurrency: usize,
    isolate_failures: bool,
}

impl<'a> FollowingExpander<'a> {
    pub fn new(client: &'a dyn GalleryClient, fetcher: &'a CollectionFetcher) -> Self {
        Self {
            client,
            fetcher,
            restrict: Restrict::default(),
            works_type: WorksType::default(),
            concurrency: 1,
            isolate_failures: true,
        }
    }

    pub fn restrict(mut self, restrict: Restrict) -> Self {
        self.restrict = restrict;
        self
    }

    pub fn works_type(mut self, works_type: WorksType) -> Self {
        self.works_type = works_type;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Keep going when a single author's works fetch fails.
    ///
    /// Authentication, quota and interruption errors end the expansion
    /// regardless, since every sibling would hit them too.
    pub fn isolate_failures(mut self, isolate: bool) -> Self {
        self.isolate_failures = isolate;
        self
    }

    /// List the followed authors of `user_id`, then fetch each one's works.
    ///
    /// Works are fetched concurrently, up to the configured bound; the
    /// returned authors keep the service order.
    pub async fn expand(&self, user_id: u64) -> Result<Following> {
        let listing = self
            .fetcher
            .fetch_authors(
                self.client,
                CollectionRef::Following {
                    user_id,
                    restrict: self.restrict,
                },
            )
            .await?;

        tracing::info!("Found {} followed authors", listing.records.len());

        let mut following = Following {
            authors: Vec::with_capacity(listing.records.len()),
            malformed: listing.malformed,
        };

        let mut works = stream::iter(listing.records)
            .map(|author| self.fetch_author_works(author))
            .buffered(self.concurrency);

        while let Some((mut author, result)) = works.next().await {
            match result {
                Ok(collected) => {
                    following.malformed += collected.malformed;
                    author.works = collected.records;
                    following.authors.push(ExpandedAuthor {
                        author,
                        failure: None,
                    });
                }
                Err(e) if self.isolate_failures && !e.is_fatal_for_job() => {
                    tracing::warn!(
                        "Failed to fetch works of {} ({}): {}",
                        author.display_name,
                        author.id,
                        e
                    );
                    following.authors.push(ExpandedAuthor {
                        author,
                        failure: Some(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(following)
    }

    async fn fetch_author_works(
        &self,
        author: AuthorRecord,
    ) -> (AuthorRecord, Result<Collected<MediaRecord>>) {
        // Each author's walk is a fresh burst of requests; pace its start too.
        self.fetcher.limiter().wait().await;

        let collection = CollectionRef::UserWorks {
            user_id: author.id,
            works_type: self.works_type,
        };
        let result = self.fetcher.fetch_works(self.client, collection).await;
        (author, result)
    }
}
