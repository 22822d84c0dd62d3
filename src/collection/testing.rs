//! In-memory gallery used by unit tests.

use std::collections::{HashMap, HashSet};
use std::time::Duration;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::StreamExt;

use crate::api::types::{RawIllust, RawUser, RawUserPreview};
use crate::api::{AssetStream, CollectionRef, GalleryClient, Page, PageCursor};
use crate::error::{Error, Result};

/// Serves pre-baked pages. Asset bodies default to the URL's bytes.
#[derive(Default)]
pub struct FakeGallery {
    illust_pages: HashMap<CollectionRef, Vec<Vec<RawIllust>>>,
    user_pages: HashMap<CollectionRef, Vec<Vec<RawUserPreview>>>,
    failing_collections: HashMap<CollectionRef, fn() -> Error>,
    failing_assets: HashMap<String, Duration>,
    stalling_assets: HashSet<String>,
    asset_requests: Mutex<Vec<String>>,
    page_requests: Mutex<Vec<CollectionRef>>,
}

impl FakeGallery {
    pub fn with_illust_pages(
        mut self,
        collection: CollectionRef,
        pages: Vec<Vec<RawIllust>>,
    ) -> Self {
        self.illust_pages.insert(collection, pages);
        self
    }

    pub fn with_user_pages(
        mut self,
        collection: CollectionRef,
        pages: Vec<Vec<RawUserPreview>>,
    ) -> Self {
        self.user_pages.insert(collection, pages);
        self
    }

    pub fn failing(mut self, collection: CollectionRef, error: fn() -> Error) -> Self {
        self.failing_collections.insert(collection, error);
        self
    }

    pub fn failing_asset(self, url: &str) -> Self {
        self.failing_asset_after(url, Duration::ZERO)
    }

    /// Fail the asset once `delay` has passed.
    pub fn failing_asset_after(mut self, url: &str, delay: Duration) -> Self {
        self.failing_assets.insert(url.to_string(), delay);
        self
    }

    /// Send the asset's first chunk, then never finish the body.
    pub fn stalling_asset(mut self, url: &str) -> Self {
        self.stalling_assets.insert(url.to_string());
        self
    }

    pub fn asset_requests(&self) -> Vec<String> {
        self.asset_requests.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> Vec<CollectionRef> {
        self.page_requests.lock().unwrap().clone()
    }

    fn serve<T: Clone>(
        &self,
        pages: Option<&Vec<Vec<T>>>,
        collection: &CollectionRef,
        cursor: &PageCursor,
    ) -> Result<Page<T>> {
        self.page_requests.lock().unwrap().push(*collection);
        if let Some(error) = self.failing_collections.get(collection) {
            return Err(error());
        }

        let pages = match pages {
            Some(pages) if !pages.is_empty() => pages,
            _ => return Ok(Page::last(Vec::new())),
        };
        let index = match cursor {
            PageCursor::Start => 0,
            PageCursor::Next(params) => params[0].1.parse::<usize>().unwrap(),
        };
        let next = (index + 1 < pages.len())
            .then(|| PageCursor::Next(vec![("page".to_string(), (index + 1).to_string())]));

        Ok(Page {
            items: pages[index].clone(),
            next,
        })
    }
}

#[async_trait]
impl GalleryClient for FakeGallery {
    async fn fetch_illust_page(
        &self,
        collection: &CollectionRef,
        cursor: &PageCursor,
    ) -> Result<Page<RawIllust>> {
        self.serve(self.illust_pages.get(collection), collection, cursor)
    }

    async fn fetch_user_page(
        &self,
        collection: &CollectionRef,
        cursor: &PageCursor,
    ) -> Result<Page<RawUserPreview>> {
        self.serve(self.user_pages.get(collection), collection, cursor)
    }

    async fn fetch_asset(&self, url: &str) -> Result<AssetStream> {
        self.asset_requests.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.failing_assets.get(url).copied() {
            tokio::time::sleep(delay).await;
            return Err(Error::Network(format!("connection reset fetching {}", url)));
        }
        let body = futures::stream::iter(vec![Ok(url.as_bytes().to_vec())]);
        if self.stalling_assets.contains(url) {
            return Ok(body.chain(futures::stream::pending()).boxed());
        }
        Ok(body.boxed())
    }
}

/// A single-page work.
pub fn illust(id: u64, title: &str, url: &str) -> RawIllust {
    RawIllust {
        id: Some(id),
        title: Some(title.to_string()),
        meta_single_page: crate::api::types::MetaSinglePage {
            original_image_url: Some(url.to_string()),
        },
        ..Default::default()
    }
}

/// A multi-page work.
pub fn multi_page_illust(id: u64, title: &str, urls: &[&str]) -> RawIllust {
    RawIllust {
        id: Some(id),
        title: Some(title.to_string()),
        meta_pages: urls
            .iter()
            .map(|u| crate::api::types::MetaPage {
                image_urls: crate::api::types::ImageUrls {
                    original: Some(u.to_string()),
                    ..Default::default()
                },
            })
            .collect(),
        ..Default::default()
    }
}

/// A followed-author entry.
pub fn user_preview(id: u64, name: &str, account: &str) -> RawUserPreview {
    RawUserPreview {
        user: Some(RawUser {
            id: Some(id),
            name: Some(name.to_string()),
            account: Some(account.to_string()),
        }),
    }
}
