//! Pagination primitives: collection references, cursors and pages.

use url::Url;

use crate::config::{Restrict, WorksType};
use crate::error::Result;

/// A paginated collection exposed by the service, bound to a target identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionRef {
    /// Works bookmarked by a user.
    Bookmarks { user_id: u64, restrict: Restrict },
    /// Works published by a user.
    UserWorks { user_id: u64, works_type: WorksType },
    /// Authors followed by a user.
    Following { user_id: u64, restrict: Restrict },
}

impl CollectionRef {
    /// Endpoint path for this collection.
    pub fn path(&self) -> &'static str {
        match self {
            CollectionRef::Bookmarks { .. } => "/v1/user/bookmarks/illust",
            CollectionRef::UserWorks { .. } => "/v1/user/illusts",
            CollectionRef::Following { .. } => "/v1/user/following",
        }
    }

    /// Query parameters of the first page.
    pub fn initial_query(&self) -> Vec<(String, String)> {
        match self {
            CollectionRef::Bookmarks { user_id, restrict } => vec![
                ("user_id".to_string(), user_id.to_string()),
                ("restrict".to_string(), restrict.to_string()),
            ],
            CollectionRef::UserWorks {
                user_id,
                works_type,
            } => vec![
                ("user_id".to_string(), user_id.to_string()),
                ("type".to_string(), works_type.to_string()),
            ],
            CollectionRef::Following { user_id, restrict } => vec![
                ("user_id".to_string(), user_id.to_string()),
                ("restrict".to_string(), restrict.to_string()),
            ],
        }
    }

    /// Query parameters to request the page designated by `cursor`.
    pub fn query_for(&self, cursor: &PageCursor) -> Vec<(String, String)> {
        match cursor {
            PageCursor::Start => self.initial_query(),
            PageCursor::Next(params) => params.clone(),
        }
    }
}

/// Continuation state of one pagination walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageCursor {
    /// No page fetched yet.
    #[default]
    Start,
    /// Query parameters extracted from the service's "next page" URL.
    Next(Vec<(String, String)>),
}

impl PageCursor {
    /// Parse a "next page" URL into a cursor.
    ///
    /// Returns `None` when there is no further page: the URL is absent, empty,
    /// or carries no query parameters.
    pub fn from_next_url(next_url: Option<&str>) -> Result<Option<Self>> {
        let Some(next_url) = next_url.map(str::trim).filter(|u| !u.is_empty()) else {
            return Ok(None);
        };

        let url = Url::parse(next_url)?;
        let params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        if params.is_empty() {
            return Ok(None);
        }

        Ok(Some(PageCursor::Next(params)))
    }
}

/// One page of a collection, with raw items still in service shape.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageCursor>,
}

impl<T> Page<T> {
    /// A page with no continuation.
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}
