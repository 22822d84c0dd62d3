//! Pixiv app API HTTP client.

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::api::paging::{CollectionRef, Page, PageCursor};
use crate::api::types::*;
use crate::error::{Error, Result};

/// Pixiv app API base URL.
const API_BASE: &str = "https://app-api.pixiv.net";

/// Referer required by the image hosts.
const REFERER: &str = "https://app-api.pixiv.net/";

/// User agent of the official Android app.
const USER_AGENT: &str = "PixivAndroidApp/5.0.234 (Android 11; Pixel 5)";

/// Streamed body of one asset.
pub type AssetStream = BoxStream<'static, Result<Vec<u8>>>;

/// Authenticated access to the gallery service.
///
/// Implementations must map service failures onto
/// [`Error::Authentication`], [`Error::QuotaExceeded`] and [`Error::Network`].
#[async_trait]
pub trait GalleryClient: Send + Sync {
    /// Fetch one page of a works collection.
    async fn fetch_illust_page(
        &self,
        collection: &CollectionRef,
        cursor: &PageCursor,
    ) -> Result<Page<RawIllust>>;

    /// Fetch one page of a followed-authors collection.
    async fn fetch_user_page(
        &self,
        collection: &CollectionRef,
        cursor: &PageCursor,
    ) -> Result<Page<RawUserPreview>>;

    /// Stream a binary asset by URL.
    async fn fetch_asset(&self, url: &str) -> Result<AssetStream>;
}

/// Pixiv API client holding a bearer token.
pub struct PixivApi {
    client: Client,
    base_url: String,
    access_token: String,
}

impl PixivApi {
    /// Create a client against the public API.
    pub fn new(access_token: String) -> Result<Self> {
        Self::with_base_url(access_token, API_BASE)
    }

    /// Create a client against an alternative base URL.
    pub fn with_base_url(access_token: String, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Api(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Make an authenticated GET request.
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(&self.access_token)
            .header("App-OS", "android")
            .header("App-OS-Version", "11")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error_response(status, &body));
        }

        Ok(response)
    }

    /// Make an authenticated GET request and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        let response = self.get(path, query).await?;
        let text = response.text().await.map_err(transport_error)?;

        serde_json::from_str(&text).map_err(|e| {
            Error::MalformedResponse(format!(
                "{}: {} - Response: {}",
                path,
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Get a user's profile; used to verify that the session is valid.
    pub async fn user_detail(&self, user_id: u64) -> Result<RawUser> {
        let query = [("user_id".to_string(), user_id.to_string())];
        let detail: UserDetailResponse = self.get_json("/v1/user/detail", &query).await?;
        Ok(detail.user)
    }
}

#[async_trait]
impl GalleryClient for PixivApi {
    async fn fetch_illust_page(
        &self,
        collection: &CollectionRef,
        cursor: &PageCursor,
    ) -> Result<Page<RawIllust>> {
        let query = collection.query_for(cursor);
        let response: IllustsResponse = self.get_json(collection.path(), &query).await?;
        let items = page_items(collection, response.error, response.illusts, "illusts")?;

        Ok(Page {
            items,
            next: PageCursor::from_next_url(response.next_url.as_deref())?,
        })
    }

    async fn fetch_user_page(
        &self,
        collection: &CollectionRef,
        cursor: &PageCursor,
    ) -> Result<Page<RawUserPreview>> {
        let query = collection.query_for(cursor);
        let response: UserPreviewsResponse = self.get_json(collection.path(), &query).await?;
        let items = page_items(
            collection,
            response.error,
            response.user_previews,
            "user_previews",
        )?;

        Ok(Page {
            items,
            next: PageCursor::from_next_url(response.next_url.as_deref())?,
        })
    }

    async fn fetch_asset(&self, url: &str) -> Result<AssetStream> {
        let response = self
            .client
            .get(url)
            .header(header::REFERER, REFERER)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error_response(status, &body));
        }

        Ok(response
            .bytes_stream()
            .map_ok(|chunk| chunk.to_vec())
            .map_err(|e| Error::Network(format!("Stream error: {}", e)))
            .boxed())
    }
}

/// Items of a successfully received page.
///
/// An embedded `error` object is classified like an error status; a page
/// with neither items nor an error cannot be told apart from a truncated one.
fn page_items<T>(
    collection: &CollectionRef,
    error: Option<ErrorDetails>,
    items: Option<Vec<T>>,
    field: &str,
) -> Result<Vec<T>> {
    if let Some(details) = error {
        return Err(classify_error_details(StatusCode::OK, &details));
    }

    items.ok_or_else(|| {
        Error::MalformedResponse(format!(
            "{}: response has no '{}' list",
            collection.path(),
            field
        ))
    })
}

/// Map a transport failure to a network error.
fn transport_error(err: reqwest::Error) -> Error {
    Error::Network(err.to_string())
}

/// Map a non-success response onto the error taxonomy.
pub fn classify_error_response(status: StatusCode, body: &str) -> Error {
    let details = serde_json::from_str::<ErrorResponse>(body)
        .map(|r| r.error)
        .unwrap_or_default();
    classify_error_details(status, &details)
}

/// Map a decoded service error onto the error taxonomy.
fn classify_error_details(status: StatusCode, details: &ErrorDetails) -> Error {
    let message = match details.human_message() {
        "" => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        m => m.to_string(),
    };
    let code = if details.reason.is_empty() {
        status.as_u16().to_string()
    } else {
        details.reason.clone()
    };

    if status == StatusCode::TOO_MANY_REQUESTS || message.contains("Rate Limit") {
        return Error::QuotaExceeded { code, message };
    }

    let oauth_failure = message.contains("OAuth") || message.contains("invalid_grant");
    let oauth_status = status == StatusCode::BAD_REQUEST || status.is_success();
    if status == StatusCode::UNAUTHORIZED || (oauth_status && oauth_failure) {
        let code = if message.contains("invalid_grant") {
            "invalid_grant".to_string()
        } else {
            code
        };
        return Error::Authentication { code, message };
    }

    if status.is_server_error() {
        return Error::Network(format!("HTTP {}: {}", status, message));
    }

    Error::Api(format!("HTTP {}: {}", status, message))
}
