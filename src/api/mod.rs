//! Pixiv API module.
//!
//! This module provides:
//! - The [`GalleryClient`] seam and its HTTP implementation
//! - Pagination cursors and collection references
//! - Session establishment and request-level retry
//! - API response types

pub mod client;
pub mod paging;
pub mod retry;
pub mod session;
pub mod types;

pub use client::{AssetStream, GalleryClient, PixivApi};
pub use paging::{CollectionRef, Page, PageCursor};
pub use retry::RetryConfig;
pub use types::*;
