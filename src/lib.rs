//! pixiv-sync - mirror a Pixiv account's bookmarks and followed authors
//!
//! This library walks paginated gallery collections, normalizes what it finds
//! into typed records and writes every asset to a predictable path.
//!
//! # Features
//!
//! - Bookmarked works (public or private)
//! - Works of every followed author, one directory per author
//! - Jittered rate limiting shared across concurrent requests
//! - Request-level retry with exponential backoff
//! - Bounded concurrent downloads
//! - Graceful Ctrl+C handling
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use pixiv_sync::collection::RateLimiter;
//! use pixiv_sync::download::{SyncOrchestrator, SyncSettings};
//! use pixiv_sync::{Config, PixivApi};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let api = PixivApi::new(config.account.access_token.clone())?;
//!     let (base, spread) = config.rate_limit();
//!
//!     let orchestrator = SyncOrchestrator::new(
//!         &api,
//!         SyncSettings::from_config(&config),
//!         Arc::new(RateLimiter::new(base, spread)),
//!         CancellationToken::new(),
//!     );
//!     let summary = orchestrator.run(&config.jobs()).await;
//!     println!("{} assets written", summary.totals.assets_written);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod collection;
pub mod config;
pub mod download;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;
pub mod shutdown;

// Re-exports for convenience
pub use api::{GalleryClient, PixivApi};
pub use config::{Config, SyncJob};
pub use download::{RunSummary, SyncOrchestrator};
pub use error::{Error, Result};
pub use media::{AuthorRecord, MediaRecord};
