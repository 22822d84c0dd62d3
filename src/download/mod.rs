//! Download module.
//!
//! This module provides:
//! - The asset download pipeline
//! - Job state tracking and statistics
//! - Bookmarks and following jobs
//! - The orchestrator running them

pub mod bookmarks;
pub mod following;
pub mod orchestrator;
pub mod pipeline;
pub mod state;

pub use orchestrator::{SyncContext, SyncOrchestrator, SyncSettings};
pub use pipeline::DownloadPipeline;
pub use state::{JobReport, JobState, JobStats, RunSummary};
