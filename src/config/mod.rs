//! Configuration module for pixiv-sync.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Job and collection option definitions
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{AccountConfig, Config, OptionsConfig};
pub use modes::{Restrict, SyncJob, WorksType};
pub use validation::{parse_user_id, validate_config, validate_token};
