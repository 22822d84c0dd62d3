//! Output module for console output and progress.
//!
//! Provides:
//! - Colored console output
//! - Progress lines and bars
//! - Statistics reporting

pub mod console;
pub mod progress;
pub mod stats;

pub use console::{
    author_progress_line, print_banner, print_config_summary, print_error, print_info,
    print_success, print_warning, record_progress_line,
};
pub use progress::{create_asset_bar, create_spinner};
pub use stats::{print_job_report, print_run_summary};
