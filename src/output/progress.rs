//! Progress indicators for fetching and downloading.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const FETCH_TEMPLATE: &str = "{spinner:.green} {msg} [{elapsed}]";
const ASSET_TEMPLATE: &str =
    "{spinner:.green} {msg:.bold} [{bar:40.cyan/blue}] {pos}/{len} assets ({per_sec}, {eta})";

/// Spinner shown while a collection is being paged through.
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template(FETCH_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Bar counting the assets written into one destination directory.
pub fn create_asset_bar(total: u64, destination: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::with_template(ASSET_TEMPLATE)
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.set_message(destination.to_string());
    bar
}
