//! Console output utilities.

use std::path::Path;

use console::style;

use crate::config::SyncJob;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════════════╗
║     pixiv-sync                                        ║
║     Mirror your bookmarks and followed authors        ║
╚═══════════════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print configuration summary.
pub fn print_config_summary(user_id: u64, jobs: &[SyncJob], save_directory: &Path) {
    let jobs: Vec<String> = jobs.iter().map(|j| j.to_string()).collect();

    println!();
    println!("{}", style("Configuration:").bold());
    println!("  User: {}", user_id);
    println!("  Jobs: {}", jobs.join(", "));
    println!("  Directory: {}", save_directory.display());
    println!();
}

/// `[i/n]: title(id)`, printed before a record's assets are downloaded.
pub fn record_progress_line(index: usize, total: usize, title: &str, id: u64) -> String {
    format!("[{}/{}]: {}({})", index + 1, total, title, id)
}

/// `[i/n]: dirname`, printed before an author's works are downloaded.
pub fn author_progress_line(index: usize, total: usize, dir_name: &str) -> String {
    format!("[{}/{}]: {}", index + 1, total, style(dir_name).bold())
}
