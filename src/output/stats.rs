//! Statistics reporting.

use console::style;

use crate::download::{JobReport, JobStats, RunSummary};

fn print_counts(stats: &JobStats) {
    println!("  Records:  {}", stats.records);
    println!("  Written:  {}", stats.assets_written);
    if stats.assets_skipped > 0 {
        println!("  Skipped:  {} (already present)", stats.assets_skipped);
    }
    if stats.malformed_skipped > 0 {
        println!("  Malformed: {}", style(stats.malformed_skipped).yellow());
    }
    if stats.authors > 0 {
        println!("  Authors:  {}", stats.authors);
    }
    if stats.authors_failed > 0 {
        println!("  Authors failed: {}", style(stats.authors_failed).red());
    }
}

/// Print statistics for a single job.
pub fn print_job_report(report: &JobReport) {
    println!();
    let header = format!("{} ({}):", report.job, report.state);
    if report.is_clean() {
        println!("{}", style(header).bold());
    } else {
        println!("{}", style(header).bold().red());
    }
    print_counts(&report.stats);
    if let Some(e) = &report.error {
        println!("  Error:    {}", style(e).red());
    }
}

/// Print per-job reports followed by the totals of the run.
pub fn print_run_summary(summary: &RunSummary) {
    for report in &summary.reports {
        print_job_report(report);
    }

    println!();
    println!("{}", style("═".repeat(50)).dim());
    println!("{}", style("Totals:").bold());
    println!("  Jobs run: {}", summary.reports.len());
    if summary.jobs_failed() > 0 {
        println!("  Jobs with failures: {}", style(summary.jobs_failed()).red());
    }
    print_counts(&summary.totals);
    println!("{}", style("═".repeat(50)).dim());
}
