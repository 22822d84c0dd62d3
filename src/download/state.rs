//! Job state tracking.

use std::fmt;

use crate::config::SyncJob;
use crate::error::{Error, Result};

/// Lifecycle of one sync job.
///
/// `NotStarted → Fetching → Downloading → Done`, with `Failed` reachable from
/// either active state. Every run starts over from `NotStarted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    NotStarted,
    Fetching,
    Downloading,
    Done,
    Failed,
}

impl JobState {
    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn advance(&mut self, next: JobState) -> Result<()> {
        use JobState::*;

        let allowed = matches!(
            (*self, next),
            (NotStarted, Fetching)
                | (Fetching, Downloading)
                | (Downloading, Done)
                | (Fetching, Failed)
                | (Downloading, Failed)
        );

        if !allowed {
            return Err(Error::Api(format!(
                "Invalid job state transition: {} -> {}",
                self, next
            )));
        }

        *self = next;
        Ok(())
    }

    /// Whether the job has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::NotStarted => write!(f, "not started"),
            JobState::Fetching => write!(f, "fetching"),
            JobState::Downloading => write!(f, "downloading"),
            JobState::Done => write!(f, "done"),
            JobState::Failed => write!(f, "failed"),
        }
    }
}

/// Counters for one job.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JobStats {
    pub records: u64,
    pub assets_written: u64,
    pub assets_skipped: u64,
    pub malformed_skipped: u64,
    pub authors: u64,
    pub authors_failed: u64,
}

impl JobStats {
    /// Add another job's (or author's) counters.
    pub fn absorb(&mut self, other: &JobStats) {
        self.records += other.records;
        self.assets_written += other.assets_written;
        self.assets_skipped += other.assets_skipped;
        self.malformed_skipped += other.malformed_skipped;
        self.authors += other.authors;
        self.authors_failed += other.authors_failed;
    }
}

/// Final report of one job.
#[derive(Debug)]
pub struct JobReport {
    pub job: SyncJob,
    pub state: JobState,
    pub stats: JobStats,
    pub error: Option<Error>,
}

impl JobReport {
    /// Whether the job completed without any failure, including per-author ones.
    pub fn is_clean(&self) -> bool {
        self.state == JobState::Done && self.stats.authors_failed == 0
    }
}

/// Statistics across all jobs of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<JobReport>,
    pub totals: JobStats,
    pub interrupted: bool,
}

impl RunSummary {
    /// Record a finished job.
    pub fn add_report(&mut self, report: JobReport) {
        self.totals.absorb(&report.stats);
        if matches!(report.error, Some(Error::Interrupted)) {
            self.interrupted = true;
        }
        self.reports.push(report);
    }

    /// Jobs that did not finish cleanly.
    pub fn jobs_failed(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_clean()).count()
    }

    /// The first authentication failure among the jobs, if any.
    pub fn auth_failure(&self) -> Option<&Error> {
        self.reports
            .iter()
            .filter_map(|r| r.error.as_ref())
            .find(|e| matches!(e, Error::Authentication { .. }))
    }
}
