//! Shared data models for policies, tallies, and run reports.

pub mod policy;
pub mod tally;

use crate::lines::Terminator;
use serde::Serialize;
use tally::IssueTally;

/// No issues seen.
pub const EXIT_CLEAN: i32 = 0;
/// Issues seen, all fixed.
pub const EXIT_FIXED: i32 = 10;
/// Issues seen and left unfixed.
pub const EXIT_UNFIXED: i32 = 20;
/// Usage or I/O error.
pub const EXIT_ERROR: i32 = 2;

#[derive(Debug, Clone, Serialize)]
/// Outcome of processing one input.
pub struct FileReport {
    pub file: String,
    pub tally: IssueTally,
    /// Terminator that lines were compared against, if any.
    pub reference: Option<Terminator>,
    /// Reference was taken from the first line rather than forced.
    pub reference_from_first: bool,
    /// In-place mode replaced the file.
    pub wrote: bool,
}

#[derive(Debug, Clone, Serialize)]
/// A file that could not be processed.
pub struct FileError {
    pub file: String,
    pub message: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
/// Aggregated run summary used by printers and exit status.
pub struct Summary {
    pub files: usize,
    pub fixed: usize,
    pub reported: usize,
    pub errors: usize,
}

impl Summary {
    pub fn from_reports(reports: &[FileReport], errors: &[FileError]) -> Summary {
        let mut total = IssueTally::default();
        for r in reports {
            total += &r.tally;
        }
        Summary {
            files: reports.len(),
            fixed: total.total_fixed(),
            reported: total.total_reported(),
            errors: errors.len(),
        }
    }
}

/// Process exit status for a finished run.
///
/// Errors win over issue codes; unfixed issues (20) win over fixed ones (10).
/// With `no_exit_codes` a run without errors always exits 0.
pub fn exit_status(summary: &Summary, no_exit_codes: bool) -> i32 {
    if summary.errors > 0 {
        EXIT_ERROR
    } else if no_exit_codes {
        EXIT_CLEAN
    } else if summary.reported > 0 {
        EXIT_UNFIXED
    } else if summary.fixed > 0 {
        EXIT_FIXED
    } else {
        EXIT_CLEAN
    }
}
