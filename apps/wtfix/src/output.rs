//! Summary rendering for a finished run.
//!
//! Supports `human` (default) and `json` outputs. Both go to stderr since
//! stdout may carry file contents. The JSON form includes per-file tallies
//! and a top-level summary with the exit status.

use crate::lines::Terminator;
use crate::models::policy::{Action, Policy};
use crate::models::{exit_status, FileError, FileReport, Summary};
use crate::utils;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(format: &str) -> bool {
    format != "json" && utils::colors_enabled()
}

fn verb(fix: bool, fixed: &'static str, saw: &'static str) -> &'static str {
    if fix {
        fixed
    } else {
        saw
    }
}

/// Per-file human summary lines, or `None` when there is nothing to say.
///
/// Files without issues are only listed at verbosity 2 and above.
pub fn compose_file_human(r: &FileReport, policy: &Policy, verbose: u8) -> Option<Vec<String>> {
    let t = &r.tally;
    let seen = t.total_fixed() + t.total_reported();
    if verbose < 1 || (seen == 0 && verbose < 2) {
        return None;
    }
    let mut lines = vec![format!("{}:", r.file)];
    if policy.trail_space.is_active() {
        lines.push(format!(
            "\t{} {} lines with trailing space",
            verb(policy.trail_space.is_fix(), "CHOPPED", "SAW"),
            t.trail_space.seen()
        ));
    }
    if policy.eof_blanks.is_active() {
        lines.push(format!(
            "\t{} {} blank lines at EOF",
            verb(policy.eof_blanks.is_fix(), "CHOPPED", "SAW"),
            t.eof_blanks.seen()
        ));
    }
    if policy.eof_newline.is_active() {
        let what = if t.eof_newline.fixed > 0 {
            "ADDED"
        } else if t.eof_newline.reported > 0 {
            "SAW MISSING"
        } else {
            "no change to"
        };
        lines.push(format!("\t{} newline at EOF", what));
    }
    if policy.eol.is_active() {
        let name = r.reference.unwrap_or(Terminator::None).name();
        lines.push(format!(
            "\t{} {} line endings which didn't match {}{}",
            verb(policy.eol.is_fix(), "CHANGED", "SAW"),
            t.eol_mismatch.seen(),
            name,
            if r.reference_from_first { " from first line" } else { "" }
        ));
    }
    if policy.tab_space_mix.is_active() {
        lines.push(format!(
            "\t{} {} lines with mixed tabs/spaces",
            verb(policy.tab_space_mix == Action::Report, "WARNED ABOUT", "SAW"),
            t.tab_space_mix.seen()
        ));
    }
    Some(lines)
}

/// Compose the JSON report (pure) for testing/snapshot purposes.
pub fn compose_json(reports: &[FileReport], errors: &[FileError], no_exit_codes: bool) -> JsonVal {
    let summary = Summary::from_reports(reports, errors);
    json!({
        "files": reports,
        "errors": errors,
        "summary": {
            "files": summary.files,
            "fixed": summary.fixed,
            "reported": summary.reported,
            "errors": summary.errors,
            "exit": exit_status(&summary, no_exit_codes),
        }
    })
}

/// Print the run report in the requested format.
pub fn print_report(
    reports: &[FileReport],
    errors: &[FileError],
    policy: &Policy,
    format: &str,
    verbose: u8,
    no_exit_codes: bool,
) {
    match format {
        "json" => match serde_json::to_string_pretty(&compose_json(reports, errors, no_exit_codes)) {
            Ok(s) => eprintln!("{}", s),
            Err(e) => eprintln!("{} {}", utils::error_prefix(), e),
        },
        _ => {
            let color = use_colors(format);
            for e in errors {
                eprintln!("{} {}", utils::error_prefix(), e.message);
            }
            for r in reports {
                let Some(lines) = compose_file_human(r, policy, verbose) else {
                    continue;
                };
                for (i, l) in lines.iter().enumerate() {
                    if i == 0 && color {
                        eprintln!("{}", l.bold());
                    } else if color && r.tally.has_unfixed() && l.contains("SAW") {
                        eprintln!("{}", l.yellow());
                    } else {
                        eprintln!("{}", l);
                    }
                }
            }
        }
    }
}
