//! CLI argument parsing via `clap`.

use crate::config::CliOverrides;
use crate::models::policy::{Action, EolTarget};
use crate::run::Destination;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "wtfix",
    version,
    about = "Whitespace Total Fixer",
    long_about = "Whitespace Total Fixer. Fixes and/or reports all manner of annoying issues with whitespace or line endings in text files.\n\nExit codes on successful operation:\n  0: no issues seen\n  10: issues fixed\n  20: unfixed issues seen\n\nConfiguration precedence: CLI > wtfix.toml > defaults.",
    after_help = "Examples:\n  wtfix -i src/*.rs\n  wtfix -I .orig -E crlf notes.txt\n  git show HEAD:README | wtfix -0 -T -B -N -e lf",
    group(ArgGroup::new("mode")),
    group(ArgGroup::new("trail")),
    group(ArgGroup::new("blanks")),
    group(ArgGroup::new("newl")),
    group(ArgGroup::new("eol")),
    group(ArgGroup::new("tabs")),
    group(ArgGroup::new("verbosity"))
)]
/// Top-level CLI options.
pub struct Cli {
    #[arg(value_name = "FILE", help = "Input file(s); reads stdin when omitted")]
    pub inputs: Vec<String>,

    // Input/output modes
    #[arg(short = 'o', long = "output-file", value_name = "OUTFILE", group = "mode", help = "Output file (default is stdout)")]
    pub outfile: Option<PathBuf>,
    #[arg(short = '0', long = "dry-run", group = "mode", help = "No output")]
    pub dry_run: bool,
    #[arg(short = 'i', long = "in-place", group = "mode", help = "In-place editing; overwrite each input file with any changes")]
    pub in_place: bool,
    #[arg(short = 'I', long = "backup", value_name = ".EXT", group = "mode", help = "Same as -i, but keeps the original with the given extension")]
    pub backup: Option<String>,

    // Trailing space
    #[arg(short = 't', long = "trail-space", group = "trail", help = "Remove space at end-of-line (default)")]
    pub trail_space: bool,
    #[arg(short = 'T', long = "report-trail-space", group = "trail")]
    pub report_trail_space: bool,
    #[arg(long = "ignore-trail-space", group = "trail")]
    pub ignore_trail_space: bool,

    // End of file
    #[arg(short = 'b', long = "eof-blanks", group = "blanks", help = "Remove blank lines at end-of-file (default)")]
    pub eof_blanks: bool,
    #[arg(short = 'B', long = "report-eof-blanks", group = "blanks")]
    pub report_eof_blanks: bool,
    #[arg(long = "ignore-eof-blanks", group = "blanks")]
    pub ignore_eof_blanks: bool,
    #[arg(short = 'n', long = "eof-newl", group = "newl", help = "Ensure newline appears at end-of-file (default)")]
    pub eof_newl: bool,
    #[arg(short = 'N', long = "report-eof-newl", group = "newl")]
    pub report_eof_newl: bool,
    #[arg(long = "ignore-eof-newl", group = "newl")]
    pub ignore_eof_newl: bool,

    // End of line characters
    #[arg(short = 'E', long = "coerce-eol", value_enum, value_name = "EOL", group = "eol", help = "Ensure specific line endings; `first` makes all line endings match the first line (default)")]
    pub coerce_eol: Option<EolTarget>,
    #[arg(short = 'e', long = "expect-eol", value_enum, value_name = "EOL", group = "eol", help = "Report line endings that differ from EOL")]
    pub expect_eol: Option<EolTarget>,
    #[arg(long = "ignore-eol", group = "eol")]
    pub ignore_eol: bool,

    // Tabs and spaces
    #[arg(short = 's', long = "tab-space-mix", group = "tabs", help = "Check for spaces before tabs in leading whitespace; cannot be fixed, so this reports")]
    pub tab_space_mix: bool,
    #[arg(short = 'S', long = "report-tab-space-mix", group = "tabs", help = "Report spaces before tabs in leading whitespace (default)")]
    pub report_tab_space_mix: bool,
    #[arg(long = "ignore-tab-space-mix", group = "tabs")]
    pub ignore_tab_space_mix: bool,

    // Reporting
    #[arg(short = 'q', long, group = "verbosity", help = "Silent operation")]
    pub quiet: bool,
    #[arg(short = 'v', long, action = clap::ArgAction::Count, group = "verbosity", help = "Increasing verbosity")]
    pub verbose: u8,
    #[arg(short = 'X', long, help = "Always return 0 on success, even if issues were fixed or reported")]
    pub no_exit_codes: bool,
    #[arg(long, value_parser = ["human", "json"], help = "Summary format: human|json (default: human)")]
    pub format: Option<String>,
    #[arg(long, value_name = "FILE", help = "Config file (default: nearest wtfix.toml|yaml)")]
    pub config: Option<PathBuf>,
}

/// Map a fix/report/ignore flag triple to the chosen action, if any.
fn pick(fix: bool, report: bool, ignore: bool) -> Option<Action> {
    if fix {
        Some(Action::Fix)
    } else if report {
        Some(Action::Report)
    } else if ignore {
        Some(Action::Ignore)
    } else {
        None
    }
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        let eol = if let Some(t) = self.coerce_eol {
            Some((Action::Fix, Some(t)))
        } else if let Some(t) = self.expect_eol {
            Some((Action::Report, Some(t)))
        } else if self.ignore_eol {
            Some((Action::Ignore, None))
        } else {
            None
        };
        let verbose = if self.quiet {
            Some(0)
        } else if self.verbose > 0 {
            Some(1 + self.verbose)
        } else {
            None
        };
        CliOverrides {
            trail_space: pick(self.trail_space, self.report_trail_space, self.ignore_trail_space),
            eof_blanks: pick(self.eof_blanks, self.report_eof_blanks, self.ignore_eof_blanks),
            eof_newline: pick(self.eof_newl, self.report_eof_newl, self.ignore_eof_newl),
            eol,
            tab_space_mix: pick(
                self.tab_space_mix,
                self.report_tab_space_mix,
                self.ignore_tab_space_mix,
            ),
            format: self.format.clone(),
            verbose,
            no_exit_codes: self.no_exit_codes,
            backup: self.backup.clone(),
        }
    }

    /// Output mode; in-place edits keep originals under the resolved
    /// `backup` extension (`-I` or the config file).
    pub fn destination(&self, backup: Option<&str>) -> Destination {
        if self.in_place || self.backup.is_some() {
            Destination::InPlace {
                backup: backup.map(str::to_string),
            }
        } else if self.dry_run {
            Destination::Discard
        } else if let Some(p) = &self.outfile {
            Destination::File(p.clone())
        } else {
            Destination::Stdout
        }
    }
}
