//! Single-file processing: split, check, reassemble.
//!
//! `process` is a pure function of the input bytes and the policy. It never
//! fails: any byte sequence (NULs, invalid UTF-8, lone CRs) is valid input.
//! The reference terminator is taken from the unmodified lines, then the
//! checks run in order:
//! 1. trailing space
//! 2. tab/space mix (read-only)
//! 3. blank lines at EOF
//! 4. line-ending mismatch
//! 5. missing final newline

use crate::checks;
use crate::lines::{join_lines, split_lines, Line, Terminator};
use crate::models::policy::Policy;
use crate::models::tally::IssueTally;
use log::{Level, LevelFilter};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A diagnostic about one input line.
pub struct Note {
    /// 1-based line number.
    pub line: usize,
    pub empty: bool,
    pub level: Level,
    pub message: String,
}

impl Note {
    pub fn new(line: &Line, level: Level, message: String) -> Self {
        Note {
            line: line.index + 1,
            empty: line.is_empty(),
            level,
            message,
        }
    }
}

#[derive(Debug, Clone)]
/// Result of processing one buffer.
pub struct Processed {
    pub output: Vec<u8>,
    pub tally: IssueTally,
    pub reference: Option<Terminator>,
    pub notes: Vec<Note>,
}

impl Processed {
    pub fn changed(&self) -> bool {
        self.tally.total_fixed() > 0
    }
}

fn show(bytes: &[u8]) -> String {
    format!("'{}'", bytes.escape_ascii())
}

fn raw(line: &Line) -> Vec<u8> {
    join_lines(std::slice::from_ref(line))
}

/// Apply `policy` to `buf` and return the rewritten bytes with a tally.
///
/// Notes are kept down to the level the logger currently lets through.
pub fn process(buf: &[u8], policy: &Policy) -> Processed {
    process_at(buf, policy, log::max_level())
}

/// Same as [`process`], building only the notes at or above `detail`.
pub fn process_at(buf: &[u8], policy: &Policy, detail: LevelFilter) -> Processed {
    let original = split_lines(buf);
    let mut notes: Vec<Note> = if Level::Trace <= detail {
        original
            .iter()
            .map(|l| Note::new(l, Level::Trace, show(&raw(l))))
            .collect()
    } else {
        Vec::new()
    };
    let reference = checks::reference_terminator(&original, policy.eol_target);

    let mut tally = IssueTally::default();
    let mut lines = original.clone();
    checks::trail_space(&mut lines, policy.trail_space, &mut tally.trail_space);
    checks::tab_space_mix(
        &lines,
        policy.tab_space_mix,
        &mut tally.tab_space_mix,
        &mut notes,
    );
    checks::eof_blanks(&mut lines, policy.eof_blanks, &mut tally.eof_blanks);
    checks::eol_mismatch(&mut lines, policy.eol, reference, &mut tally.eol_mismatch);
    checks::eof_newline(
        &mut lines,
        policy.eof_newline,
        reference,
        &mut tally.eof_newline,
        &mut notes,
    );

    if Level::Debug <= detail {
        for (i, before) in original.iter().enumerate() {
            match lines.get(i) {
                Some(after) if after != before => notes.push(Note::new(
                    before,
                    Level::Debug,
                    format!("changing {} to {}", show(&raw(before)), show(&raw(after))),
                )),
                Some(_) => {}
                None => notes.push(Note::new(
                    before,
                    Level::Debug,
                    "removing blank line at end of file".to_string(),
                )),
            }
        }
    }
    notes.sort_by_key(|n| n.line);

    Processed {
        output: join_lines(&lines),
        tally,
        reference,
        notes,
    }
}
