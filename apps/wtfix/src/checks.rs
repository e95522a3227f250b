//! The five whitespace checks.
//!
//! Each check looks at one aspect of the line sequence, records what it saw
//! into its `Counts`, and (under `Action::Fix`) replaces affected lines with
//! corrected copies. `engine::process` runs them in dependency order:
//! trailing space before EOF blanks before the final newline.

use crate::engine::Note;
use crate::lines::{Line, Terminator};
use crate::models::policy::{Action, EolTarget};
use crate::models::tally::Counts;
use log::Level;

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

/// Terminator that every line should carry.
///
/// A forced target wins; otherwise the first terminated line decides.
/// Computed on the unmodified input.
pub fn reference_terminator(lines: &[Line], target: EolTarget) -> Option<Terminator> {
    target.forced().or_else(|| {
        lines
            .iter()
            .map(|l| l.terminator)
            .find(|t| *t != Terminator::None)
    })
}

/// Length of `content` without its trailing spaces and tabs.
pub fn trimmed_len(content: &[u8]) -> usize {
    content
        .iter()
        .rposition(|b| !is_blank(*b))
        .map(|p| p + 1)
        .unwrap_or(0)
}

/// Strip or count space/tab at the end of each line.
pub fn trail_space(lines: &mut [Line], action: Action, counts: &mut Counts) {
    if !action.is_active() {
        return;
    }
    for line in lines.iter_mut() {
        let keep = trimmed_len(&line.content);
        if keep == line.content.len() {
            continue;
        }
        counts.record(action, 1);
        if action.is_fix() {
            *line = line.with_content(&line.content[..keep]);
        }
    }
}

/// Remove or count empty lines at the end of the file.
///
/// Only lines that are empty at this point count; run after `trail_space`
/// so that whitespace-only lines it emptied are included.
pub fn eof_blanks(lines: &mut Vec<Line>, action: Action, counts: &mut Counts) {
    if !action.is_active() {
        return;
    }
    let blanks = lines.iter().rev().take_while(|l| l.is_empty()).count();
    if blanks == 0 {
        return;
    }
    counts.record(action, blanks);
    if action.is_fix() {
        lines.truncate(lines.len() - blanks);
    }
}

/// Add or count a missing terminator on the last line.
///
/// Without a reference terminator the platform's native one is used and a
/// warning note is emitted.
pub fn eof_newline(
    lines: &mut [Line],
    action: Action,
    reference: Option<Terminator>,
    counts: &mut Counts,
    notes: &mut Vec<Note>,
) {
    if !action.is_active() {
        return;
    }
    let Some(last) = lines.last_mut() else {
        return;
    };
    if last.terminator != Terminator::None {
        return;
    }
    counts.record(action, 1);
    if action.is_fix() {
        let term = match reference {
            Some(t) => t,
            None => {
                let guess = Terminator::native();
                notes.push(Note::new(
                    last,
                    Level::Warn,
                    format!("don't know what line ending to add (guessed {})", guess),
                ));
                guess
            }
        };
        *last = last.with_terminator(term);
    }
}

/// Coerce or count terminators that differ from `reference`.
///
/// A final unterminated line is left to `eof_newline`.
pub fn eol_mismatch(
    lines: &mut [Line],
    action: Action,
    reference: Option<Terminator>,
    counts: &mut Counts,
) {
    let Some(reference) = reference else {
        return;
    };
    if !action.is_active() {
        return;
    }
    for line in lines.iter_mut() {
        if line.terminator == Terminator::None || line.terminator == reference {
            continue;
        }
        counts.record(action, 1);
        if action.is_fix() {
            *line = line.with_terminator(reference);
        }
    }
}

/// True when a space precedes a tab in the indentation of `content`.
///
/// Whitespace-only content has no indentation; it is all trailing space.
pub fn has_space_before_tab(content: &[u8]) -> bool {
    let lead = content.iter().take_while(|b| is_blank(**b)).count();
    if lead == content.len() {
        return false;
    }
    let indent = &content[..lead];
    match indent.iter().position(|b| *b == b' ') {
        Some(p) => indent[p..].contains(&b'\t'),
        None => false,
    }
}

/// Warn about space-before-tab indentation. Never changes content.
pub fn tab_space_mix(lines: &[Line], action: Action, counts: &mut Counts, notes: &mut Vec<Note>) {
    if !action.is_active() {
        return;
    }
    for line in lines {
        if has_space_before_tab(&line.content) {
            counts.record(Action::Report, 1);
            notes.push(Note::new(
                line,
                Level::Warn,
                "WARNING: mixed use of spaces and tabs at beginning of line".to_string(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::{join_lines, split_lines};

    #[test]
    fn test_trimmed_len() {
        assert_eq!(trimmed_len(b"a \t "), 1);
        assert_eq!(trimmed_len(b" a b"), 4);
        assert_eq!(trimmed_len(b" \t"), 0);
        assert_eq!(trimmed_len(b""), 0);
    }

    #[test]
    fn test_trail_space_report_does_not_mutate() {
        let mut lines = split_lines(b"a \nb\n");
        let mut c = Counts::default();
        trail_space(&mut lines, Action::Report, &mut c);
        assert_eq!(join_lines(&lines), b"a \nb\n");
        assert_eq!(c.reported, 1);
    }

    #[test]
    fn test_trail_space_keeps_interior_whitespace() {
        let mut lines = split_lines(b"a \t b  \r\n");
        let mut c = Counts::default();
        trail_space(&mut lines, Action::Fix, &mut c);
        assert_eq!(join_lines(&lines), b"a \t b\r\n");
        assert_eq!(c.fixed, 1);
    }

    #[test]
    fn test_eof_blanks_whole_file_blank() {
        let mut lines = split_lines(b"\n\n\n");
        let mut c = Counts::default();
        eof_blanks(&mut lines, Action::Fix, &mut c);
        assert!(lines.is_empty());
        assert_eq!(c.fixed, 3);
    }

    #[test]
    fn test_eof_blanks_whitespace_line_counts_only_after_trim() {
        let mut lines = split_lines(b"a\n  \n");
        let mut c = Counts::default();
        eof_blanks(&mut lines, Action::Fix, &mut c);
        assert_eq!(c.seen(), 0);
        let mut t = Counts::default();
        trail_space(&mut lines, Action::Fix, &mut t);
        eof_blanks(&mut lines, Action::Fix, &mut c);
        assert_eq!(join_lines(&lines), b"a\n");
        assert_eq!(c.fixed, 1);
    }

    #[test]
    fn test_eof_newline_without_reference_guesses_native() {
        let mut lines = split_lines(b"only");
        let mut c = Counts::default();
        let mut notes = Vec::new();
        eof_newline(&mut lines, Action::Fix, None, &mut c, &mut notes);
        assert_eq!(lines[0].terminator, Terminator::native());
        assert_eq!(c.fixed, 1);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].level, Level::Warn);
    }

    #[test]
    fn test_eol_mismatch_skips_unterminated_last_line() {
        let mut lines = split_lines(b"a\r\nb\rc");
        let mut c = Counts::default();
        let reference = reference_terminator(&lines, EolTarget::First);
        assert_eq!(reference, Some(Terminator::CrLf));
        eol_mismatch(&mut lines, Action::Fix, reference, &mut c);
        assert_eq!(join_lines(&lines), b"a\r\nb\r\nc");
        assert_eq!(c.fixed, 1);
    }

    #[test]
    fn test_reference_without_terminators() {
        let lines = split_lines(b"abc");
        assert_eq!(reference_terminator(&lines, EolTarget::First), None);
        assert_eq!(
            reference_terminator(&lines, EolTarget::Cr),
            Some(Terminator::Cr)
        );
    }

    #[test]
    fn test_space_before_tab_detection() {
        assert!(has_space_before_tab(b" \tx"));
        assert!(has_space_before_tab(b"\t  \tx"));
        assert!(!has_space_before_tab(b"\t  x"));
        assert!(!has_space_before_tab(b"x \t y"));
        assert!(!has_space_before_tab(b" \t"));
    }

    #[test]
    fn test_tab_space_fix_is_reported() {
        let lines = split_lines(b" \tx\n");
        let mut c = Counts::default();
        let mut notes = Vec::new();
        tab_space_mix(&lines, Action::Fix, &mut c, &mut notes);
        assert_eq!(c, Counts { fixed: 0, reported: 1 });
        assert_eq!(notes[0].line, 1);
    }
}
