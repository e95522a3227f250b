//! Issue policy: what to do about each whitespace issue category.
//!
//! A `Policy` is resolved once per invocation (CLI > config file > defaults)
//! and passed by reference to every file. Categories:
//! - `trail_space`: space/tab at end of line.
//! - `eof_blanks`: blank lines at end of file.
//! - `eof_newline`: last line without a terminator.
//! - `eol`: terminators that differ from the reference terminator,
//!   chosen by `eol_target`.
//! - `tab_space_mix`: space before tab in leading whitespace. Report only.

use crate::lines::Terminator;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
/// Action applied to one issue category.
pub enum Action {
    Fix,
    Report,
    Ignore,
}

impl Action {
    pub fn is_fix(self) -> bool {
        self == Action::Fix
    }

    pub fn is_active(self) -> bool {
        self != Action::Ignore
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
/// Which terminator every line should end with.
pub enum EolTarget {
    /// Whatever the first terminated line of each file uses.
    First,
    Lf,
    Crlf,
    Cr,
    Native,
}

impl EolTarget {
    /// The forced terminator, or `None` when it depends on the file.
    pub fn forced(self) -> Option<Terminator> {
        match self {
            EolTarget::First => None,
            EolTarget::Lf => Some(Terminator::Lf),
            EolTarget::Crlf => Some(Terminator::CrLf),
            EolTarget::Cr => Some(Terminator::Cr),
            EolTarget::Native => Some(Terminator::native()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Immutable per-run policy.
pub struct Policy {
    pub trail_space: Action,
    pub eof_blanks: Action,
    pub eof_newline: Action,
    pub eol: Action,
    pub eol_target: EolTarget,
    pub tab_space_mix: Action,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            trail_space: Action::Fix,
            eof_blanks: Action::Fix,
            eof_newline: Action::Fix,
            eol: Action::Fix,
            eol_target: EolTarget::First,
            tab_space_mix: Action::Report,
        }
    }
}

impl Policy {
    /// Everything ignored; processing is then the identity.
    pub fn ignore_all() -> Self {
        Policy {
            trail_space: Action::Ignore,
            eof_blanks: Action::Ignore,
            eof_newline: Action::Ignore,
            eol: Action::Ignore,
            eol_target: EolTarget::First,
            tab_space_mix: Action::Ignore,
        }
    }

    /// Tab/space mix has no fixer; `Fix` is downgraded to `Report`.
    ///
    /// Returns true when a downgrade happened so the caller can tell the user.
    pub fn downgrade_tab_space_fix(&mut self) -> bool {
        if self.tab_space_mix == Action::Fix {
            self.tab_space_mix = Action::Report;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_fix_everything_but_tab_space() {
        let p = Policy::default();
        assert_eq!(p.trail_space, Action::Fix);
        assert_eq!(p.eol_target, EolTarget::First);
        assert_eq!(p.tab_space_mix, Action::Report);
    }

    #[test]
    fn test_downgrade_tab_space_fix() {
        let mut p = Policy {
            tab_space_mix: Action::Fix,
            ..Policy::default()
        };
        assert!(p.downgrade_tab_space_fix());
        assert_eq!(p.tab_space_mix, Action::Report);
        assert!(!p.downgrade_tab_space_fix());
    }

    #[test]
    fn test_eol_target_forced_values() {
        assert_eq!(EolTarget::First.forced(), None);
        assert_eq!(EolTarget::Crlf.forced(), Some(Terminator::CrLf));
        assert_eq!(EolTarget::Native.forced(), Some(Terminator::native()));
    }

    #[test]
    fn test_action_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct W {
            a: Action,
            t: EolTarget,
        }
        let w: W = toml::from_str("a = \"report\"\nt = \"crlf\"").unwrap();
        assert_eq!(w.a, Action::Report);
        assert_eq!(w.t, EolTarget::Crlf);
    }
}
