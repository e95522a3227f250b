//! Per-file issue counters.

use crate::models::policy::Action;
use serde::Serialize;
use std::ops::AddAssign;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
/// Issue categories tracked by the tally.
pub enum Category {
    TrailSpace,
    EofBlanks,
    EofNewline,
    EolMismatch,
    TabSpaceMix,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::TrailSpace,
        Category::EofBlanks,
        Category::EofNewline,
        Category::EolMismatch,
        Category::TabSpaceMix,
    ];
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
/// Fixed vs. merely reported count for one category.
pub struct Counts {
    pub fixed: usize,
    pub reported: usize,
}

impl Counts {
    pub fn seen(&self) -> usize {
        self.fixed + self.reported
    }

    /// Record `n` occurrences under `action`. `Ignore` records nothing.
    pub fn record(&mut self, action: Action, n: usize) {
        match action {
            Action::Fix => self.fixed += n,
            Action::Report => self.reported += n,
            Action::Ignore => {}
        }
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, rhs: Counts) {
        self.fixed += rhs.fixed;
        self.reported += rhs.reported;
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
/// Counters for one processed file.
pub struct IssueTally {
    pub trail_space: Counts,
    pub eof_blanks: Counts,
    pub eof_newline: Counts,
    pub eol_mismatch: Counts,
    pub tab_space_mix: Counts,
}

impl IssueTally {
    pub fn get(&self, cat: Category) -> &Counts {
        match cat {
            Category::TrailSpace => &self.trail_space,
            Category::EofBlanks => &self.eof_blanks,
            Category::EofNewline => &self.eof_newline,
            Category::EolMismatch => &self.eol_mismatch,
            Category::TabSpaceMix => &self.tab_space_mix,
        }
    }

    pub fn get_mut(&mut self, cat: Category) -> &mut Counts {
        match cat {
            Category::TrailSpace => &mut self.trail_space,
            Category::EofBlanks => &mut self.eof_blanks,
            Category::EofNewline => &mut self.eof_newline,
            Category::EolMismatch => &mut self.eol_mismatch,
            Category::TabSpaceMix => &mut self.tab_space_mix,
        }
    }

    pub fn total_fixed(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).fixed).sum()
    }

    pub fn total_reported(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).reported).sum()
    }

    /// Any issue that was seen but left in place.
    pub fn has_unfixed(&self) -> bool {
        self.total_reported() > 0
    }

    pub fn is_clean(&self) -> bool {
        self.total_fixed() == 0 && self.total_reported() == 0
    }
}

impl AddAssign<&IssueTally> for IssueTally {
    fn add_assign(&mut self, rhs: &IssueTally) {
        for cat in Category::ALL {
            *self.get_mut(cat) += *rhs.get(cat);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_respects_action() {
        let mut c = Counts::default();
        c.record(Action::Fix, 2);
        c.record(Action::Report, 1);
        c.record(Action::Ignore, 5);
        assert_eq!(c, Counts { fixed: 2, reported: 1 });
        assert_eq!(c.seen(), 3);
    }

    #[test]
    fn test_unfixed_flag_and_sum() {
        let mut a = IssueTally::default();
        assert!(a.is_clean());
        a.trail_space.fixed = 3;
        assert!(!a.has_unfixed());
        let mut b = IssueTally::default();
        b.tab_space_mix.reported = 1;
        a += &b;
        assert!(a.has_unfixed());
        assert_eq!(a.total_fixed(), 3);
        assert_eq!(a.total_reported(), 1);
    }
}
