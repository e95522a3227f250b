//! Line splitting and reassembly.
//!
//! A file is decomposed into `Line`s that keep their original terminator,
//! so that `join_lines(&split_lines(buf)) == buf` for every byte buffer.
//! Terminators are matched longest first: `\r\n`, then `\n`, then a bare `\r`.

use memchr::memchr2;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
/// End-of-line marker of a single line.
pub enum Terminator {
    /// Last line of a file that does not end with a line break.
    None,
    Lf,
    Cr,
    CrLf,
}

impl Terminator {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Terminator::None => b"",
            Terminator::Lf => b"\n",
            Terminator::Cr => b"\r",
            Terminator::CrLf => b"\r\n",
        }
    }

    /// Platform line separator.
    pub fn native() -> Terminator {
        if cfg!(windows) {
            Terminator::CrLf
        } else {
            Terminator::Lf
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Terminator::None => "unknown",
            Terminator::Lf => "lf",
            Terminator::Cr => "cr",
            Terminator::CrLf => "crlf",
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One line of input: content without its terminator.
pub struct Line {
    pub index: usize,
    pub content: Vec<u8>,
    pub terminator: Terminator,
}

impl Line {
    pub fn new(index: usize, content: &[u8], terminator: Terminator) -> Self {
        Line {
            index,
            content: content.to_vec(),
            terminator,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Same line with different content.
    pub fn with_content(&self, content: &[u8]) -> Line {
        Line::new(self.index, content, self.terminator)
    }

    /// Same line with a different terminator.
    pub fn with_terminator(&self, terminator: Terminator) -> Line {
        Line {
            index: self.index,
            content: self.content.clone(),
            terminator,
        }
    }

    /// Byte length of content plus terminator.
    pub fn len(&self) -> usize {
        self.content.len() + self.terminator.as_bytes().len()
    }
}

/// Split a whole file into lines. Empty input yields no lines.
pub fn split_lines(buf: &[u8]) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut start = 0usize;
    while start < buf.len() {
        let rest = &buf[start..];
        match memchr2(b'\n', b'\r', rest) {
            Some(pos) => {
                let (term, width) = if rest[pos] == b'\n' {
                    (Terminator::Lf, 1)
                } else if rest.get(pos + 1) == Some(&b'\n') {
                    (Terminator::CrLf, 2)
                } else {
                    (Terminator::Cr, 1)
                };
                lines.push(Line::new(lines.len(), &rest[..pos], term));
                start += pos + width;
            }
            None => {
                lines.push(Line::new(lines.len(), rest, Terminator::None));
                break;
            }
        }
    }
    lines
}

/// Concatenate lines back into a single buffer.
pub fn join_lines(lines: &[Line]) -> Vec<u8> {
    let mut out = Vec::with_capacity(lines.iter().map(Line::len).sum());
    for line in lines {
        out.extend_from_slice(&line.content);
        out.extend_from_slice(line.terminator.as_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(lines: &[Line]) -> Vec<(&[u8], Terminator)> {
        lines
            .iter()
            .map(|l| (l.content.as_slice(), l.terminator))
            .collect()
    }

    #[test]
    fn test_split_mixed_terminators() {
        let lines = split_lines(b"a\r\nb\nc\rd");
        assert_eq!(
            shape(&lines),
            vec![
                (&b"a"[..], Terminator::CrLf),
                (&b"b"[..], Terminator::Lf),
                (&b"c"[..], Terminator::Cr),
                (&b"d"[..], Terminator::None),
            ]
        );
        let idx: Vec<_> = lines.iter().map(|l| l.index).collect();
        assert_eq!(idx, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_split_empty_input_yields_no_lines() {
        assert!(split_lines(b"").is_empty());
    }

    #[test]
    fn test_split_only_terminators() {
        let lines = split_lines(b"\n\r\n\r");
        assert_eq!(
            shape(&lines),
            vec![
                (&b""[..], Terminator::Lf),
                (&b""[..], Terminator::CrLf),
                (&b""[..], Terminator::Cr),
            ]
        );
    }

    #[test]
    fn test_cr_then_lf_is_one_crlf_but_lf_then_cr_is_two() {
        assert_eq!(split_lines(b"\r\n").len(), 1);
        assert_eq!(split_lines(b"\n\r").len(), 2);
    }

    #[test]
    fn test_join_restores_original_bytes() {
        for input in [
            &b""[..],
            b"x",
            b"x\n",
            b"a \r\n\tb\r\rc\n\n",
            b"\x00\xff\r\n\xfe",
        ] {
            assert_eq!(join_lines(&split_lines(input)), input);
        }
    }
}
