//! Runs the engine over every input and routes the results.
//!
//! Inputs are read and processed in parallel; results keep input order so
//! that stream output (stdout or `-o FILE`) and reports are deterministic.
//! In-place mode writes a temporary file next to each input and persists it
//! over the original only when something was fixed.

use crate::engine::{self, Note};
use crate::error::{io_at, Result, WtfError};
use crate::models::policy::{EolTarget, Policy};
use crate::models::{FileError, FileReport};
use rayon::prelude::*;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Where processed output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
    Discard,
    InPlace { backup: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    Path(PathBuf),
}

impl Input {
    pub fn name(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_string(),
            Input::Path(p) => p.to_string_lossy().to_string(),
        }
    }

    fn read(&self) -> Result<Vec<u8>> {
        match self {
            Input::Stdin => {
                let mut buf = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut buf)
                    .map_err(io_at(Path::new("<stdin>")))?;
                Ok(buf)
            }
            Input::Path(p) => fs::read(p).map_err(io_at(p)),
        }
    }
}

/// Turn CLI arguments into inputs; no arguments means stdin.
///
/// An argument that names no existing path but contains glob metacharacters
/// is expanded with `glob`. A pattern matching nothing is kept verbatim so
/// the read error is reported against it.
pub fn expand_inputs(args: &[String]) -> Vec<Input> {
    if args.is_empty() {
        return vec![Input::Stdin];
    }
    let mut out = Vec::new();
    for arg in args {
        if arg == "-" {
            out.push(Input::Stdin);
            continue;
        }
        let literal = PathBuf::from(arg);
        let wild = arg.contains(['*', '?', '[']);
        if !literal.exists() && wild {
            if let Ok(paths) = glob::glob(arg) {
                let mut matched: Vec<PathBuf> = paths.flatten().filter(|p| p.is_file()).collect();
                if !matched.is_empty() {
                    matched.sort();
                    out.extend(matched.into_iter().map(Input::Path));
                    continue;
                }
            }
        }
        out.push(Input::Path(literal));
    }
    out
}

/// Reject input/output combinations that cannot work.
pub fn validate(inputs: &[Input], dest: &Destination) -> Result<()> {
    match dest {
        Destination::InPlace { .. } if inputs.contains(&Input::Stdin) => Err(WtfError::Usage(
            "cannot use stdin for in-place editing (-i/-I); must specify filenames".into(),
        )),
        Destination::File(_) if inputs.len() > 1 => Err(WtfError::Usage(
            "cannot specify multiple input files with a single output file (-o)".into(),
        )),
        _ if inputs.iter().filter(|i| **i == Input::Stdin).count() > 1 => Err(
            WtfError::Usage("stdin may only be given once".into()),
        ),
        _ => Ok(()),
    }
}

struct Outcome {
    report: FileReport,
    /// Only kept when it goes to a stream.
    output: Option<Vec<u8>>,
    notes: Vec<Note>,
}

fn backup_path(path: &Path, ext: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(ext);
    PathBuf::from(s)
}

/// Replace `path` with `data` via a temporary file in the same directory.
///
/// With `backup`, the original is first renamed to `path + backup`, which
/// must not exist yet.
pub fn replace_in_place(path: &Path, data: &[u8], backup: Option<&str>) -> Result<()> {
    let backup = backup.map(|ext| backup_path(path, ext));
    if let Some(b) = backup.as_ref() {
        if b.exists() {
            return Err(WtfError::BackupExists {
                path: path.to_string_lossy().to_string(),
                backup: b.to_string_lossy().to_string(),
            });
        }
    }
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!("{}_tmp_", stem))
        .suffix(&suffix)
        .tempfile_in(dir)
        .map_err(io_at(dir))?;
    tmp.write_all(data).map_err(io_at(tmp.path()))?;
    tmp.as_file().sync_all().map_err(io_at(tmp.path()))?;
    let perms = fs::metadata(path).map_err(io_at(path))?.permissions();
    fs::set_permissions(tmp.path(), perms).map_err(io_at(tmp.path()))?;
    swap_in(path, backup.as_deref(), || tmp.persist(path).map(|_| ()).map_err(|e| e.error))
}

/// Move the original aside (when backing up) and run `persist`.
///
/// A failed `persist` puts the backup back at `path`.
fn swap_in<F>(path: &Path, backup: Option<&Path>, persist: F) -> Result<()>
where
    F: FnOnce() -> io::Result<()>,
{
    if let Some(b) = backup {
        fs::rename(path, b).map_err(io_at(path))?;
    }
    if let Err(source) = persist() {
        if let Some(b) = backup {
            if let Err(undo) = fs::rename(b, path) {
                log::error!(
                    "{}: could not restore from {}: {}",
                    path.to_string_lossy(),
                    b.to_string_lossy(),
                    undo
                );
            }
        }
        return Err(WtfError::Io {
            path: path.to_string_lossy().to_string(),
            source,
        });
    }
    Ok(())
}

fn process_one(input: &Input, dest: &Destination, policy: &Policy) -> Result<Outcome> {
    let data = input.read()?;
    let processed = engine::process(&data, policy);
    drop(data);
    let mut wrote = false;
    if let (Destination::InPlace { backup }, Input::Path(p)) = (dest, input) {
        if processed.changed() {
            replace_in_place(p, &processed.output, backup.as_deref())?;
            wrote = true;
        }
    }
    Ok(Outcome {
        report: FileReport {
            file: input.name(),
            tally: processed.tally,
            reference: processed.reference,
            reference_from_first: policy.eol_target == EolTarget::First,
            wrote,
        },
        output: match dest {
            Destination::Stdout | Destination::File(_) => Some(processed.output),
            Destination::Discard | Destination::InPlace { .. } => None,
        },
        notes: processed.notes,
    })
}

/// One log line for a note: `<file> [EMPTY ]LINE <n>: <message>`.
pub fn format_note(file: &str, note: &Note) -> String {
    format!(
        "{} {}LINE {}: {}",
        file,
        if note.empty { "EMPTY " } else { "" },
        note.line,
        note.message
    )
}

fn emit_notes(file: &str, notes: &[Note]) {
    for n in notes {
        log::log!(n.level, "{}", format_note(file, n));
    }
}

fn open_sink(dest: &Destination) -> Result<Option<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match dest {
        Destination::Stdout => Box::new(io::stdout().lock()),
        Destination::File(p) => Box::new(io::BufWriter::new(
            fs::File::create(p).map_err(io_at(p))?,
        )),
        Destination::Discard | Destination::InPlace { .. } => return Ok(None),
    };
    Ok(Some(sink))
}

/// Process all inputs. Per-file failures are collected, never fatal.
pub fn run(inputs: &[Input], dest: &Destination, policy: &Policy) -> (Vec<FileReport>, Vec<FileError>) {
    let outcomes: Vec<(String, Result<Outcome>)> = inputs
        .par_iter()
        .map(|input| (input.name(), process_one(input, dest, policy)))
        .collect();

    let mut reports = Vec::new();
    let mut errors = Vec::new();
    let mut sink = match open_sink(dest) {
        Ok(s) => s,
        Err(e) => {
            errors.push(FileError {
                file: dest_name(dest),
                message: e.to_string(),
            });
            None
        }
    };
    for (name, outcome) in outcomes {
        match outcome {
            Ok(o) => {
                emit_notes(&name, &o.notes);
                let written = match (sink.as_mut(), o.output.as_deref()) {
                    (Some(w), Some(data)) => w.write_all(data),
                    _ => Ok(()),
                };
                if let Err(e) = written {
                    errors.push(FileError {
                        file: dest_name(dest),
                        message: e.to_string(),
                    });
                    sink = None;
                }
                if o.report.wrote {
                    log::info!("{}: rewritten", name);
                }
                reports.push(o.report);
            }
            Err(e) => errors.push(FileError {
                file: name,
                message: e.to_string(),
            }),
        }
    }
    if let Some(mut w) = sink {
        if let Err(e) = w.flush() {
            errors.push(FileError {
                file: dest_name(dest),
                message: e.to_string(),
            });
        }
    }
    (reports, errors)
}

fn dest_name(dest: &Destination) -> String {
    match dest {
        Destination::File(p) => p.to_string_lossy().to_string(),
        _ => "<stdout>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_in_place_rewrites_only_changed_files() {
        let dir = tempdir().unwrap();
        let dirty = dir.path().join("dirty.txt");
        let clean = dir.path().join("clean.txt");
        fs::write(&dirty, "a \nb\n\n").unwrap();
        fs::write(&clean, "ok\n").unwrap();
        let inputs = vec![Input::Path(dirty.clone()), Input::Path(clean.clone())];
        let dest = Destination::InPlace { backup: None };
        let (reports, errors) = run(&inputs, &dest, &Policy::default());
        assert!(errors.is_empty());
        assert_eq!(fs::read(&dirty).unwrap(), b"a\nb\n");
        assert_eq!(fs::read(&clean).unwrap(), b"ok\n");
        assert!(reports[0].wrote);
        assert!(!reports[1].wrote);
        assert_eq!(reports[0].tally.trail_space.fixed, 1);
        // no temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_in_place_with_backup() {
        let dir = tempdir().unwrap();
        let f = dir.path().join("x.md");
        fs::write(&f, "x\r\ny\n").unwrap();
        replace_in_place(&f, b"x\r\ny\r\n", Some(".orig")).unwrap();
        assert_eq!(fs::read(&f).unwrap(), b"x\r\ny\r\n");
        assert_eq!(fs::read(dir.path().join("x.md.orig")).unwrap(), b"x\r\ny\n");
        // a second backup would clobber the first one
        let err = replace_in_place(&f, b"z\n", Some(".orig")).unwrap_err();
        assert!(matches!(err, WtfError::BackupExists { .. }));
        assert_eq!(fs::read(&f).unwrap(), b"x\r\ny\r\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_in_place_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let f = dir.path().join("run.sh");
        fs::write(&f, "echo hi \n").unwrap();
        fs::set_permissions(&f, fs::Permissions::from_mode(0o755)).unwrap();
        replace_in_place(&f, b"echo hi\n", None).unwrap();
        let mode = fs::metadata(&f).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
    }

    #[test]
    fn test_missing_file_is_reported_and_others_processed() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.txt");
        fs::write(&good, "g").unwrap();
        let inputs = vec![Input::Path(dir.path().join("nope.txt")), Input::Path(good)];
        let (reports, errors) = run(&inputs, &Destination::Discard, &Policy::default());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].file.ends_with("nope.txt"));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].tally.eof_newline.fixed, 1);
    }

    #[test]
    fn test_output_file_receives_fixed_bytes() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("in.txt");
        let out = dir.path().join("out.txt");
        fs::write(&src, "a\r\nb\nc").unwrap();
        let (reports, errors) = run(
            &[Input::Path(src.clone())],
            &Destination::File(out.clone()),
            &Policy::default(),
        );
        assert!(errors.is_empty());
        assert_eq!(fs::read(&out).unwrap(), b"a\r\nb\r\nc\r\n");
        assert_eq!(fs::read(&src).unwrap(), b"a\r\nb\nc");
        assert_eq!(reports[0].tally.eol_mismatch.fixed, 1);
    }

    #[test]
    fn test_validate_rejects_bad_combinations() {
        let stdin = vec![Input::Stdin];
        assert!(validate(&stdin, &Destination::InPlace { backup: None }).is_err());
        let two = vec![Input::Path("a".into()), Input::Path("b".into())];
        assert!(validate(&two, &Destination::File("o".into())).is_err());
        assert!(validate(&two, &Destination::Stdout).is_ok());
        assert!(validate(&[Input::Stdin, Input::Stdin], &Destination::Stdout).is_err());
    }

    #[test]
    fn test_expand_inputs_globs_when_needed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("c.md"), "").unwrap();
        let pat = dir.path().join("*.txt").to_string_lossy().to_string();
        let got = expand_inputs(&[pat]);
        assert_eq!(
            got,
            vec![
                Input::Path(dir.path().join("a.txt")),
                Input::Path(dir.path().join("b.txt")),
            ]
        );
        assert_eq!(expand_inputs(&[]), vec![Input::Stdin]);
        let none = dir.path().join("*.rs").to_string_lossy().to_string();
        assert_eq!(expand_inputs(&[none.clone()]), vec![Input::Path(none.into())]);
    }

    #[test]
    fn test_only_stream_destinations_keep_output() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("a.txt");
        fs::write(&p, "a \n").unwrap();
        let input = Input::Path(p.clone());
        let policy = Policy::default();
        let o = process_one(&input, &Destination::Discard, &policy).unwrap();
        assert!(o.output.is_none());
        let o = process_one(&input, &Destination::Stdout, &policy).unwrap();
        assert_eq!(o.output.as_deref(), Some(&b"a\n"[..]));
        let o = process_one(&input, &Destination::InPlace { backup: None }, &policy).unwrap();
        assert!(o.output.is_none());
        assert!(o.report.wrote);
        assert_eq!(fs::read(&p).unwrap(), b"a\n");
    }

    #[test]
    fn test_note_lines_name_file_and_line() {
        let plain = Note {
            line: 3,
            empty: false,
            level: log::Level::Debug,
            message: "changing 'a \\n' to 'a\\n'".into(),
        };
        assert_eq!(
            format_note("x.txt", &plain),
            "x.txt LINE 3: changing 'a \\n' to 'a\\n'"
        );
        let empty = Note {
            line: 7,
            empty: true,
            level: log::Level::Debug,
            message: "removing blank line at end of file".into(),
        };
        assert_eq!(
            format_note("<stdin>", &empty),
            "<stdin> EMPTY LINE 7: removing blank line at end of file"
        );
    }

    #[test]
    fn test_failed_persist_restores_backup() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("f.txt");
        let b = dir.path().join("f.txt.bak");
        fs::write(&p, "orig \n").unwrap();
        let res = swap_in(&p, Some(&b), || {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        });
        assert!(matches!(res, Err(WtfError::Io { .. })));
        assert_eq!(fs::read(&p).unwrap(), b"orig \n");
        assert!(!b.exists());

        let res = swap_in(&p, Some(&b), || fs::write(&p, "new\n"));
        assert!(res.is_ok());
        assert_eq!(fs::read(&p).unwrap(), b"new\n");
        assert_eq!(fs::read(&b).unwrap(), b"orig \n");
    }
}
