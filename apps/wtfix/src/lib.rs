//! wtfix core library.
//!
//! This crate exposes programmatic APIs for finding and fixing whitespace
//! issues in text files: trailing space, blank lines at end of file, a
//! missing final newline, inconsistent line endings, and spaces before tabs
//! in indentation.
//!
//! High-level modules:
//! - `lines`: Lossless line splitting and reassembly.
//! - `checks`: The five whitespace checks.
//! - `engine`: `process`, the pure per-file entry point.
//! - `models`: Policy, tally, and run report types plus exit status.
//! - `config`: Discovery and effective configuration resolution.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `run`: Input iteration, stream output, and in-place editing.
//! - `output`: Human/JSON summary printers.
//! - `error`: Error type for the I/O and configuration boundary.
//! - `utils`: Supporting helpers.
pub mod checks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod lines;
pub mod models;
pub mod output;
pub mod run;
pub mod utils;
