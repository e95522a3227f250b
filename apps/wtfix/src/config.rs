//! Configuration discovery and effective settings resolution.
//!
//! wtfix reads `wtfix.toml|yaml|yml` from the current directory or the
//! closest ancestor (stopping at a `.git` directory) and merges it with CLI
//! flags to produce an `Effective` config.
//! Defaults:
//! - `format`: `human`
//! - `verbose`: 1
//! - `no_exit_codes`: false
//! - `backup`: none (extension used by `-i`; `-I EXT` overrides it)
//! - `policy.{trail_space,eof_blanks,eof_newline,eol}`: `fix`
//! - `policy.eol_target`: `first`
//! - `policy.tab_space_mix`: `report`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{io_at, Result, WtfError};
use crate::models::policy::{Action, EolTarget, Policy};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_NAMES: [&str; 3] = ["wtfix.toml", "wtfix.yaml", "wtfix.yml"];

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
/// Policy section under `[policy]`.
pub struct PolicyCfg {
    pub trail_space: Option<Action>,
    pub eof_blanks: Option<Action>,
    pub eof_newline: Option<Action>,
    pub eol: Option<Action>,
    pub eol_target: Option<EolTarget>,
    pub tab_space_mix: Option<Action>,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
/// Root configuration loaded from `wtfix.toml|yaml`.
pub struct WtfixConfig {
    pub format: Option<String>,
    pub verbose: Option<u8>,
    pub no_exit_codes: Option<bool>,
    pub backup: Option<String>,
    pub policy: Option<PolicyCfg>,
}

#[derive(Debug, Default, Clone)]
/// Values given on the command line; `None` means "not given".
pub struct CliOverrides {
    pub trail_space: Option<Action>,
    pub eof_blanks: Option<Action>,
    pub eof_newline: Option<Action>,
    pub eol: Option<(Action, Option<EolTarget>)>,
    pub tab_space_mix: Option<Action>,
    pub format: Option<String>,
    pub verbose: Option<u8>,
    pub no_exit_codes: bool,
    pub backup: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the run after applying precedence.
pub struct Effective {
    pub policy: Policy,
    pub format: String,
    pub verbose: u8,
    pub no_exit_codes: bool,
    /// Backup extension for in-place edits.
    pub backup: Option<String>,
    /// `fix` was requested for tab/space mix and turned into `report`.
    pub tab_space_downgraded: bool,
    pub config_path: Option<PathBuf>,
}

/// Walk upward from `start` looking for a config file.
///
/// Stops at the first directory holding a `wtfix.*` file or a `.git` entry.
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut cur = start;
    loop {
        for name in CONFIG_NAMES {
            let p = cur.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
        if cur.join(".git").exists() {
            return None;
        }
        cur = cur.parent()?;
    }
}

/// Load and parse a config file. A malformed file is an error.
pub fn load_config(path: &Path) -> Result<WtfixConfig> {
    let s = fs::read_to_string(path).map_err(io_at(path))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        serde_yaml::from_str::<WtfixConfig>(&s).map_err(|e| e.to_string())
    } else {
        toml::from_str::<WtfixConfig>(&s).map_err(|e| e.to_string())
    };
    let cfg = parsed.map_err(|message| WtfError::Config {
        path: path.to_string_lossy().to_string(),
        message,
    })?;
    if let Some(f) = cfg.format.as_deref() {
        if f != "human" && f != "json" {
            return Err(WtfError::Config {
                path: path.to_string_lossy().to_string(),
                message: format!("format must be human or json, got '{}'", f),
            });
        }
    }
    Ok(cfg)
}

/// Resolve `Effective` by merging CLI flags, the config file, and defaults.
pub fn resolve_effective(
    cli: &CliOverrides,
    cfg: Option<&WtfixConfig>,
    config_path: Option<PathBuf>,
) -> Effective {
    let defaults = Policy::default();
    let pc = cfg.and_then(|c| c.policy.clone()).unwrap_or_default();

    let (cli_eol, cli_target) = match cli.eol {
        Some((a, t)) => (Some(a), t),
        None => (None, None),
    };
    let mut policy = Policy {
        trail_space: cli
            .trail_space
            .or(pc.trail_space)
            .unwrap_or(defaults.trail_space),
        eof_blanks: cli
            .eof_blanks
            .or(pc.eof_blanks)
            .unwrap_or(defaults.eof_blanks),
        eof_newline: cli
            .eof_newline
            .or(pc.eof_newline)
            .unwrap_or(defaults.eof_newline),
        eol: cli_eol.or(pc.eol).unwrap_or(defaults.eol),
        eol_target: cli_target
            .or(pc.eol_target)
            .unwrap_or(defaults.eol_target),
        tab_space_mix: cli
            .tab_space_mix
            .or(pc.tab_space_mix)
            .unwrap_or(defaults.tab_space_mix),
    };
    let tab_space_downgraded = policy.downgrade_tab_space_fix();

    let format = cli
        .format
        .clone()
        .or_else(|| cfg.and_then(|c| c.format.clone()))
        .unwrap_or_else(|| "human".to_string());
    let verbose = cli
        .verbose
        .or_else(|| cfg.and_then(|c| c.verbose))
        .unwrap_or(1);
    let no_exit_codes =
        cli.no_exit_codes || cfg.and_then(|c| c.no_exit_codes).unwrap_or(false);
    let backup = cli
        .backup
        .clone()
        .or_else(|| cfg.and_then(|c| c.backup.clone()));

    Effective {
        policy,
        format,
        verbose,
        no_exit_codes,
        backup,
        tab_space_downgraded,
        config_path,
    }
}
