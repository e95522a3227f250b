//! wtfix CLI binary entry point.
//! Resolves configuration, runs the fixer over all inputs, and prints results.

use clap::Parser;
use std::io::Write;
use wtfix::cli::Cli;
use wtfix::models::{exit_status, Summary, EXIT_ERROR};
use wtfix::{config, output, run, utils};

/// Route `log` output to stderr as plain lines. `RUST_LOG` takes precedence.
fn init_logging(verbose: u8) {
    env_logger::Builder::new()
        .filter_level(utils::log_filter(verbose))
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn main() {
    let cli = Cli::parse();

    let cfg_path = cli.config.clone().or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|cwd| config::discover_config(&cwd))
    });
    let cfg = match cfg_path.as_deref().map(config::load_config).transpose() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            std::process::exit(EXIT_ERROR);
        }
    };
    let eff = config::resolve_effective(&cli.overrides(), cfg.as_ref(), cfg_path);
    init_logging(eff.verbose);

    if let Some(p) = eff.config_path.as_ref() {
        log::info!("{} using config {}", utils::info_prefix(), p.to_string_lossy());
    }
    if eff.tab_space_downgraded {
        eprintln!(
            "{} {}",
            utils::note_prefix(),
            "changing to --report-tab-space-mix (tab/space mix cannot be fixed)"
        );
    }

    let inputs = run::expand_inputs(&cli.inputs);
    let dest = cli.destination(eff.backup.as_deref());
    if let Err(e) = run::validate(&inputs, &dest) {
        eprintln!("{} {}", utils::error_prefix(), e);
        std::process::exit(EXIT_ERROR);
    }

    let (reports, errors) = run::run(&inputs, &dest, &eff.policy);
    output::print_report(
        &reports,
        &errors,
        &eff.policy,
        &eff.format,
        eff.verbose,
        eff.no_exit_codes,
    );
    let summary = Summary::from_reports(&reports, &errors);
    std::process::exit(exit_status(&summary, eff.no_exit_codes));
}
