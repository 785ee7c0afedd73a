//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the normalize/project pipeline
//! - prints reports/plots or starts the TUI

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::cli::{CatalogArgs, Command, ShowArgs, TableArgs};
use crate::domain::{RunConfig, TypeAtLocation};
use crate::error::{AppError, EXIT_INPUT};

pub mod pipeline;

/// Entry point for the `plans` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    // `plans` and `plans -f offers.json` behave like `plans summary ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Table(args) => handle_table(args),
        Command::Show(args) => handle_show(args),
        Command::Tui(args) => crate::tui::run(run_config_from_args(&args)),
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn handle_summary(args: CatalogArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args);
    let run = pipeline::run(&config)?;
    println!("{}", crate::report::format_catalog_summary(&run.catalog, run.horizon_years));
    Ok(())
}

fn handle_table(args: TableArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.catalog);
    let run = pipeline::run(&config)?;

    if !run.catalog.dimensions.operating_systems.contains(&args.os) {
        let known: Vec<&str> = run
            .catalog
            .dimensions
            .operating_systems
            .iter()
            .map(String::as_str)
            .collect();
        return Err(AppError::new(
            EXIT_INPUT,
            format!("Unknown operating system '{}'. Known: {}", args.os, known.join(", ")),
        ));
    }

    let table = crate::report::build_table(&run.catalog, &args.os);
    println!("{}", crate::report::format_table(&table));
    Ok(())
}

fn handle_show(args: ShowArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.catalog);
    let run = pipeline::run(&config)?;

    let key = TypeAtLocation::new(args.os, args.region, args.instance_type);
    let projections = run
        .projections_for(&key)
        .ok_or_else(|| AppError::new(EXIT_INPUT, format!("No priced plans for {key}.")))?;

    let summaries = crate::report::summarize_plans(projections);
    println!(
        "{}",
        crate::report::format_plan_summary(&key, &summaries, run.horizon_years)
    );

    if !args.no_plot {
        let plot = crate::plot::render_cost_plot(projections, args.width, args.height);
        println!("{plot}");
    }

    Ok(())
}

pub fn run_config_from_args(args: &CatalogArgs) -> RunConfig {
    RunConfig {
        price_file: args.file.clone(),
        horizon_years: args.horizon,
        duplicate_policy: args.on_duplicate,
    }
}

/// Rewrite argv so `plans` defaults to `plans summary`.
///
/// Rules:
/// - `plans`                      -> `plans summary`
/// - `plans -f offers.json ...`   -> `plans summary -f offers.json ...`
/// - `plans --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("summary".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "table" | "show" | "tui");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "summary".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn rewrite_defaults_to_summary() {
        assert_eq!(rewrite_args(argv(&["plans"])), argv(&["plans", "summary"]));
        assert_eq!(
            rewrite_args(argv(&["plans", "-f", "x.json"])),
            argv(&["plans", "summary", "-f", "x.json"])
        );
        assert_eq!(rewrite_args(argv(&["plans", "--help"])), argv(&["plans", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["plans", "table", "--os", "Linux"])),
            argv(&["plans", "table", "--os", "Linux"])
        );
    }

    #[test]
    fn run_config_copies_flags() {
        let cli =
            crate::cli::Cli::parse_from(["plans", "tui", "-f", "offers.json", "--horizon", "2"]);
        let Command::Tui(args) = cli.command else {
            panic!("expected tui");
        };
        let config = run_config_from_args(&args);
        assert_eq!(config.price_file, std::path::PathBuf::from("offers.json"));
        assert_eq!(config.horizon_years, 2);
    }
}
