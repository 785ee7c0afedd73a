//! Command-line parsing for the EC2 payment plan comparison.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! normalization and projection code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_HORIZON_YEARS, DuplicatePolicy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "plans", version, about = "EC2 payment plan comparison (price list based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print catalog meta, dimension counts and index size (default).
    Summary(CatalogArgs),
    /// Print the instance type × region table for one operating system.
    Table(TableArgs),
    /// Compare the plans of one instance type in one region.
    Show(ShowArgs),
    /// Launch the interactive TUI.
    ///
    /// Uses the same pipeline as the other commands, but browses keys and
    /// charts their projections in a terminal UI using Ratatui.
    Tui(CatalogArgs),
}

/// Options shared by every command: where the catalog comes from and how to read it.
#[derive(Debug, Args, Clone)]
pub struct CatalogArgs {
    /// Price list JSON file.
    #[arg(short = 'f', long = "file", env = "PLANS_PRICE_FILE", default_value = "price.json")]
    pub file: PathBuf,

    /// Projection horizon in years.
    #[arg(
        long,
        default_value_t = DEFAULT_HORIZON_YEARS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub horizon: u32,

    /// What to do when two products resolve to the same instance type, region and OS.
    #[arg(long = "on-duplicate", value_enum, default_value_t = DuplicatePolicy::LastWriteWins)]
    pub on_duplicate: DuplicatePolicy,
}

#[derive(Debug, Args, Clone)]
pub struct TableArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Operating system, e.g. `Linux`.
    #[arg(long)]
    pub os: String,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Operating system, e.g. `Linux`.
    #[arg(long)]
    pub os: String,

    /// Region code, e.g. `us-east-1`.
    #[arg(long)]
    pub region: String,

    /// Instance type, e.g. `m4.large`.
    #[arg(long = "type", value_name = "TYPE")]
    pub instance_type: String,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_parses_key_and_common_flags() {
        let cli = Cli::try_parse_from([
            "plans",
            "show",
            "-f",
            "offers.json",
            "--horizon",
            "5",
            "--os",
            "Linux",
            "--region",
            "us-east-1",
            "--type",
            "m4.large",
            "--no-plot",
        ])
        .unwrap();
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.catalog.file, PathBuf::from("offers.json"));
        assert_eq!(args.catalog.horizon, 5);
        assert_eq!(args.catalog.on_duplicate, DuplicatePolicy::LastWriteWins);
        assert_eq!(args.instance_type, "m4.large");
        assert!(args.no_plot);
        assert_eq!((args.width, args.height), (72, 20));
    }

    #[test]
    fn duplicate_policy_and_horizon_validation() {
        let cli = Cli::try_parse_from(["plans", "summary", "--on-duplicate", "reject"]).unwrap();
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.on_duplicate, DuplicatePolicy::Reject);

        assert!(Cli::try_parse_from(["plans", "summary", "--horizon", "0"]).is_err());
        assert!(Cli::try_parse_from(["plans", "table"]).is_err());
    }
}
