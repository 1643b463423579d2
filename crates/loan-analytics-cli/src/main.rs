mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::advisory::{QuadrantsArgs, RecommendArgs};
use commands::portfolio::{CheckArgs, PortfolioArgs, SegmentsArgs};
use commands::trend::{TrendArgs, WindowsArgs};

/// Loan portfolio yield and recommendation analytics
#[derive(Parser)]
#[command(
    name = "lpa",
    version,
    about = "Loan portfolio yield and recommendation analytics",
    long_about = "Analyzes a raw loan snapshot with decimal precision: \
                  capital-weighted portfolio yield, segment and trend breakdowns, \
                  quadrant classification, and threshold-rule recommendations. \
                  Snapshots are JSON, YAML, or CSV files using the legacy export \
                  column names, or JSON piped via stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Portfolio-level yield metrics for a snapshot
    Portfolio(PortfolioArgs),
    /// Segment breakdown by holding period, loan size, or customer class
    Segments(SegmentsArgs),
    /// Yearly or trailing-monthly yield trend with period deltas
    Trend(TrendArgs),
    /// Trailing 3/6/12-month window yields
    Windows(WindowsArgs),
    /// Median-threshold quadrant classification of yearly performance
    Quadrants(QuadrantsArgs),
    /// Threshold-rule recommendations from indicator readings
    Recommend(RecommendArgs),
    /// Validate a raw snapshot and report rejected records
    Check(CheckArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Portfolio(args) => commands::portfolio::run_portfolio(args),
        Commands::Segments(args) => commands::portfolio::run_segments(args),
        Commands::Trend(args) => commands::trend::run_trend(args),
        Commands::Windows(args) => commands::trend::run_windows(args),
        Commands::Quadrants(args) => commands::advisory::run_quadrants(args),
        Commands::Recommend(args) => commands::advisory::run_recommend(args),
        Commands::Check(args) => commands::portfolio::run_check(args),
        Commands::Version => {
            println!("lpa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
