//! Breakout analysis - main entry point
//!
//! This binary provides three subcommands:
//! - analyze: Detect breakouts for one parameter set and report outcomes
//! - sweep: Compare outcomes across a list of thresholds
//! - download: Fetch daily history from Yahoo Finance into the CSV cache

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "breakout-analysis")]
#[command(about = "Daily breakout detection with hold confirmation and forward outcome statistics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Data source overrides shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Primary symbol, e.g. "SI=F"
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Alternate symbols tried in order when the primary has no data (comma-separated)
    #[arg(long)]
    pub alternates: Option<String>,

    /// Data source: "csv" or "yahoo"
    #[arg(long)]
    pub source: Option<String>,

    /// Directory holding {SYMBOL}_1d.csv files
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
}

/// Hold and outcome windows shared by analyze and sweep
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Days the close must stay at or above the breakout low
    #[arg(long)]
    pub hold_days: Option<usize>,

    /// Trading days after the breakout at which the outcome is measured
    #[arg(long)]
    pub future_days: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect breakouts and report outcome statistics
    Analyze {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        window: WindowArgs,

        /// Minimum one-day gain in percent
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Number of recent breakouts to list
        #[arg(long)]
        recent: Option<usize>,

        /// Also write events with hold periods as JSON
        #[arg(long)]
        json: bool,

        /// Skip the CSV export
        #[arg(long)]
        no_export: bool,
    },

    /// Run the analysis for several thresholds
    Sweep {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        window: WindowArgs,

        /// Thresholds to test (comma-separated). E.g., "3,4,5,6,7"
        #[arg(long)]
        thresholds: Option<String>,

        /// Sort rows by metric (threshold, win_rate, avg_return, median_return, breakouts)
        #[arg(long, default_value = "threshold")]
        sort_by: String,

        /// Run sequentially instead of parallel
        #[arg(long)]
        sequential: bool,

        /// Output CSV path (defaults to {results_dir}/{symbol}_sweep.csv)
        #[arg(short, long)]
        output: Option<String>,

        /// Skip the CSV export
        #[arg(long)]
        no_export: bool,
    },

    /// Download daily history from Yahoo Finance into the data directory
    Download {
        #[command(flatten)]
        data: DataArgs,
    },
}

fn setup_logging(verbose: bool, command_name: &str, file_only: bool) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    // {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    // Filter out noisy HTTP crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    if file_only {
        // Sweep: keep the console clean for the progress bar
        let file_appender = tracing_appender::rolling::never("logs", &log_filename);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    } else {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(true);

        let file_appender = tracing_appender::rolling::never("logs", &log_filename);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        info!("Logging initialized");
        info!("Log file: {}", log_path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let (command_name, file_only) = match &cli.command {
        Commands::Analyze { .. } => ("analyze", false),
        Commands::Sweep { .. } => ("sweep", true),
        Commands::Download { .. } => ("download", false),
    };

    setup_logging(cli.verbose, command_name, file_only)?;

    match cli.command {
        Commands::Analyze {
            data,
            window,
            threshold,
            recent,
            json,
            no_export,
        } => commands::analyze::run(data, window, threshold, recent, json, no_export),

        Commands::Sweep {
            data,
            window,
            thresholds,
            sort_by,
            sequential,
            output,
            no_export,
        } => commands::sweep::run(
            data, window, thresholds, sort_by, sequential, output, no_export,
        ),

        Commands::Download { data } => commands::download::run(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_flags_parse() {
        let cli = Cli::try_parse_from([
            "breakout-analysis",
            "sweep",
            "--symbol",
            "SLV",
            "--thresholds",
            "3,5",
            "--hold-days",
            "1",
            "--sequential",
        ])
        .unwrap();

        match cli.command {
            Commands::Sweep {
                data,
                window,
                thresholds,
                sort_by,
                sequential,
                ..
            } => {
                assert_eq!(data.symbol.as_deref(), Some("SLV"));
                assert_eq!(window.hold_days, Some(1));
                assert_eq!(thresholds.as_deref(), Some("3,5"));
                assert_eq!(sort_by, "threshold");
                assert!(sequential);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["breakout-analysis", "analyze", "-v", "-t", "4.5"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Analyze {
                threshold: Some(t),
                ..
            } if t == 4.5
        ));
    }
}
