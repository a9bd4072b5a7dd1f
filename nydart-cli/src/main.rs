//! NydArt CLI - artwork analysis client.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use nydart_core::{AdvisorError, AnalysisType, ErrorBanner};
use tracing_subscriber::EnvFilter;

mod commands;
mod exit_codes;
mod utils;

use exit_codes::ExitCode;

const EXIT_CODES_HELP: &str = "\
Exit codes:
  0   Success
  1   General error
  65  Image could not be processed
  66  Input file not found or unreadable
  69  Analysis or history service unavailable, or request timed out
  77  Not logged in, or credential rejected";

#[derive(Parser)]
#[command(name = "nydart")]
#[command(author, version, about = "Artwork analysis from the command line", long_about = None)]
#[command(after_help = EXIT_CODES_HELP)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bearer credential issued by the auth service (overrides NYDART_TOKEN)
    #[arg(long, global = true, value_name = "TOKEN")]
    token: Option<String>,

    /// Directory holding the local analysis history (overrides NYDART_STORE_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    store_dir: Option<PathBuf>,

    /// Suppress informational output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Bound an image to 1200px and re-encode it as JPEG
    Compress {
        /// Image to compress
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (defaults to <FILE>.compressed.jpg)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Check whether the analysis service is reachable
    Health,

    /// Submit an image for critique
    Analyze {
        /// Image to analyze
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Analysis type: general, technical, style, composition, color
        #[arg(short = 't', long = "type", default_value = "general")]
        analysis_type: AnalysisType,

        /// Print the normalized result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recent analyses (remote when available, local otherwise)
    History {
        /// Number of remote analyses to fetch
        #[arg(short, long)]
        limit: Option<u32>,

        /// Delete the locally cached analyses
        #[arg(long)]
        clear_local: bool,

        /// List every stored remote analysis
        #[arg(long, conflicts_with = "clear_local")]
        all: bool,
    },

    /// Show one analysis from the history
    Show {
        /// Entry id as printed by `nydart history`
        #[arg(value_name = "ID")]
        id: String,

        /// Write a plain-text report to this file
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Print the artwork draft pre-filled from this analysis
        #[arg(long)]
        draft: bool,
    },

    /// Delete a stored remote analysis
    Delete {
        /// Remote analysis id
        #[arg(value_name = "ID")]
        id: String,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let global = utils::GlobalOptions {
        token: cli.token,
        store_dir: cli.store_dir,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Compress { file, output } => commands::compress::execute(file, output, &global),
        Commands::Health => commands::health::execute(&global).await,
        Commands::Analyze {
            file,
            analysis_type,
            json,
        } => commands::analyze::execute(file, analysis_type, json, &global).await,
        Commands::History {
            limit,
            clear_local,
            all,
        } => commands::history::execute(limit, clear_local, all, &global).await,
        Commands::Show { id, report, draft } => {
            commands::show::execute(id, report, draft, &global).await
        }
        Commands::Delete { id } => commands::delete::execute(id, &global).await,
    }
}

fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<AdvisorError>() {
        Some(advisor) => {
            let banner = ErrorBanner::from_error(advisor);
            eprintln!("{} {}", "Error:".red().bold(), banner.message);
            if let Some(hint) = banner.hint {
                eprintln!("       {}", hint.yellow());
            }
        }
        None => eprintln!("{} {err:#}", "Error:".red().bold()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let exit = match run(cli).await {
        Ok(()) => ExitCode::success(),
        Err(err) => {
            report_error(&err);
            ExitCode::from_anyhow(&err)
        }
    };

    std::process::exit(exit.code);
}
