use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

use paperlens_cli::{interval_counts, load_settings, run_timeline, TIMELINE};
use paperlens_core::args::RunArgs;
use paperlens_core::config::Config;
use paperlens_core::logging::init_tracing;

#[derive(Parser)]
#[command(name = "paperlens")]
#[command(author, version, about = "Date-bucketed n-gram timelines over a document collection")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the timeline report for a run
    Timeline {
        /// Run-args JSON file written by the launcher
        args_file: PathBuf,

        /// Hide the terminal progress bar
        #[arg(long)]
        quiet: bool,
    },

    /// Print interval label -> document count as JSON
    Intervals {
        /// Run-args JSON file written by the launcher
        args_file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if tracing::dispatcher::has_been_set() {
                error!(error = %format!("{e:#}"), "run failed");
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Timeline { args_file, quiet } => {
            let args = RunArgs::from_file(&args_file)?;
            init_tracing(Some(&args.output_path(TIMELINE, "log")))?;
            let settings = load_settings(Config::load()?, &args)?;
            let files = run_timeline(&args, settings, !quiet)?;
            println!("{}", files.html.display());
        }
        Commands::Intervals { args_file } => {
            let args = RunArgs::from_file(&args_file)?;
            init_tracing(None)?;
            let settings = load_settings(Config::load()?, &args)?;
            let counts = interval_counts(&args, settings)?;
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
    }
    Ok(())
}
