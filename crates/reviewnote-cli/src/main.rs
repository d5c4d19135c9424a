//! reviewnote CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use reviewnote_core::selection::EligibilityPolicy;

mod commands;

#[derive(Parser)]
#[command(
    name = "reviewnote",
    version,
    about = "Per-student review notes and question miss-rate statistics for mock exams"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one review note per student, bundled into a ZIP archive
    Notes {
        /// Roster spreadsheet (.csv, .xlsx, .xls, .ods)
        #[arg(long)]
        roster: PathBuf,

        /// ZIP of question images with m1/ and m2/ folders
        #[arg(long)]
        assets: PathBuf,

        /// Exam title used in document names and headings
        #[arg(long)]
        title: Option<String>,

        /// Output archive path
        #[arg(long, default_value = "review-notes.zip")]
        output: PathBuf,

        /// Who gets a note: both-attempted, both-present, any-missed
        #[arg(long)]
        eligibility: Option<EligibilityPolicy>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compute per-question miss rates
    Stats {
        /// Roster spreadsheet (.csv, .xlsx, .xls, .ods)
        #[arg(long)]
        roster: PathBuf,

        /// Exam title used in the report heading
        #[arg(long)]
        title: Option<String>,

        /// Number of questions in module 1 (1-200)
        #[arg(long)]
        m1_questions: Option<u32>,

        /// Number of questions in module 2 (1-200)
        #[arg(long)]
        m2_questions: Option<u32>,

        /// Emphasize rows at or above this miss rate, in percent
        #[arg(long)]
        threshold: Option<f64>,

        /// Output format: table, json, html, csv, xlsx, all (comma-separated)
        #[arg(long, default_value = "table")]
        format: String,

        /// Output directory for report files
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a roster and report every parsing warning
    Validate {
        /// Roster spreadsheet (.csv, .xlsx, .xls, .ods)
        #[arg(long)]
        roster: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and an example roster
    Init,
}

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reviewnote=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Notes {
            roster,
            assets,
            title,
            output,
            eligibility,
            config,
        } => commands::notes::execute(roster, assets, title, output, eligibility, config),
        Commands::Stats {
            roster,
            title,
            m1_questions,
            m2_questions,
            threshold,
            format,
            output,
            config,
        } => commands::stats::execute(
            roster,
            title,
            [m1_questions, m2_questions],
            threshold,
            format,
            output,
            config,
        ),
        Commands::Validate { roster, config } => commands::validate::execute(roster, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
