mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::calculate::CalculateArgs;

#[derive(Parser)]
#[command(
    name = "footprint",
    version,
    about = "CO₂ footprint calculator for fuel ledgers and equipment inventories"
)]
struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every sheet of a workbook and compute its CO₂ footprint
    Calculate(CalculateArgs),
    /// Compute CO₂ intensity (footprint per revenue) over the years
    Intensity {
        /// Workbook whose first sheet has year, revenue and CO₂ columns
        workbook: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the intensity table to an xlsx file
        #[arg(short = 'O', long = "export", value_name = "FILE")]
        export: Option<PathBuf>,
    },
    /// Manage emission factor configuration
    Factors {
        #[command(subcommand)]
        action: FactorsAction,
    },
}

#[derive(Subcommand)]
enum FactorsAction {
    /// Print a zero-valued factor configuration to start from
    Template,
    /// Merge a factor workbook (headers on row 5) and print the result as JSON
    Import {
        /// Factor workbook (xlsx)
        sheet: PathBuf,

        /// Factor configuration to merge into (default: all zero)
        #[arg(long, value_name = "FILE")]
        base: Option<PathBuf>,
    },
    /// Validate a factor configuration file
    Validate {
        /// Path to JSON factor file
        file: PathBuf,
    },
    /// List the factor workbook labels that are recognized
    Labels,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Calculate(args) => commands::calculate::run(args),
        Commands::Intensity {
            workbook,
            output,
            export,
        } => commands::intensity::run(workbook, &output, export),
        Commands::Factors { action } => match action {
            FactorsAction::Template => commands::factors::template(),
            FactorsAction::Import { sheet, base } => commands::factors::import(&sheet, base),
            FactorsAction::Validate { file } => commands::factors::validate(&file),
            FactorsAction::Labels => commands::factors::labels(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
