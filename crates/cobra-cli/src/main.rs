//! Cobra lowering CLI
//!
//! Reads a type-checked program tree as JSON and prints the lowered
//! basic-block IR, or the class layouts the lowering would use.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "cobra")]
#[command(about = "Cobra compiler lowering stage", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower a typed program tree to basic-block IR
    Lower {
        /// Typed program tree (JSON)
        file: PathBuf,
        /// Lowering configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Validate the lowered IR
        #[arg(long)]
        validate: bool,
    },

    /// Print the class field layouts of a typed program tree
    Layout {
        /// Typed program tree (JSON)
        file: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    Pretty,
    /// Serialized IR
    Json,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Lower {
            file,
            config,
            format,
            output,
            validate,
        } => commands::lower::execute(commands::lower::LowerArgs {
            file,
            config,
            format,
            output,
            validate,
        }),

        Commands::Layout { file } => commands::layout::execute(&file),
    }
}
