use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

mod commands;

use commands::{
    dump::{dump_array, DumpTarget},
    list::list_arrays,
    summary::{print_summary, summarize_file},
};

#[derive(Parser)]
#[command(name = "ecltool")]
#[command(about = "Inspect ECLIPSE result files (INIT, UNRST, SMSPEC, ...)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log catalog construction at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every array: index, name, type tag and element count
    List {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Print the decoded values of one array, one per line
    Dump {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Array name, or catalog index
        #[arg(value_name = "NAME|INDEX")]
        target: String,

        /// Pick the N-th array with this name (unified restart files repeat names)
        #[arg(long, default_value_t = 0)]
        occurrence: usize,

        /// If > 0, stop after N values
        #[arg(long, default_value_t = 0)]
        limit: usize,

        /// Output path (defaults to stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Per-type totals and repeated names
    Summary {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::List { input } => list_arrays(&input),
        Commands::Dump {
            input,
            target,
            occurrence,
            limit,
            out,
        } => dump_array(
            &input,
            DumpTarget::parse(&target, occurrence),
            limit,
            out.as_deref(),
        ),
        Commands::Summary { input } => summarize_file(&input).map(|r| print_summary(&r)),
    }
}
