use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "statree",
    about = "Query a path-addressed status registry",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// TOML file listing static entries to register at startup
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of simulated workers exposed under /status/workers
    #[arg(short, long, global = true, default_value = "2")]
    pub workers: usize,

    /// Treat segments past a leaf as not found
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve one path
    Query(QueryArgs),
    /// Dump the whole tree
    Tree,
}

#[derive(Args)]
pub struct QueryArgs {
    /// Path to resolve, e.g. /status/workers/0/pid
    pub path: String,
}
