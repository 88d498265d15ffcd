use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "focus", about = concat!("focus v", env!("CARGO_PKG_VERSION"), " - pick a random task and work on it for an hour"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep tasks, log, and focus.toml in this directory (default: current directory)
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to the end of the list
    Add(AddArgs),
    /// List the tasks in order
    List,
    /// Show the audit log
    Log(LogArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Task label
    pub task: String,
}

#[derive(Args)]
pub struct LogArgs {
    /// Only show the most recent N entries
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}
