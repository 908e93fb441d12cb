//! Command-line arguments for the `linkorder` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "linkorder", about = "Order native static libraries for linking")]
pub struct Cli {
    /// Path to a JSON configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Library to ignore, either `foo` or `libfoo.a`. Repeatable.
    #[arg(long, global = true)]
    pub exclude: Vec<String>,

    /// Fail on archives that cannot be read.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Maximum directory depth to search.
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the static libraries found and their symbol counts.
    Scan { root: PathBuf },

    /// Print libraries in link order.
    Order {
        root: PathBuf,

        /// Print the full link plan as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print Cargo link directives.
    Emit {
        root: PathBuf,

        /// Omit rerun-if-changed lines.
        #[arg(long)]
        no_rerun: bool,
    },

    /// Print the dependency graph in Graphviz DOT format.
    Graph { root: PathBuf },
}

impl Command {
    pub fn root(&self) -> &PathBuf {
        match self {
            Command::Scan { root }
            | Command::Order { root, .. }
            | Command::Emit { root, .. }
            | Command::Graph { root } => root,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
