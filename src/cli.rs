use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Clone, Debug)]
#[command(name = "pgsift")]
#[command(about = "Classify SQL scripts and inspect schema changes and cron jobs")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Increase verbosity level (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a configuration file (defaults to ./pgsift.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Generate a sample configuration file
    Init,

    /// Sort the statements of a SQL file into queries, seeds and migrations
    Classify {
        /// SQL file to read, or '-' for stdin
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// List the tables, functions and cron jobs a SQL file touches
    Events {
        /// SQL file to read, or '-' for stdin
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Print events as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report tables created, filled or put under row level security
    Activity {
        /// SQL file to read, or '-' for stdin
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Print activity as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a pg_cron job command and show what kind of job it is
    Cron {
        /// The job command as stored by pg_cron
        #[arg(value_name = "COMMAND")]
        command: String,

        /// Only treat URLs of this project as edge functions
        #[arg(long)]
        project_ref: Option<String>,

        /// Print the parsed job as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Verbosity from the command line, `None` when no -v was given
    pub fn verbosity(&self) -> Option<u8> {
        (self.verbose > 0).then_some(self.verbose)
    }
}
