//! CLI module for Deep Research
//!
//! Provides command-line interface parsing for the deep-research binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Deep Research - plan, search, write and email research reports
#[derive(Parser, Debug)]
#[command(
    name = "deep-research",
    author = "Dirmacs <build@dirmacs.com>",
    version,
    about = "Deep Research - turn a question into a researched markdown report",
    long_about = "Plans a set of web searches for a query, runs them concurrently,\n\
                  writes a markdown report from the results and emails it.\n\n\
                  Domains in research.toml specialise the agents (e.g. cruises, jobs).",
    after_help = "EXAMPLES:\n    \
                  deep-research run \"best budget laptops 2024\"\n    \
                  deep-research run --domain cruise \"Alaska cruise with balcony\"\n    \
                  deep-research domains list\n    \
                  deep-research config --validate"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "research.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Research a query and print the report
    Run {
        /// The research question
        query: String,

        /// Domain from research.toml to specialise the agents
        #[arg(short, long)]
        domain: Option<String>,

        /// Do not email the report, even if [email] is configured
        #[arg(long)]
        no_email: bool,
    },

    /// Inspect configured research domains
    #[command(subcommand)]
    Domains(DomainCommands),

    /// Show configuration information
    Config {
        /// Resolve every stage's provider, including API key variables
        #[arg(long)]
        validate: bool,
    },
}

/// Domain subcommands
#[derive(Subcommand, Debug)]
pub enum DomainCommands {
    /// List all configured domains
    List,

    /// Show details for a specific domain
    Show {
        /// Name of the domain
        name: String,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
