//! CLI argument definitions for the `glossa` binary.
//!
//! Parsing lives here so the entrypoint only orchestrates.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Extract translatable messages and inspect message ids.
#[derive(Parser, Debug)]
#[command(name = "glossa")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Extract using glossa.toml in the current directory:\n",
    "    $ glossa extract\n\n",
    "  Extract two directories with four workers:\n",
    "    $ glossa extract --jobs 4 src lib\n\n",
    "  Show the catalog key for a message:\n",
    "    $ glossa id right --context direction",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract message records from source files into a JSON file.
    Extract(ExtractArgs),

    /// Print the catalog id of a message.
    Id(IdArgs),
}

/// Arguments for the extract command.
#[derive(Args, Debug, Clone, Default)]
pub struct ExtractArgs {
    /// Configuration file [default: glossa.toml when present].
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Output file, overriding the configured one.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Number of worker threads.
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,

    /// Files, directories, or glob patterns, replacing `include`.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}

/// Arguments for the id command.
#[derive(Args, Debug, Clone)]
pub struct IdArgs {
    /// Source-language message text.
    pub message: String,

    /// Disambiguating context.
    #[arg(long, value_name = "CTX")]
    pub context: Option<String>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
