//! CLI argument parsing.
use clap::{Parser, Subcommand};

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = ".", global = true)]
    /// Path to the git repository holding the manifest and notes file.
    pub repo: String,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Release notes subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Build release notes from recent commits, bump the manifest version,
    /// and commit the result.
    Generate {
        #[arg(long, default_value_t = false)]
        /// Compute and log the result without writing files or committing.
        dry_run: bool,
    },

    /// Render the release notes as a collapsible HTML page.
    View {
        #[arg(long)]
        /// Directory or http(s) URL the notes file is loaded relative to.
        /// Defaults to the repository path.
        source: Option<String>,

        #[arg(long)]
        /// Write the page to this file instead of stdout.
        out_file: Option<String>,
    },
}
