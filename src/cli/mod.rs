//! Command-line interface.

use clap::{Parser, Subcommand};

/// Quill - a small blogging REST API
#[derive(Parser)]
#[command(name = "quill")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,
}

impl Cli {
    /// The requested command, defaulting to `serve`.
    #[must_use]
    pub fn resolved_command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}
