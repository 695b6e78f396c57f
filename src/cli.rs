//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fetch URLs and download files with a preconfigured HTTP client.
#[derive(Parser, Debug)]
#[command(name = "httpwrap")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/httpwrap/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overall request timeout in seconds (1-3600)
    #[arg(short, long, global = true, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    pub insecure: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations exposed on the command line.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// GET a URL and print the body
    Get {
        /// Target URL
        url: String,
    },
    /// POST data to a URL and print the body
    Post {
        /// Target URL
        url: String,
        /// Content-Type of the body
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,
        /// Body to send
        #[arg(short, long, default_value = "")]
        data: String,
    },
    /// Download a URL to a file
    Download {
        /// Source URL
        url: String,
        /// Destination path
        path: PathBuf,
    },
}
