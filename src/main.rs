//! CLI entry point for httpwrap.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use httpwrap::{Client, ClientConfig, Response, default_config_path};
use tracing::{debug, info};

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = resolve_config(&args)?;
    let client = Client::with_config(config).context("Failed to build HTTP client")?;

    match &args.command {
        Command::Get { url } => {
            let response = client
                .get(url)
                .await
                .with_context(|| format!("GET {url} failed"))?;
            print_response(&response)?;
        }
        Command::Post {
            url,
            content_type,
            data,
        } => {
            let response = client
                .post(url, content_type, data.as_bytes().to_vec())
                .await
                .with_context(|| format!("POST {url} failed"))?;
            print_response(&response)?;
        }
        Command::Download { url, path } => {
            client
                .download_file(url, path)
                .await
                .with_context(|| format!("Failed to download {url}"))?;
            info!(path = %path.display(), "Saved");
        }
    }

    Ok(())
}

/// Built-in defaults, then the config file, then CLI flags.
fn resolve_config(args: &Args) -> Result<ClientConfig> {
    let path = args.config.clone().or_else(|| default_config_path().filter(|path| path.exists()));

    let mut config = match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            ClientConfig::load(&path)?
        }
        None => ClientConfig::default(),
    };

    if let Some(secs) = args.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    if args.insecure {
        config.skip_tls_verify = true;
    }
    Ok(config)
}

fn print_response(response: &Response) -> Result<()> {
    info!(status = %response.status, bytes = response.body.len(), "Response received");

    let mut stdout = io::stdout().lock();
    stdout.write_all(&response.body)?;
    stdout.flush()?;

    if !response.is_success() {
        bail!("request failed: {}", response.status);
    }
    Ok(())
}
