//! # Iron Status Main Application Entry Point
//!
//! Loads the bar layout, opens the display sink and runs every block until
//! the process is killed.
//!
//! ## Example Usage
//!
//! ```bash
//! # Publish to the X root window using the default configuration
//! iron_status
//!
//! # Try a configuration out on the terminal
//! iron_status --config my-bar.json5 --sink stdout
//!
//! # Print a single status and exit
//! iron_status --once --sink stdout
//! ```
//!
//! Log levels can be controlled through the `RUST_LOG` environment variable.
//! Logs go to stderr so that stdout stays free for the status itself.

use clap::Parser;
use iron_status::config::Config;
use iron_status::error::IronStatusError;
use iron_status::registry::Registry;
use iron_status::sink::{self, SinkKind};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// iron_status - a status bar for dwm
#[derive(Parser, Debug)]
#[command(name = "iron_status")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to <config dir>/iron_status/config.json5)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Where to publish the status, overriding the configuration
    #[arg(short = 's', long = "sink", value_enum)]
    sink: Option<SinkKind>,

    /// Compute every block once, publish a single status and exit
    #[arg(long)]
    once: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<(), IronStatusError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(sink) = cli.sink {
        config.sink = sink;
    }

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    tracing::info!(
        "Starting iron_status with {} blocks, publishing to {}",
        config.blocks.len(),
        config.sink
    );

    let sink = sink::open(config.sink)?;
    let registry = Registry::from_config(&config)?;

    if cli.once {
        registry.render_once(sink);
        return Ok(());
    }

    match registry.run(sink)? {}
}
