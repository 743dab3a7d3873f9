//! Display sinks receiving the finished status string

use crate::error::{IronStatusError, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::Command;
use tracing::{debug, warn};

/// Receives every status the aggregator publishes.
///
/// Publishing cannot fail from the aggregator's point of view; a sink logs
/// its own errors and carries on.
pub trait DisplaySink: Send {
    fn publish(&mut self, status: &str);
}

/// Which sink to publish to
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// The X root window name, read by dwm as its status text
    #[default]
    RootWindow,
    /// One line per status on standard output
    Stdout,
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkKind::RootWindow => f.write_str("root_window"),
            SinkKind::Stdout => f.write_str("stdout"),
        }
    }
}

/// Open the sink selected by `kind`.
///
/// # Errors
///
/// Returns an error if the display cannot be reached.
pub fn open(kind: SinkKind) -> Result<Box<dyn DisplaySink>> {
    match kind {
        SinkKind::RootWindow => Ok(Box::new(RootWindowSink::open()?)),
        SinkKind::Stdout => Ok(Box::new(StdoutSink)),
    }
}

/// Sets the root window name through `xsetroot`
#[derive(Debug)]
pub struct RootWindowSink {
    display: String,
}

impl RootWindowSink {
    /// # Errors
    ///
    /// Returns an error if `DISPLAY` is not set.
    pub fn open() -> Result<Self> {
        let display_name = std::env::var("DISPLAY")
            .ok()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| IronStatusError::Display("DISPLAY is not set".to_string()))?;
        debug!("Publishing status to root window of display {display_name}");
        Ok(Self {
            display: display_name,
        })
    }
}

impl DisplaySink for RootWindowSink {
    fn publish(&mut self, status: &str) {
        match Command::new("xsetroot")
            .arg("-display")
            .arg(&self.display)
            .arg("-name")
            .arg(status)
            .status()
        {
            Ok(exit) if exit.success() => {}
            Ok(exit) => warn!("xsetroot exited with {exit}"),
            Err(e) => warn!("Failed to run xsetroot: {e}"),
        }
    }
}

/// Prints each status on its own line
#[derive(Debug, Default)]
pub struct StdoutSink;

impl DisplaySink for StdoutSink {
    fn publish(&mut self, status: &str) {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{status}").and_then(|()| stdout.flush()) {
            warn!("Failed to write status to stdout: {e}");
        }
    }
}
