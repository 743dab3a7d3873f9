//! # Iron Status Library
//!
//! Core of the `iron_status` status bar for dwm. Several independent sources
//! (clock, sensors, battery, files written by scripts) each refresh on their
//! own schedule; their latest values are merged into one status line and
//! published to a display sink.
//!
//! ## Overview
//!
//! - `slot`: per-block display state, dirty flag and cached rendering
//! - `schedule`: fixed, wall-clock aligned and file-watch triggers
//! - `producer`: one thread per block, recomputing its slot on every trigger
//! - `signal`: the wake-up shared by all producers and the aggregator
//! - `aggregator`: the single consumer that rebuilds and publishes the status
//! - `render`: dwm status2d markup of one block
//! - `blocks`: the built-in compute functions
//! - `registry`: the ordered set of blocks built from the configuration
//! - `sink`: where the status goes (X root window name, stdout)
//! - `config`, `error`, `utils`: configuration, error type and helpers
//!
//! ## Getting Started
//!
//! ```no_run
//! use iron_status::{config::Config, registry::Registry, sink};
//!
//! fn main() -> Result<(), iron_status::error::IronStatusError> {
//!     let config = Config::load(None)?;
//!     let sink = sink::open(config.sink)?;
//!     let registry = Registry::from_config(&config)?;
//!     match registry.run(sink)? {}
//! }
//! ```
//!
//! ## Architecture
//!
//! Producers only ever hold their own slot lock, and release it before
//! waking the aggregator. The aggregator holds the signal lock for a whole
//! pass and takes slot locks one at a time, so any number of updates that
//! land while it is waiting are folded into a single publish.

/// Custom error types module
///
/// Defines the `IronStatusError` enum used across the library.
pub mod error;

/// Configuration management module
///
/// Loads the bar layout from a JSON5 file and validates it.
pub mod config;

pub mod aggregator;
pub mod blocks;
pub mod producer;
pub mod registry;
pub mod render;
pub mod schedule;
pub mod signal;
pub mod sink;
pub mod slot;

/// Utility functions module
///
/// File and text helpers shared by the built-in blocks.
pub mod utils;
