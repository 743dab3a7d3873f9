//! The ordered set of producers built from the configuration

use crate::aggregator::Aggregator;
use crate::blocks;
use crate::config::{Config, ScheduleConfig};
use crate::error::Result;
use crate::producer::Producer;
use crate::schedule::{AlignedInterval, FixedInterval, Schedule, WatchTrigger};
use crate::signal::SharedSignal;
use crate::sink::DisplaySink;
use crate::slot::Slot;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::info;

/// Every block of the bar in display order, with its slot and producer.
///
/// Built once at startup and never changed afterwards.
pub struct Registry {
    producers: Vec<Producer>,
    slots: Vec<Arc<Slot>>,
    bar_color: String,
}

/// Turn a configured schedule into a live one.
///
/// # Errors
///
/// Returns an error if a file watch cannot be installed
pub fn schedule(config: &ScheduleConfig) -> Result<Schedule> {
    Ok(match config {
        ScheduleConfig::Every(secs) => Schedule::Every(FixedInterval::from_secs(*secs)),
        ScheduleConfig::Aligned { epoch, interval } => {
            Schedule::Aligned(AlignedInterval::new(*epoch, *interval))
        }
        ScheduleConfig::Watch(path) => Schedule::Watch(WatchTrigger::new(path)?),
    })
}

impl Registry {
    /// Build a slot and a producer for each configured block; a block's
    /// position is its index in the list.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a file watch
    /// cannot be installed
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let mut producers = Vec::with_capacity(config.blocks.len());
        let mut slots = Vec::with_capacity(config.blocks.len());

        for (position, block) in config.blocks.iter().enumerate() {
            let slot = Arc::new(Slot::new(position, block.kind.name()));
            let schedule = schedule(&block.schedule)?;
            producers.push(Producer::new(
                Arc::clone(&slot),
                schedule,
                blocks::build(block),
            ));
            slots.push(slot);
        }

        info!("Registered {} blocks", slots.len());
        Ok(Self {
            producers,
            slots,
            bar_color: config.bar_color.clone(),
        })
    }

    #[must_use]
    pub fn slots(&self) -> &[Arc<Slot>] {
        &self.slots
    }

    /// Start every producer on its own thread and aggregate on the calling
    /// thread, forever.
    ///
    /// # Errors
    ///
    /// Returns an error if a producer thread cannot be spawned
    pub fn run(self, sink: Box<dyn DisplaySink>) -> Result<Infallible> {
        let signal = Arc::new(SharedSignal::new());
        let mut aggregator = Aggregator::new(self.slots, self.bar_color, sink);

        for producer in self.producers {
            producer.spawn(Arc::clone(&signal))?;
        }

        aggregator.run(&signal)
    }

    /// Compute every block once on the calling thread and publish a single
    /// status.
    pub fn render_once(self, sink: Box<dyn DisplaySink>) -> String {
        let signal = SharedSignal::new();
        let mut producers = self.producers;
        for producer in &mut producers {
            producer.update(&signal);
        }
        Aggregator::new(self.slots, self.bar_color, sink).publish()
    }
}
