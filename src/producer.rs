//! Producers: one thread per block, recomputing its slot on its schedule

use crate::error::{IronStatusError, Result};
use crate::schedule::Schedule;
use crate::signal::SharedSignal;
use crate::slot::{Slot, SlotData};
use std::convert::Infallible;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, trace};

/// Turns a raw reading into the icon/text/color of one block.
///
/// Implementations receive a blank [`SlotData`] and must fill all three
/// fields. A failing data source is not an error: write a fallback icon or
/// text and return, the next trigger retries.
pub trait Compute: Send {
    fn compute(&mut self, out: &mut SlotData);
}

impl<F> Compute for F
where
    F: FnMut(&mut SlotData) + Send,
{
    fn compute(&mut self, out: &mut SlotData) {
        self(out);
    }
}

/// Recompute `slot` under its lock, mark it dirty, then wake the aggregator.
///
/// The slot lock is released before the signal lock is taken, so a producer
/// never holds two locks at once.
pub fn safe_update(slot: &Slot, compute: &mut dyn Compute, signal: &SharedSignal) {
    {
        let mut state = slot.lock();
        let mut data = SlotData::default();
        compute.compute(&mut data);
        trace!(
            slot = slot.name(),
            icon = %data.icon,
            text = %data.text,
            color = %data.color,
            "slot updated"
        );
        state.update(data);
    }
    signal.notify();
}

/// A schedule bound to one slot and one compute function
pub struct Producer {
    slot: Arc<Slot>,
    schedule: Schedule,
    compute: Box<dyn Compute>,
}

impl Producer {
    #[must_use]
    pub fn new(slot: Arc<Slot>, schedule: Schedule, compute: Box<dyn Compute>) -> Self {
        Self {
            slot,
            schedule,
            compute,
        }
    }

    /// Run one [`safe_update`] outside of the schedule
    pub fn update(&mut self, signal: &SharedSignal) {
        safe_update(&self.slot, self.compute.as_mut(), signal);
    }

    /// Fill the slot once, then update it on every trigger, forever.
    ///
    /// # Errors
    ///
    /// Returns only when the schedule fails (a broken file watch).
    pub fn run(mut self, signal: &SharedSignal) -> Result<Infallible> {
        self.update(signal);
        loop {
            let triggers = self.schedule.wait_for_trigger()?;
            debug!(slot = self.slot.name(), triggers, "producer triggered");
            for _ in 0..triggers {
                self.update(signal);
            }
        }
    }

    /// Start the producer on its own named thread.
    ///
    /// A schedule failure inside the thread is fatal for the whole process.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to create the thread.
    pub fn spawn(self, signal: Arc<SharedSignal>) -> Result<JoinHandle<()>> {
        let name = format!("block-{}-{}", self.slot.position(), self.slot.name());
        info!(slot = self.slot.name(), schedule = %self.schedule, "starting producer");

        let thread_name = name.clone();
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || match self.run(&signal) {
                Ok(never) => match never {},
                Err(e) => {
                    error!("Producer {thread_name} failed: {e}");
                    std::process::exit(1);
                }
            })
            .map_err(|e| IronStatusError::Generic(format!("Failed to spawn {name}: {e}")))
    }
}
