//! Per-block display state
//!
//! A [`Slot`] holds the latest icon/text/color triple written by exactly one
//! producer, the dirty flag that tells the aggregator there is something new
//! to consume, and the cached markup fragment the aggregator last built from it.

use std::sync::{Mutex, MutexGuard};

/// Icon, text and color of one block, always replaced as a whole
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotData {
    pub icon: String,
    pub text: String,
    /// Opaque color token understood by the display sink (e.g. `#ebcb8b`)
    pub color: String,
}

impl SlotData {
    pub fn new(
        icon: impl Into<String>,
        text: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            icon: icon.into(),
            text: text.into(),
            color: color.into(),
        }
    }
}

/// Everything behind a slot's lock
#[derive(Debug, Default)]
pub struct SlotState {
    data: SlotData,
    dirty: bool,
    rendered: String,
}

impl SlotState {
    /// Replace the whole triple and mark it for the aggregator.
    ///
    /// Only the owning producer calls this, with the slot lock held.
    pub fn update(&mut self, data: SlotData) {
        self.data = data;
        self.dirty = true;
    }

    /// Take the current triple if it has not been consumed yet.
    ///
    /// Only the aggregator calls this, with the slot lock held.
    pub fn consume_if_dirty(&mut self) -> Option<SlotData> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.data.clone())
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn data(&self) -> &SlotData {
        &self.data
    }

    /// Last fragment built by the aggregator, empty until the first rebuild
    #[must_use]
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub(crate) fn set_rendered(&mut self, rendered: String) {
        self.rendered = rendered;
    }
}

/// One status bar segment at a fixed position
#[derive(Debug)]
pub struct Slot {
    position: usize,
    name: String,
    state: Mutex<SlotState>,
}

impl Slot {
    #[must_use]
    pub fn new(position: usize, name: impl Into<String>) -> Self {
        Self {
            position,
            name: name.into(),
            state: Mutex::new(SlotState::default()),
        }
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acquire the slot's exclusive lock.
    ///
    /// A producer that panicked while holding the lock leaves the last fully
    /// written triple behind (fields are swapped in one assignment), so a
    /// poisoned lock is recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
