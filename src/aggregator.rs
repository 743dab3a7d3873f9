//! The single consumer that merges every slot into one status line

use crate::render::render;
use crate::signal::SharedSignal;
use crate::sink::DisplaySink;
use crate::slot::Slot;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

pub struct Aggregator {
    slots: Vec<Arc<Slot>>,
    bar_color: String,
    sink: Box<dyn DisplaySink>,
}

impl Aggregator {
    /// `slots` must already be in display order
    #[must_use]
    pub fn new(
        slots: Vec<Arc<Slot>>,
        bar_color: impl Into<String>,
        sink: Box<dyn DisplaySink>,
    ) -> Self {
        Self {
            slots,
            bar_color: bar_color.into(),
            sink,
        }
    }

    /// Wait for producers and publish, forever
    pub fn run(&mut self, signal: &SharedSignal) -> ! {
        loop {
            let guard = signal.wait();
            self.publish();
            drop(guard);
        }
    }

    /// One bounded iteration of [`run`](Self::run).
    ///
    /// Returns the published status, or `None` if no producer signalled
    /// within `timeout`.
    pub fn step(&mut self, signal: &SharedSignal, timeout: Duration) -> Option<String> {
        let guard = signal.wait_timeout(timeout)?;
        let status = self.publish();
        drop(guard);
        Some(status)
    }

    /// Rebuild the status and hand it to the sink
    pub fn publish(&mut self) -> String {
        let status = self.rebuild();
        debug!(%status, "publishing status");
        self.sink.publish(&status);
        status
    }

    /// Scan every slot in order, re-render the dirty ones and join the
    /// cached fragments.
    ///
    /// Slot locks are taken one at a time. A pass where nothing is dirty
    /// reproduces the previous status.
    #[must_use]
    pub fn rebuild(&self) -> String {
        let mut status = String::new();

        for slot in &self.slots {
            let mut state = slot.lock();
            if let Some(data) = state.consume_if_dirty() {
                let rendered = render(&data, &self.bar_color);
                trace!(
                    slot = slot.name(),
                    position = slot.position(),
                    %rendered,
                    "slot re-rendered"
                );
                state.set_rendered(rendered);
            }
            status.push_str(state.rendered());
        }

        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::safe_update;
    use crate::slot::SlotData;
    use std::sync::Mutex;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl DisplaySink for Recorder {
        fn publish(&mut self, status: &str) {
            self.0.lock().unwrap().push(status.to_string());
        }
    }

    fn slots(names: &[&str]) -> Vec<Arc<Slot>> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Arc::new(Slot::new(i, *name)))
            .collect()
    }

    fn set(slot: &Slot, signal: &SharedSignal, icon: &str, text: &str) {
        let (icon, text) = (icon.to_string(), text.to_string());
        safe_update(
            slot,
            &mut move |out: &mut SlotData| {
                out.icon.clone_from(&icon);
                out.text.clone_from(&text);
                out.color = "C".to_string();
            },
            signal,
        );
    }

    #[test]
    fn test_rebuild_in_registry_order_skipping_empty() {
        let slots = slots(&["a", "b", "c"]);
        let signal = SharedSignal::new();
        let aggregator = Aggregator::new(slots.clone(), "B", Box::new(Recorder::default()));

        set(&slots[2], &signal, "", "third");
        set(&slots[1], &signal, "", "");
        set(&slots[0], &signal, "", "first");

        assert_eq!(aggregator.rebuild(), "^cC^^bB^ first ^cC^^bB^ third ");
    }

    #[test]
    fn test_coalesced_updates_publish_once() {
        let slots = slots(&["a", "b"]);
        let signal = SharedSignal::new();
        let recorder = Recorder::default();
        let mut aggregator = Aggregator::new(slots.clone(), "B", Box::new(recorder.clone()));

        set(&slots[0], &signal, "", "one");
        set(&slots[1], &signal, "", "two");

        let status = aggregator.step(&signal, Duration::from_secs(1)).unwrap();
        assert_eq!(status, "^cC^^bB^ one ^cC^^bB^ two ");
        assert!(aggregator.step(&signal, Duration::from_millis(20)).is_none());
        assert_eq!(recorder.0.lock().unwrap().as_slice(), [status]);
    }

    #[test]
    fn test_clean_pass_keeps_cached_rendering() {
        let slots = slots(&["a"]);
        let signal = SharedSignal::new();
        let mut aggregator = Aggregator::new(slots.clone(), "B", Box::new(Recorder::default()));

        set(&slots[0], &signal, "I", "");
        let first = aggregator.publish();
        let second = aggregator.publish();
        assert_eq!(first, "^cB^^bC^ I ");
        assert_eq!(first, second);
    }

    #[test]
    fn test_only_dirty_slots_are_rerendered() {
        let slots = slots(&["a", "b"]);
        let signal = SharedSignal::new();
        let aggregator = Aggregator::new(slots.clone(), "B", Box::new(Recorder::default()));

        set(&slots[0], &signal, "", "x");
        set(&slots[1], &signal, "", "y");
        let _ = aggregator.rebuild();

        set(&slots[1], &signal, "", "z");
        assert!(!slots[0].lock().is_dirty());
        assert_eq!(aggregator.rebuild(), "^cC^^bB^ x ^cC^^bB^ z ");
        assert!(!slots[1].lock().is_dirty());
    }
}
