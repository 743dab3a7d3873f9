use super::{fill, FAIL_ICON};
use crate::producer::Compute;
use crate::slot::SlotData;
use crate::utils::{read_file, read_number, strip};
use std::collections::VecDeque;
use std::path::PathBuf;

const POWER_ICON: &str = "\u{f0e7}";

/// Battery power draw in watts, smoothed over the last few readings.
///
/// Hidden while the battery reports `Full`.
pub struct Power {
    device: PathBuf,
    samples: usize,
    history: VecDeque<f64>,
    color: String,
}

impl Power {
    #[must_use]
    pub fn new(device: PathBuf, samples: usize, color: String) -> Self {
        Self {
            device,
            samples: samples.max(1),
            history: VecDeque::with_capacity(samples),
            color,
        }
    }

    /// Current draw in watts, `None` if unreadable or zero
    #[allow(clippy::cast_precision_loss)]
    fn read_watts(&self) -> Option<f64> {
        let current: i64 = read_number(&self.device.join("current_now"))?;
        let voltage: i64 = read_number(&self.device.join("voltage_now"))?;
        if current == 0 || voltage == 0 {
            return None;
        }
        Some(current as f64 / 1e6 * voltage as f64 / 1e6)
    }

    fn record(&mut self, watts: f64) -> f64 {
        if self.history.len() == self.samples {
            self.history.pop_front();
        }
        self.history.push_back(watts);
        #[allow(clippy::cast_precision_loss)]
        let count = self.history.len() as f64;
        self.history.iter().sum::<f64>() / count
    }
}

impl Compute for Power {
    fn compute(&mut self, out: &mut SlotData) {
        let Some(status) = read_file(&self.device.join("status")) else {
            fill(out, POWER_ICON, FAIL_ICON, &self.color);
            return;
        };
        if strip(&status) == "Full" {
            fill(out, "", "", &self.color);
            return;
        }

        match self.read_watts() {
            Some(watts) => {
                let average = self.record(watts);
                fill(out, POWER_ICON, format!("{average:.1}W"), &self.color);
            }
            None => fill(out, POWER_ICON, FAIL_ICON, &self.color),
        }
    }
}
