use super::{fill, FAIL_ICON_PADDED};
use crate::producer::Compute;
use crate::slot::SlotData;
use crate::utils::{read_file, read_number};
use std::path::PathBuf;

const BATTERY_FULL: &str = "\u{f240}";
const BATTERY_THREE_QUARTERS: &str = "\u{f241}";
const BATTERY_HALF: &str = "\u{f242}";
const BATTERY_QUARTER: &str = "\u{f243}";
const BATTERY_EMPTY: &str = "\u{f244}";

/// Battery charge from `/sys/class/power_supply/<device>`
pub struct Battery {
    device: PathBuf,
    color: String,
}

impl Battery {
    #[must_use]
    pub fn new(device: PathBuf, color: String) -> Self {
        Self { device, color }
    }

    /// `None` when the capacity could not be read
    fn capacity(&self) -> Option<u32> {
        read_number(&self.device.join("capacity"))
    }
}

/// Icon for a charge level; unknown charge shows a full battery
fn battery_icon(capacity: Option<u32>) -> &'static str {
    match capacity {
        None => BATTERY_FULL,
        Some(c) if c >= 80 => BATTERY_FULL,
        Some(c) if c >= 60 => BATTERY_THREE_QUARTERS,
        Some(c) if c >= 40 => BATTERY_HALF,
        Some(c) if c >= 20 => BATTERY_QUARTER,
        Some(_) => BATTERY_EMPTY,
    }
}

impl Compute for Battery {
    fn compute(&mut self, out: &mut SlotData) {
        let Some(present) = read_file(&self.device.join("present")) else {
            fill(out, battery_icon(None), FAIL_ICON_PADDED, &self.color);
            return;
        };

        if !present.starts_with('1') {
            fill(out, battery_icon(None), "", &self.color);
            return;
        }

        let capacity = self.capacity();
        let text = capacity.map_or_else(|| FAIL_ICON_PADDED.to_string(), |c| format!("{c}%"));
        fill(out, battery_icon(capacity), text, &self.color);
    }
}
