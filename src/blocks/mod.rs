//! Compute functions for the built-in blocks
//!
//! Each block reads its data source and fills a [`SlotData`]. A source that
//! is missing or unreadable yields a fallback glyph instead of an error; the
//! next trigger tries again.

mod battery;
mod clock;
mod fan;
pub mod hwmon;
mod level;
mod memory;
mod power;
mod temperature;

pub use battery::Battery;
pub use clock::Clock;
pub use fan::Fan;
pub use level::{Brightness, Volume};
pub use memory::Memory;
pub use power::Power;
pub use temperature::Temperature;

use crate::config::{BlockConfig, BlockKind};
use crate::producer::Compute;
use crate::slot::SlotData;

/// Shown in place of a value that could not be read
pub const FAIL_ICON: &str = "\u{f128}";

/// Like [`FAIL_ICON`], padded for blocks whose text is joined with others
pub const FAIL_ICON_PADDED: &str = "\u{f128} ";

/// Build the compute function for a configured block
#[must_use]
pub fn build(block: &BlockConfig) -> Box<dyn Compute> {
    let color = block.color().to_string();
    match &block.kind {
        BlockKind::Clock { format } => Box::new(Clock::new(format.clone(), color)),
        BlockKind::Volume { path } => Box::new(Volume::new(path.clone(), color)),
        BlockKind::Brightness { path, scale } => {
            Box::new(Brightness::new(path.clone(), *scale, color))
        }
        BlockKind::Battery { device } => Box::new(Battery::new(device.clone(), color)),
        BlockKind::Power { device, samples } => {
            Box::new(Power::new(device.clone(), *samples, color))
        }
        BlockKind::Temperature {
            hwmon_root,
            chip,
            input,
        } => Box::new(Temperature::new(
            hwmon::find_sensor(hwmon_root, chip, input),
            color,
        )),
        BlockKind::Fan {
            hwmon_root,
            chip,
            inputs,
        } => Box::new(Fan::new(
            inputs
                .iter()
                .map(|input| hwmon::find_sensor(hwmon_root, chip, input))
                .collect(),
            color,
        )),
        BlockKind::Memory { meminfo } => Box::new(Memory::new(meminfo.clone(), color)),
    }
}

fn fill(out: &mut SlotData, icon: &str, text: impl Into<String>, color: &str) {
    out.icon = icon.to_string();
    out.text = text.into();
    out.color = color.to_string();
}
