use super::{fill, FAIL_ICON};
use crate::producer::Compute;
use crate::slot::SlotData;
use crate::utils::read_number;
use std::path::PathBuf;

const THERMOMETER_FULL: &str = "\u{f2c7}";
const THERMOMETER_HALF: &str = "\u{f2c9}";
const THERMOMETER_QUARTER: &str = "\u{f2ca}";

/// CPU temperature from an hwmon input in millidegrees Celsius
pub struct Temperature {
    sensor: Option<PathBuf>,
    color: String,
}

impl Temperature {
    /// `sensor` is `None` when discovery found nothing; the block then
    /// always shows the fallback glyph.
    #[must_use]
    pub fn new(sensor: Option<PathBuf>, color: String) -> Self {
        Self { sensor, color }
    }
}

impl Compute for Temperature {
    fn compute(&mut self, out: &mut SlotData) {
        let celsius = self
            .sensor
            .as_deref()
            .and_then(read_number::<f64>)
            .map(|millis| millis / 1000.0);

        let text = celsius.map_or_else(|| FAIL_ICON.to_string(), |c| format!("{c:02.0}°C"));
        let icon = match celsius {
            Some(c) if c >= 60.0 => THERMOMETER_FULL,
            Some(c) if c >= 40.0 => THERMOMETER_HALF,
            _ => THERMOMETER_QUARTER,
        };
        fill(out, icon, text, &self.color);
    }
}
