use super::{fill, FAIL_ICON};
use crate::producer::Compute;
use crate::slot::SlotData;
use crate::utils::read_number;
use std::path::PathBuf;

const FAN_ICON: &str = "\u{f0210}";
const FAN_OFF_ICON: &str = "\u{f081d}";

/// Speeds of one or more fans in RPM
pub struct Fan {
    sensors: Vec<Option<PathBuf>>,
    color: String,
}

impl Fan {
    #[must_use]
    pub fn new(sensors: Vec<Option<PathBuf>>, color: String) -> Self {
        Self { sensors, color }
    }
}

impl Compute for Fan {
    fn compute(&mut self, out: &mut SlotData) {
        let rpms: Vec<Option<u32>> = self
            .sensors
            .iter()
            .map(|sensor| sensor.as_deref().and_then(read_number))
            .collect();

        let all_stopped = !rpms.is_empty() && rpms.iter().all(|rpm| *rpm == Some(0));
        if all_stopped {
            fill(out, FAN_OFF_ICON, " ", &self.color);
            return;
        }

        let speeds = rpms
            .iter()
            .map(|rpm| rpm.map_or_else(|| FAIL_ICON.to_string(), |rpm| rpm.to_string()))
            .collect::<Vec<_>>()
            .join(" ");
        let text = if rpms.iter().any(Option::is_some) {
            format!("{speeds} rpm")
        } else {
            speeds
        };
        fill(out, FAN_ICON, text, &self.color);
    }
}
