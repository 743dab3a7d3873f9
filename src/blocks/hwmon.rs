//! Discovery of hwmon sensor inputs
//!
//! hwmon device numbers change between boots, so inputs are located by the
//! chip name each `hwmonN/name` file reports.

use crate::utils::{read_file, strip};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Find `<root>/hwmonN/<input>` on the chip named `chip`.
///
/// # Returns
///
/// The input path, or `None` if no chip of that name exposes it
#[must_use]
pub fn find_sensor(root: &Path, chip: &str, input: &str) -> Option<PathBuf> {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {}: {e}", root.display());
            return None;
        }
    };

    let mut devices: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    devices.sort();

    for device in devices {
        if !chip_matches(&device, chip) {
            continue;
        }
        let candidate = device.join(input);
        if candidate.is_file() {
            info!("Found {chip} {input} at {}", candidate.display());
            return Some(candidate);
        }
    }

    warn!("No {chip} sensor with {input} under {}", root.display());
    None
}

fn chip_matches(device: &Path, chip: &str) -> bool {
    read_file(&device.join("name")).is_some_and(|name| strip(&name) == chip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn hwmon(root: &Path, dir: &str, name: &str, inputs: &[&str]) {
        let device = root.join(dir);
        fs::create_dir_all(&device).unwrap();
        fs::write(device.join("name"), format!("{name}\n")).unwrap();
        for input in inputs {
            fs::write(device.join(input), "1000\n").unwrap();
        }
    }

    #[test]
    fn test_find_sensor_by_chip_name() {
        let root = tempfile::tempdir().unwrap();
        hwmon(root.path(), "hwmon0", "acpitz", &["temp1_input"]);
        hwmon(root.path(), "hwmon3", "coretemp", &["temp1_input", "temp2_input"]);
        hwmon(root.path(), "hwmon5", "dell_smm", &["fan1_input"]);

        assert_eq!(
            find_sensor(root.path(), "coretemp", "temp1_input"),
            Some(root.path().join("hwmon3/temp1_input"))
        );
        assert_eq!(
            find_sensor(root.path(), "dell_smm", "fan1_input"),
            Some(root.path().join("hwmon5/fan1_input"))
        );
    }

    #[test]
    fn test_find_sensor_missing_input_or_chip() {
        let root = tempfile::tempdir().unwrap();
        hwmon(root.path(), "hwmon0", "dell_smm", &["fan1_input"]);

        assert_eq!(find_sensor(root.path(), "dell_smm", "fan2_input"), None);
        assert_eq!(find_sensor(root.path(), "coretemp", "temp1_input"), None);
        assert_eq!(
            find_sensor(&root.path().join("missing"), "coretemp", "temp1_input"),
            None
        );
    }
}
