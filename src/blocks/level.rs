//! Blocks showing a level written to a file by an external script

use super::{fill, FAIL_ICON};
use crate::producer::Compute;
use crate::slot::SlotData;
use crate::utils::{is_num, read_file, strip};
use std::path::{Path, PathBuf};
use tracing::warn;

const VOLUME_MUTED: &str = "\u{f0581}";
const VOLUME_LOW: &str = "\u{f057f}";
const VOLUME_MEDIUM: &str = "\u{f0580}";
const VOLUME_HIGH: &str = "\u{f057e}";
const BRIGHTNESS_ICON: &str = "\u{2600}";

/// Raw file content, either a number or a free-form word such as "muted"
enum Level {
    Value(i64),
    Word(String),
}

fn read_level(path: &Path) -> Option<Level> {
    let Some(content) = read_file(path) else {
        warn!("Cannot read {}", path.display());
        return None;
    };
    if is_num(&content) {
        if let Ok(value) = content.trim().parse() {
            return Some(Level::Value(value));
        }
    }
    Some(Level::Word(strip(&content)))
}

/// Volume percentage
pub struct Volume {
    path: PathBuf,
    color: String,
}

impl Volume {
    #[must_use]
    pub fn new(path: PathBuf, color: String) -> Self {
        Self { path, color }
    }
}

impl Compute for Volume {
    fn compute(&mut self, out: &mut SlotData) {
        match read_level(&self.path) {
            Some(Level::Value(volume)) => {
                let icon = match volume {
                    v if v <= 0 => VOLUME_MUTED,
                    v if v < 25 => VOLUME_LOW,
                    v if v < 50 => VOLUME_MEDIUM,
                    _ => VOLUME_HIGH,
                };
                fill(out, icon, format!("{volume}%"), &self.color);
            }
            Some(Level::Word(word)) => fill(out, VOLUME_MUTED, word, &self.color),
            None => fill(out, VOLUME_MUTED, FAIL_ICON, &self.color),
        }
    }
}

/// Backlight percentage from a raw value
pub struct Brightness {
    path: PathBuf,
    scale: f64,
    color: String,
}

impl Brightness {
    #[must_use]
    pub fn new(path: PathBuf, scale: f64, color: String) -> Self {
        Self { path, scale, color }
    }
}

impl Compute for Brightness {
    fn compute(&mut self, out: &mut SlotData) {
        let text = match read_level(&self.path) {
            #[allow(clippy::cast_precision_loss)]
            Some(Level::Value(raw)) => format!("{:.0}%", (raw as f64 / self.scale).round()),
            Some(Level::Word(word)) => word,
            None => FAIL_ICON.to_string(),
        };
        fill(out, BRIGHTNESS_ICON, text, &self.color);
    }
}
