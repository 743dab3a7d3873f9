use super::{fill, FAIL_ICON_PADDED};
use crate::producer::Compute;
use crate::slot::SlotData;
use crate::utils::read_file;
use std::path::PathBuf;

const MEMORY_ICON: &str = "\u{f2db}";

/// Used memory, `MemTotal - MemAvailable` from `/proc/meminfo`
pub struct Memory {
    meminfo: PathBuf,
    color: String,
}

impl Memory {
    #[must_use]
    pub fn new(meminfo: PathBuf, color: String) -> Self {
        Self { meminfo, color }
    }
}

/// Value in kB of a `Key:   1234 kB` line
fn field(meminfo: &str, key: &str) -> Option<u64> {
    meminfo.lines().find_map(|line| {
        let rest = line.strip_prefix(key)?.strip_prefix(':')?;
        rest.split_whitespace().next()?.parse().ok()
    })
}

/// Used memory in MiB
fn used_mib(meminfo: &str) -> Option<u64> {
    let total = field(meminfo, "MemTotal")?;
    let available = field(meminfo, "MemAvailable")?;
    Some(total.saturating_sub(available) / 1024)
}

fn format_mib(used: u64) -> String {
    if used > 1024 {
        #[allow(clippy::cast_precision_loss)]
        let gib = used as f64 / 1024.0;
        format!("{gib:.1}G")
    } else {
        format!("{used}M")
    }
}

impl Compute for Memory {
    fn compute(&mut self, out: &mut SlotData) {
        let text = read_file(&self.meminfo)
            .as_deref()
            .and_then(used_mib)
            .map_or_else(|| FAIL_ICON_PADDED.to_string(), format_mib);
        fill(out, MEMORY_ICON, text, &self.color);
    }
}
