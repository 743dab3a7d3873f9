use super::{fill, FAIL_ICON, FAIL_ICON_PADDED};
use crate::producer::Compute;
use crate::slot::SlotData;
use chrono::{DateTime, Local, Timelike};
use std::fmt::Write;
use tracing::warn;

/// Clock faces for 12, 1, 2, ... 11 o'clock
const CLOCK_FACES: [&str; 12] = [
    "\u{e38d}", "\u{e382}", "\u{e383}", "\u{e384}", "\u{e385}", "\u{e386}",
    "\u{e387}", "\u{e388}", "\u{e389}", "\u{e38a}", "\u{e38b}", "\u{e38c}",
];

/// Local time with an icon showing the hour
pub struct Clock {
    format: String,
    color: String,
}

impl Clock {
    #[must_use]
    pub fn new(format: String, color: String) -> Self {
        Self { format, color }
    }

    fn fill_at(&self, now: &DateTime<Local>, out: &mut SlotData) {
        let mut text = String::new();
        if write!(text, "{}", now.format(&self.format)).is_err() {
            warn!("Invalid clock format {:?}", self.format);
            fill(out, FAIL_ICON, FAIL_ICON_PADDED, &self.color);
            return;
        }

        let face = CLOCK_FACES[(now.hour() % 12) as usize];
        fill(out, face, text, &self.color);
    }
}

impl Compute for Clock {
    fn compute(&mut self, out: &mut SlotData) {
        self.fill_at(&Local::now(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_clock_formats_time_and_face() {
        let clock = Clock::new("%H:%M".to_string(), "#ffffff".to_string());
        let mut out = SlotData::default();

        clock.fill_at(&at(15, 7), &mut out);
        assert_eq!(out, SlotData::new("\u{e384}", "15:07", "#ffffff"));

        clock.fill_at(&at(0, 0), &mut out);
        assert_eq!(out.icon, "\u{e38d}");
        assert_eq!(out.text, "00:00");
    }

    #[test]
    fn test_clock_invalid_format_falls_back() {
        let clock = Clock::new("%Q".to_string(), "#ffffff".to_string());
        let mut out = SlotData::default();
        clock.fill_at(&at(9, 30), &mut out);
        assert_eq!(out, SlotData::new(FAIL_ICON, FAIL_ICON_PADDED, "#ffffff"));
    }
}
