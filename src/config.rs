use crate::error::{IronStatusError, Result};
use crate::sink::SinkKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the config directory
pub const CONFIG_FILE: &str = "config.json5";

/// Background color of the bar
pub const DEFAULT_BAR_COLOR: &str = "#282828";

/// A Unix time on a whole minute, used to align the clock on minute boundaries
pub const MINUTE_EPOCH: i64 = 1_592_384_460;

/// Longest allowed block interval, one day
pub const MAX_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Application configuration structure
///
/// Blocks are displayed in the order they are listed.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Config {
    /// Background color of the bar, used for icon text and text background
    #[serde(default = "default_bar_color")]
    pub bar_color: String,
    /// Where the status is published
    #[serde(default)]
    pub sink: SinkKind,
    /// Blocks, left to right
    pub blocks: Vec<BlockConfig>,
}

/// One block: what it shows, when it refreshes and in which color
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BlockConfig {
    #[serde(flatten)]
    pub kind: BlockKind,
    pub schedule: ScheduleConfig,
    /// Overrides the block's default color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// When a block is recomputed
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleConfig {
    /// Every N seconds from startup
    Every(u64),
    /// On `epoch + k * interval` wall-clock seconds
    Aligned { epoch: i64, interval: u64 },
    /// Whenever the file is closed after a write
    Watch(PathBuf),
}

/// What a block displays, with its data source options
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockKind {
    Clock {
        /// `strftime`-style format of the local time
        #[serde(default = "default_clock_format")]
        format: String,
    },
    Volume {
        /// File holding the volume percentage
        path: PathBuf,
    },
    Brightness {
        /// File holding the raw backlight value
        path: PathBuf,
        /// Raw units per percent
        #[serde(default = "default_brightness_scale")]
        scale: f64,
    },
    Battery {
        #[serde(default = "default_battery_device")]
        device: PathBuf,
    },
    Power {
        #[serde(default = "default_battery_device")]
        device: PathBuf,
        /// Number of readings averaged together
        #[serde(default = "default_power_samples")]
        samples: usize,
    },
    Temperature {
        #[serde(default = "default_hwmon_root")]
        hwmon_root: PathBuf,
        #[serde(default = "default_temperature_chip")]
        chip: String,
        #[serde(default = "default_temperature_input")]
        input: String,
    },
    Fan {
        #[serde(default = "default_hwmon_root")]
        hwmon_root: PathBuf,
        #[serde(default = "default_fan_chip")]
        chip: String,
        #[serde(default = "default_fan_inputs")]
        inputs: Vec<String>,
    },
    Memory {
        #[serde(default = "default_meminfo")]
        meminfo: PathBuf,
    },
}

impl BlockKind {
    /// Short name used for slot and thread names
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Clock { .. } => "clock",
            BlockKind::Volume { .. } => "volume",
            BlockKind::Brightness { .. } => "brightness",
            BlockKind::Battery { .. } => "battery",
            BlockKind::Power { .. } => "power",
            BlockKind::Temperature { .. } => "temperature",
            BlockKind::Fan { .. } => "fan",
            BlockKind::Memory { .. } => "memory",
        }
    }

    #[must_use]
    pub fn default_color(&self) -> &'static str {
        match self {
            BlockKind::Clock { .. } => "#ffffff",
            BlockKind::Volume { .. } | BlockKind::Memory { .. } => "#ebcb8b",
            BlockKind::Brightness { .. } | BlockKind::Fan { .. } => "#88c0d0",
            BlockKind::Battery { .. } => "#a3be8c",
            BlockKind::Power { .. } => "#d06c4c",
            BlockKind::Temperature { .. } => "#e85c6a",
        }
    }
}

impl BlockConfig {
    #[must_use]
    pub fn new(kind: BlockKind, schedule: ScheduleConfig) -> Self {
        Self {
            kind,
            schedule,
            color: None,
        }
    }

    /// Configured color, or the kind's default
    #[must_use]
    pub fn color(&self) -> &str {
        self.color
            .as_deref()
            .unwrap_or_else(|| self.kind.default_color())
    }
}

fn default_bar_color() -> String {
    DEFAULT_BAR_COLOR.to_string()
}

fn default_clock_format() -> String {
    "%H:%M".to_string()
}

fn default_brightness_scale() -> f64 {
    1200.0
}

fn default_battery_device() -> PathBuf {
    PathBuf::from("/sys/class/power_supply/BAT0")
}

fn default_power_samples() -> usize {
    5
}

fn default_hwmon_root() -> PathBuf {
    PathBuf::from("/sys/class/hwmon")
}

fn default_temperature_chip() -> String {
    "coretemp".to_string()
}

fn default_temperature_input() -> String {
    "temp1_input".to_string()
}

fn default_fan_chip() -> String {
    "dell_smm".to_string()
}

fn default_fan_inputs() -> Vec<String> {
    vec!["fan1_input".to_string(), "fan2_input".to_string()]
}

fn default_meminfo() -> PathBuf {
    PathBuf::from("/proc/meminfo")
}

impl Default for Config {
    /// The built-in layout: sensors on fixed intervals, clock on the minute.
    ///
    /// Watch-driven blocks need a user-specific file and are left out.
    fn default() -> Self {
        Self {
            bar_color: default_bar_color(),
            sink: SinkKind::default(),
            blocks: vec![
                BlockConfig::new(
                    BlockKind::Temperature {
                        hwmon_root: default_hwmon_root(),
                        chip: default_temperature_chip(),
                        input: default_temperature_input(),
                    },
                    ScheduleConfig::Every(20),
                ),
                BlockConfig::new(
                    BlockKind::Fan {
                        hwmon_root: default_hwmon_root(),
                        chip: default_fan_chip(),
                        inputs: default_fan_inputs(),
                    },
                    ScheduleConfig::Every(5),
                ),
                BlockConfig::new(
                    BlockKind::Memory {
                        meminfo: default_meminfo(),
                    },
                    ScheduleConfig::Every(10),
                ),
                BlockConfig::new(
                    BlockKind::Battery {
                        device: default_battery_device(),
                    },
                    ScheduleConfig::Every(60),
                ),
                BlockConfig::new(
                    BlockKind::Power {
                        device: default_battery_device(),
                        samples: default_power_samples(),
                    },
                    ScheduleConfig::Every(20),
                ),
                BlockConfig::new(
                    BlockKind::Clock {
                        format: default_clock_format(),
                    },
                    ScheduleConfig::Aligned {
                        epoch: MINUTE_EPOCH,
                        interval: 60,
                    },
                ),
            ],
        }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// With an explicit `path` the file must exist. Without one, the file in
    /// the user's config directory is used when present, otherwise the
    /// built-in layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read, parsed or
    /// validated
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_path(&path),
            _ => {
                tracing::info!("No configuration file found, using built-in layout");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_from_path(path: &Path) -> Result<Self> {
        tracing::debug!("Loading configuration from {}", path.display());
        let config_str = fs::read_to_string(path)?;
        let config = Self::parse(&config_str)?;
        tracing::info!(
            "Configuration loaded successfully with {} blocks",
            config.blocks.len()
        );
        Ok(config)
    }

    /// Parse and validate a JSON5 document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON5, does not match the
    /// configuration shape, or fails validation
    pub fn parse(config_str: &str) -> Result<Self> {
        let value: serde_json::Value = json5::from_str(config_str)?;
        if !value.is_object() {
            return Err(IronStatusError::from("Config is not an object"));
        }

        let config: Config = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/iron_status/config.json5`, when a home directory exists
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "iron_status")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Check values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if self.bar_color.trim().is_empty() {
            return Err(IronStatusError::from("Bar color cannot be empty"));
        }
        if self.blocks.is_empty() {
            return Err(IronStatusError::from("Config has no blocks"));
        }

        for (position, block) in self.blocks.iter().enumerate() {
            let name = block.kind.name();
            match &block.schedule {
                ScheduleConfig::Every(0) | ScheduleConfig::Aligned { interval: 0, .. } => {
                    return Err(IronStatusError::from(format!(
                        "Block {position} ({name}) has a zero interval"
                    )));
                }
                ScheduleConfig::Every(secs) | ScheduleConfig::Aligned { interval: secs, .. }
                    if *secs > MAX_INTERVAL_SECS =>
                {
                    return Err(IronStatusError::from(format!(
                        "Block {position} ({name}) interval exceeds {MAX_INTERVAL_SECS} seconds"
                    )));
                }
                ScheduleConfig::Watch(path) if path.as_os_str().is_empty() => {
                    return Err(IronStatusError::from(format!(
                        "Block {position} ({name}) watches an empty path"
                    )));
                }
                _ => {}
            }

            if block.color().trim().is_empty() {
                return Err(IronStatusError::from(format!(
                    "Block {position} ({name}) has an empty color"
                )));
            }

            match &block.kind {
                BlockKind::Power { samples: 0, .. } => {
                    return Err(IronStatusError::from(format!(
                        "Block {position} (power) must average at least one sample"
                    )));
                }
                BlockKind::Brightness { scale, .. } if *scale <= 0.0 => {
                    return Err(IronStatusError::from(format!(
                        "Block {position} (brightness) scale must be positive"
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }
}
