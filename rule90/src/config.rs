// config.rs - Grid and clock settings, loadable from TOML

use std::path::Path;

use serde::Deserialize;

use crate::clock::{self, DEFAULT_INTERVAL};
use crate::error::{ConfigError, SimulationError};

/// Construction parameters. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub width: usize,
    pub height: usize,
    /// Pixels per cell.
    pub scale: usize,
    /// Initial tick interval in seconds.
    pub interval: f64,
    /// Seconds added or removed by one speed trigger.
    pub speed_step: f64,
    /// How long the highlight flash lasts during a reset.
    pub reset_flash_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            scale: 8,
            interval: DEFAULT_INTERVAL,
            speed_step: 0.05,
            reset_flash_ms: 100,
        }
    }
}

impl Settings {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&source)
    }

    /// Fails fast on settings the simulation cannot be built from.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.width == 0 || self.height == 0 {
            return Err(SimulationError::EmptyGrid { width: self.width, height: self.height });
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(SimulationError::GridTooLarge { width: self.width, height: self.height });
        }
        if self.scale == 0 {
            return Err(SimulationError::ZeroScale);
        }
        // The clock runs on the value rounded to hundredths, so check that one.
        if !clock::interval_in_range(clock::round_centis(self.interval)) {
            return Err(SimulationError::IntervalOutOfRange(self.interval));
        }
        Ok(())
    }
}
