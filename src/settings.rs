//! Simulation parameters.
//!
//! `Settings` can be built in code or loaded from a JSON file. Every field is optional in the
//! file; missing fields take their defaults:
//!
//! ```json
//! {
//!     "density": 120,
//!     "recovery_delay": 8.0,
//!     "random_seed": 42
//! }
//! ```
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::clock::DEFAULT_TIME_SCALE;
use crate::error::OutbreakError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Radius of every particle.
    pub particle_radius: f64,
    /// Multiplier from elapsed wall-clock seconds to integration step.
    pub time_scale: f64,
    /// Seconds between `start` and the infection of the index case.
    pub index_case_delay: f64,
    /// Seconds a particle stays sick.
    pub recovery_delay: f64,
    /// Whether the surface is cleared before each frame is drawn.
    pub clear_each_frame: bool,
    /// Number of particles the runner starts with.
    pub density: usize,
    /// Size of the headless surface used by the runner.
    pub width: f64,
    pub height: f64,
    pub random_seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            particle_radius: 4.0,
            time_scale: DEFAULT_TIME_SCALE,
            index_case_delay: 1.0,
            recovery_delay: 10.0,
            clear_each_frame: true,
            density: 90,
            width: 500.0,
            height: 500.0,
            random_seed: 0,
        }
    }
}

impl Settings {
    /// Reads settings from a JSON file and validates them.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON for `Settings`, or holds
    /// out-of-range values.
    pub fn load(path: &Path) -> Result<Self, OutbreakError> {
        debug!("loading settings from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// # Errors
    /// `OutbreakError::InvalidParameter` naming the first offending field.
    pub fn validate(&self) -> Result<(), OutbreakError> {
        fn positive(name: &str, value: f64) -> Result<(), OutbreakError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(OutbreakError::InvalidParameter(format!(
                    "{name} must be finite and > 0, got {value}"
                )))
            }
        }
        fn non_negative(name: &str, value: f64) -> Result<(), OutbreakError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(OutbreakError::InvalidParameter(format!(
                    "{name} must be finite and >= 0, got {value}"
                )))
            }
        }

        positive("particle_radius", self.particle_radius)?;
        positive("time_scale", self.time_scale)?;
        non_negative("index_case_delay", self.index_case_delay)?;
        non_negative("recovery_delay", self.recovery_delay)?;
        positive("width", self.width)?;
        positive("height", self.height)?;
        Ok(())
    }
}
