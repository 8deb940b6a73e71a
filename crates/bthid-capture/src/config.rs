//! YAML configuration for the capture adapters.
//!
//! Two files live side by side in the config directory:
//!
//! - `general.yaml` — which target OS/model this peripheral emulates and an
//!   optional log file path.
//! - `devices.yaml` — per-OS, per-model movement tuning. A `DEFAULT` entry
//!   resolves without a model level.
//!
//! Missing required keys are fatal at startup; a misconfigured adapter must
//! not come up half-working.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required key is absent.
    #[error("missing configuration key: {key}")]
    Missing { key: String },

    /// `move_step` outside the single-report byte range.
    #[error("move_step must be between 1 and 128, got {value}")]
    InvalidStep { value: u16 },

    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Which target the peripheral presents itself to.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceSelection {
    pub os: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// Optional file logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggerConfig {
    pub path: String,
}

/// Contents of `general.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub device: DeviceSelection,
    #[serde(default)]
    pub logger: Option<LoggerConfig>,
}

/// Movement tuning for one OS/model pair.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct MoveProfile {
    /// Per-report step ceiling, 1–128.
    pub move_step: u16,
    /// Pixel scale applied to requested displacements.
    pub move_coefficient: f64,
}

impl MoveProfile {
    fn validate(self) -> Result<Self, ConfigError> {
        if self.move_step < 1 || self.move_step > 128 {
            return Err(ConfigError::InvalidStep {
                value: self.move_step,
            });
        }
        Ok(self)
    }
}

/// One OS's entry in `devices.yaml`: either a flat profile (the `DEFAULT`
/// form) or a map of models.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OsEntry {
    Profile(MoveProfile),
    Models(HashMap<String, MoveProfile>),
}

/// Contents of `devices.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceProfiles(HashMap<String, OsEntry>);

impl DeviceProfiles {
    /// Looks up the profile for an OS/model pair.
    pub fn resolve(&self, os: &str, model: Option<&str>) -> Result<MoveProfile, ConfigError> {
        let entry = self.0.get(os).ok_or_else(|| ConfigError::Missing {
            key: os.to_string(),
        })?;
        match entry {
            OsEntry::Profile(profile) => profile.validate(),
            OsEntry::Models(models) => {
                let model = model.ok_or_else(|| ConfigError::Missing {
                    key: format!("{os}.<model>"),
                })?;
                models
                    .get(model)
                    .ok_or_else(|| ConfigError::Missing {
                        key: format!("{os}.{model}"),
                    })?
                    .validate()
            }
        }
    }
}

/// Fully loaded and resolved adapter configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub general: GeneralConfig,
    pub profile: MoveProfile,
}

impl Config {
    /// Loads `general.yaml` and `devices.yaml` from `dir` and resolves the
    /// movement profile for the configured target.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let general: GeneralConfig =
            serde_yaml::from_str(&std::fs::read_to_string(dir.join("general.yaml"))?)?;
        let profiles: DeviceProfiles =
            serde_yaml::from_str(&std::fs::read_to_string(dir.join("devices.yaml"))?)?;

        let profile = profiles.resolve(
            &general.device.os,
            general.device.model.as_deref(),
        )?;

        Ok(Self { general, profile })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
