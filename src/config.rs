use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Per-particle physics tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhysicsConfig {
    /// Shrink factor applied once per update call, independent of elapsed time.
    pub decay_rate: f64,
    /// Downward acceleration in Cartesian units/s².
    pub gravity: f64,
    /// Lifetime of a fresh particle in seconds.
    pub ttl: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            decay_rate: 0.999,
            gravity: 1000.0,
            ttl: 5.0,
        }
    }
}

/// Simulation settings, loadable from a JSON file such as
/// `{"decayRate": 0.995, "gravity": 800, "particlesPerSpawn": 8}`.
/// Missing keys keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationConfig {
    #[serde(flatten)]
    pub physics: PhysicsConfig,
    pub particles_per_spawn: usize,
    pub min_points: usize,
    pub max_points: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            particles_per_spawn: 5,
            min_points: 25,
            max_points: 50,
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading config from {}", path.display());
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let PhysicsConfig {
            decay_rate,
            gravity,
            ttl,
        } = self.physics;

        if !decay_rate.is_finite() || decay_rate <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "decayRate must be positive, got {decay_rate}"
            )));
        }
        if !gravity.is_finite() || gravity < 0.0 {
            return Err(ConfigError::Validation(format!(
                "gravity must be non-negative, got {gravity}"
            )));
        }
        if !ttl.is_finite() || ttl <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "ttl must be positive, got {ttl}"
            )));
        }
        if self.particles_per_spawn == 0 {
            return Err(ConfigError::Validation(
                "particlesPerSpawn must be at least 1".to_string(),
            ));
        }
        if self.min_points < 2 || self.min_points > self.max_points {
            return Err(ConfigError::Validation(format!(
                "point range {}..={} must satisfy 2 <= minPoints <= maxPoints",
                self.min_points, self.max_points
            )));
        }
        Ok(())
    }
}
