//! Engine configuration
//!
//! Configuration for the simulation core. Strongly typed with defaults,
//! serializable to and from TOML so levels can ship a tuning file.

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML source did not parse or did not match the schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A parsed value is outside its allowed range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Gravity acceleration applied to gravity-enabled nodes
    pub gravity: Vec3,

    /// Fixed simulation timestep in seconds
    pub fixed_timestep: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_timestep: 1.0 / 60.0,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fixed_timestep <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "fixed_timestep must be positive, got {}",
                self.fixed_timestep
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_from_toml() {
        let source = r#"
            gravity = [0.0, -20.0, 0.0]
            fixed_timestep = 0.02
        "#;

        let config = EngineConfig::from_toml_str(source).unwrap();
        assert_eq!(config.gravity.y, -20.0);
        assert_eq!(config.fixed_timestep, 0.02);
    }

    #[test]
    fn test_zero_timestep_is_rejected() {
        let source = r#"
            gravity = [0.0, -9.81, 0.0]
            fixed_timestep = 0.0
        "#;

        assert!(EngineConfig::from_toml_str(source).is_err());
    }
}
