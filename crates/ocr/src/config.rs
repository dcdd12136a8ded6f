use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables for boundary detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Gaussian blur sigma applied before thresholding. 1.1 matches a 5x5 kernel.
    pub blur_sigma: f32,
    /// Polygon simplification tolerance as a fraction of the contour perimeter.
    pub approx_epsilon_ratio: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self { blur_sigma: 1.1, approx_epsilon_ratio: 0.02 }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.blur_sigma.is_finite() && self.blur_sigma > 0.0) {
            return Err(ConfigError::Invalid {
                field: "blur_sigma",
                reason: format!("must be a positive number, got {}", self.blur_sigma),
            });
        }
        if !(self.approx_epsilon_ratio > 0.0 && self.approx_epsilon_ratio < 1.0) {
            return Err(ConfigError::Invalid {
                field: "approx_epsilon_ratio",
                reason: format!("must be in (0, 1), got {}", self.approx_epsilon_ratio),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(PipelineConfig::from_toml("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn overrides_single_key() {
        let c = PipelineConfig::from_toml("approx_epsilon_ratio = 0.05").unwrap();
        assert_eq!(c.approx_epsilon_ratio, 0.05);
        assert_eq!(c.blur_sigma, 1.1);
    }

    #[test]
    fn rejects_bad_sigma() {
        let err = PipelineConfig::from_toml("blur_sigma = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "blur_sigma", .. }));
    }

    #[test]
    fn rejects_out_of_range_epsilon() {
        let err = PipelineConfig::from_toml("approx_epsilon_ratio = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "approx_epsilon_ratio", .. }));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(PipelineConfig::from_toml("blur_sigma = ["), Err(ConfigError::Parse(_))));
    }
}
