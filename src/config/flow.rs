//! Conversation flow configuration

use serde::Deserialize;

use crate::domain::conversation::{EngineConfig, DEFAULT_MIN_CONFIDENCE};
use crate::ports::CvTemplate;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct FlowConfig {
    /// Natural-language extractions below this confidence are not applied
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Template used when an export names none
    #[serde(default = "default_template")]
    pub default_template: String,
}

impl FlowConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ValidationError::InvalidConfidence(self.min_confidence));
        }
        let known = CvTemplate::all()
            .iter()
            .any(|t| t.as_str() == self.default_template.trim().to_lowercase());
        if !known {
            return Err(ValidationError::UnknownTemplate(self.default_template.clone()));
        }
        Ok(())
    }

    pub fn template(&self) -> CvTemplate {
        CvTemplate::from_name(&self.default_template)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            min_confidence: self.min_confidence,
            ..EngineConfig::default()
        }
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            default_template: default_template(),
        }
    }
}

fn default_min_confidence() -> f64 {
    DEFAULT_MIN_CONFIDENCE
}

fn default_template() -> String {
    "modern".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_defaults() {
        let config = FlowConfig::default();
        assert_eq!(config.min_confidence, 0.6);
        assert_eq!(config.template(), CvTemplate::Modern);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_confidence_range() {
        for bad in [-0.1, 1.5, f64::NAN] {
            let config = FlowConfig {
                min_confidence: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "{} accepted", bad);
        }
    }

    #[test]
    fn test_unknown_template_rejected() {
        let config = FlowConfig {
            default_template: "fancy".into(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::UnknownTemplate("fancy".into()))
        );
    }

    #[test]
    fn test_engine_config_carries_confidence() {
        let config = FlowConfig {
            min_confidence: 0.8,
            ..Default::default()
        };
        assert_eq!(config.engine_config().min_confidence, 0.8);
    }
}
