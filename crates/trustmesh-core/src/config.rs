use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Attestation-count boundaries for the risk classification.
///
/// A subject with more than `low` attestations is low risk, more than
/// `medium` is medium risk, more than `high` is high risk, anything else is
/// critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskThresholds {
    #[serde(default = "default_low")]
    pub low: usize,
    #[serde(default = "default_medium")]
    pub medium: usize,
    #[serde(default = "default_high")]
    pub high: usize,
}

fn default_low() -> usize {
    20
}
fn default_medium() -> usize {
    10
}
fn default_high() -> usize {
    5
}
fn default_decay_factor() -> f64 {
    0.98
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: default_low(),
            medium: default_medium(),
            high: default_high(),
        }
    }
}

impl RiskThresholds {
    /// Boundaries must be strictly decreasing: `low > medium > high`.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.low > self.medium && self.medium > self.high {
            Ok(())
        } else {
            Err(CoreError::InvalidThresholds(format!(
                "expected low > medium > high, got {} / {} / {}",
                self.low, self.medium, self.high
            )))
        }
    }
}

/// Parameters of the reputation aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationConfig {
    /// Reported in every report; no time decay is applied to scores yet.
    #[serde(default = "default_decay_factor")]
    pub decay_factor: f64,
    #[serde(default)]
    pub risk_thresholds: RiskThresholds,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            decay_factor: default_decay_factor(),
            risk_thresholds: RiskThresholds::default(),
        }
    }
}

impl ReputationConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=1.0).contains(&self.decay_factor) {
            return Err(CoreError::ValidationError(format!(
                "decay_factor must be within [0, 1], got {}",
                self.decay_factor
            )));
        }
        self.risk_thresholds.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReputationConfig::default();
        assert!((config.decay_factor - 0.98).abs() < f64::EPSILON);
        assert_eq!(config.risk_thresholds.low, 20);
        assert_eq!(config.risk_thresholds.medium, 10);
        assert_eq!(config.risk_thresholds.high, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ReputationConfig =
            serde_json::from_str(r#"{"risk_thresholds": {"low": 50}}"#).unwrap();
        assert_eq!(config.risk_thresholds.low, 50);
        assert_eq!(config.risk_thresholds.medium, 10);
        assert!((config.decay_factor - 0.98).abs() < f64::EPSILON);
    }

    #[test]
    fn test_thresholds_must_decrease() {
        let thresholds = RiskThresholds {
            low: 10,
            medium: 10,
            high: 5,
        };
        assert!(matches!(
            thresholds.validate(),
            Err(CoreError::InvalidThresholds(_))
        ));
    }

    #[test]
    fn test_decay_factor_out_of_range() {
        let config = ReputationConfig {
            decay_factor: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CoreError::ValidationError(_))));
    }
}
