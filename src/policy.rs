use crate::error::PolicyError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Weights, label bands and sub-score curves shared by every consumer of a
/// score. Weights are integer percents and must sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub speed_weight: u32,
    pub reactivity_weight: u32,
    pub coverage_weight: u32,
    pub standing_weight: u32,
    /// composite at or above this is Excellent
    pub excellent_from: u8,
    /// composite at or above this (and below `excellent_from`) is To-watch
    pub watch_from: u8,
    /// speed (distance per frame) that earns a full speed score
    pub speed_full: f64,
    /// response time (minutes) at or below which reactivity is 100
    pub response_best: f64,
    /// response time (minutes) at or above which reactivity is 0
    pub response_worst: f64,
    /// speed at or above this reads as fast
    pub speed_fast: f64,
    /// speed below this reads as slow
    pub speed_slow: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            speed_weight: 30,
            reactivity_weight: 30,
            coverage_weight: 25,
            standing_weight: 15,
            excellent_from: 70,
            watch_from: 40,
            speed_full: 3.5,
            response_best: 1.0,
            response_worst: 11.5,
            speed_fast: 2.5,
            speed_slow: 1.0,
        }
    }
}

impl ScoringPolicy {
    fn weights(&self) -> [(&'static str, u32); 4] {
        [
            ("speed_weight", self.speed_weight),
            ("reactivity_weight", self.reactivity_weight),
            ("coverage_weight", self.coverage_weight),
            ("standing_weight", self.standing_weight),
        ]
    }

    /// None when the weights overflow `u32`.
    pub fn weight_sum(&self) -> Option<u32> {
        self.weights()
            .iter()
            .try_fold(0u32, |sum, (_, w)| sum.checked_add(*w))
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if let Some((field, value)) = self.weights().into_iter().find(|(_, w)| *w > 100) {
            return Err(PolicyError::WeightOutOfRange { field, value });
        }
        match self.weight_sum() {
            Some(100) => {}
            Some(sum) => return Err(PolicyError::Weights(sum)),
            None => return Err(PolicyError::Weights(u32::MAX)),
        }
        if self.watch_from == 0 || self.watch_from >= self.excellent_from || self.excellent_from > 100
        {
            return Err(PolicyError::Thresholds {
                watch: self.watch_from,
                excellent: self.excellent_from,
            });
        }
        if !(self.speed_full.is_finite() && self.speed_full > 0.0) {
            return Err(PolicyError::SpeedCurve(self.speed_full));
        }
        if !(self.response_best >= 0.0 && self.response_best < self.response_worst)
            || !self.response_worst.is_finite()
        {
            return Err(PolicyError::ResponseCurve {
                best: self.response_best,
                worst: self.response_worst,
            });
        }
        if !(self.speed_slow >= 0.0 && self.speed_slow < self.speed_fast)
            || !self.speed_fast.is_finite()
        {
            return Err(PolicyError::SpeedBands {
                slow: self.speed_slow,
                fast: self.speed_fast,
            });
        }
        Ok(())
    }
}

/// Alert rule thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertPolicy {
    /// reactivity sub-score below this raises a warning
    pub low_reactivity: u8,
    /// coverage sub-score below this raises a warning
    pub low_coverage: u8,
    pub inactivity_seconds: u32,
    pub unserved_minutes: u32,
    /// minutes in the alert band before it is reported
    pub low_score_minutes: u32,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            low_reactivity: 75,
            low_coverage: 60,
            inactivity_seconds: 180,
            unserved_minutes: 10,
            low_score_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub scoring: ScoringPolicy,
    pub alerts: AlertPolicy,
}

impl Policy {
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        let content = fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let policy = Self::from_toml(&content)?;
        info!(path = %path.display(), "loaded policy");
        Ok(policy)
    }

    pub fn from_toml(content: &str) -> Result<Self, PolicyError> {
        let policy: Policy = toml::from_str(content)?;
        policy.scoring.validate()?;
        Ok(policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_policy_is_valid() {
        let policy = Policy::default();
        assert!(policy.scoring.validate().is_ok());
        assert_eq!(Some(100), policy.scoring.weight_sum());
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let policy = Policy::from_toml(
            r#"
            [scoring]
            response_worst = 15.0

            [alerts]
            unserved_minutes = 8
            "#,
        )
        .unwrap();

        assert_relative_eq!(15.0, policy.scoring.response_worst);
        assert_eq!(30, policy.scoring.speed_weight);
        assert_eq!(8, policy.alerts.unserved_minutes);
        assert_eq!(180, policy.alerts.inactivity_seconds);
    }

    #[test]
    fn test_invalid_weights_are_rejected() {
        let err = Policy::from_toml("[scoring]\nspeed_weight = 40\n").unwrap_err();
        assert!(matches!(err, PolicyError::Weights(110)));
    }

    #[test]
    fn test_overflowing_weights_are_rejected() {
        let err = Policy::from_toml(
            "[scoring]\nspeed_weight = 4294967295\nreactivity_weight = 101\ncoverage_weight = 0\nstanding_weight = 0\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PolicyError::WeightOutOfRange {
                field: "speed_weight",
                value: 4294967295
            }
        ));

        let policy = ScoringPolicy {
            speed_weight: u32::MAX,
            reactivity_weight: 101,
            ..ScoringPolicy::default()
        };
        assert_eq!(None, policy.weight_sum());
    }

    #[test]
    fn test_speed_bands_must_be_ordered() {
        let err = Policy::from_toml("[scoring]\nspeed_slow = 3.0\n").unwrap_err();
        assert!(matches!(err, PolicyError::SpeedBands { .. }));
    }

    #[test]
    fn test_unordered_thresholds_are_rejected() {
        let err = Policy::from_toml("[scoring]\nwatch_from = 70\n").unwrap_err();
        assert!(matches!(
            err,
            PolicyError::Thresholds {
                watch: 70,
                excellent: 70
            }
        ));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = Policy::from_toml("[scoring\n").unwrap_err();
        assert!(matches!(err, PolicyError::Parse(_)));
    }
}
