//! Pipeline threshold configuration
//!
//! One struct holds every tunable cutoff. The defaults are the production
//! values; a YAML file can override any subset at startup.

use serde::{Deserialize, Serialize};

use crate::error::CivicError;

/// Decision thresholds for verification and deduplication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Below this vision confidence a submission is rejected outright
    pub vision_confidence_min: f64,

    /// At or above this vision confidence a submission may auto-verify
    pub vision_confidence_auto: f64,

    /// Minimum agent confidence for the auto-verify path
    pub agent_confidence_min: f64,

    /// Risk score at or above which human sign-off is mandatory
    pub critical_risk_flag: f64,

    /// Radius in meters for spatial duplicate matching
    pub duplicate_distance_meters: f64,

    /// Look-back window in hours for spatial duplicate matching
    pub duplicate_time_window_hours: i64,

    /// Maximum Hamming distance for a perceptual fingerprint match
    pub perceptual_hash_hamming_threshold: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            vision_confidence_min: 0.40,
            vision_confidence_auto: 0.75,
            agent_confidence_min: 0.60,
            critical_risk_flag: 85.0,
            duplicate_distance_meters: 15.0,
            duplicate_time_window_hours: 24,
            perceptual_hash_hamming_threshold: 5,
        }
    }
}

impl Thresholds {
    /// Load thresholds from YAML; absent keys keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, CivicError> {
        serde_yaml::from_str(yaml).map_err(|e| CivicError::Config(e.to_string()))
    }

    /// Read a YAML override file, falling back to defaults on any error
    pub fn load_or_default(path: Option<&str>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        let loaded = std::fs::read_to_string(path)
            .map_err(|e| CivicError::Config(e.to_string()))
            .and_then(|text| Self::from_yaml(&text));
        match loaded {
            Ok(thresholds) => thresholds,
            Err(e) => {
                tracing::warn!(path, error = %e, "threshold override unusable, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let t = Thresholds::default();
        assert_eq!(t.vision_confidence_min, 0.40);
        assert_eq!(t.vision_confidence_auto, 0.75);
        assert_eq!(t.agent_confidence_min, 0.60);
        assert_eq!(t.critical_risk_flag, 85.0);
        assert_eq!(t.duplicate_distance_meters, 15.0);
        assert_eq!(t.duplicate_time_window_hours, 24);
        assert_eq!(t.perceptual_hash_hamming_threshold, 5);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let t = Thresholds::from_yaml("duplicate_distance_meters: 30.0").unwrap();
        assert_eq!(t.duplicate_distance_meters, 30.0);
        assert_eq!(t.vision_confidence_min, 0.40);
        assert_eq!(t.duplicate_time_window_hours, 24);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = Thresholds::from_yaml("vision_confidence_min: [oops").unwrap_err();
        assert!(matches!(err, CivicError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let t = Thresholds::load_or_default(Some("/nonexistent/thresholds.yaml"));
        assert_eq!(t, Thresholds::default());
    }
}
