//! Per-issue-type scoring weights and context multipliers.

use civic_core::{IssueType, RoadType, TrafficLevel};

/// Weight triple applied to the three risk factors. Sums to 1.0 for
/// every issue type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskWeights {
    pub safety: f64,
    pub exposure: f64,
    pub scale: f64,
}

impl RiskWeights {
    /// Weights for one issue type
    pub fn for_issue(issue_type: IssueType) -> Self {
        match issue_type {
            // Potholes are a direct hazard to vehicles, so safety leads
            IssueType::Pothole => Self {
                safety: 0.5,
                exposure: 0.3,
                scale: 0.2,
            },
            // An outage has no size dimension to speak of
            IssueType::Streetlight => Self {
                safety: 0.6,
                exposure: 0.3,
                scale: 0.1,
            },
            // Garbage severity tracks how much has piled up
            IssueType::Garbage => Self {
                safety: 0.3,
                exposure: 0.3,
                scale: 0.4,
            },
        }
    }
}

/// Exposure multiplier for observed traffic volume
pub fn traffic_multiplier(level: TrafficLevel) -> f64 {
    match level {
        TrafficLevel::Low => 1.0,
        TrafficLevel::Medium => 1.5,
        TrafficLevel::High => 2.2,
    }
}

/// Exposure multiplier for road classification
pub fn road_multiplier(road: RoadType) -> f64 {
    match road {
        RoadType::Residential => 1.0,
        RoadType::Secondary => 1.2,
        RoadType::MajorRoad => 1.5,
        RoadType::Highway => 2.0,
    }
}
