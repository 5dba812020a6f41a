//! Raw risk factors, each scaled to roughly [0, 10].

use civic_core::{IssueMetrics, IssueType, RiskBreakdown, RoadContext, TrafficLevel};

use crate::weights::{road_multiplier, traffic_multiplier, RiskWeights};

/// Physical magnitude of the issue. Missing measurements count as
/// zero; streetlight outages have no scale dimension.
pub fn scale_factor(issue_type: IssueType, metrics: &IssueMetrics) -> f64 {
    match issue_type {
        IssueType::Pothole => (metrics.area.unwrap_or(0.0) / 5.0).min(10.0),
        IssueType::Garbage => (metrics.volume.unwrap_or(0.0) / 10.0).min(10.0),
        IssueType::Streetlight => 0.0,
    }
}

/// How much of the public passes the hazard
pub fn exposure_factor(context: &RoadContext) -> f64 {
    (traffic_multiplier(context.traffic_level) * road_multiplier(context.road_type) * 2.5).min(10.0)
}

/// Direct danger to road users. A pothole in heavy traffic is the one
/// hand-escalated case.
pub fn safety_factor(issue_type: IssueType, context: &RoadContext) -> f64 {
    if issue_type == IssueType::Pothole && context.traffic_level == TrafficLevel::High {
        9.0
    } else {
        5.0
    }
}

/// All three factors for one report
pub fn breakdown(
    issue_type: IssueType,
    metrics: &IssueMetrics,
    context: &RoadContext,
) -> RiskBreakdown {
    RiskBreakdown {
        safety: safety_factor(issue_type, context),
        exposure: exposure_factor(context),
        scale: scale_factor(issue_type, metrics),
    }
}

/// Weighted composite on the 0-100 scale
pub fn composite_score(breakdown: &RiskBreakdown, weights: &RiskWeights) -> f64 {
    let raw = breakdown.safety * weights.safety
        + breakdown.exposure * weights.exposure
        + breakdown.scale * weights.scale;
    (raw * 10.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_core::{RoadType, TrafficLevel};

    #[test]
    fn test_scale_caps_at_ten() {
        let huge = IssueMetrics::area(500.0);
        assert_eq!(scale_factor(IssueType::Pothole, &huge), 10.0);

        let pile = IssueMetrics::volume(250.0);
        assert_eq!(scale_factor(IssueType::Garbage, &pile), 10.0);
    }

    #[test]
    fn test_missing_metrics_count_as_zero() {
        let none = IssueMetrics::default();
        assert_eq!(scale_factor(IssueType::Pothole, &none), 0.0);
        assert_eq!(scale_factor(IssueType::Garbage, &none), 0.0);
    }

    #[test]
    fn test_streetlight_has_no_scale_dimension() {
        let metrics = IssueMetrics::area(40.0);
        assert_eq!(scale_factor(IssueType::Streetlight, &metrics), 0.0);
    }

    #[test]
    fn test_exposure_caps_at_ten() {
        let worst = RoadContext::new(RoadType::Highway, TrafficLevel::High);
        // 2.2 * 2.0 * 2.5 = 11, capped
        assert_eq!(exposure_factor(&worst), 10.0);

        let quiet = RoadContext::new(RoadType::Residential, TrafficLevel::Low);
        assert_eq!(exposure_factor(&quiet), 2.5);
    }

    #[test]
    fn test_pothole_in_heavy_traffic_escalates_safety() {
        let busy = RoadContext::new(RoadType::Secondary, TrafficLevel::High);
        assert_eq!(safety_factor(IssueType::Pothole, &busy), 9.0);
        assert_eq!(safety_factor(IssueType::Garbage, &busy), 5.0);

        let calm = RoadContext::new(RoadType::Secondary, TrafficLevel::Low);
        assert_eq!(safety_factor(IssueType::Pothole, &calm), 5.0);
    }

    #[test]
    fn test_composite_stays_in_range() {
        let b = RiskBreakdown {
            safety: 10.0,
            exposure: 10.0,
            scale: 10.0,
        };
        let w = RiskWeights::for_issue(IssueType::Pothole);
        assert_eq!(composite_score(&b, &w), 100.0);

        let zero = RiskBreakdown {
            safety: 0.0,
            exposure: 0.0,
            scale: 0.0,
        };
        assert_eq!(composite_score(&zero, &w), 0.0);
    }
}
