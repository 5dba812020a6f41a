//! The risk scoring agent.

use civic_core::{
    Decision, IssueMetrics, IssueType, Priority, RoadContext, RoadType, Severity, TrafficLevel,
};

use crate::factors;
use crate::logistics::{HeuristicEstimator, LogisticsEstimator};
use crate::weights::RiskWeights;

/// Scores reports into deterministic, explainable decisions.
///
/// Every field of the output is a pure function of the inputs and the
/// estimator chosen at construction, so one agent can serve any number
/// of concurrent callers through `&self`.
pub struct RiskAgent {
    estimator: Box<dyn LogisticsEstimator>,
}

impl RiskAgent {
    /// Agent with heuristic logistics
    pub fn new() -> Self {
        Self {
            estimator: Box::new(HeuristicEstimator),
        }
    }

    /// Agent with a caller-selected estimator
    pub fn with_estimator(estimator: Box<dyn LogisticsEstimator>) -> Self {
        Self { estimator }
    }

    /// Name of the estimator in use, for startup logging
    pub fn estimator_name(&self) -> &'static str {
        self.estimator.name()
    }

    /// Score one report
    pub fn decide(
        &self,
        issue_type: IssueType,
        metrics: &IssueMetrics,
        context: &RoadContext,
    ) -> Decision {
        let weights = RiskWeights::for_issue(issue_type);
        let breakdown = factors::breakdown(issue_type, metrics, context);
        let risk_score = factors::composite_score(&breakdown, &weights);
        let (severity, priority) = classify(risk_score);
        let logistics = self.estimator.estimate(issue_type, metrics, context, risk_score);

        Decision {
            issue_type,
            severity,
            priority,
            risk_score,
            breakdown,
            recommended_action: recommended_action(priority, issue_type).to_string(),
            estimated_cost: logistics.cost,
            repair_time_days: logistics.days,
            confidence_score: confidence(risk_score),
            explanation: explain(issue_type, context, risk_score, priority),
        }
    }
}

impl Default for RiskAgent {
    fn default() -> Self {
        Self::new()
    }
}

/// Severity and priority classes for a composite score, highest
/// threshold first.
fn classify(risk_score: f64) -> (Severity, Priority) {
    if risk_score >= 80.0 {
        (Severity::High, Priority::Critical)
    } else if risk_score >= 60.0 {
        (Severity::High, Priority::High)
    } else if risk_score >= 40.0 {
        (Severity::Medium, Priority::Medium)
    } else {
        (Severity::Low, Priority::Low)
    }
}

/// Flat self-assessed confidence, bumped for clear-cut scores at
/// either extreme. Not a calibrated probability.
fn confidence(risk_score: f64) -> f64 {
    let base: f64 = if risk_score > 90.0 || risk_score < 10.0 {
        0.95
    } else {
        0.85
    };
    base.min(0.99)
}

fn recommended_action(priority: Priority, issue_type: IssueType) -> &'static str {
    match (priority, issue_type) {
        (Priority::Critical, IssueType::Pothole) => {
            "Dispatch emergency road crew; barricade the damaged section until resurfacing"
        }
        (Priority::Critical, IssueType::Streetlight) => {
            "Dispatch electrical crew immediately; unlit stretch on a high-exposure road"
        }
        (Priority::Critical, IssueType::Garbage) => {
            "Dispatch sanitation unit today and notify the public-health inspector"
        }
        (Priority::High, IssueType::Pothole) => {
            "Schedule resurfacing crew within 48 hours; place hazard signage"
        }
        (Priority::High, IssueType::Streetlight) => {
            "Schedule lamp replacement within 48 hours"
        }
        (Priority::High, IssueType::Garbage) => {
            "Schedule clearance within 48 hours; flag location for recurring-dump monitoring"
        }
        (Priority::Medium, IssueType::Pothole) => {
            "Queue for the next scheduled road maintenance cycle"
        }
        (Priority::Medium, IssueType::Streetlight) => {
            "Add to the electrical division's weekly repair round"
        }
        (Priority::Medium, IssueType::Garbage) => "Add to the next scheduled collection route",
        (Priority::Low, IssueType::Pothole) => {
            "Log for routine inspection; no immediate action required"
        }
        (Priority::Low, IssueType::Streetlight) => "Note for the next patrol inspection",
        (Priority::Low, IssueType::Garbage) => "Monitor during routine collection rounds",
    }
}

/// One-sentence rationale, with the strongest contextual driver
/// appended when one applies.
fn explain(
    issue_type: IssueType,
    context: &RoadContext,
    risk_score: f64,
    priority: Priority,
) -> String {
    let mut explanation = format!(
        "Risk score {risk_score:.0}/100 places this {issue_type} report at {priority} priority."
    );
    if context.road_type == RoadType::Highway && priority >= Priority::High {
        explanation.push_str(" Highway location compounds the hazard.");
    } else if context.traffic_level == TrafficLevel::High {
        explanation.push_str(" High traffic volume raises public exposure.");
    }
    explanation
}
