//! Risk decision types
//!
//! The risk agent's output for a single report: score, classification,
//! logistics estimates, and a human-readable explanation.

use serde::{Deserialize, Serialize};

use crate::report::IssueType;

/// Physical severity of the reported damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

/// Dispatch priority assigned by the risk agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low = 0,
    Medium = 1,
    High = 2,
    Critical = 3,
}

impl Priority {
    /// Check whether this priority warrants an automatic work-order draft
    pub fn warrants_work_order(&self) -> bool {
        matches!(self, Priority::High | Priority::Critical)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "Low"),
            Priority::Medium => write!(f, "Medium"),
            Priority::High => write!(f, "High"),
            Priority::Critical => write!(f, "Critical"),
        }
    }
}

/// Factor contributions behind a risk score, each roughly 0-10
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    /// Hazard to people at the site
    pub safety: f64,
    /// How many people pass the site
    pub exposure: f64,
    /// Physical magnitude of the damage
    pub scale: f64,
}

/// The risk agent's full output for one report; never mutated after creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub issue_type: IssueType,

    pub severity: Severity,

    pub priority: Priority,

    /// Composite risk score (0-100)
    pub risk_score: f64,

    /// Factor contributions behind the score
    pub breakdown: RiskBreakdown,

    /// Crew instruction keyed off priority and issue type
    pub recommended_action: String,

    /// Estimated repair cost in INR
    pub estimated_cost: f64,

    /// Estimated repair time in days
    pub repair_time_days: f64,

    /// Agent self-confidence (0-1)
    pub confidence_score: f64,

    /// One-sentence explanation of the score
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::High < Priority::Critical);
    }

    #[test]
    fn test_priority_work_order_guard() {
        assert!(!Priority::Low.warrants_work_order());
        assert!(!Priority::Medium.warrants_work_order());
        assert!(Priority::High.warrants_work_order());
        assert!(Priority::Critical.warrants_work_order());
    }

    #[test]
    fn test_priority_wire_names() {
        assert_eq!(serde_json::to_string(&Priority::Critical).unwrap(), "\"Critical\"");
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"High\"");
    }
}
