//! Point arithmetic and the post-review outcome taxonomy.

use civic_core::{IssueType, Priority, VerificationStatus};
use serde::{Deserialize, Serialize};

/// What ultimately happened to a report, as the ledger sees it.
///
/// A superset of the automatic verification states: a human reviewer
/// can promote a `manual_review` report to `manual_verified`, which
/// the automatic classifier never emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    AutoVerified,
    ManualVerified,
    AutoMerged,
    ManualReview,
    Rejected,
}

impl ReportOutcome {
    /// True for the outcomes that earn a trust bonus
    pub fn is_verified(&self) -> bool {
        matches!(
            self,
            ReportOutcome::AutoVerified | ReportOutcome::ManualVerified
        )
    }
}

impl Default for ReportOutcome {
    /// Pending review, the neutral state
    fn default() -> Self {
        ReportOutcome::ManualReview
    }
}

impl From<VerificationStatus> for ReportOutcome {
    fn from(status: VerificationStatus) -> Self {
        match status {
            VerificationStatus::AutoVerified => ReportOutcome::AutoVerified,
            VerificationStatus::AutoMerged => ReportOutcome::AutoMerged,
            VerificationStatus::ManualReview => ReportOutcome::ManualReview,
            VerificationStatus::Rejected => ReportOutcome::Rejected,
        }
    }
}

impl std::fmt::Display for ReportOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ReportOutcome::AutoVerified => write!(f, "auto_verified"),
            ReportOutcome::ManualVerified => write!(f, "manual_verified"),
            ReportOutcome::AutoMerged => write!(f, "auto_merged"),
            ReportOutcome::ManualReview => write!(f, "manual_review"),
            ReportOutcome::Rejected => write!(f, "rejected"),
        }
    }
}

/// Everything the ledger needs to price one report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardContext {
    pub issue_type: IssueType,
    pub priority: Priority,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(rename = "verification_status", default)]
    pub outcome: ReportOutcome,
    /// False when the report was merged into an earlier one
    #[serde(default = "default_is_unique")]
    pub is_unique: bool,
}

fn default_is_unique() -> bool {
    true
}

impl RewardContext {
    pub fn new(issue_type: IssueType, priority: Priority, risk_score: f64) -> Self {
        Self {
            issue_type,
            priority,
            risk_score,
            outcome: ReportOutcome::default(),
            is_unique: true,
        }
    }

    /// Set the post-review outcome
    pub fn with_outcome(mut self, outcome: ReportOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Mark the report as a confirmation of an existing one
    pub fn as_confirmation(mut self) -> Self {
        self.is_unique = false;
        self
    }
}

/// Points for one report, before any rejection zeroing.
///
/// `issueTypeBase × priorityMultiplier + 10 + riskScore × 0.5`,
/// truncated to a whole number. Non-unique reports keep ten percent as
/// a confirmation bonus.
pub fn calculate_points(
    issue_type: IssueType,
    priority: Priority,
    risk_score: f64,
    is_unique: bool,
) -> i64 {
    let type_base = match issue_type {
        IssueType::Pothole => 20.0,
        IssueType::Streetlight => 15.0,
        IssueType::Garbage => 10.0,
    };
    let priority_mult = match priority {
        Priority::Critical => 3.0,
        Priority::High => 2.0,
        Priority::Medium => 1.5,
        Priority::Low => 1.0,
    };

    let mut points = type_base * priority_mult + 10.0 + risk_score * 0.5;
    if !is_unique {
        points *= 0.1;
    }
    points as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medium_garbage_scenario() {
        // 10 * 1.5 + 10 + 25
        assert_eq!(
            calculate_points(IssueType::Garbage, Priority::Medium, 50.0, true),
            50
        );
    }

    #[test]
    fn test_critical_pothole_truncates() {
        // 20 * 3 + 10 + 42.5 = 112.5
        assert_eq!(
            calculate_points(IssueType::Pothole, Priority::Critical, 85.0, true),
            112
        );
    }

    #[test]
    fn test_confirmation_keeps_ten_percent() {
        // 112.5 * 0.1 = 11.25
        assert_eq!(
            calculate_points(IssueType::Pothole, Priority::Critical, 85.0, false),
            11
        );
    }

    #[test]
    fn test_low_priority_streetlight() {
        // 15 * 1.0 + 10 + 0
        assert_eq!(
            calculate_points(IssueType::Streetlight, Priority::Low, 0.0, true),
            25
        );
    }

    #[test]
    fn test_outcome_from_verification_status() {
        assert_eq!(
            ReportOutcome::from(VerificationStatus::AutoVerified),
            ReportOutcome::AutoVerified
        );
        assert_eq!(
            ReportOutcome::from(VerificationStatus::Rejected),
            ReportOutcome::Rejected
        );
        assert!(!ReportOutcome::AutoMerged.is_verified());
        assert!(ReportOutcome::ManualVerified.is_verified());
    }

    #[test]
    fn test_context_deserializes_with_defaults() {
        let context: RewardContext = serde_json::from_str(
            r#"{"issue_type": "pothole", "priority": "High"}"#,
        )
        .unwrap();
        assert_eq!(context.outcome, ReportOutcome::ManualReview);
        assert!(context.is_unique);
        assert_eq!(context.risk_score, 0.0);
    }
}
