//! Verification outcome types
//!
//! Every report receives exactly one terminal disposition. There are no
//! further transitions after assignment; re-checks happen by submitting a
//! new report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal disposition assigned to a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Vision confidence too low to trust the submission
    Rejected,
    /// Same physical issue already on file; consolidated into the original
    AutoMerged,
    /// High confidence on all fronts, accepted without human review
    AutoVerified,
    /// Queued for a human verdict
    ManualReview,
}

impl VerificationStatus {
    /// Whether the platform accepts the report (anything but rejected)
    pub fn is_verified(&self) -> bool {
        !matches!(self, VerificationStatus::Rejected)
    }

    /// Whether a report with this status is indexed for future duplicate checks
    pub fn is_registered(&self) -> bool {
        matches!(
            self,
            VerificationStatus::AutoVerified | VerificationStatus::ManualReview
        )
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            VerificationStatus::Rejected => write!(f, "rejected"),
            VerificationStatus::AutoMerged => write!(f, "auto_merged"),
            VerificationStatus::AutoVerified => write!(f, "auto_verified"),
            VerificationStatus::ManualReview => write!(f, "manual_review"),
        }
    }
}

/// Outcome of verifying a single report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub report_id: String,

    pub is_verified: bool,

    #[serde(rename = "verification_status")]
    pub status: VerificationStatus,

    #[serde(rename = "verification_reason")]
    pub reason: String,

    pub timestamp: DateTime<Utc>,

    /// Set only when the report was merged into an earlier one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_into: Option<String>,
}

impl VerificationResult {
    /// Create a result for the given status
    pub fn new(
        report_id: impl Into<String>,
        status: VerificationStatus,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            report_id: report_id.into(),
            is_verified: status.is_verified(),
            status,
            reason: reason.into(),
            timestamp: Utc::now(),
            merged_into: None,
        }
    }

    /// Create an auto-merged result pointing at the original report
    pub fn merged(
        report_id: impl Into<String>,
        original_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        let mut result = Self::new(report_id, VerificationStatus::AutoMerged, reason);
        result.merged_into = Some(original_id.into());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_predicates() {
        assert!(!VerificationStatus::Rejected.is_verified());
        assert!(VerificationStatus::AutoMerged.is_verified());
        assert!(VerificationStatus::AutoVerified.is_verified());
        assert!(VerificationStatus::ManualReview.is_verified());

        assert!(!VerificationStatus::Rejected.is_registered());
        assert!(!VerificationStatus::AutoMerged.is_registered());
        assert!(VerificationStatus::AutoVerified.is_registered());
        assert!(VerificationStatus::ManualReview.is_registered());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&VerificationStatus::AutoMerged).unwrap(),
            "\"auto_merged\""
        );
        assert_eq!(
            serde_json::to_string(&VerificationStatus::ManualReview).unwrap(),
            "\"manual_review\""
        );
    }

    #[test]
    fn test_result_serializes_original_field_names() {
        let result = VerificationResult::new("r1", VerificationStatus::AutoVerified, "ok");
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"verification_status\""));
        assert!(json.contains("\"verification_reason\""));
        assert!(!json.contains("merged_into"));
    }

    #[test]
    fn test_merged_result_links_original() {
        let result = VerificationResult::merged("r2", "r1", "Duplicate of report r1");
        assert_eq!(result.status, VerificationStatus::AutoMerged);
        assert_eq!(result.merged_into.as_deref(), Some("r1"));
        assert!(result.is_verified);
    }
}
