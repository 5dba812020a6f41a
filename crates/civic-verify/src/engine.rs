//! The verification rule chain.

use std::sync::Arc;

use civic_core::{Decision, Report, Thresholds, VerificationResult, VerificationStatus};
use civic_dedup::{DuplicateCheck, DuplicateIndex, DuplicateRecord};

/// Assigns each report its terminal disposition.
///
/// Stateless apart from the shared duplicate index; the rules run in a
/// fixed order and the first one that fires decides the outcome.
pub struct VerificationEngine {
    thresholds: Thresholds,
    index: Arc<DuplicateIndex>,
}

impl VerificationEngine {
    pub fn new(thresholds: Thresholds, index: Arc<DuplicateIndex>) -> Self {
        Self { thresholds, index }
    }

    /// Classify one report. Non-rejected, non-merged reports are
    /// registered into the duplicate index as a side effect.
    pub fn verify(&self, report: &Report, decision: &Decision) -> VerificationResult {
        let result = self.classify(report, decision);
        tracing::info!(
            "report {} dispositioned {}: {}",
            result.report_id,
            result.status,
            result.reason
        );
        result
    }

    fn classify(&self, report: &Report, decision: &Decision) -> VerificationResult {
        // Gate 1: unusable evidence never touches the index
        if report.vision_confidence < self.thresholds.vision_confidence_min {
            return VerificationResult::new(
                &report.id,
                VerificationStatus::Rejected,
                format!(
                    "Vision confidence too low ({:.2}). Please retake photo.",
                    report.vision_confidence
                ),
            );
        }

        // Gate 2: duplicate check and conditional registration under
        // one critical section
        let check = self
            .index
            .check_and_register(DuplicateRecord::from_report(report));
        match check {
            DuplicateCheck::Duplicate {
                original_id,
                distance_m,
                ..
            } => {
                return VerificationResult::merged(
                    &report.id,
                    &original_id,
                    format!(
                        "Duplicate of report {original_id}, {distance_m:.1}m away. Votes consolidated."
                    ),
                );
            }
            DuplicateCheck::Suspicious { original_id, .. } => {
                return VerificationResult::new(
                    &report.id,
                    VerificationStatus::ManualReview,
                    format!(
                        "Image visually identical to report {original_id}. Flagged for manual review."
                    ),
                );
            }
            DuplicateCheck::New => {}
        }

        // Gate 3: critical risk always gets human sign-off before any
        // emergency dispatch
        if decision.risk_score >= self.thresholds.critical_risk_flag {
            return VerificationResult::new(
                &report.id,
                VerificationStatus::ManualReview,
                format!(
                    "High Risk Score ({:.1}) requires human safety validation.",
                    decision.risk_score
                ),
            );
        }

        // Gate 4: high confidence on all fronts
        if report.vision_confidence >= self.thresholds.vision_confidence_auto
            && decision.confidence_score >= self.thresholds.agent_confidence_min
        {
            return VerificationResult::new(
                &report.id,
                VerificationStatus::AutoVerified,
                "High confidence AI detection. Auto-approved.",
            );
        }

        // Everything ambiguous lands with a human
        VerificationResult::new(
            &report.id,
            VerificationStatus::ManualReview,
            format!(
                "Moderate confidence (Vision: {:.2}, Agent: {:.2}).",
                report.vision_confidence, decision.confidence_score
            ),
        )
    }
}
