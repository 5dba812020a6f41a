//! Prometheus counters for pipeline throughput.

use civic_core::VerificationStatus;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// Counters shared across all request handlers.
#[derive(Clone)]
pub struct ApiMetrics {
    registry: Registry,
    pub assessed: IntCounter,
    pub verified: IntCounter,
    pub merged: IntCounter,
    pub rejected: IntCounter,
    pub review: IntCounter,
    pub rewards: IntCounter,
}

impl ApiMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let assessed = IntCounter::new(
            "civic_reports_assessed_total",
            "Reports scored by the risk agent",
        )?;
        let verified = IntCounter::new(
            "civic_reports_verified_total",
            "Reports auto-verified or manually verified",
        )?;
        let merged = IntCounter::new(
            "civic_reports_merged_total",
            "Reports consolidated into an earlier duplicate",
        )?;
        let rejected = IntCounter::new(
            "civic_reports_rejected_total",
            "Reports rejected for low vision confidence",
        )?;
        let review = IntCounter::new(
            "civic_reports_review_total",
            "Reports routed to a human reviewer",
        )?;
        let rewards = IntCounter::new(
            "civic_rewards_processed_total",
            "Reward requests processed by the ledger",
        )?;
        registry.register(Box::new(assessed.clone()))?;
        registry.register(Box::new(verified.clone()))?;
        registry.register(Box::new(merged.clone()))?;
        registry.register(Box::new(rejected.clone()))?;
        registry.register(Box::new(review.clone()))?;
        registry.register(Box::new(rewards.clone()))?;
        Ok(Self {
            registry,
            assessed,
            verified,
            merged,
            rejected,
            review,
            rewards,
        })
    }

    /// Bump the counter matching a verification disposition.
    pub fn record_verification(&self, status: VerificationStatus) {
        match status {
            VerificationStatus::AutoVerified => self.verified.inc(),
            VerificationStatus::AutoMerged => self.merged.inc(),
            VerificationStatus::Rejected => self.rejected.inc(),
            VerificationStatus::ManualReview => self.review.inc(),
        }
    }

    /// Render the registry in Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
