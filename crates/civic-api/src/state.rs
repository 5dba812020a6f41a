//! Shared service state assembled once at startup.

use std::path::Path;
use std::sync::Arc;

use civic_core::{CivicError, Thresholds};
use civic_dedup::DuplicateIndex;
use civic_orders::WorkOrderDrafter;
use civic_rewards::RewardLedger;
use civic_risk::{select_estimator, RiskAgent};
use civic_verify::VerificationEngine;

use crate::metrics::ApiMetrics;

/// Environment variable naming a threshold override file.
pub const THRESHOLDS_ENV: &str = "CIVIC_THRESHOLDS";

/// Environment variable naming a trained logistics model artifact.
pub const LOGISTICS_MODEL_ENV: &str = "CIVIC_LOGISTICS_MODEL";

/// Every pipeline component the handlers touch, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub agent: Arc<RiskAgent>,
    pub engine: Arc<VerificationEngine>,
    pub index: Arc<DuplicateIndex>,
    pub ledger: Arc<RewardLedger>,
    pub drafter: Arc<WorkOrderDrafter>,
    pub metrics: ApiMetrics,
}

impl AppState {
    /// Assemble the pipeline from environment configuration.
    ///
    /// `CIVIC_THRESHOLDS` may point at a YAML threshold override file and
    /// `CIVIC_LOGISTICS_MODEL` at a trained cost/time artifact. Both fall
    /// back to built-in behaviour when absent or unreadable.
    pub fn from_env() -> Result<Self, CivicError> {
        let thresholds = Thresholds::load_or_default(std::env::var(THRESHOLDS_ENV).ok().as_deref());
        let model_path = std::env::var(LOGISTICS_MODEL_ENV).ok();
        let agent = RiskAgent::with_estimator(select_estimator(
            model_path.as_deref().map(Path::new),
        ));
        Self::assemble(thresholds, agent)
    }

    /// Assemble the pipeline with built-in thresholds and the heuristic
    /// estimator, ignoring the environment.
    pub fn with_defaults() -> Result<Self, CivicError> {
        Self::assemble(Thresholds::default(), RiskAgent::new())
    }

    fn assemble(thresholds: Thresholds, agent: RiskAgent) -> Result<Self, CivicError> {
        let metrics = ApiMetrics::new()
            .map_err(|e| CivicError::Config(format!("metrics registry: {e}")))?;
        let index = Arc::new(DuplicateIndex::new(&thresholds));
        let engine = Arc::new(VerificationEngine::new(thresholds, Arc::clone(&index)));
        tracing::info!("pipeline ready with {} logistics", agent.estimator_name());
        Ok(Self {
            agent: Arc::new(agent),
            engine,
            index,
            ledger: Arc::new(RewardLedger::new()),
            drafter: Arc::new(WorkOrderDrafter::new()?),
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_defaults_builds_an_empty_pipeline() {
        let state = AppState::with_defaults().unwrap();
        assert!(state.index.is_empty());
        assert_eq!(state.agent.estimator_name(), "heuristic");
        assert_eq!(state.metrics.assessed.get(), 0);
    }

    #[test]
    fn test_cloned_state_shares_the_ledger() {
        let state = AppState::with_defaults().unwrap();
        let other = state.clone();

        let context = civic_rewards::RewardContext::new(
            civic_core::IssueType::Pothole,
            civic_core::Priority::Low,
            10.0,
        );
        state.ledger.process("user-1", "rpt-1", &context);

        assert!(other.ledger.balance("user-1").is_some());
    }
}
