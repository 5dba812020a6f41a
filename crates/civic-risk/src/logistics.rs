//! Cost and repair-time estimation.
//!
//! Two interchangeable estimators sit behind [`LogisticsEstimator`]: a
//! heuristic cost table and a linear model loaded from a JSON artifact
//! produced by the offline training job. The choice is made once at
//! startup; a missing or unreadable artifact selects the heuristic
//! permanently instead of failing individual decisions.

use std::fs;
use std::path::Path;

use civic_core::{CivicError, IssueMetrics, IssueType, RoadContext, RoadType, TrafficLevel};
use serde::Deserialize;

/// Cost in rupees and repair time in days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticsEstimate {
    pub cost: f64,
    pub days: f64,
}

/// Estimates repair logistics for a scored report.
pub trait LogisticsEstimator: Send + Sync {
    /// Cost and repair-time estimate for one report
    fn estimate(
        &self,
        issue_type: IssueType,
        metrics: &IssueMetrics,
        context: &RoadContext,
        risk_score: f64,
    ) -> LogisticsEstimate;

    /// Short name for startup logging
    fn name(&self) -> &'static str;
}

/// Fixed per-issue base costs, scaled up with risk.
#[derive(Debug, Default)]
pub struct HeuristicEstimator;

impl LogisticsEstimator for HeuristicEstimator {
    fn estimate(
        &self,
        issue_type: IssueType,
        metrics: &IssueMetrics,
        _context: &RoadContext,
        risk_score: f64,
    ) -> LogisticsEstimate {
        let (base_cost, base_days) = match issue_type {
            IssueType::Garbage => (200.0 * metrics.volume.unwrap_or(0.0).max(1.0) * 0.5, 1.0),
            IssueType::Streetlight => (2000.0, 2.0),
            IssueType::Pothole => (500.0, 1.0),
        };
        let urgency = 1.0 + risk_score / 100.0;
        LogisticsEstimate {
            cost: base_cost * urgency,
            days: base_days * urgency,
        }
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Linear cost/time model exported by the training job.
///
/// The artifact records the feature columns in training order plus one
/// weight per column and an intercept, for each of the two targets.
#[derive(Debug, Clone, Deserialize)]
pub struct CostTimeModel {
    pub feature_columns: Vec<String>,
    pub cost_weights: Vec<f64>,
    pub cost_intercept: f64,
    pub time_weights: Vec<f64>,
    pub time_intercept: f64,
}

impl CostTimeModel {
    /// Load and validate an artifact
    pub fn from_json_file(path: &Path) -> Result<Self, CivicError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| CivicError::ModelUnavailable(format!("{}: {e}", path.display())))?;
        let model: CostTimeModel = serde_json::from_str(&raw)
            .map_err(|e| CivicError::ModelUnavailable(format!("{}: {e}", path.display())))?;
        if model.cost_weights.len() != model.feature_columns.len()
            || model.time_weights.len() != model.feature_columns.len()
        {
            return Err(CivicError::ModelUnavailable(format!(
                "{}: weight count does not match feature columns",
                path.display()
            )));
        }
        Ok(model)
    }

    /// `intercept + Σ weight·feature` for both targets
    pub fn predict(&self, metrics: &IssueMetrics, context: &RoadContext) -> LogisticsEstimate {
        let features: Vec<f64> = self
            .feature_columns
            .iter()
            .map(|column| feature_value(column, metrics, context))
            .collect();
        let dot =
            |weights: &[f64]| -> f64 { weights.iter().zip(&features).map(|(w, f)| w * f).sum() };
        LogisticsEstimate {
            cost: self.cost_intercept + dot(&self.cost_weights),
            days: self.time_intercept + dot(&self.time_weights),
        }
    }
}

/// One-hot encoding aligned to the trained schema. Columns the model
/// was trained with but this report does not match stay zero.
fn feature_value(column: &str, metrics: &IssueMetrics, context: &RoadContext) -> f64 {
    if column == "area_m2" {
        return metrics.area.unwrap_or(0.0);
    }
    if let Some(road) = column.strip_prefix("road_") {
        return if road == road_label(context.road_type) {
            1.0
        } else {
            0.0
        };
    }
    if let Some(level) = column.strip_prefix("traffic_") {
        return if level == traffic_label(context.traffic_level) {
            1.0
        } else {
            0.0
        };
    }
    0.0
}

fn road_label(road: RoadType) -> &'static str {
    match road {
        RoadType::Residential => "Residential",
        RoadType::Secondary => "Secondary",
        RoadType::MajorRoad => "MajorRoad",
        RoadType::Highway => "Highway",
    }
}

fn traffic_label(level: TrafficLevel) -> &'static str {
    match level {
        TrafficLevel::Low => "Low",
        TrafficLevel::Medium => "Medium",
        TrafficLevel::High => "High",
    }
}

/// Trained-model estimates for potholes; every other issue type uses
/// the heuristic table (the model was only fitted on road damage).
#[derive(Debug)]
pub struct ModelEstimator {
    model: CostTimeModel,
    heuristic: HeuristicEstimator,
}

impl ModelEstimator {
    pub fn new(model: CostTimeModel) -> Self {
        Self {
            model,
            heuristic: HeuristicEstimator,
        }
    }
}

impl LogisticsEstimator for ModelEstimator {
    fn estimate(
        &self,
        issue_type: IssueType,
        metrics: &IssueMetrics,
        context: &RoadContext,
        risk_score: f64,
    ) -> LogisticsEstimate {
        match issue_type {
            IssueType::Pothole => self.model.predict(metrics, context),
            _ => self.heuristic.estimate(issue_type, metrics, context, risk_score),
        }
    }

    fn name(&self) -> &'static str {
        "cost-time model"
    }
}

/// Pick the estimator once at startup. No artifact path, or an
/// artifact that fails to load, means the heuristic runs for the life
/// of the process.
pub fn select_estimator(artifact: Option<&Path>) -> Box<dyn LogisticsEstimator> {
    match artifact {
        Some(path) => match CostTimeModel::from_json_file(path) {
            Ok(model) => {
                tracing::info!("logistics model loaded from {}", path.display());
                Box::new(ModelEstimator::new(model))
            }
            Err(e) => {
                tracing::warn!("{e}; falling back to heuristic logistics");
                Box::new(HeuristicEstimator)
            }
        },
        None => Box::new(HeuristicEstimator),
    }
}
