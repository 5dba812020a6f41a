//! civic-risk: deterministic risk scoring for citizen reports
//!
//! Turns a detector's raw output (issue type, measured magnitude, road
//! context) into a scored, classified, costed decision. Scoring is a
//! pure function; the only configuration is the logistics estimator
//! chosen once at startup.

pub mod agent;
pub mod factors;
pub mod logistics;
pub mod weights;

pub use agent::RiskAgent;
pub use logistics::{
    select_estimator, CostTimeModel, HeuristicEstimator, LogisticsEstimate, LogisticsEstimator,
    ModelEstimator,
};
pub use weights::RiskWeights;
