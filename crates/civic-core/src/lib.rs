//! Civic Core: shared data model, errors, and thresholds
//!
//! Common types for the report triage pipeline: submissions, risk
//! decisions, verification outcomes, image fingerprints, and the tunable
//! thresholds every downstream service reads.

pub mod decision;
pub mod error;
pub mod fingerprint;
pub mod report;
pub mod thresholds;
pub mod verification;

pub use decision::{Decision, Priority, RiskBreakdown, Severity};
pub use error::CivicError;
pub use fingerprint::PerceptualHash;
pub use report::{GeoPoint, IssueMetrics, IssueType, Report, RoadContext, RoadType, TrafficLevel};
pub use thresholds::Thresholds;
pub use verification::{VerificationResult, VerificationStatus};

/// Version of the civic triage engine
pub const CIVIC_VERSION: &str = "1.0.0";
