//! Report model for citizen submissions
//!
//! A `Report` is the immutable record of one submission: where the issue
//! is, what kind of issue the detector saw, what it measured, and how
//! confident it was. Reports never change after creation; everything
//! downstream (risk, verification, rewards) derives from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CivicError;
use crate::fingerprint::PerceptualHash;

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check that both coordinates are finite and inside WGS84 bounds
    pub fn validate(&self) -> Result<(), CivicError> {
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(CivicError::InvalidInput(
                "location coordinates must be finite numbers".to_string(),
            ));
        }
        if self.lat.abs() > 90.0 || self.lon.abs() > 180.0 {
            return Err(CivicError::InvalidInput(format!(
                "location out of range: {}, {}",
                self.lat, self.lon
            )));
        }
        Ok(())
    }
}

/// Category of infrastructure issue a report describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// Road surface damage
    Pothole,
    /// Failed or damaged street lighting
    Streetlight,
    /// Uncollected garbage accumulation
    Garbage,
}

impl IssueType {
    /// Parse a free-form intake label; unknown labels fall back to `Pothole`
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "pothole" => IssueType::Pothole,
            "streetlight" | "street_light" => IssueType::Streetlight,
            "garbage" => IssueType::Garbage,
            other => {
                tracing::warn!(label = other, "unknown issue type, treating as pothole");
                IssueType::Pothole
            }
        }
    }
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            IssueType::Pothole => write!(f, "pothole"),
            IssueType::Streetlight => write!(f, "streetlight"),
            IssueType::Garbage => write!(f, "garbage"),
        }
    }
}

/// Road classification supplied by the reporting client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoadType {
    Residential,
    Secondary,
    /// Arterial city road (older clients send "MainRoad")
    #[serde(alias = "MainRoad")]
    MajorRoad,
    Highway,
}

/// Observed traffic volume at the reported location
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrafficLevel {
    Low,
    Medium,
    High,
}

/// Where the issue sits relative to the road network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadContext {
    pub road_type: RoadType,
    pub traffic_level: TrafficLevel,
}

impl RoadContext {
    pub fn new(road_type: RoadType, traffic_level: TrafficLevel) -> Self {
        Self {
            road_type,
            traffic_level,
        }
    }
}

impl Default for RoadContext {
    /// Quiet residential street, the neutral scoring context
    fn default() -> Self {
        Self {
            road_type: RoadType::Residential,
            traffic_level: TrafficLevel::Low,
        }
    }
}

/// Detector-derived measurements; which field is present depends on the
/// issue type. Missing fields are treated as zero by the scoring code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueMetrics {
    /// Damaged surface area in square meters (potholes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    /// Accumulation volume estimate (garbage)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl IssueMetrics {
    pub fn area(area: f64) -> Self {
        Self {
            area: Some(area),
            volume: None,
        }
    }

    pub fn volume(volume: f64) -> Self {
        Self {
            area: None,
            volume: Some(volume),
        }
    }
}

/// One citizen submission, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Unique report id (UUID v4)
    pub id: String,

    /// Where the issue was reported
    pub location: GeoPoint,

    /// What kind of issue the detector saw
    pub issue_type: IssueType,

    /// Detector measurements, when available
    #[serde(default)]
    pub metrics: IssueMetrics,

    /// Road context, when the client supplied it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<RoadContext>,

    /// Perceptual fingerprint of the submitted photo, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<PerceptualHash>,

    /// Mean detection confidence from the vision model (0-1)
    pub vision_confidence: f64,

    /// Submission timestamp
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Create a new report with a fresh id and the current timestamp
    pub fn new(location: GeoPoint, issue_type: IssueType, vision_confidence: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            location,
            issue_type,
            metrics: IssueMetrics::default(),
            context: None,
            fingerprint: None,
            vision_confidence,
            created_at: Utc::now(),
        }
    }

    /// Override the generated id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Attach detector measurements
    pub fn with_metrics(mut self, metrics: IssueMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Attach road context
    pub fn with_context(mut self, context: RoadContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach the photo fingerprint
    pub fn with_fingerprint(mut self, fingerprint: PerceptualHash) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    /// Override the submission timestamp
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
