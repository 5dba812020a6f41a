//! Storage behind the duplicate index.
//!
//! The index itself only needs three queries: append a record, scan
//! recent records of one issue type, and list known fingerprints. The
//! [`DuplicateStore`] trait captures exactly that, so the in-memory
//! store used here can later be swapped for a spatially-indexed
//! database without touching the classification logic.

use chrono::{DateTime, Utc};
use civic_core::{GeoPoint, IssueType, PerceptualHash, Report};
use serde::{Deserialize, Serialize};

/// One indexed report: the minimum needed to match future submissions
/// against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateRecord {
    /// Id of the report this entry was built from
    pub id: String,
    /// Where the issue was reported
    pub location: GeoPoint,
    /// What kind of issue it is
    pub issue_type: IssueType,
    /// When the report was created
    pub timestamp: DateTime<Utc>,
    /// Perceptual hash of the report photo, when one was supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<PerceptualHash>,
}

impl DuplicateRecord {
    /// Create a record with no photo fingerprint
    pub fn new(
        id: impl Into<String>,
        location: GeoPoint,
        issue_type: IssueType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            location,
            issue_type,
            timestamp,
            fingerprint: None,
        }
    }

    /// Attach a photo fingerprint
    pub fn with_fingerprint(mut self, fingerprint: PerceptualHash) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    /// Build the index entry for a report
    pub fn from_report(report: &Report) -> Self {
        Self {
            id: report.id.clone(),
            location: report.location,
            issue_type: report.issue_type,
            timestamp: report.created_at,
            fingerprint: report.fingerprint,
        }
    }
}

/// Storage abstraction for the duplicate index.
///
/// Implementations return owned data so they are free to keep records
/// wherever they like. All queries are answered under the index lock,
/// so implementations do not need interior synchronization.
pub trait DuplicateStore: Send {
    /// Add a record to the store
    fn append(&mut self, record: DuplicateRecord);

    /// Records of `issue_type` with a timestamp at or after `since`
    fn recent(&self, issue_type: IssueType, since: DateTime<Utc>) -> Vec<DuplicateRecord>;

    /// Every stored photo fingerprint with the id of the report it
    /// came from
    fn fingerprints(&self) -> Vec<(PerceptualHash, String)>;

    /// Number of records held
    fn len(&self) -> usize;

    /// True when nothing has been registered yet
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store. Queries are linear scans, which is fine for
/// the volumes a single triage instance sees.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Vec<DuplicateRecord>,
    fingerprints: Vec<(PerceptualHash, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DuplicateStore for MemoryStore {
    fn append(&mut self, record: DuplicateRecord) {
        if let Some(fingerprint) = record.fingerprint {
            self.fingerprints.push((fingerprint, record.id.clone()));
        }
        self.records.push(record);
    }

    fn recent(&self, issue_type: IssueType, since: DateTime<Utc>) -> Vec<DuplicateRecord> {
        self.records
            .iter()
            .filter(|r| r.issue_type == issue_type && r.timestamp >= since)
            .cloned()
            .collect()
    }

    fn fingerprints(&self) -> Vec<(PerceptualHash, String)> {
        self.fingerprints.clone()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn point() -> GeoPoint {
        GeoPoint {
            lat: 12.9716,
            lon: 77.5946,
        }
    }

    #[test]
    fn test_recent_filters_by_issue_type_and_time() {
        let mut store = MemoryStore::new();
        let now = Utc::now();

        store.append(DuplicateRecord::new("r1", point(), IssueType::Pothole, now));
        store.append(DuplicateRecord::new(
            "r2",
            point(),
            IssueType::Garbage,
            now,
        ));
        store.append(DuplicateRecord::new(
            "r3",
            point(),
            IssueType::Pothole,
            now - Duration::hours(48),
        ));

        let hits = store.recent(IssueType::Pothole, now - Duration::hours(24));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "r1");
    }

    #[test]
    fn test_fingerprints_only_from_records_that_carry_one() {
        let mut store = MemoryStore::new();
        let now = Utc::now();

        store.append(DuplicateRecord::new("r1", point(), IssueType::Pothole, now));
        store.append(
            DuplicateRecord::new("r2", point(), IssueType::Pothole, now)
                .with_fingerprint(PerceptualHash(0xDEAD_BEEF)),
        );

        let fps = store.fingerprints();
        assert_eq!(fps.len(), 1);
        assert_eq!(fps[0].1, "r2");
    }

    #[test]
    fn test_from_report_copies_identity_fields() {
        let report = Report::new(point(), IssueType::Streetlight, 0.9)
            .with_fingerprint(PerceptualHash(42));
        let record = DuplicateRecord::from_report(&report);
        assert_eq!(record.id, report.id);
        assert_eq!(record.issue_type, IssueType::Streetlight);
        assert_eq!(record.fingerprint, Some(PerceptualHash(42)));
    }
}
