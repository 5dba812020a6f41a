//! The duplicate index and its classification rules.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use civic_core::Thresholds;
use serde::{Deserialize, Serialize};

use crate::geo::haversine_distance;
use crate::store::{DuplicateRecord, DuplicateStore, MemoryStore};

/// Outcome of probing the index with a new report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum DuplicateCheck {
    /// Nothing similar on file
    New,
    /// Same physical issue already reported nearby within the time
    /// window
    Duplicate {
        original_id: String,
        distance_m: f64,
        reported_at: DateTime<Utc>,
    },
    /// Visually identical photo already on file, regardless of where
    /// the submission claims to be
    Suspicious { original_id: String, hamming: u32 },
}

impl DuplicateCheck {
    /// True when the report matched nothing
    pub fn is_new(&self) -> bool {
        matches!(self, DuplicateCheck::New)
    }

    /// True when the report is a spatial duplicate
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DuplicateCheck::Duplicate { .. })
    }

    /// True when the report reused a known photo
    pub fn is_suspicious(&self) -> bool {
        matches!(self, DuplicateCheck::Suspicious { .. })
    }
}

/// Shared index of accepted reports.
///
/// Classification runs two passes over the store. The perceptual pass
/// goes first: a resubmitted photo is suspicious even when the claimed
/// location is nowhere near the original. The spatial pass then looks
/// for the same issue type within the distance and time cutoffs.
pub struct DuplicateIndex {
    store: Mutex<Box<dyn DuplicateStore>>,
    max_distance_m: f64,
    window: Duration,
    max_hamming: u32,
}

impl DuplicateIndex {
    /// In-memory index with the given cutoffs
    pub fn new(thresholds: &Thresholds) -> Self {
        Self::with_store(Box::new(MemoryStore::new()), thresholds)
    }

    /// Index over a caller-provided store
    pub fn with_store(store: Box<dyn DuplicateStore>, thresholds: &Thresholds) -> Self {
        Self {
            store: Mutex::new(store),
            max_distance_m: thresholds.duplicate_distance_meters,
            window: Duration::hours(thresholds.duplicate_time_window_hours),
            max_hamming: thresholds.perceptual_hash_hamming_threshold,
        }
    }

    /// Classify `probe` against the index without registering it
    pub fn check(&self, probe: &DuplicateRecord) -> DuplicateCheck {
        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        self.classify(store.as_ref(), probe)
    }

    /// Add a record to the index
    pub fn register(&self, record: DuplicateRecord) {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.append(record);
    }

    /// Classify `record` and, unless it came back a spatial duplicate,
    /// register it. Check and append run under one lock, so two
    /// simultaneous submissions of the same issue cannot both classify
    /// as new.
    pub fn check_and_register(&self, record: DuplicateRecord) -> DuplicateCheck {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let check = self.classify(store.as_ref(), &record);
        if !check.is_duplicate() {
            store.append(record);
        }
        check
    }

    /// Number of registered records
    pub fn len(&self) -> usize {
        let store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        store.len()
    }

    /// True when nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn classify(&self, store: &dyn DuplicateStore, probe: &DuplicateRecord) -> DuplicateCheck {
        if let Some(fingerprint) = probe.fingerprint {
            for (known, original_id) in store.fingerprints() {
                let hamming = fingerprint.hamming(&known);
                if hamming <= self.max_hamming {
                    return DuplicateCheck::Suspicious {
                        original_id,
                        hamming,
                    };
                }
            }
        }

        let since = probe.timestamp - self.window;
        for candidate in store.recent(probe.issue_type, since) {
            let distance_m = haversine_distance(&probe.location, &candidate.location);
            if distance_m < self.max_distance_m {
                return DuplicateCheck::Duplicate {
                    original_id: candidate.id,
                    distance_m,
                    reported_at: candidate.timestamp,
                };
            }
        }

        DuplicateCheck::New
    }
}

impl std::fmt::Debug for DuplicateIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplicateIndex")
            .field("len", &self.len())
            .field("max_distance_m", &self.max_distance_m)
            .field("window_hours", &self.window.num_hours())
            .field("max_hamming", &self.max_hamming)
            .finish()
    }
}
