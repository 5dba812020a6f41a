//! civic-dedup: duplicate detection for incoming reports
//!
//! Keeps an index of every accepted report and classifies each new
//! submission against it. Two signals feed the classification: spatial
//! proximity (same issue type, close by, recent) and perceptual image
//! fingerprints (the same photo resubmitted from anywhere). The index
//! is safe to share across request handlers.

pub mod geo;
pub mod index;
pub mod store;

pub use geo::haversine_distance;
pub use index::{DuplicateCheck, DuplicateIndex};
pub use store::{DuplicateRecord, DuplicateStore, MemoryStore};
