//! civic-verify: terminal disposition for incoming reports
//!
//! Combines the vision confidence, the risk agent's decision, and the
//! duplicate index into one of four final states: rejected, merged
//! into an earlier report, auto-verified, or queued for human review.
//! Each report is classified exactly once.

pub mod engine;

pub use engine::VerificationEngine;
