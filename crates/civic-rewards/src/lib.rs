//! civic-rewards: the reporter reward and trust ledger
//!
//! Citizens earn points for verified reports and a trust score that
//! rises with confirmed submissions and falls with rejected ones. The
//! ledger is append-only and idempotent per report: however many times
//! the pipeline retries, a report pays out at most once.

pub mod ledger;
pub mod points;

pub use ledger::{LedgerStats, RewardLedger, RewardReceipt, RewardTransaction, UserBalance};
pub use points::{calculate_points, ReportOutcome, RewardContext};
