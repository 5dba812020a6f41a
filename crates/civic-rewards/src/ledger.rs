//! The append-only reward ledger.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use civic_core::Priority;
use serde::{Deserialize, Serialize};

use crate::points::{calculate_points, ReportOutcome, RewardContext};

/// One immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardTransaction {
    /// Unique transaction ID
    pub tx_id: String,
    pub user_id: String,
    pub report_id: String,
    pub points: i64,
    pub trust_delta: f64,
    pub timestamp: DateTime<Utc>,
}

/// A reporter's current standing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBalance {
    pub user_id: String,
    /// Clamped to [0, 100]; new reporters start at 50
    pub trust_score: f64,
    pub total_points: i64,
}

/// What one `process` call did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RewardReceipt {
    /// Points and trust applied
    #[serde(rename = "success")]
    Granted {
        points_awarded: i64,
        new_trust_score: f64,
        new_total_balance: i64,
    },
    /// The idempotence guard fired; nothing changed
    Skipped { reason: String },
}

impl RewardReceipt {
    pub fn is_granted(&self) -> bool {
        matches!(self, RewardReceipt::Granted { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, RewardReceipt::Skipped { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Account {
    trust_score: f64,
    total_points: i64,
}

impl Account {
    /// New reporters start neutral
    fn new() -> Self {
        Self {
            trust_score: 50.0,
            total_points: 0,
        }
    }
}

#[derive(Default)]
struct LedgerInner {
    accounts: HashMap<String, Account>,
    transactions: Vec<RewardTransaction>,
    rewarded: HashSet<String>,
}

/// Per-user balances plus the transaction log, behind one mutex.
///
/// The idempotence guard and the transaction append share a critical
/// section, so concurrent retries for the same report cannot both pay
/// out.
pub struct RewardLedger {
    inner: Mutex<LedgerInner>,
}

impl RewardLedger {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LedgerInner::default()),
        }
    }

    /// Apply one report's outcome to its reporter.
    ///
    /// Exactly one transaction is ever recorded per report id; later
    /// calls return a skipped receipt and change nothing.
    pub fn process(&self, user_id: &str, report_id: &str, context: &RewardContext) -> RewardReceipt {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());

        if inner.rewarded.contains(report_id) {
            return RewardReceipt::Skipped {
                reason: "Already rewarded".to_string(),
            };
        }

        let points = if context.outcome == ReportOutcome::Rejected {
            0
        } else {
            calculate_points(
                context.issue_type,
                context.priority,
                context.risk_score,
                context.is_unique,
            )
        };

        let trust_delta = match context.outcome {
            ReportOutcome::AutoVerified | ReportOutcome::ManualVerified => {
                if context.priority == Priority::Critical {
                    3.0
                } else {
                    2.0
                }
            }
            ReportOutcome::Rejected => -5.0,
            ReportOutcome::AutoMerged | ReportOutcome::ManualReview => 0.0,
        };

        let (new_trust_score, new_total_balance) = {
            let account = inner
                .accounts
                .entry(user_id.to_string())
                .or_insert_with(Account::new);
            account.trust_score = (account.trust_score + trust_delta).clamp(0.0, 100.0);
            account.total_points += points;
            (account.trust_score, account.total_points)
        };

        inner.rewarded.insert(report_id.to_string());
        inner.transactions.push(RewardTransaction {
            tx_id: generate_tx_id(),
            user_id: user_id.to_string(),
            report_id: report_id.to_string(),
            points,
            trust_delta,
            timestamp: Utc::now(),
        });

        tracing::info!(
            "rewarded {points} points to {user_id} for report {report_id} ({})",
            context.outcome
        );

        RewardReceipt::Granted {
            points_awarded: points,
            new_trust_score,
            new_total_balance,
        }
    }

    /// A reporter's balances, if they have ever interacted with the
    /// ledger
    pub fn balance(&self, user_id: &str) -> Option<UserBalance> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.accounts.get(user_id).map(|account| UserBalance {
            user_id: user_id.to_string(),
            trust_score: account.trust_score,
            total_points: account.total_points,
        })
    }

    /// Every transaction, oldest first
    pub fn transactions(&self) -> Vec<RewardTransaction> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.transactions.clone()
    }

    /// One reporter's transactions, oldest first
    pub fn transactions_for_user(&self, user_id: &str) -> Vec<RewardTransaction> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .transactions
            .iter()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Aggregate counters
    pub fn stats(&self) -> LedgerStats {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let transactions = inner.transactions.len();
        let points_issued = inner.transactions.iter().map(|tx| tx.points).sum();
        let rejected = inner
            .transactions
            .iter()
            .filter(|tx| tx.trust_delta < 0.0)
            .count();

        LedgerStats {
            users: inner.accounts.len(),
            transactions,
            points_issued,
            rejected,
            rejection_rate: if transactions > 0 {
                rejected as f64 / transactions as f64
            } else {
                0.0
            },
        }
    }

    /// Export the transaction log as JSON Lines for offline audit
    pub fn to_jsonl(&self) -> String {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .transactions
            .iter()
            .filter_map(|tx| serde_json::to_string(tx).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for RewardLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate state of the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub users: usize,
    pub transactions: usize,
    pub points_issued: i64,
    pub rejected: usize,
    pub rejection_rate: f64,
}

fn generate_tx_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let timestamp = Utc::now().timestamp_millis();
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("tx_{:x}_{:04x}", timestamp, counter % 0xFFFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_core::IssueType;

    fn verified_context() -> RewardContext {
        RewardContext::new(IssueType::Pothole, Priority::High, 70.0)
            .with_outcome(ReportOutcome::AutoVerified)
    }

    #[test]
    fn test_first_reward_creates_neutral_account() {
        let ledger = RewardLedger::new();
        let receipt = ledger.process("user-1", "rep-1", &verified_context());

        match receipt {
            RewardReceipt::Granted {
                points_awarded,
                new_trust_score,
                new_total_balance,
            } => {
                // 20 * 2 + 10 + 35 = 85
                assert_eq!(points_awarded, 85);
                assert_eq!(new_trust_score, 52.0);
                assert_eq!(new_total_balance, 85);
            }
            other => panic!("expected granted, got {other:?}"),
        }
    }

    #[test]
    fn test_second_reward_for_same_report_is_skipped() {
        let ledger = RewardLedger::new();
        ledger.process("user-1", "rep-1", &verified_context());
        let second = ledger.process("user-1", "rep-1", &verified_context());

        assert!(second.is_skipped());
        assert_eq!(ledger.transactions().len(), 1);

        let balance = ledger.balance("user-1").unwrap();
        assert_eq!(balance.total_points, 85);
        assert_eq!(balance.trust_score, 52.0);
    }

    #[test]
    fn test_critical_verified_report_earns_extra_trust() {
        let ledger = RewardLedger::new();
        let context = RewardContext::new(IssueType::Pothole, Priority::Critical, 85.0)
            .with_outcome(ReportOutcome::AutoVerified);
        ledger.process("user-1", "rep-1", &context);

        let balance = ledger.balance("user-1").unwrap();
        assert_eq!(balance.trust_score, 53.0);
    }

    #[test]
    fn test_rejected_report_earns_nothing_and_costs_trust() {
        let ledger = RewardLedger::new();
        let context = RewardContext::new(IssueType::Garbage, Priority::Low, 20.0)
            .with_outcome(ReportOutcome::Rejected);
        let receipt = ledger.process("user-1", "rep-1", &context);

        match receipt {
            RewardReceipt::Granted {
                points_awarded,
                new_trust_score,
                ..
            } => {
                assert_eq!(points_awarded, 0);
                assert_eq!(new_trust_score, 45.0);
            }
            other => panic!("expected granted, got {other:?}"),
        }
    }

    #[test]
    fn test_merged_report_earns_confirmation_points_and_no_trust() {
        let ledger = RewardLedger::new();
        let context = RewardContext::new(IssueType::Pothole, Priority::High, 70.0)
            .with_outcome(ReportOutcome::AutoMerged)
            .as_confirmation();
        let receipt = ledger.process("user-1", "rep-1", &context);

        match receipt {
            RewardReceipt::Granted {
                points_awarded,
                new_trust_score,
                ..
            } => {
                // 85 * 0.1 = 8.5 truncated
                assert_eq!(points_awarded, 8);
                assert_eq!(new_trust_score, 50.0);
            }
            other => panic!("expected granted, got {other:?}"),
        }
    }

    #[test]
    fn test_pending_review_earns_points_but_no_trust() {
        let ledger = RewardLedger::new();
        let context = RewardContext::new(IssueType::Streetlight, Priority::Medium, 40.0);
        let receipt = ledger.process("user-1", "rep-1", &context);

        match receipt {
            RewardReceipt::Granted {
                points_awarded,
                new_trust_score,
                ..
            } => {
                // 15 * 1.5 + 10 + 20 = 52.5 truncated
                assert_eq!(points_awarded, 52);
                assert_eq!(new_trust_score, 50.0);
            }
            other => panic!("expected granted, got {other:?}"),
        }
    }

    #[test]
    fn test_trust_score_clamps_at_both_ends() {
        let ledger = RewardLedger::new();

        // Push the score to the ceiling
        for i in 0..30 {
            let context = RewardContext::new(IssueType::Pothole, Priority::Critical, 85.0)
                .with_outcome(ReportOutcome::AutoVerified);
            ledger.process("saint", &format!("up-{i}"), &context);
        }
        assert_eq!(ledger.balance("saint").unwrap().trust_score, 100.0);

        // And to the floor
        for i in 0..30 {
            let context = RewardContext::new(IssueType::Garbage, Priority::Low, 0.0)
                .with_outcome(ReportOutcome::Rejected);
            ledger.process("spammer", &format!("down-{i}"), &context);
        }
        assert_eq!(ledger.balance("spammer").unwrap().trust_score, 0.0);
    }

    #[test]
    fn test_unknown_user_has_no_balance() {
        let ledger = RewardLedger::new();
        assert!(ledger.balance("ghost").is_none());
    }

    #[test]
    fn test_transactions_for_user_filters() {
        let ledger = RewardLedger::new();
        ledger.process("alice", "rep-1", &verified_context());
        ledger.process("bob", "rep-2", &verified_context());
        ledger.process("alice", "rep-3", &verified_context());

        let alices = ledger.transactions_for_user("alice");
        assert_eq!(alices.len(), 2);
        assert!(alices.iter().all(|tx| tx.user_id == "alice"));
    }

    #[test]
    fn test_stats_count_rejections() {
        let ledger = RewardLedger::new();
        ledger.process("alice", "rep-1", &verified_context());
        let rejected = RewardContext::new(IssueType::Garbage, Priority::Low, 0.0)
            .with_outcome(ReportOutcome::Rejected);
        ledger.process("bob", "rep-2", &rejected);

        let stats = ledger.stats();
        assert_eq!(stats.users, 2);
        assert_eq!(stats.transactions, 2);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.points_issued, 85);
        assert!((stats.rejection_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_jsonl_export_parses_back() {
        let ledger = RewardLedger::new();
        ledger.process("alice", "rep-1", &verified_context());
        ledger.process("bob", "rep-2", &verified_context());

        let jsonl = ledger.to_jsonl();
        let lines: Vec<&str> = jsonl.lines().collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            let tx: RewardTransaction = serde_json::from_str(line).unwrap();
            assert!(tx.tx_id.starts_with("tx_"));
        }
    }

    #[test]
    fn test_concurrent_processing_records_one_transaction() {
        use std::sync::Arc;

        let ledger = Arc::new(RewardLedger::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || ledger.process("user-1", "rep-1", &verified_context()))
            })
            .collect();

        let receipts: Vec<RewardReceipt> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let granted = receipts.iter().filter(|r| r.is_granted()).count();
        assert_eq!(granted, 1, "exactly one retry may pay out");
        assert_eq!(ledger.transactions().len(), 1);
        assert_eq!(ledger.balance("user-1").unwrap().total_points, 85);
    }

    #[test]
    fn test_receipt_wire_format_matches_legacy_clients() {
        let receipt = RewardReceipt::Granted {
            points_awarded: 85,
            new_trust_score: 52.0,
            new_total_balance: 85,
        };
        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains("\"status\":\"success\""));

        let skipped = RewardReceipt::Skipped {
            reason: "Already rewarded".to_string(),
        };
        let json = serde_json::to_string(&skipped).unwrap();
        assert!(json.contains("\"status\":\"skipped\""));
    }
}
