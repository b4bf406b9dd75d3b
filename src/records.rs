// 📒 Wallet Records - Read-only inputs of the scoring engine
// Transactions, savings goals and the user's financial profile, plus the
// snapshot loaders used by the CLI and the API server.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Duration assumed for stored goals that predate the duration field.
pub const DEFAULT_GOAL_DURATION_DAYS: u32 = 90;

/// Shortest and longest durations a goal draft may carry.
pub const MIN_GOAL_DURATION_DAYS: u32 = 7;
pub const MAX_GOAL_DURATION_DAYS: u32 = 1095;

// ============================================================================
// TRANSACTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Outgoing transfer (the wallet adds a flat fee on top of the amount)
    Sent,

    /// Incoming transfer
    Received,

    /// Scheduled payment
    Recurring,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Sent => "sent",
            TransactionKind::Received => "received",
            TransactionKind::Recurring => "recurring",
        }
    }
}

/// A completed wallet transaction.
///
/// `amount` is net of the outgoing transfer fee; aggregates that want the
/// fee included must add it themselves (see `activity`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    pub amount: f64,

    #[serde(rename = "date")]
    pub occurred_at: DateTime<Utc>,

    #[serde(default = "default_method")]
    pub method: String,

    /// Counterparty, display only
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
}

fn default_method() -> String {
    "MoMo".to_string()
}

impl TransactionRecord {
    pub fn new(id: &str, kind: TransactionKind, amount: f64, occurred_at: DateTime<Utc>) -> Self {
        TransactionRecord {
            id: id.to_string(),
            kind,
            amount,
            occurred_at,
            method: default_method(),
            recipient: None,
        }
    }

    pub fn is_sent(&self) -> bool {
        self.kind == TransactionKind::Sent
    }
}

// ============================================================================
// SAVINGS GOALS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalRecord {
    pub id: String,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub target: f64,

    /// May exceed `target`: over-funding is allowed
    #[serde(default)]
    pub current: f64,

    #[serde(default = "default_goal_duration")]
    #[serde(alias = "duration")]
    pub duration_days: u32,

    #[serde(default)]
    pub locked: bool,

    #[serde(default)]
    pub penalty_rate: f64,

    #[serde(default)]
    pub boost_rate: f64,
}

fn default_goal_duration() -> u32 {
    DEFAULT_GOAL_DURATION_DAYS
}

impl SavingsGoalRecord {
    pub fn new(id: &str, target: f64, current: f64) -> Self {
        SavingsGoalRecord {
            id: id.to_string(),
            name: None,
            target,
            current,
            duration_days: DEFAULT_GOAL_DURATION_DAYS,
            locked: false,
            penalty_rate: 0.0,
            boost_rate: 0.0,
        }
    }

    /// Funded fraction of the target; guards against tiny or zero targets.
    pub fn progress(&self) -> f64 {
        self.current / self.target.max(1.0)
    }
}

// ============================================================================
// FINANCIAL PROFILE
// ============================================================================

/// Per-user profile supplied alongside a goal draft. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    /// 300-850
    pub credit_score: u32,

    pub monthly_income: f64,

    /// Savings the user already holds
    #[serde(alias = "currentSavings")]
    pub monthly_savings_current: f64,

    pub monthly_expenses: f64,
}

impl FinancialProfile {
    pub fn disposable_income(&self) -> f64 {
        self.monthly_income - self.monthly_expenses
    }
}

impl Default for FinancialProfile {
    fn default() -> Self {
        FinancialProfile {
            credit_score: 720,
            monthly_income: 4500.0,
            monthly_savings_current: 5000.0,
            monthly_expenses: 3200.0,
        }
    }
}

// ============================================================================
// GOAL DRAFT
// ============================================================================

/// A goal being configured by the user, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub target: f64,

    #[serde(alias = "duration")]
    pub duration_days: u32,

    /// Lock requested by the user; long goals are locked regardless
    #[serde(default)]
    pub locked: bool,
}

impl GoalDraft {
    pub fn new(target: f64, duration_days: u32) -> Self {
        GoalDraft {
            target,
            duration_days,
            locked: false,
        }
    }

    /// Copy with the duration pulled into the accepted range.
    pub fn clamped(&self) -> Self {
        GoalDraft {
            duration_days: self
                .duration_days
                .clamp(MIN_GOAL_DURATION_DAYS, MAX_GOAL_DURATION_DAYS),
            ..self.clone()
        }
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// One consistent read of a user's wallet state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    #[serde(default)]
    pub balance: f64,

    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,

    #[serde(default)]
    pub goals: Vec<SavingsGoalRecord>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<FinancialProfile>,
}

/// Load a JSON snapshot file
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<WalletSnapshot> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
    let snapshot: WalletSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse snapshot JSON in {}", path.display()))?;

    info!(
        path = %path.display(),
        transactions = snapshot.transactions.len(),
        goals = snapshot.goals.len(),
        "loaded wallet snapshot"
    );
    Ok(snapshot)
}

/// Load transactions from a CSV export (`id,type,amount,date,method`)
pub fn load_transactions_csv<P: AsRef<Path>>(path: P) -> Result<Vec<TransactionRecord>> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let mut transactions = Vec::new();

    for (line, result) in rdr.deserialize().enumerate() {
        let mut transaction: TransactionRecord = result
            .with_context(|| format!("Failed to deserialize transaction on row {}", line + 1))?;

        if transaction.id.is_empty() {
            transaction.id = uuid::Uuid::new_v4().to_string();
        }

        transactions.push(transaction);
    }

    debug!(path = %path.display(), count = transactions.len(), "loaded transactions CSV");
    Ok(transactions)
}

// ============================================================================
// TESTS
// ============================================================================
