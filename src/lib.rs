// Kola Engine - Core Library
// Credit scoring and savings-goal economics for the Kola wallet.
// Exposes all modules for use in CLI, API server, and tests

pub mod records;
pub mod store;
pub mod error;
pub mod money;
pub mod credit_score;
pub mod goal_economics;
pub mod activity;
pub mod demo;
pub mod config;

// Re-export commonly used types
pub use records::{
    TransactionRecord, TransactionKind, SavingsGoalRecord, FinancialProfile,
    GoalDraft, WalletSnapshot,
    load_snapshot, load_transactions_csv,
};
pub use store::{
    EntityType, RecordKey,
    snapshot_from_entries, load_store_dump,
};
pub use error::{RecordKeyError, RecordKeyResult};
pub use money::{round_currency, OUTGOING_TRANSFER_FEE};
pub use credit_score::{
    CreditScoreCalculator, CreditScoreResult, ScoreBreakdown,
    CreditRating, CreditRisk, CreditLevel, CreditProgress,
};
pub use goal_economics::{
    GoalEconomicsCalculator, GoalEconomicsResult, GoalFactors, GoalRisk,
    TimelineRecommendation, GoalBenefits, BenefitsTier, LockStatus,
    GoalRates, GoalTerms, EmergencyWithdrawalQuote,
    sanitize_rates, effective_goal_terms, quote_emergency_withdrawal,
    is_eligible, should_auto_lock,
};
pub use activity::{
    ActivityWindow, ActivitySummary, ActivityBucket, ActivityTotals,
    summarize_activity,
};
pub use demo::demo_snapshot;
pub use config::{AppConfig, load_config, load_config_with_fallback};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
