// 🌱 Demo Wallet - The state a fresh demo user starts with

use crate::records::{FinancialProfile, SavingsGoalRecord, TransactionKind, TransactionRecord, WalletSnapshot};
use chrono::{DateTime, Duration, Utc};

pub const DEMO_USER_ID: &str = "demo-user";
pub const DEMO_BALANCE: f64 = 2847.50;

fn demo_transaction(
    id: &str,
    kind: TransactionKind,
    recipient: &str,
    amount: f64,
    occurred_at: DateTime<Utc>,
    method: &str,
) -> TransactionRecord {
    TransactionRecord {
        id: id.to_string(),
        kind,
        amount,
        occurred_at,
        method: method.to_string(),
        recipient: Some(recipient.to_string()),
    }
}

fn demo_goal(id: &str, name: &str, target: f64, current: f64) -> SavingsGoalRecord {
    SavingsGoalRecord {
        name: Some(name.to_string()),
        ..SavingsGoalRecord::new(id, target, current)
    }
}

/// Seeded wallet with transactions spread over the last three days
pub fn demo_snapshot(now: DateTime<Utc>) -> WalletSnapshot {
    WalletSnapshot {
        balance: DEMO_BALANCE,
        transactions: vec![
            demo_transaction("1", TransactionKind::Sent, "Sarah Johnson", 45.0, now, "MoMo"),
            demo_transaction("2", TransactionKind::Received, "John Doe", 120.5, now - Duration::hours(1), "Bank Transfer"),
            demo_transaction("3", TransactionKind::Sent, "Emma Wilson", 67.2, now - Duration::days(1), "Orange Money"),
            demo_transaction("4", TransactionKind::Received, "Michael Brown", 200.0, now - Duration::days(2), "MoMo"),
            demo_transaction("5", TransactionKind::Sent, "Lisa Chen", 89.99, now - Duration::days(3), "Bank Transfer"),
        ],
        goals: vec![
            demo_goal("1", "Emergency Fund", 5000.0, 3200.0),
            demo_goal("2", "Vacation 2026", 3000.0, 1450.0),
            demo_goal("3", "New Laptop", 1500.0, 890.0),
        ],
        profile: Some(FinancialProfile::default()),
    }
}
