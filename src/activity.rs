// 📊 Activity Statistics - Sent / received / net per hour or per day
//
// Unlike the scoring engine, these aggregates show what actually left the
// balance, so every outgoing transfer carries the flat transfer fee.
// Recurring transactions are listed but not charted.

use crate::money::with_transfer_fee;
use crate::records::{TransactionKind, TransactionRecord};
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityWindow {
    /// Hourly buckets for the current day
    Today,

    /// Daily buckets for the current calendar month
    ThisMonth,
}

impl ActivityWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityWindow::Today => "today",
            ActivityWindow::ThisMonth => "month",
        }
    }

    fn contains(&self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let same_month = at.year() == now.year() && at.month() == now.month();
        match self {
            ActivityWindow::Today => same_month && at.day() == now.day(),
            ActivityWindow::ThisMonth => same_month,
        }
    }
}

impl FromStr for ActivityWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" | "daily" => Ok(ActivityWindow::Today),
            "month" | "monthly" | "this_month" => Ok(ActivityWindow::ThisMonth),
            other => Err(format!("unknown activity window '{}' (expected today or month)", other)),
        }
    }
}

impl fmt::Display for ActivityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityBucket {
    pub label: String,
    pub sent: f64,
    pub received: f64,
    pub net: f64,
}

impl ActivityBucket {
    fn empty(label: String) -> Self {
        ActivityBucket {
            label,
            sent: 0.0,
            received: 0.0,
            net: 0.0,
        }
    }

    fn is_empty(&self) -> bool {
        self.sent == 0.0 && self.received == 0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityTotals {
    pub sent: f64,
    pub received: f64,
    pub net: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub window: ActivityWindow,
    pub buckets: Vec<ActivityBucket>,
    pub totals: ActivityTotals,

    /// Transactions of any kind falling inside the window
    pub transaction_count: usize,
}

impl ActivitySummary {
    pub fn summary(&self) -> String {
        format!(
            "{} activity: {} transactions, sent ${:.2}, received ${:.2}, net ${:.2}",
            self.window, self.transaction_count, self.totals.sent, self.totals.received, self.totals.net
        )
    }
}

pub fn summarize_activity(
    transactions: &[TransactionRecord],
    window: ActivityWindow,
    now: DateTime<Utc>,
) -> ActivitySummary {
    let mut buckets: Vec<ActivityBucket> = match window {
        ActivityWindow::Today => (0..24).map(|h| ActivityBucket::empty(format!("{}:00", h))).collect(),
        ActivityWindow::ThisMonth => (1..=days_in_month(now.year(), now.month()))
            .map(|d| ActivityBucket::empty(d.to_string()))
            .collect(),
    };

    let mut transaction_count = 0;

    for tx in transactions.iter().filter(|tx| window.contains(tx.occurred_at, now)) {
        transaction_count += 1;

        let index = match window {
            ActivityWindow::Today => tx.occurred_at.hour() as usize,
            ActivityWindow::ThisMonth => tx.occurred_at.day0() as usize,
        };
        let bucket = &mut buckets[index];

        match tx.kind {
            TransactionKind::Sent => {
                let charged = with_transfer_fee(tx.amount);
                bucket.sent += charged;
                bucket.net -= charged;
            }
            TransactionKind::Received => {
                bucket.received += tx.amount;
                bucket.net += tx.amount;
            }
            TransactionKind::Recurring => {}
        }
    }

    if window == ActivityWindow::Today {
        buckets.retain(|b| !b.is_empty());
    }

    let totals = buckets.iter().fold(ActivityTotals::default(), |acc, b| ActivityTotals {
        sent: acc.sent + b.sent,
        received: acc.received + b.received,
        net: acc.net + b.net,
    });

    ActivitySummary {
        window,
        buckets,
        totals,
        transaction_count,
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

// ============================================================================
// TESTS
// ============================================================================
