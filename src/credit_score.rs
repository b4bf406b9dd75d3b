// 📈 Credit Score Calculator - 300-850 score from wallet activity
//
// Four independently clamped components are added onto a base of 300:
//   payment history      0-35
//   credit utilization   0-30
//   savings behavior     0-20
//   spending consistency 0-15
//
// The calculator is a pure function over a read-only snapshot. It never
// fails: degenerate input (no transactions, no goals, zero balance) simply
// contributes nothing and yields the 300 floor.

use crate::records::{SavingsGoalRecord, TransactionRecord};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

pub const BASE_SCORE: u32 = 300;
pub const MAX_SCORE: u32 = 850;

const MAX_PAYMENT_HISTORY: u32 = 35;
const MAX_CREDIT_UTILIZATION: u32 = 30;
const MAX_SAVINGS_BEHAVIOR: u32 = 20;
const MAX_SPENDING_CONSISTENCY: u32 = 15;

/// Balance above which utilization earns a flat bonus
const HIGH_BALANCE_THRESHOLD: f64 = 1000.0;
const HIGH_BALANCE_BONUS: f64 = 10.0;

/// Cap on the per-goal participation bonus in savings behavior
const MAX_GOAL_COUNT_BONUS: u32 = 10;

// ============================================================================
// RATING & RISK
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditRating {
    Poor,
    Fair,
    Good,
    #[serde(rename = "Very Good")]
    VeryGood,
    Excellent,
}

impl CreditRating {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 800 => CreditRating::Excellent,
            s if s >= 740 => CreditRating::VeryGood,
            s if s >= 670 => CreditRating::Good,
            s if s >= 580 => CreditRating::Fair,
            _ => CreditRating::Poor,
        }
    }

    pub fn risk_level(&self) -> CreditRisk {
        match self {
            CreditRating::Excellent | CreditRating::VeryGood => CreditRisk::Low,
            CreditRating::Good => CreditRisk::Medium,
            CreditRating::Fair => CreditRisk::MediumHigh,
            CreditRating::Poor => CreditRisk::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CreditRating::Poor => "Poor",
            CreditRating::Fair => "Fair",
            CreditRating::Good => "Good",
            CreditRating::VeryGood => "Very Good",
            CreditRating::Excellent => "Excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditRisk {
    Low,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
}

impl CreditRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreditRisk::Low => "Low",
            CreditRisk::Medium => "Medium",
            CreditRisk::MediumHigh => "Medium-High",
            CreditRisk::High => "High",
        }
    }
}

// ============================================================================
// RESULT
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub payment_history: u32,
    pub credit_utilization: u32,
    pub savings_behavior: u32,
    pub spending_consistency: u32,
}

impl ScoreBreakdown {
    /// Sum of all components, at most 100
    pub fn total(&self) -> u32 {
        self.payment_history + self.credit_utilization + self.savings_behavior + self.spending_consistency
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditScoreResult {
    pub score: u32,
    pub max_score: u32,
    pub rating: CreditRating,
    pub risk_level: CreditRisk,
    pub breakdown: ScoreBreakdown,
}

impl CreditScoreResult {
    pub fn summary(&self) -> String {
        format!(
            "Credit score {} / {} ({}, {} risk): payment {}/35, utilization {}/30, savings {}/20, consistency {}/15",
            self.score,
            self.max_score,
            self.rating.as_str(),
            self.risk_level.as_str(),
            self.breakdown.payment_history,
            self.breakdown.credit_utilization,
            self.breakdown.savings_behavior,
            self.breakdown.spending_consistency,
        )
    }
}

// ============================================================================
// CALCULATOR
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct CreditScoreCalculator;

impl CreditScoreCalculator {
    pub fn new() -> Self {
        CreditScoreCalculator
    }

    /// Score a snapshot relative to the current month
    pub fn score(
        &self,
        balance: f64,
        transactions: &[TransactionRecord],
        goals: &[SavingsGoalRecord],
    ) -> CreditScoreResult {
        self.score_at(balance, transactions, goals, Utc::now())
    }

    /// Score a snapshot with an explicit reference instant.
    ///
    /// `now` only decides which calendar month is "this month" for the
    /// spending consistency component.
    pub fn score_at(
        &self,
        balance: f64,
        transactions: &[TransactionRecord],
        goals: &[SavingsGoalRecord],
        now: DateTime<Utc>,
    ) -> CreditScoreResult {
        let breakdown = ScoreBreakdown {
            payment_history: self.payment_history_points(transactions),
            credit_utilization: self.credit_utilization_points(balance, transactions),
            savings_behavior: self.savings_behavior_points(goals),
            spending_consistency: self.spending_consistency_points(transactions, now),
        };

        let score = (BASE_SCORE + breakdown.total()).min(MAX_SCORE);
        let rating = CreditRating::from_score(score);

        CreditScoreResult {
            score,
            max_score: MAX_SCORE,
            rating,
            risk_level: rating.risk_level(),
            breakdown,
        }
    }

    /// Share of outgoing payments plus two points per transaction
    fn payment_history_points(&self, transactions: &[TransactionRecord]) -> u32 {
        let n = transactions.len();
        let sent = transactions.iter().filter(|tx| tx.is_sent()).count();

        let raw = (sent as f64 / n.max(1) as f64) * 35.0 + n as f64 * 2.0;
        clamp_points(raw, MAX_PAYMENT_HISTORY)
    }

    /// Balance held relative to five average-sized transactions
    fn credit_utilization_points(&self, balance: f64, transactions: &[TransactionRecord]) -> u32 {
        // f64::min ignores NaN, so non-finite inputs must be zeroed before the ratio
        let balance = finite_or_zero(balance);
        let avg_tx = if transactions.is_empty() {
            0.0
        } else {
            finite_or_zero(transactions.iter().map(|tx| tx.amount).sum::<f64>() / transactions.len() as f64)
        };

        let utilization_ratio = balance / (avg_tx * 5.0).max(1.0);
        let bonus = if balance > HIGH_BALANCE_THRESHOLD {
            HIGH_BALANCE_BONUS
        } else {
            0.0
        };

        clamp_points(utilization_ratio.min(1.0) * 30.0 + bonus, MAX_CREDIT_UTILIZATION)
    }

    /// Average goal progress plus a participation bonus per goal
    fn savings_behavior_points(&self, goals: &[SavingsGoalRecord]) -> u32 {
        if goals.is_empty() {
            return 0;
        }

        let avg_progress = goals.iter().map(|g| g.progress()).sum::<f64>() / goals.len() as f64;
        let count_bonus = (goals.len() as u32).saturating_mul(2).min(MAX_GOAL_COUNT_BONUS);

        clamp_points((avg_progress * 20.0).floor() + count_bonus as f64, MAX_SAVINGS_BEHAVIOR)
    }

    /// Regularity of transaction counts between this and the previous month.
    ///
    /// Symmetric: an imbalance in either direction lowers the points.
    fn spending_consistency_points(&self, transactions: &[TransactionRecord], now: DateTime<Utc>) -> u32 {
        let this_month = (now.year(), now.month());
        let last_month = previous_month(this_month);

        let mut this_count = 0usize;
        let mut last_count = 0usize;

        for tx in transactions {
            let month = (tx.occurred_at.year(), tx.occurred_at.month());
            if month == this_month {
                this_count += 1;
            } else if month == last_month {
                last_count += 1;
            }
        }

        if this_count == 0 || last_count == 0 {
            return 0;
        }

        let ratio = this_count.min(last_count) as f64 / this_count.max(last_count) as f64;
        clamp_points(ratio * 15.0, MAX_SPENDING_CONSISTENCY)
    }
}

fn previous_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Floor a raw component value into `[0, max]`
fn clamp_points(raw: f64, max: u32) -> u32 {
    let floored = raw.floor();
    if floored.is_nan() || floored <= 0.0 {
        0
    } else if floored >= max as f64 {
        max
    } else {
        floored as u32
    }
}

// ============================================================================
// LEVEL PROGRESSION
// ============================================================================

/// A rating band with the threshold of the next band up
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditLevel {
    pub rating: CreditRating,
    pub min: u32,
    pub max: u32,
    pub next_threshold: u32,
    pub purchasing_multiplier: f64,
}

pub const CREDIT_LEVELS: [CreditLevel; 5] = [
    CreditLevel { rating: CreditRating::Poor, min: 300, max: 579, next_threshold: 580, purchasing_multiplier: 0.5 },
    CreditLevel { rating: CreditRating::Fair, min: 580, max: 669, next_threshold: 670, purchasing_multiplier: 0.8 },
    CreditLevel { rating: CreditRating::Good, min: 670, max: 739, next_threshold: 740, purchasing_multiplier: 1.2 },
    CreditLevel { rating: CreditRating::VeryGood, min: 740, max: 799, next_threshold: 800, purchasing_multiplier: 1.5 },
    CreditLevel { rating: CreditRating::Excellent, min: 800, max: 850, next_threshold: 850, purchasing_multiplier: 2.0 },
];

impl CreditLevel {
    pub fn for_score(score: u32) -> CreditLevel {
        CREDIT_LEVELS
            .iter()
            .copied()
            .find(|level| score >= level.min && score <= level.max)
            .unwrap_or(if score > MAX_SCORE { CREDIT_LEVELS[4] } else { CREDIT_LEVELS[0] })
    }

    pub fn is_top(&self) -> bool {
        self.next_threshold == MAX_SCORE
    }
}

/// Where a score sits within its band and what it unlocks
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditProgress {
    pub level: CreditLevel,
    pub points_to_next: u32,
    pub progress_percent: f64,
    pub purchasing_power: f64,
}

impl CreditProgress {
    pub fn for_score(score: u32, balance: f64) -> Self {
        let score = score.min(MAX_SCORE);
        let level = CreditLevel::for_score(score);

        let progress_percent = if level.is_top() {
            100.0
        } else {
            (score.saturating_sub(level.min)) as f64 / (level.next_threshold - level.min) as f64 * 100.0
        };

        CreditProgress {
            level,
            points_to_next: level.next_threshold.saturating_sub(score),
            progress_percent,
            purchasing_power: balance * level.purchasing_multiplier,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
