// 🎯 Goal Economics Calculator - Penalty, boost, interest and timeline for a goal draft
//
// Everything here is derived from a GoalDraft and the user's
// FinancialProfile, and recomputed on every draft change:
//
//   eligibility gate   duration > 40 days enables penalties and boosts
//   auto-lock          duration > 180 days locks the goal regardless of choice
//   penalty rate       2-10%, rises with savings strain, weak credit and duration
//   boost rate         0-5%, rises with duration and credit
//   interest (APY)     tiered by duration plus a credit bonus
//   timeline           affordable duration from 60% of disposable income
//
// Callers validate `target > 0`, duration in [7, 1095] and a positive
// income. Out-of-range values are floored instead of failing, so a display
// estimate is always produced.

use crate::money::{round_currency, round_rate};
use crate::records::{FinancialProfile, GoalDraft, SavingsGoalRecord, MAX_GOAL_DURATION_DAYS, MIN_GOAL_DURATION_DAYS};
use serde::{Deserialize, Serialize};

/// Penalties and boosts require a duration strictly above this
pub const ELIGIBILITY_THRESHOLD_DAYS: u32 = 40;

/// Goals strictly longer than this are locked automatically
pub const AUTO_LOCK_THRESHOLD_DAYS: u32 = 180;

pub const DAYS_PER_MONTH: f64 = 30.44;
const DAYS_PER_YEAR: f64 = 365.0;

const MIN_PENALTY_RATE: f64 = 0.02;
pub const MAX_PENALTY_RATE: f64 = 0.10;
pub const MAX_BOOST_RATE: f64 = 0.05;

/// Rate applied to emergency withdrawals from goals stored without one
const DEFAULT_EMERGENCY_PENALTY_RATE: f64 = 0.02;

/// Share of disposable income considered safe to commit to savings
const SAFE_SAVINGS_SHARE: f64 = 0.6;

/// Floors substituted for non-positive divisors
const MIN_DISPOSABLE_INCOME: f64 = 0.01;
const MIN_TARGET: f64 = 0.01;

pub fn is_eligible(duration_days: u32) -> bool {
    duration_days > ELIGIBILITY_THRESHOLD_DAYS
}

pub fn should_auto_lock(duration_days: u32) -> bool {
    duration_days > AUTO_LOCK_THRESHOLD_DAYS
}

// ============================================================================
// FACTORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalRisk {
    Low,
    Moderate,
    High,
}

impl GoalRisk {
    pub fn from_strain(savings_strain: f64) -> Self {
        if savings_strain > 0.7 {
            GoalRisk::High
        } else if savings_strain > 0.4 {
            GoalRisk::Moderate
        } else {
            GoalRisk::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalRisk::Low => "low",
            GoalRisk::Moderate => "moderate",
            GoalRisk::High => "high",
        }
    }
}

/// Intermediate signals shared by the rate formulas, kept for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalFactors {
    /// Income minus expenses, negative when the user overspends
    pub disposable_income: f64,
    pub monthly_savings_needed: f64,

    /// Required monthly contribution over disposable income (0..1+)
    pub savings_strain: f64,

    /// Credit score normalized to [0, 1]
    pub credit_factor: f64,

    /// Existing savings relative to this goal's target
    pub savings_cushion: f64,

    /// Duration as a share of a year, capped at 1
    pub duration_factor: f64,
}

impl GoalFactors {
    pub fn compute(draft: &GoalDraft, profile: &FinancialProfile) -> Self {
        let days = draft.duration_days as f64;
        let disposable_income = profile.disposable_income();
        let monthly_savings_needed = draft.target / (days / DAYS_PER_MONTH).max(1.0);

        GoalFactors {
            disposable_income,
            monthly_savings_needed,
            savings_strain: monthly_savings_needed / disposable_income.max(MIN_DISPOSABLE_INCOME),
            credit_factor: credit_factor(profile.credit_score),
            savings_cushion: profile.monthly_savings_current / draft.target.max(MIN_TARGET),
            duration_factor: (days / DAYS_PER_YEAR).min(1.0),
        }
    }
}

pub fn credit_factor(credit_score: u32) -> f64 {
    ((credit_score as f64 - 300.0) / 550.0).clamp(0.0, 1.0)
}

// ============================================================================
// RESULTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalEconomicsResult {
    pub penalty_rate: f64,
    pub boost_rate: f64,
    pub interest_rate_apy: f64,

    pub projected_interest: f64,
    pub projected_boost_amount: f64,
    pub total_at_maturity: f64,
    pub penalty_amount_if_withdrawn_early: f64,
    pub payout_if_withdrawn_early: f64,

    pub recommended_duration_days: u32,
    pub risk_level: GoalRisk,

    /// Duration passes the eligibility gate
    pub eligible: bool,

    /// Requested lock or auto-lock
    pub locked: bool,

    pub factors: GoalFactors,
}

impl GoalEconomicsResult {
    /// Copy prepared for display: money to cents, rates to basis points
    pub fn for_display(&self) -> Self {
        GoalEconomicsResult {
            penalty_rate: round_rate(self.penalty_rate),
            boost_rate: round_rate(self.boost_rate),
            interest_rate_apy: round_rate(self.interest_rate_apy),
            projected_interest: round_currency(self.projected_interest),
            projected_boost_amount: round_currency(self.projected_boost_amount),
            total_at_maturity: round_currency(self.total_at_maturity),
            penalty_amount_if_withdrawn_early: round_currency(self.penalty_amount_if_withdrawn_early),
            payout_if_withdrawn_early: round_currency(self.payout_if_withdrawn_early),
            factors: GoalFactors {
                disposable_income: round_currency(self.factors.disposable_income),
                monthly_savings_needed: round_currency(self.factors.monthly_savings_needed),
                ..self.factors
            },
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Moderate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRecommendation {
    pub days: u32,
    pub months: f64,

    /// Contribution considered affordable each month
    pub monthly_savings: f64,

    /// Chosen duration is well under the recommendation
    pub is_aggressive: bool,

    /// Chosen duration is well over the recommendation
    pub is_conservative: bool,

    pub confidence: Confidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenefitsTier {
    #[serde(rename = "Short-term")]
    ShortTerm,
    #[serde(rename = "Medium-term")]
    MediumTerm,
    #[serde(rename = "Long-term")]
    LongTerm,
    #[serde(rename = "Extended-term")]
    ExtendedTerm,
}

impl BenefitsTier {
    pub fn for_duration(duration_days: u32) -> Self {
        match duration_days {
            d if d <= 30 => BenefitsTier::ShortTerm,
            d if d <= 90 => BenefitsTier::MediumTerm,
            d if d <= AUTO_LOCK_THRESHOLD_DAYS => BenefitsTier::LongTerm,
            _ => BenefitsTier::ExtendedTerm,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BenefitsTier::ShortTerm => "Short-term",
            BenefitsTier::MediumTerm => "Medium-term",
            BenefitsTier::LongTerm => "Long-term",
            BenefitsTier::ExtendedTerm => "Extended-term",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockStatus {
    Unlocked,
    #[serde(rename = "Auto-locked")]
    AutoLocked,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalBenefits {
    pub tier: BenefitsTier,
    pub lock_status: LockStatus,
    pub penalties: bool,
    pub boosts: bool,
    pub multiplier: f64,
    pub description: &'static str,
    pub features: &'static [&'static str],
}

const SHORT_TERM_FEATURES: &[&str] = &[
    "Full access to withdrawals",
    "No emergency withdrawal penalties",
    "Simple progress tracking",
];

const MEDIUM_TERM_FEATURES: &[&str] = &[
    "Emergency withdrawal penalties (2-10%)",
    "Progress boost eligible",
    "Milestone notifications",
    "Weekly progress reports",
];

const LONG_TERM_FEATURES: &[&str] = &[
    "Emergency withdrawal penalties (2-10%)",
    "Progress boost (up to 5%)",
    "Goal achievement badges",
    "Social sharing features",
    "10% - 20% credit score increase",
];

const EXTENDED_TERM_FEATURES: &[&str] = &[
    "Automatic lock On",
    "Emergency withdrawal penalties (5-15%)",
    "Maximum progress boost (10%)",
    "Premium goal analytics",
    "20% - 50% credit score increase",
    "Dedicated goal coach insights",
];

// ============================================================================
// CALCULATOR
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct GoalEconomicsCalculator;

impl GoalEconomicsCalculator {
    pub fn new() -> Self {
        GoalEconomicsCalculator
    }

    /// Rates and projections for a draft
    pub fn compute_rates(&self, draft: &GoalDraft, profile: &FinancialProfile) -> GoalEconomicsResult {
        let factors = GoalFactors::compute(draft, profile);
        let days = draft.duration_days;

        let penalty_rate = self.penalty_rate(&factors, days);
        let boost_rate = self.boost_rate(&factors, days);
        let interest_rate_apy = self.interest_rate_apy(&factors, days);

        let target = draft.target;
        let projected_interest = target * interest_rate_apy * (days as f64 / DAYS_PER_YEAR);
        let projected_boost_amount = target * boost_rate;
        let penalty_amount = target * penalty_rate;

        GoalEconomicsResult {
            penalty_rate,
            boost_rate,
            interest_rate_apy,
            projected_interest,
            projected_boost_amount,
            total_at_maturity: target + projected_interest + projected_boost_amount,
            penalty_amount_if_withdrawn_early: penalty_amount,
            payout_if_withdrawn_early: target - penalty_amount,
            recommended_duration_days: self.recommend_timeline(draft, profile).days,
            risk_level: GoalRisk::from_strain(factors.savings_strain),
            eligible: is_eligible(days),
            locked: draft.locked || should_auto_lock(days),
            factors,
        }
    }

    /// Affordable duration for the draft's target and how the chosen one compares
    pub fn recommend_timeline(&self, draft: &GoalDraft, profile: &FinancialProfile) -> TimelineRecommendation {
        let disposable_income = profile.disposable_income().max(MIN_DISPOSABLE_INCOME);
        let safe_savings_rate = disposable_income * SAFE_SAVINGS_SHARE;

        let multiplier = credit_score_multiplier(profile.credit_score);
        let raw_days = ((draft.target / safe_savings_rate) * multiplier * DAYS_PER_MONTH).ceil();

        let days = if raw_days.is_nan() {
            MAX_GOAL_DURATION_DAYS
        } else {
            raw_days.clamp(MIN_GOAL_DURATION_DAYS as f64, MAX_GOAL_DURATION_DAYS as f64) as u32
        };

        let chosen = draft.duration_days as f64;

        TimelineRecommendation {
            days,
            months: days as f64 / DAYS_PER_MONTH,
            monthly_savings: safe_savings_rate,
            is_aggressive: chosen < days as f64 * 0.8,
            is_conservative: chosen > days as f64 * 1.3,
            confidence: if profile.credit_score >= 700 {
                Confidence::High
            } else {
                Confidence::Moderate
            },
        }
    }

    /// Benefits unlocked by a duration band
    pub fn benefits_tier(&self, duration_days: u32) -> GoalBenefits {
        let tier = BenefitsTier::for_duration(duration_days);

        match tier {
            BenefitsTier::ShortTerm => GoalBenefits {
                tier,
                lock_status: LockStatus::Unlocked,
                penalties: false,
                boosts: false,
                multiplier: 1.0,
                description: "Short-term goal",
                features: SHORT_TERM_FEATURES,
            },
            BenefitsTier::MediumTerm => GoalBenefits {
                tier,
                lock_status: LockStatus::Unlocked,
                penalties: true,
                boosts: false,
                multiplier: 1.0,
                description: "Medium-term goal",
                features: MEDIUM_TERM_FEATURES,
            },
            BenefitsTier::LongTerm => GoalBenefits {
                tier,
                lock_status: LockStatus::Unlocked,
                penalties: true,
                boosts: true,
                multiplier: 1.2,
                description: "Long-term goal",
                features: LONG_TERM_FEATURES,
            },
            BenefitsTier::ExtendedTerm => GoalBenefits {
                tier,
                lock_status: LockStatus::AutoLocked,
                penalties: true,
                boosts: true,
                multiplier: 1.5,
                description: "Extended-term goal",
                features: EXTENDED_TERM_FEATURES,
            },
        }
    }

    fn penalty_rate(&self, factors: &GoalFactors, duration_days: u32) -> f64 {
        if !is_eligible(duration_days) {
            return 0.0;
        }

        let mut rate = MIN_PENALTY_RATE;
        rate += (factors.savings_strain * 0.05).min(0.04);
        rate += (1.0 - factors.credit_factor) * 0.02;
        rate += factors.duration_factor * 0.02;

        if factors.savings_cushion > 0.5 {
            rate -= 0.01;
        }

        rate.clamp(MIN_PENALTY_RATE, MAX_PENALTY_RATE)
    }

    fn boost_rate(&self, factors: &GoalFactors, duration_days: u32) -> f64 {
        if !is_eligible(duration_days) {
            return 0.0;
        }

        let mut rate = factors.duration_factor * 0.03;
        rate += factors.credit_factor * 0.015;

        // Sweet spot: not too easy, not too hard
        if (0.2..=0.6).contains(&factors.savings_strain) {
            rate += 0.01;
        }

        if should_auto_lock(duration_days) {
            rate += 0.01;
        }

        rate.clamp(0.0, MAX_BOOST_RATE)
    }

    fn interest_rate_apy(&self, factors: &GoalFactors, duration_days: u32) -> f64 {
        let tier_rate = if duration_days > AUTO_LOCK_THRESHOLD_DAYS {
            0.05
        } else if duration_days > 90 {
            0.035
        } else {
            0.02
        };

        tier_rate + factors.credit_factor * 0.01
    }
}

fn credit_score_multiplier(credit_score: u32) -> f64 {
    match credit_score {
        s if s >= 750 => 0.9,
        s if s >= 700 => 1.0,
        s if s >= 650 => 1.15,
        _ => 1.3,
    }
}

// ============================================================================
// PERSISTED TERMS & WITHDRAWAL QUOTES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalRates {
    pub penalty_rate: f64,
    pub boost_rate: f64,
}

/// Clamp user-supplied rates the way the goal store does on write
pub fn sanitize_rates(penalty_rate: f64, boost_rate: f64) -> GoalRates {
    let clamp = |rate: f64, max: f64| if rate.is_finite() { rate.clamp(0.0, max) } else { 0.0 };

    GoalRates {
        penalty_rate: clamp(penalty_rate, MAX_PENALTY_RATE),
        boost_rate: clamp(boost_rate, MAX_BOOST_RATE),
    }
}

/// Terms stored when a goal is created from a draft
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalTerms {
    pub duration_days: u32,
    pub locked: bool,
    pub penalty_rate: f64,
    pub boost_rate: f64,
}

pub fn effective_goal_terms(draft: &GoalDraft, rates: GoalRates) -> GoalTerms {
    let rates = if is_eligible(draft.duration_days) {
        sanitize_rates(rates.penalty_rate, rates.boost_rate)
    } else {
        GoalRates {
            penalty_rate: 0.0,
            boost_rate: 0.0,
        }
    };

    GoalTerms {
        duration_days: draft.duration_days,
        locked: draft.locked || should_auto_lock(draft.duration_days),
        penalty_rate: rates.penalty_rate,
        boost_rate: rates.boost_rate,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyWithdrawalQuote {
    pub amount: f64,
    pub penalty_rate: f64,
    pub penalty: f64,
    pub payout: f64,
    pub remaining: f64,
    pub sufficient_funds: bool,

    /// Unlocked goals can use a standard, penalty-free withdrawal instead
    pub standard_withdrawal_allowed: bool,
}

/// Price an emergency withdrawal from a goal without moving any money
pub fn quote_emergency_withdrawal(goal: &SavingsGoalRecord, amount: f64) -> EmergencyWithdrawalQuote {
    let stored = if goal.penalty_rate.is_finite() && goal.penalty_rate != 0.0 {
        goal.penalty_rate
    } else {
        DEFAULT_EMERGENCY_PENALTY_RATE
    };
    let penalty_rate = stored.clamp(0.0, MAX_PENALTY_RATE);
    let penalty = amount * penalty_rate;

    EmergencyWithdrawalQuote {
        amount,
        penalty_rate,
        penalty,
        payout: (amount - penalty).max(0.0),
        remaining: goal.current - amount,
        sufficient_funds: goal.current >= amount,
        standard_withdrawal_allowed: !goal.locked,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn create_test_profile(credit_score: u32, income: f64, savings: f64, expenses: f64) -> FinancialProfile {
        FinancialProfile {
            credit_score,
            monthly_income: income,
            monthly_savings_current: savings,
            monthly_expenses: expenses,
        }
    }

    fn wallet_profile() -> FinancialProfile {
        create_test_profile(720, 4500.0, 5000.0, 3200.0)
    }

    #[test]
    fn test_draft_scenario_matches_formula() {
        let calc = GoalEconomicsCalculator::new();
        let profile = wallet_profile();
        let draft = GoalDraft::new(500.0, 90);

        let result = calc.compute_rates(&draft, &profile);

        let disposable = 4500.0 - 3200.0;
        let monthly_needed = 500.0 / f64::max(90.0 / 30.44, 1.0);
        let strain = monthly_needed / disposable;
        let credit = (720.0 - 300.0) / 550.0;
        let duration = 90.0 / 365.0;
        let cushion = 5000.0 / 500.0;

        let mut expected: f64 = 0.02;
        expected += f64::min(0.04, strain * 0.05);
        expected += (1.0 - credit) * 0.02;
        expected += duration * 0.02;
        if cushion > 0.5 {
            expected -= 0.01;
        }
        let expected = expected.clamp(0.02, 0.10);

        assert!((result.factors.disposable_income - 1300.0).abs() < EPS);
        assert!((result.factors.monthly_savings_needed - 169.1111).abs() < 1e-3);
        assert!((result.factors.savings_strain - 0.130085).abs() < 1e-5);
        assert!((result.penalty_rate - expected).abs() < EPS);
        assert!((result.penalty_rate - 0.026163).abs() < 1e-5);

        // 0.0074 + 0.0115, strain below the sweet spot
        let expected_boost = duration * 0.03 + credit * 0.015;
        assert!((result.boost_rate - expected_boost).abs() < EPS);

        // 90 days stays in the base interest tier
        assert!((result.interest_rate_apy - (0.02 + credit * 0.01)).abs() < EPS);

        assert_eq!(result.risk_level, GoalRisk::Low);
        assert!(result.eligible);
        assert!(!result.locked);
        assert_eq!(result.recommended_duration_days, 20);
    }

    #[test]
    fn test_projections() {
        let calc = GoalEconomicsCalculator::new();
        let draft = GoalDraft::new(1000.0, 365);
        let result = calc.compute_rates(&draft, &wallet_profile());

        let interest = 1000.0 * result.interest_rate_apy * (365.0 / 365.0);
        let boost = 1000.0 * result.boost_rate;

        assert!((result.projected_interest - interest).abs() < EPS);
        assert!((result.projected_boost_amount - boost).abs() < EPS);
        assert!((result.total_at_maturity - (1000.0 + interest + boost)).abs() < EPS);
        assert!((result.penalty_amount_if_withdrawn_early - 1000.0 * result.penalty_rate).abs() < EPS);
        assert!(
            (result.payout_if_withdrawn_early - (1000.0 - result.penalty_amount_if_withdrawn_early)).abs() < EPS
        );
    }

    #[test]
    fn test_gate_disables_penalty_and_boost() {
        let calc = GoalEconomicsCalculator::new();
        let strained = create_test_profile(300, 1000.0, 0.0, 990.0);

        for days in [7, 30, 40] {
            for profile in [wallet_profile(), strained.clone()] {
                let result = calc.compute_rates(&GoalDraft::new(5000.0, days), &profile);
                assert_eq!(result.penalty_rate, 0.0);
                assert_eq!(result.boost_rate, 0.0);
                assert!(!result.eligible);
            }
        }

        let result = calc.compute_rates(&GoalDraft::new(5000.0, 41), &wallet_profile());
        assert!(result.eligible);
        assert!(result.penalty_rate >= 0.02);
    }

    #[test]
    fn test_penalty_and_boost_bounds() {
        let calc = GoalEconomicsCalculator::new();
        let profiles = [
            wallet_profile(),
            create_test_profile(300, 1000.0, 0.0, 990.0),
            create_test_profile(850, 20000.0, 100000.0, 1000.0),
            create_test_profile(600, 3000.0, 200.0, 2500.0),
        ];

        for profile in &profiles {
            for target in [50.0, 500.0, 5000.0, 50000.0] {
                for days in [41, 60, 90, 120, 181, 365, 730, 1095] {
                    let result = calc.compute_rates(&GoalDraft::new(target, days), profile);
                    assert!(
                        (0.02..=0.10).contains(&result.penalty_rate),
                        "penalty {} out of range",
                        result.penalty_rate
                    );
                    assert!((0.0..=0.05).contains(&result.boost_rate));
                    assert!((7..=1095).contains(&result.recommended_duration_days));
                }
            }
        }
    }

    #[test]
    fn test_penalty_floor_applies_with_cushion() {
        let calc = GoalEconomicsCalculator::new();
        let rich = create_test_profile(850, 20000.0, 100000.0, 1000.0);

        // 0.02 + ~0 + 0 + 0.0022 - 0.01 -> clamped up to 0.02
        let result = calc.compute_rates(&GoalDraft::new(100.0, 41), &rich);
        assert_eq!(result.penalty_rate, 0.02);
    }

    #[test]
    fn test_penalty_ceiling() {
        let calc = GoalEconomicsCalculator::new();
        let strained = create_test_profile(300, 1000.0, 0.0, 990.0);

        let result = calc.compute_rates(&GoalDraft::new(50000.0, 730), &strained);
        assert!((result.penalty_rate - 0.10).abs() < EPS);
        assert_eq!(result.risk_level, GoalRisk::High);
    }

    #[test]
    fn test_boost_bonuses_and_clamp() {
        let calc = GoalEconomicsCalculator::new();

        // Strain in [0.2, 0.6]: 2000 over 120 days ~ 507/month of 1300
        let sweet = calc.compute_rates(&GoalDraft::new(2000.0, 120), &wallet_profile());
        assert!((0.2..=0.6).contains(&sweet.factors.savings_strain));
        let expected = (120.0 / 365.0) * 0.03 + sweet.factors.credit_factor * 0.015 + 0.01;
        assert!((sweet.boost_rate - expected).abs() < EPS);
        assert_eq!(sweet.risk_level, GoalRisk::Low);

        // Year-long goal with excellent credit overshoots and is clamped
        let excellent = create_test_profile(850, 20000.0, 0.0, 1000.0);
        let capped = calc.compute_rates(&GoalDraft::new(1000.0, 365), &excellent);
        assert_eq!(capped.boost_rate, 0.05);
    }

    #[test]
    fn test_interest_tiers() {
        let calc = GoalEconomicsCalculator::new();
        let zero_credit = create_test_profile(300, 4500.0, 0.0, 3200.0);

        let rate = |days| calc.compute_rates(&GoalDraft::new(500.0, days), &zero_credit).interest_rate_apy;
        assert!((rate(90) - 0.02).abs() < EPS);
        assert!((rate(91) - 0.035).abs() < EPS);
        assert!((rate(180) - 0.035).abs() < EPS);
        assert!((rate(181) - 0.05).abs() < EPS);

        let top = create_test_profile(850, 4500.0, 0.0, 3200.0);
        let apy = calc.compute_rates(&GoalDraft::new(500.0, 365), &top).interest_rate_apy;
        assert!((apy - 0.06).abs() < EPS);
    }

    #[test]
    fn test_auto_lock_overrides_request() {
        let calc = GoalEconomicsCalculator::new();

        let mut draft = GoalDraft::new(500.0, 181);
        draft.locked = false;
        assert!(calc.compute_rates(&draft, &wallet_profile()).locked);

        let short = GoalDraft::new(500.0, 180);
        assert!(!calc.compute_rates(&short, &wallet_profile()).locked);

        let requested = GoalDraft { locked: true, ..GoalDraft::new(500.0, 30) };
        assert!(calc.compute_rates(&requested, &wallet_profile()).locked);
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(GoalRisk::from_strain(0.4), GoalRisk::Low);
        assert_eq!(GoalRisk::from_strain(0.41), GoalRisk::Moderate);
        assert_eq!(GoalRisk::from_strain(0.7), GoalRisk::Moderate);
        assert_eq!(GoalRisk::from_strain(0.71), GoalRisk::High);
    }

    #[test]
    fn test_timeline_recommendation() {
        let calc = GoalEconomicsCalculator::new();
        let profile = wallet_profile();

        // 500 / 780 * 1.0 * 30.44 = 19.5 -> 20 days
        let timeline = calc.recommend_timeline(&GoalDraft::new(500.0, 90), &profile);
        assert_eq!(timeline.days, 20);
        assert!((timeline.monthly_savings - 780.0).abs() < EPS);
        assert!(timeline.is_conservative);
        assert!(!timeline.is_aggressive);
        assert_eq!(timeline.confidence, Confidence::High);

        // 5000 / 780 * 30.44 = 195.1 -> 196 days
        let aggressive = calc.recommend_timeline(&GoalDraft::new(5000.0, 90), &profile);
        assert_eq!(aggressive.days, 196);
        assert!(aggressive.is_aggressive);
        assert!(!aggressive.is_conservative);

        let on_track = calc.recommend_timeline(&GoalDraft::new(5000.0, 200), &profile);
        assert!(!on_track.is_aggressive && !on_track.is_conservative);
    }

    #[test]
    fn test_timeline_credit_multipliers() {
        assert_eq!(credit_score_multiplier(750), 0.9);
        assert_eq!(credit_score_multiplier(749), 1.0);
        assert_eq!(credit_score_multiplier(700), 1.0);
        assert_eq!(credit_score_multiplier(650), 1.15);
        assert_eq!(credit_score_multiplier(649), 1.3);
    }

    #[test]
    fn test_timeline_bounds() {
        let calc = GoalEconomicsCalculator::new();
        let profile = wallet_profile();

        assert_eq!(calc.recommend_timeline(&GoalDraft::new(1.0, 30), &profile).days, 7);
        assert_eq!(calc.recommend_timeline(&GoalDraft::new(1_000_000.0, 30), &profile).days, 1095);
    }

    #[test]
    fn test_timeline_flags_never_both_true() {
        let calc = GoalEconomicsCalculator::new();
        let profiles = [wallet_profile(), create_test_profile(600, 2500.0, 0.0, 2400.0)];

        for profile in &profiles {
            for target in [10.0, 500.0, 5000.0, 100000.0] {
                for days in (7..=1095).step_by(17) {
                    let t = calc.recommend_timeline(&GoalDraft::new(target, days), profile);
                    assert!(!(t.is_aggressive && t.is_conservative));
                }
            }
        }
    }

    #[test]
    fn test_non_positive_disposable_income_is_floored() {
        let calc = GoalEconomicsCalculator::new();
        let broke = create_test_profile(680, 2000.0, 0.0, 2500.0);

        let result = calc.compute_rates(&GoalDraft::new(500.0, 120), &broke);
        assert!(result.penalty_rate.is_finite());
        assert!((0.02..=0.10).contains(&result.penalty_rate));
        assert_eq!(result.risk_level, GoalRisk::High);
        assert_eq!(result.recommended_duration_days, 1095);

        // the shortfall itself is reported, only the divisor is floored
        assert!((result.factors.disposable_income + 500.0).abs() < EPS);
        assert!((result.for_display().factors.disposable_income + 500.0).abs() < EPS);
        assert!((result.factors.savings_strain - result.factors.monthly_savings_needed / 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_benefits_tiers() {
        let calc = GoalEconomicsCalculator::new();

        let short = calc.benefits_tier(30);
        assert_eq!(short.tier, BenefitsTier::ShortTerm);
        assert!(!short.penalties && !short.boosts);
        assert_eq!(short.features.len(), 3);

        let medium = calc.benefits_tier(90);
        assert_eq!(medium.tier, BenefitsTier::MediumTerm);
        assert!(medium.penalties && !medium.boosts);
        assert_eq!(medium.multiplier, 1.0);

        let long = calc.benefits_tier(180);
        assert_eq!(long.tier, BenefitsTier::LongTerm);
        assert_eq!(long.lock_status, LockStatus::Unlocked);
        assert_eq!(long.multiplier, 1.2);

        let extended = calc.benefits_tier(181);
        assert_eq!(extended.tier, BenefitsTier::ExtendedTerm);
        assert_eq!(extended.lock_status, LockStatus::AutoLocked);
        assert_eq!(extended.multiplier, 1.5);
        assert_eq!(extended.features[0], "Automatic lock On");
    }

    #[test]
    fn test_compute_rates_is_deterministic() {
        let calc = GoalEconomicsCalculator::new();
        let draft = GoalDraft::new(1234.56, 222);

        let a = calc.compute_rates(&draft, &wallet_profile());
        let b = calc.compute_rates(&draft, &wallet_profile());
        assert_eq!(a, b);
        assert_eq!(a.penalty_rate.to_bits(), b.penalty_rate.to_bits());
    }

    #[test]
    fn test_for_display_rounds_money() {
        let calc = GoalEconomicsCalculator::new();
        let result = calc.compute_rates(&GoalDraft::new(500.0, 90), &wallet_profile()).for_display();

        assert_eq!(result.penalty_rate, 0.0262);
        assert_eq!(result.penalty_amount_if_withdrawn_early, 13.08);
        assert_eq!(result.payout_if_withdrawn_early, 486.92);
        assert_eq!(result.factors.monthly_savings_needed, 169.11);
    }

    #[test]
    fn test_sanitize_rates() {
        assert_eq!(
            sanitize_rates(0.25, -1.0),
            GoalRates { penalty_rate: 0.10, boost_rate: 0.0 }
        );
        assert_eq!(
            sanitize_rates(f64::NAN, 0.03),
            GoalRates { penalty_rate: 0.0, boost_rate: 0.03 }
        );
    }

    #[test]
    fn test_effective_goal_terms() {
        let rates = GoalRates { penalty_rate: 0.04, boost_rate: 0.02 };

        let short = effective_goal_terms(&GoalDraft::new(500.0, 30), rates);
        assert_eq!(short.penalty_rate, 0.0);
        assert_eq!(short.boost_rate, 0.0);
        assert!(!short.locked);

        let extended = effective_goal_terms(&GoalDraft::new(500.0, 200), rates);
        assert_eq!(extended.penalty_rate, 0.04);
        assert!(extended.locked);
    }

    #[test]
    fn test_emergency_withdrawal_quote() {
        let mut goal = SavingsGoalRecord::new("1", 5000.0, 3200.0);
        goal.locked = true;
        goal.penalty_rate = 0.05;

        let quote = quote_emergency_withdrawal(&goal, 1000.0);
        assert!((quote.penalty - 50.0).abs() < EPS);
        assert!((quote.payout - 950.0).abs() < EPS);
        assert_eq!(quote.remaining, 2200.0);
        assert!(quote.sufficient_funds);
        assert!(!quote.standard_withdrawal_allowed);
    }

    #[test]
    fn test_emergency_withdrawal_default_and_clamped_rates() {
        let goal = SavingsGoalRecord::new("1", 5000.0, 100.0);
        let quote = quote_emergency_withdrawal(&goal, 500.0);
        assert_eq!(quote.penalty_rate, 0.02);
        assert!(!quote.sufficient_funds);
        assert!(quote.standard_withdrawal_allowed);

        let mut greedy = goal.clone();
        greedy.penalty_rate = 0.15;
        assert_eq!(quote_emergency_withdrawal(&greedy, 100.0).penalty_rate, 0.10);
    }
}
