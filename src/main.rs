use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// Use library instead of local modules
use kola_engine::{
    demo_snapshot, load_config_with_fallback, load_snapshot, load_store_dump, load_transactions_csv,
    quote_emergency_withdrawal, round_currency, summarize_activity, ActivityWindow, AppConfig,
    CreditProgress, CreditScoreCalculator, GoalDraft, GoalEconomicsCalculator, WalletSnapshot,
};

/// Kola Engine - credit scoring and savings-goal economics for the Kola wallet
#[derive(Parser, Debug)]
#[command(name = "kola-engine", version)]
struct Cli {
    /// Settings file (defaults to ./kola.json when present)
    #[arg(long, global = true, env = "KOLA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

/// Where the wallet snapshot comes from
#[derive(clap::Args, Debug)]
struct SnapshotSource {
    /// JSON snapshot file
    #[arg(long, env = "KOLA_SNAPSHOT", conflicts_with = "store_dump")]
    snapshot: Option<PathBuf>,

    /// Key-value store dump (JSON object of key -> JSON string)
    #[arg(long)]
    store_dump: Option<PathBuf>,

    /// User to read from a store dump (defaults to the configured user)
    #[arg(long)]
    user: Option<String>,

    /// Replace the snapshot's transactions with a CSV export
    #[arg(long)]
    transactions_csv: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute the credit score of a wallet snapshot
    Score {
        #[command(flatten)]
        source: SnapshotSource,

        /// Print JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Price a savings goal draft: penalty, boost, interest and projections
    Goal {
        #[arg(long)]
        target: f64,

        #[arg(long)]
        days: u32,

        /// Request a lock (goals over 180 days are always locked)
        #[arg(long)]
        locked: bool,

        #[command(flatten)]
        source: SnapshotSource,

        #[arg(long)]
        json: bool,
    },

    /// Recommend an affordable duration for a target
    Timeline {
        #[arg(long)]
        target: f64,

        /// Duration the user is considering
        #[arg(long)]
        days: u32,

        #[command(flatten)]
        source: SnapshotSource,
    },

    /// Show the benefits tier for a duration
    Benefits {
        #[arg(long)]
        days: u32,
    },

    /// Sent / received / net activity including transfer fees
    Activity {
        /// today or month
        #[arg(long, default_value = "month")]
        window: ActivityWindow,

        #[command(flatten)]
        source: SnapshotSource,

        #[arg(long)]
        json: bool,
    },

    /// Quote an emergency withdrawal from a goal
    Emergency {
        /// Goal id within the snapshot
        #[arg(long)]
        goal: String,

        #[arg(long)]
        amount: f64,

        #[command(flatten)]
        source: SnapshotSource,
    },

    /// Score the demo wallet and price a 500 / 90 day goal
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = load_config_with_fallback(cli.config.as_ref())?;

    match cli.command {
        Commands::Score { source, json } => run_score(&config, &source, json),
        Commands::Goal { target, days, locked, source, json } => {
            run_goal(&config, &source, draft_from_args(target, days, locked)?, json)
        }
        Commands::Timeline { target, days, source } => {
            run_timeline(&config, &source, draft_from_args(target, days, false)?)
        }
        Commands::Benefits { days } => run_benefits(days),
        Commands::Activity { window, source, json } => run_activity(&config, &source, window, json),
        Commands::Emergency { goal, amount, source } => run_emergency(&config, &source, &goal, amount),
        Commands::Demo => run_demo(),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn resolve_snapshot(config: &AppConfig, source: &SnapshotSource) -> Result<WalletSnapshot> {
    let mut snapshot = if let Some(dump) = &source.store_dump {
        let user = source.user.as_deref().unwrap_or(&config.user_id);
        load_store_dump(dump, user)?
    } else if let Some(path) = source.snapshot.as_ref().or(config.snapshot_path.as_ref()) {
        load_snapshot(path)?
    } else {
        info!("no snapshot given, using the demo wallet");
        demo_snapshot(Utc::now())
    };

    if let Some(csv) = &source.transactions_csv {
        snapshot.transactions = load_transactions_csv(csv)
            .with_context(|| format!("Loading transactions from {}", csv.display()))?;
    }

    Ok(snapshot)
}

fn draft_from_args(target: f64, days: u32, locked: bool) -> Result<GoalDraft> {
    if !(target.is_finite() && target > 0.0) {
        bail!("target must be a positive amount, got {}", target);
    }

    let draft = GoalDraft { target, duration_days: days, locked };
    let clamped = draft.clamped();
    if clamped.duration_days != days {
        warn!(requested = days, used = clamped.duration_days, "duration clamped to 7-1095 days");
    }
    Ok(clamped)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_score(config: &AppConfig, source: &SnapshotSource, json: bool) -> Result<()> {
    let snapshot = resolve_snapshot(config, source)?;
    let result = CreditScoreCalculator::new().score(snapshot.balance, &snapshot.transactions, &snapshot.goals);
    let progress = CreditProgress::for_score(result.score, snapshot.balance);

    if json {
        return print_json(&serde_json::json!({ "score": result, "progress": progress }));
    }

    println!("📈 Credit Score");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Score:        {} / {}", result.score, result.max_score);
    println!("Rating:       {}", result.rating.as_str());
    println!("Risk:         {}", result.risk_level.as_str());
    println!("\nBreakdown:");
    println!("  Payment history      {:>2}/35", result.breakdown.payment_history);
    println!("  Credit utilization   {:>2}/30", result.breakdown.credit_utilization);
    println!("  Savings behavior     {:>2}/20", result.breakdown.savings_behavior);
    println!("  Spending consistency {:>2}/15", result.breakdown.spending_consistency);

    if progress.level.is_top() {
        println!("\n✓ Top level reached");
    } else {
        println!(
            "\n{} points to reach {} ({:.0}% of the way)",
            progress.points_to_next, progress.level.next_threshold, progress.progress_percent
        );
    }
    println!("Purchasing power: ${:.2}", progress.purchasing_power);

    Ok(())
}

fn run_goal(config: &AppConfig, source: &SnapshotSource, draft: GoalDraft, json: bool) -> Result<()> {
    let snapshot = resolve_snapshot(config, source)?;
    let profile = snapshot.profile.unwrap_or_else(|| config.profile.clone());

    let calc = GoalEconomicsCalculator::new();
    let result = calc.compute_rates(&draft, &profile);
    let timeline = calc.recommend_timeline(&draft, &profile);
    let benefits = calc.benefits_tier(draft.duration_days);

    if json {
        return print_json(&serde_json::json!({
            "economics": result.for_display(),
            "timeline": timeline,
            "benefits": benefits,
        }));
    }

    let shown = result.for_display();
    println!("🎯 Goal: ${:.2} over {} days", draft.target, draft.duration_days);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if shown.eligible {
        println!("Penalty rate:      {:.2}%", shown.penalty_rate * 100.0);
        println!("Boost rate:        {:.2}%", shown.boost_rate * 100.0);
    } else {
        println!("Penalties & boosts: not available for goals of 40 days or less");
    }
    println!("Interest (APY):    {:.2}%", shown.interest_rate_apy * 100.0);
    println!("Locked:            {}", if shown.locked { "yes" } else { "no" });
    println!("Risk:              {}", shown.risk_level.as_str());
    println!("\nProjected interest:   ${:.2}", shown.projected_interest);
    println!("Engagement bonus:     ${:.2}", shown.projected_boost_amount);
    println!("Total at maturity:    ${:.2}", shown.total_at_maturity);
    println!("Early withdrawal:     ${:.2} (penalty ${:.2})", shown.payout_if_withdrawn_early, shown.penalty_amount_if_withdrawn_early);
    println!("\nSave ${:.2}/month ({:.0}% of disposable income)", shown.factors.monthly_savings_needed, result.factors.savings_strain * 100.0);
    println!("Recommended duration: {} days", timeline.days);
    println!("Tier: {} ({})", benefits.tier.as_str(), benefits.description);

    Ok(())
}

fn run_timeline(config: &AppConfig, source: &SnapshotSource, draft: GoalDraft) -> Result<()> {
    let snapshot = resolve_snapshot(config, source)?;
    let profile = snapshot.profile.unwrap_or_else(|| config.profile.clone());
    let timeline = GoalEconomicsCalculator::new().recommend_timeline(&draft, &profile);

    println!("⏳ Recommended timeline for ${:.2}", draft.target);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Recommended:    {} days ({:.1} months)", timeline.days, timeline.months);
    println!("Safe savings:   ${:.2}/month", round_currency(timeline.monthly_savings));
    println!("Confidence:     {:?}", timeline.confidence);

    if timeline.is_aggressive {
        println!("⚠️  {} days is aggressive for this target", draft.duration_days);
    } else if timeline.is_conservative {
        println!("ℹ️  {} days is conservative; a shorter goal is affordable", draft.duration_days);
    } else {
        println!("✓ {} days is on track", draft.duration_days);
    }

    Ok(())
}

fn run_benefits(days: u32) -> Result<()> {
    let benefits = GoalEconomicsCalculator::new().benefits_tier(days);

    println!("🏅 {} ({:?})", benefits.description, benefits.lock_status);
    if benefits.multiplier > 1.0 {
        println!("   +{:.0}% reward multiplier", (benefits.multiplier - 1.0) * 100.0);
    }
    for feature in benefits.features {
        println!("   • {}", feature);
    }

    Ok(())
}

fn run_activity(config: &AppConfig, source: &SnapshotSource, window: ActivityWindow, json: bool) -> Result<()> {
    let snapshot = resolve_snapshot(config, source)?;
    let summary = summarize_activity(&snapshot.transactions, window, Utc::now());

    if json {
        return print_json(&summary);
    }

    println!("📊 {}", summary.summary());
    for bucket in &summary.buckets {
        if bucket.sent > 0.0 || bucket.received > 0.0 {
            println!(
                "  {:>5}  sent ${:>9.2}  received ${:>9.2}  net ${:>9.2}",
                bucket.label, bucket.sent, bucket.received, bucket.net
            );
        }
    }

    Ok(())
}

fn run_emergency(config: &AppConfig, source: &SnapshotSource, goal_id: &str, amount: f64) -> Result<()> {
    if !(amount.is_finite() && amount > 0.0) {
        bail!("amount must be positive, got {}", amount);
    }

    let snapshot = resolve_snapshot(config, source)?;
    let goal = snapshot
        .goals
        .iter()
        .find(|g| g.id == goal_id)
        .with_context(|| format!("Goal not found: {}", goal_id))?;

    let quote = quote_emergency_withdrawal(goal, amount);

    println!("🚨 Emergency withdrawal from {}", goal.name.as_deref().unwrap_or(goal_id));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Amount:   ${:.2}", quote.amount);
    println!("Penalty:  ${:.2} ({:.1}%)", quote.penalty, quote.penalty_rate * 100.0);
    println!("Payout:   ${:.2}", quote.payout);

    if !quote.sufficient_funds {
        println!("❌ Goal only holds ${:.2}", goal.current);
    }
    if quote.standard_withdrawal_allowed {
        println!("ℹ️  Goal is not locked; a standard withdrawal has no penalty");
    }

    Ok(())
}

fn run_demo() -> Result<()> {
    println!("🌱 Kola Engine v{} - demo wallet\n", kola_engine::VERSION);

    let config = AppConfig::default();
    let source = SnapshotSource {
        snapshot: None,
        store_dump: None,
        user: None,
        transactions_csv: None,
    };

    run_score(&config, &source, false)?;
    println!();
    run_goal(&config, &source, GoalDraft::new(500.0, 90), false)
}
