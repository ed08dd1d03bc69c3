//! Command implementations
//!
//! Thin presentation glue: load the snapshot, run the advisor, render.
//! The dismissal filtering happens here, never inside the engine.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use tally_core::{
    dismissal_key, filter_dismissed, Advisor, DismissalStore, EngineConfig, RecoType, SavingsTier,
    Snapshot,
};

use crate::store::FileDismissalStore;

/// Resolve the engine config: operator file when given, defaults
/// otherwise
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => {
            let config = EngineConfig::load(p)
                .with_context(|| format!("Failed to load config from {}", p.display()))?;
            tracing::debug!(path = %p.display(), "Loaded engine config");
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Parse an optional YYYY-MM-DD argument, defaulting to today
pub fn parse_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", d)),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn load_snapshot(file: &Path) -> Result<Snapshot> {
    let data = fs::read_to_string(file)
        .with_context(|| format!("Failed to read snapshot {}", file.display()))?;
    let snapshot = Snapshot::from_json(&data)
        .with_context(|| format!("Failed to parse snapshot {}", file.display()))?;
    tracing::debug!(
        file = %file.display(),
        accounts = snapshot.accounts.len(),
        transactions = snapshot.transactions.len(),
        "Loaded snapshot"
    );
    Ok(snapshot)
}

pub fn cmd_recommend(
    file: &Path,
    date: Option<&str>,
    config_path: Option<&Path>,
    state: PathBuf,
    json: bool,
    all: bool,
) -> Result<()> {
    let reference = parse_date(date)?;
    let advisor = Advisor::new(load_config(config_path)?)?;
    let snapshot = load_snapshot(file)?;

    let advice = advisor.advise(&snapshot, reference)?;

    let recommendations = if all {
        advice.recommendations.clone()
    } else {
        let store = FileDismissalStore::new(state);
        let dismissed = store.get(&dismissal_key(reference))?;
        filter_dismissed(advice.recommendations.clone(), &dismissed)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&advice)?);
        return Ok(());
    }

    println!();
    println!(
        "💡 Budget advice for {} — tier: {}",
        reference.format("%B %Y"),
        advice.tier
    );
    println!(
        "   Safe to spend: {:.0} (checking {:.0} − fixed {:.0} − committed {:.0})",
        advice.metrics.safe_to_spend,
        advice.metrics.current_checking_balance,
        advice.metrics.remaining_fixed_expenses,
        advice.metrics.committed_allocations,
    );
    println!();

    if recommendations.is_empty() {
        if advice.recommendations.is_empty() {
            println!("   Nothing to allocate this month.");
        } else {
            println!("   All recommendations dismissed this month (use --all to show).");
        }
        return Ok(());
    }

    for rec in &recommendations {
        println!("   {:>3}%  {:<8} {:>8}  {}", rec.percentage, rec.kind, rec.amount, rec.title);
        println!("         {}", rec.description);
    }

    let hidden = advice.recommendations.len() - recommendations.len();
    if hidden > 0 {
        println!();
        println!("   ({} dismissed this month, use --all to show)", hidden);
    }

    Ok(())
}

pub fn cmd_metrics(file: &Path, date: Option<&str>, config_path: Option<&Path>) -> Result<()> {
    let reference = parse_date(date)?;
    let config = load_config(config_path)?;
    let snapshot = load_snapshot(file)?;

    let metrics = tally_core::aggregate(&snapshot, reference, &config)?;
    let tier = SavingsTier::classify(metrics.current_savings, &metrics.thresholds);

    println!();
    println!("📊 Derived metrics for {}", reference.format("%B %Y"));
    println!("   Checking:            {:>12.2}", metrics.total_checking);
    println!("   Savings:             {:>12.2}", metrics.total_savings);
    println!("   Invested:            {:>12.2}", metrics.total_invested);
    println!("   Fixed expenses:      {:>12.2}", metrics.remaining_fixed_expenses);
    println!("   Committed:           {:>12.2}", metrics.committed_allocations);
    println!("   Safe to spend:       {:>12.2}", metrics.safe_to_spend);
    println!("   Variable (month):    {:>12.2}", metrics.current_month_variable);
    println!("   Variable (3m avg):   {:>12.2}", metrics.avg_variable_expenses_3m);
    println!("   Variable trend:      {:>11.1}%", metrics.variable_trend_percentage);
    println!(
        "   Savings tier:        {:>12}  (thresholds {:.0}/{:.0}/{:.0})",
        tier.as_str(),
        metrics.thresholds.min,
        metrics.thresholds.optimal,
        metrics.thresholds.comfort,
    );

    Ok(())
}

pub fn cmd_tiers(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;

    println!();
    println!("📋 Tier-allocation table");
    println!("   {:<15} {:>6} {:>8} {:>7} {:>6}", "tier", "save", "invest", "enjoy", "keep");
    for tier in SavingsTier::ALL {
        let row = config.tiers.row(tier);
        println!(
            "   {:<15} {:>6.0} {:>8.0} {:>7.0} {:>6.0}",
            tier.as_str(),
            row.save,
            row.invest,
            row.enjoy,
            row.keep
        );
    }

    Ok(())
}

pub fn cmd_dismiss(kind: &str, date: Option<&str>, state: PathBuf) -> Result<()> {
    let kind = RecoType::from_str(kind).map_err(anyhow::Error::msg)?;
    let reference = parse_date(date)?;
    let key = dismissal_key(reference);

    let store = FileDismissalStore::new(state);
    let mut dismissed = store.get(&key)?;
    if !dismissed.contains(&kind) {
        dismissed.push(kind);
        store.set(&key, &dismissed)?;
    }

    println!("🙈 Dismissed '{}' for {}", kind, reference.format("%B %Y"));
    Ok(())
}

pub fn cmd_restore(kind: Option<&str>, date: Option<&str>, state: PathBuf) -> Result<()> {
    let reference = parse_date(date)?;
    let key = dismissal_key(reference);
    let store = FileDismissalStore::new(state);

    match kind {
        Some(k) => {
            let kind = RecoType::from_str(k).map_err(anyhow::Error::msg)?;
            let dismissed: Vec<RecoType> = store
                .get(&key)?
                .into_iter()
                .filter(|d| *d != kind)
                .collect();
            store.set(&key, &dismissed)?;
            println!("👀 Restored '{}' for {}", kind, reference.format("%B %Y"));
        }
        None => {
            store.set(&key, &[])?;
            println!("👀 Restored all types for {}", reference.format("%B %Y"));
        }
    }

    Ok(())
}
