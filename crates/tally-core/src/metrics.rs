//! Metric aggregation
//!
//! Reduces one user's raw records into the flat set of derived metrics
//! the rest of the pipeline reads. Recomputed fresh on every call;
//! nothing here caches or mutates.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{AccountKind, ProjectStatus, Snapshot, Thresholds, Transaction};

/// Derived metrics for one user at one reference date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    /// Disposable amount after fixed obligations and project earmarks,
    /// never negative
    pub safe_to_spend: f64,
    pub current_checking_balance: f64,
    /// Absolute sum of this month's recurring/forecast expenses
    pub remaining_fixed_expenses: f64,
    /// Monthly earmarks across active projects
    pub committed_allocations: f64,
    /// Variable spending averaged over the trailing three months
    pub avg_variable_expenses_3m: f64,
    pub current_month_variable: f64,
    /// Current month as a percentage of the trailing average, 0 when
    /// there is no history
    pub variable_trend_percentage: f64,
    pub current_savings: f64,
    pub total_checking: f64,
    pub total_savings: f64,
    pub total_invested: f64,
    pub thresholds: Thresholds,
}

/// Reduce a snapshot to its derived metrics
pub fn aggregate(
    snapshot: &Snapshot,
    reference_date: NaiveDate,
    config: &EngineConfig,
) -> Result<MetricSet> {
    let mut total_checking = 0.0;
    let mut total_savings = 0.0;
    let mut total_invested = 0.0;
    for account in &snapshot.accounts {
        match account.kind {
            AccountKind::Checking => total_checking += account.balance,
            AccountKind::Savings => total_savings += account.balance,
            AccountKind::Investment => total_invested += account.balance,
            AccountKind::Other => {}
        }
    }

    let remaining_fixed_expenses: f64 = snapshot
        .transactions
        .iter()
        .filter(|tx| in_month(tx.date, reference_date))
        .filter(|tx| (tx.is_recurring || tx.is_forecast) && tx.amount < 0.0)
        .map(|tx| tx.amount.abs())
        .sum();

    let committed_allocations: f64 = snapshot
        .projects
        .iter()
        .filter(|p| p.status == ProjectStatus::Active)
        .map(|p| p.monthly_allocation)
        .sum();

    let safe_to_spend =
        (total_checking - remaining_fixed_expenses - committed_allocations).max(0.0);

    // Trailing window: the three full calendar months before the
    // reference month, so the current month is compared against history
    // it is not part of.
    let trailing = trailing_months(reference_date);
    let trailing_total: f64 = snapshot
        .transactions
        .iter()
        .filter(|tx| is_variable_expense(tx, &config.variable_markers))
        .filter(|tx| trailing.contains(&(tx.date.year(), tx.date.month())))
        .map(|tx| tx.amount.abs())
        .sum();
    // Fixed divisor: months without data still count as zero.
    let avg_variable_expenses_3m = trailing_total / 3.0;

    let current_month_variable: f64 = snapshot
        .transactions
        .iter()
        .filter(|tx| is_variable_expense(tx, &config.variable_markers))
        .filter(|tx| in_month(tx.date, reference_date))
        .map(|tx| tx.amount.abs())
        .sum();

    let variable_trend_percentage = if avg_variable_expenses_3m > 0.0 {
        current_month_variable / avg_variable_expenses_3m * 100.0
    } else {
        0.0
    };

    let thresholds = Thresholds::resolve(&snapshot.profile, config.default_thresholds)?;

    let metrics = MetricSet {
        safe_to_spend,
        current_checking_balance: total_checking,
        remaining_fixed_expenses,
        committed_allocations,
        avg_variable_expenses_3m,
        current_month_variable,
        variable_trend_percentage,
        current_savings: total_savings,
        total_checking,
        total_savings,
        total_invested,
        thresholds,
    };

    tracing::debug!(
        safe_to_spend = metrics.safe_to_spend,
        trend = metrics.variable_trend_percentage,
        savings = metrics.current_savings,
        "Aggregated metrics"
    );

    Ok(metrics)
}

fn in_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

/// The three (year, month) pairs immediately before the reference month
fn trailing_months(reference: NaiveDate) -> [(i32, u32); 3] {
    let mut year = reference.year();
    let mut month = reference.month();
    let mut window = [(0, 0); 3];
    for slot in &mut window {
        if month == 1 {
            year -= 1;
            month = 12;
        } else {
            month -= 1;
        }
        *slot = (year, month);
    }
    window
}

/// Expense whose category carries one of the configured variable
/// spending markers (case-insensitive substring match)
fn is_variable_expense(tx: &Transaction, markers: &[String]) -> bool {
    if tx.amount >= 0.0 {
        return false;
    }
    let category = match &tx.category {
        Some(c) => c.to_lowercase(),
        None => return false,
    };
    markers.iter().any(|m| category.contains(&m.to_lowercase()))
}
