//! Recommendation builder
//!
//! Converts a final allocation and the safe-to-spend budget into
//! display-ready recommendation records. Pure string formatting on top
//! of the metrics; nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::allocation::{Allocation, RecoType};
use crate::config::Presentation;
use crate::metrics::MetricSet;
use crate::tier::SavingsTier;

/// A display-ready budget recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecoType,
    pub title: String,
    pub description: String,
    /// Rounded share of the budget in whole currency units
    pub amount: i64,
    /// Share of the budget, 0-100
    pub percentage: u8,
    pub color: String,
    pub icon: String,
    /// Route the presentation layer opens for the action button
    pub action: String,
    pub action_label: String,
}

/// Build the ordered recommendation list for one allocation
///
/// Returns an empty list when there is nothing to allocate. Amounts are
/// rounded independently, so their sum may drift from the budget by at
/// most one unit per entry beyond the first.
pub fn build_recommendations(
    allocation: &Allocation,
    budget: f64,
    tier: SavingsTier,
    metrics: &MetricSet,
    presentation: &Presentation,
) -> Vec<Recommendation> {
    if budget <= 0.0 {
        tracing::debug!("Budget is not positive, no recommendations");
        return vec![];
    }

    allocation
        .shares
        .iter()
        .map(|share| {
            let style = presentation.style(share.kind);
            let amount = (share.percent as f64 / 100.0 * budget).round() as i64;
            Recommendation {
                kind: share.kind,
                title: title(share.kind).to_string(),
                description: describe(share.kind, amount, tier, metrics),
                amount,
                percentage: share.percent as u8,
                color: style.color.clone(),
                icon: style.icon.clone(),
                action: style.action.clone(),
                action_label: style.action_label.clone(),
            }
        })
        .collect()
}

fn title(kind: RecoType) -> &'static str {
    match kind {
        RecoType::Save => "Grow your cushion",
        RecoType::Invest => "Put money to work",
        RecoType::Enjoy => "Enjoy yourself",
        RecoType::Keep => "Keep a buffer",
    }
}

fn describe(kind: RecoType, amount: i64, tier: SavingsTier, metrics: &MetricSet) -> String {
    match kind {
        RecoType::Save => {
            let gap = metrics.thresholds.optimal - metrics.current_savings;
            if tier <= SavingsTier::BelowOptimal && gap > 0.0 {
                format!(
                    "You're {:.0} away from your optimal cushion. Setting aside {} closes part of the gap.",
                    gap, amount
                )
            } else {
                format!("Your cushion is solid. Topping it up with {} keeps it that way.", amount)
            }
        }
        RecoType::Invest => {
            if metrics.total_savings > 0.0
                && metrics.total_invested < 0.15 * metrics.total_savings
            {
                format!(
                    "Your investments sit below 15% of your savings. {} would start rebalancing that.",
                    amount
                )
            } else {
                format!("Keep your portfolio compounding with {} this month.", amount)
            }
        }
        RecoType::Enjoy => {
            if metrics.variable_trend_percentage > 0.0 {
                format!(
                    "Discretionary spending is at {:.0}% of your 3-month average. {} is safe to enjoy.",
                    metrics.variable_trend_percentage, amount
                )
            } else {
                format!("No spending pressure this month. {} is yours to enjoy.", amount)
            }
        }
        RecoType::Keep => {
            let monthly_commit =
                metrics.committed_allocations + metrics.remaining_fixed_expenses;
            if monthly_commit > 0.0 && metrics.current_checking_balance < 2.0 * monthly_commit {
                format!(
                    "Checking is running close to your monthly commitments. Keep {} as a buffer.",
                    amount
                )
            } else {
                format!("Leave {} in checking for the unexpected.", amount)
            }
        }
    }
}
