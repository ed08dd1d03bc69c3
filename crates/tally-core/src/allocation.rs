//! Allocation engine
//!
//! Turns a savings tier plus the derived metrics into a normalized
//! percentage split over the four action types. The base split comes
//! from the injected tier table; three contextual modifiers then nudge
//! it in a fixed order, each reading the split the previous one
//! produced. The result is rounded to integer percentages that sum to
//! exactly 100, with undersized shares filtered out and redistributed.

use serde::{Deserialize, Serialize};

use crate::config::TierTable;
use crate::metrics::MetricSet;
use crate::tier::SavingsTier;

/// Shares below this percentage are dropped and redistributed
const MIN_SHARE_PCT: i64 = 5;

/// The four recommended action types, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoType {
    Save,
    Invest,
    Enjoy,
    Keep,
}

impl RecoType {
    pub const ALL: [RecoType; 4] = [
        RecoType::Save,
        RecoType::Invest,
        RecoType::Enjoy,
        RecoType::Keep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Invest => "invest",
            Self::Enjoy => "enjoy",
            Self::Keep => "keep",
        }
    }
}

impl std::str::FromStr for RecoType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "save" => Ok(Self::Save),
            "invest" => Ok(Self::Invest),
            "enjoy" => Ok(Self::Enjoy),
            "keep" => Ok(Self::Keep),
            _ => Err(format!("Unknown recommendation type: {}", s)),
        }
    }
}

impl std::fmt::Display for RecoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A four-way percentage split, the running value threaded through the
/// modifier chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub save: f64,
    pub invest: f64,
    pub enjoy: f64,
    pub keep: f64,
}

impl Split {
    pub const fn new(save: f64, invest: f64, enjoy: f64, keep: f64) -> Self {
        Self {
            save,
            invest,
            enjoy,
            keep,
        }
    }

    pub fn get(&self, kind: RecoType) -> f64 {
        match kind {
            RecoType::Save => self.save,
            RecoType::Invest => self.invest,
            RecoType::Enjoy => self.enjoy,
            RecoType::Keep => self.keep,
        }
    }

    pub fn sum(&self) -> f64 {
        self.save + self.invest + self.enjoy + self.keep
    }
}

/// One entry of a final allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub kind: RecoType,
    pub percent: i64,
}

/// Final allocation: 2-4 positive integer shares summing to exactly 100,
/// in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub shares: Vec<Share>,
}

impl Allocation {
    pub fn get(&self, kind: RecoType) -> Option<i64> {
        self.shares
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.percent)
    }

    pub fn total(&self) -> i64 {
        self.shares.iter().map(|s| s.percent).sum()
    }
}

/// Computes allocations from an injected tier table
pub struct AllocationEngine {
    tiers: TierTable,
}

impl AllocationEngine {
    pub fn new(tiers: TierTable) -> Self {
        Self { tiers }
    }

    pub fn tier_table(&self) -> &TierTable {
        &self.tiers
    }

    /// Run the full base split -> modifiers -> normalize -> filter chain
    pub fn allocate(&self, tier: SavingsTier, metrics: &MetricSet) -> Allocation {
        let base = self.tiers.row(tier);
        tracing::debug!(tier = tier.as_str(), ?base, "Base allocation");

        // Order matters: each modifier reads the split the previous one
        // produced.
        let modifiers: [fn(Split, &MetricSet) -> Split; 3] = [
            variable_trend_modifier,
            checking_health_modifier,
            investment_ratio_modifier,
        ];
        let adjusted = modifiers.iter().fold(base, |split, m| m(split, metrics));
        tracing::debug!(?adjusted, "Adjusted allocation");

        let rounded = normalize(&RecoType::ALL.map(|k| (k, adjusted.get(k))));
        let allocation = min_share_filter(rounded);
        tracing::debug!(?allocation, "Final allocation");

        allocation
    }
}

/// Shift points between enjoy and keep based on the variable-spending
/// trend: overspending pulls from enjoy, underspending releases from
/// keep
fn variable_trend_modifier(split: Split, metrics: &MetricSet) -> Split {
    let trend = metrics.variable_trend_percentage;

    if trend > 120.0 {
        let shift = ((trend - 120.0) / 10.0).clamp(0.0, 15.0);
        let shift = shift.min(split.enjoy); // floor enjoy at 0
        Split {
            enjoy: split.enjoy - shift,
            keep: split.keep + shift,
            ..split
        }
    } else if trend > 0.0 && trend < 80.0 {
        let shift = ((80.0 - trend) / 20.0).clamp(0.0, 5.0);
        let shift = shift.min(split.keep); // floor keep at 0
        Split {
            keep: split.keep - shift,
            enjoy: split.enjoy + shift,
            ..split
        }
    } else {
        split
    }
}

/// Favor keeping cash when the checking balance covers less than two
/// months of known commitments
fn checking_health_modifier(split: Split, metrics: &MetricSet) -> Split {
    let monthly_commit = metrics.committed_allocations + metrics.remaining_fixed_expenses;

    if monthly_commit > 0.0 && metrics.current_checking_balance < 2.0 * monthly_commit {
        Split {
            keep: split.keep + 10.0,
            save: (split.save - 5.0).max(0.0),
            invest: (split.invest - 5.0).max(0.0),
            ..split
        }
    } else {
        split
    }
}

/// Nudge toward investing when invested assets sit below 15% of savings;
/// the 8 points come out of whichever of save/enjoy is currently larger
fn investment_ratio_modifier(split: Split, metrics: &MetricSet) -> Split {
    if metrics.total_savings > 0.0 && metrics.total_invested < 0.15 * metrics.total_savings {
        let mut next = Split {
            invest: split.invest + 8.0,
            ..split
        };
        if split.save >= split.enjoy {
            next.save = (split.save - 8.0).max(0.0);
        } else {
            next.enjoy = (split.enjoy - 8.0).max(0.0);
        }
        next
    } else {
        split
    }
}

/// Scale parts to sum 100, round to nearest integer, and push the
/// rounding remainder into the single largest bucket (ties broken by
/// position)
fn normalize(parts: &[(RecoType, f64)]) -> Vec<(RecoType, i64)> {
    let total: f64 = parts.iter().map(|(_, v)| v.max(0.0)).sum();
    if total <= 0.0 {
        return parts.iter().map(|(k, _)| (*k, 0)).collect();
    }

    let mut rounded: Vec<(RecoType, i64)> = parts
        .iter()
        .map(|(k, v)| (*k, (v.max(0.0) / total * 100.0).round() as i64))
        .collect();

    let remainder: i64 = 100 - rounded.iter().map(|(_, v)| v).sum::<i64>();
    if remainder != 0 {
        let largest = rounded
            .iter()
            .enumerate()
            .max_by(|(ai, a), (bi, b)| a.1.cmp(&b.1).then(bi.cmp(ai)))
            .map(|(i, _)| i);
        if let Some(i) = largest {
            rounded[i].1 += remainder;
        }
    }

    rounded
}

/// Drop shares under the minimum, hand their points out equally to the
/// survivors, and renormalize; falls back to the two largest shares if
/// everything would be dropped
fn min_share_filter(rounded: Vec<(RecoType, i64)>) -> Allocation {
    let mut kept: Vec<(RecoType, i64)> = rounded
        .iter()
        .copied()
        .filter(|(_, v)| *v >= MIN_SHARE_PCT)
        .collect();

    if kept.len() < 2 {
        // Not reachable from the shipped tier tables, but fail closed by
        // keeping the two largest shares.
        let mut by_size = rounded.clone();
        by_size.sort_by(|a, b| b.1.cmp(&a.1));
        let survivors: Vec<RecoType> = by_size.iter().take(2).map(|(k, _)| *k).collect();
        kept = rounded
            .iter()
            .filter(|(k, _)| survivors.contains(k))
            .copied()
            .collect();
    }

    let removed_total: i64 = rounded
        .iter()
        .filter(|(k, _)| !kept.iter().any(|(kk, _)| kk == k))
        .map(|(_, v)| v)
        .sum();

    let per_survivor = removed_total as f64 / kept.len() as f64;
    let parts: Vec<(RecoType, f64)> = kept
        .iter()
        .map(|(k, v)| (*k, *v as f64 + per_survivor))
        .collect();

    let shares = normalize(&parts)
        .into_iter()
        .map(|(kind, percent)| Share { kind, percent })
        .collect();

    Allocation { shares }
}
