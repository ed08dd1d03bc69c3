//! Savings-health tier classification
//!
//! Maps current savings against the three profile thresholds into one
//! of four ordinal tiers. Total function: every input lands in exactly
//! one tier, and raising savings never lowers the tier.

use serde::{Deserialize, Serialize};

use crate::models::Thresholds;

/// Ordinal savings-health buckets, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsTier {
    Critical,
    BelowOptimal,
    Healthy,
    Comfortable,
}

impl SavingsTier {
    pub const ALL: [SavingsTier; 4] = [
        SavingsTier::Critical,
        SavingsTier::BelowOptimal,
        SavingsTier::Healthy,
        SavingsTier::Comfortable,
    ];

    /// Classify savings against thresholds, first strict match wins
    pub fn classify(savings: f64, thresholds: &Thresholds) -> Self {
        if savings < thresholds.min {
            SavingsTier::Critical
        } else if savings < thresholds.optimal {
            SavingsTier::BelowOptimal
        } else if savings < thresholds.comfort {
            SavingsTier::Healthy
        } else {
            SavingsTier::Comfortable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::BelowOptimal => "below_optimal",
            Self::Healthy => "healthy",
            Self::Comfortable => "comfortable",
        }
    }
}

impl std::str::FromStr for SavingsTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "below_optimal" => Ok(Self::BelowOptimal),
            "healthy" => Ok(Self::Healthy),
            "comfortable" => Ok(Self::Comfortable),
            _ => Err(format!("Unknown savings tier: {}", s)),
        }
    }
}

impl std::fmt::Display for SavingsTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
