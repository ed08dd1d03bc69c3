//! Pipeline orchestration
//!
//! Wires the aggregator, classifier, allocation engine, and builder
//! into one synchronous pass: snapshot in, advice out. Given the same
//! inputs the same advice comes back; there is no hidden state, so
//! concurrent callers need no coordination.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::allocation::{Allocation, AllocationEngine};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::metrics::{self, MetricSet};
use crate::models::Snapshot;
use crate::recommend::{build_recommendations, Recommendation};
use crate::tier::SavingsTier;

/// Full pipeline output, with intermediates exposed for display-only
/// rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advice {
    pub metrics: MetricSet,
    pub tier: SavingsTier,
    pub allocation: Allocation,
    pub recommendations: Vec<Recommendation>,
}

/// The budget-allocation advisor
pub struct Advisor {
    config: EngineConfig,
    engine: AllocationEngine,
}

impl Advisor {
    /// Create an advisor from injected configuration
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let engine = AllocationEngine::new(config.tiers.clone());
        Ok(Self { config, engine })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline for one snapshot
    pub fn advise(&self, snapshot: &Snapshot, reference_date: NaiveDate) -> Result<Advice> {
        let metrics = metrics::aggregate(snapshot, reference_date, &self.config)?;
        let tier = SavingsTier::classify(metrics.current_savings, &metrics.thresholds);
        let allocation = self.engine.allocate(tier, &metrics);
        let recommendations = build_recommendations(
            &allocation,
            metrics.safe_to_spend,
            tier,
            &metrics,
            &self.config.presentation,
        );

        tracing::info!(
            tier = tier.as_str(),
            safe_to_spend = metrics.safe_to_spend,
            recommendations = recommendations.len(),
            "Advice computed"
        );

        Ok(Advice {
            metrics,
            tier,
            allocation,
            recommendations,
        })
    }
}

impl Default for Advisor {
    fn default() -> Self {
        // The shipped defaults always validate.
        Self::new(EngineConfig::default()).expect("default config is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountKind};

    fn snapshot() -> Snapshot {
        Snapshot {
            accounts: vec![
                Account {
                    id: 1,
                    name: "Main".to_string(),
                    kind: AccountKind::Checking,
                    balance: 4000.0,
                    currency: "EUR".to_string(),
                },
                Account {
                    id: 2,
                    name: "Cushion".to_string(),
                    kind: AccountKind::Savings,
                    balance: 8000.0,
                    currency: "EUR".to_string(),
                },
                Account {
                    id: 3,
                    name: "Broker".to_string(),
                    kind: AccountKind::Investment,
                    balance: 3000.0,
                    currency: "EUR".to_string(),
                },
            ],
            ..Default::default()
        }
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()
    }

    #[test]
    fn test_advise_produces_consistent_output() {
        let advisor = Advisor::default();
        let advice = advisor.advise(&snapshot(), reference()).unwrap();

        assert_eq!(advice.tier, SavingsTier::BelowOptimal);
        assert_eq!(advice.allocation.total(), 100);
        assert!(!advice.recommendations.is_empty());

        // Recommendations mirror the allocation shares
        for (share, rec) in advice
            .allocation
            .shares
            .iter()
            .zip(advice.recommendations.iter())
        {
            assert_eq!(share.kind, rec.kind);
            assert_eq!(share.percent, rec.percentage as i64);
        }
    }

    #[test]
    fn test_advise_is_idempotent() {
        let advisor = Advisor::default();
        let first = advisor.advise(&snapshot(), reference()).unwrap();
        let second = advisor.advise(&snapshot(), reference()).unwrap();
        assert_eq!(first.metrics, second.metrics);
        assert_eq!(first.allocation, second.allocation);
        assert_eq!(first.recommendations, second.recommendations);
    }

    #[test]
    fn test_empty_snapshot_gives_no_recommendations() {
        let advisor = Advisor::default();
        let advice = advisor.advise(&Snapshot::default(), reference()).unwrap();
        assert_eq!(advice.metrics.safe_to_spend, 0.0);
        assert!(advice.recommendations.is_empty());
        // Intermediates are still exposed for rendering
        assert_eq!(advice.tier, SavingsTier::Critical);
        assert_eq!(advice.allocation.total(), 100);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.tiers.healthy.save += 1.0;
        assert!(Advisor::new(config).is_err());
    }
}
