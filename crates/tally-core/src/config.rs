//! Engine configuration
//!
//! The tier-allocation table, default thresholds, variable-spending
//! markers, and presentation map are data, not code: an operator can
//! retune them through a TOML file without touching the engine. The
//! built-in defaults match the shipped tier table.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::allocation::{RecoType, Split};
use crate::error::{Error, Result};
use crate::models::Thresholds;
use crate::tier::SavingsTier;

/// Base percentage split per savings tier; every row must sum to 100
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierTable {
    pub critical: Split,
    pub below_optimal: Split,
    pub healthy: Split,
    pub comfortable: Split,
}

impl TierTable {
    pub fn row(&self, tier: SavingsTier) -> Split {
        match tier {
            SavingsTier::Critical => self.critical,
            SavingsTier::BelowOptimal => self.below_optimal,
            SavingsTier::Healthy => self.healthy,
            SavingsTier::Comfortable => self.comfortable,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for tier in SavingsTier::ALL {
            let row = self.row(tier);
            if (row.sum() - 100.0).abs() > 1e-6 {
                return Err(Error::Config(format!(
                    "tier table row '{}' sums to {}, expected 100",
                    tier,
                    row.sum()
                )));
            }
            for kind in RecoType::ALL {
                if row.get(kind) < 0.0 {
                    return Err(Error::Config(format!(
                        "tier table row '{}' has negative share for '{}'",
                        tier, kind
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            critical: Split::new(60.0, 0.0, 10.0, 30.0),
            below_optimal: Split::new(40.0, 15.0, 20.0, 25.0),
            healthy: Split::new(15.0, 35.0, 30.0, 20.0),
            comfortable: Split::new(10.0, 45.0, 30.0, 15.0),
        }
    }
}

/// Display attributes for one recommendation type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: String,
    pub icon: String,
    /// Route the presentation layer should open for the action button
    pub action: String,
    pub action_label: String,
}

/// Presentation map: colors, icons, and action routes per type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Presentation {
    pub save: Style,
    pub invest: Style,
    pub enjoy: Style,
    pub keep: Style,
}

impl Presentation {
    pub fn style(&self, kind: RecoType) -> &Style {
        match kind {
            RecoType::Save => &self.save,
            RecoType::Invest => &self.invest,
            RecoType::Enjoy => &self.enjoy,
            RecoType::Keep => &self.keep,
        }
    }
}

impl Default for Presentation {
    fn default() -> Self {
        let style = |color: &str, icon: &str, action: &str, label: &str| Style {
            color: color.to_string(),
            icon: icon.to_string(),
            action: action.to_string(),
            action_label: label.to_string(),
        };
        Self {
            save: style("#2E7D32", "piggy-bank", "savings/transfer", "Move to savings"),
            invest: style("#1565C0", "trending-up", "invest/contribute", "Invest now"),
            enjoy: style("#EF6C00", "sparkles", "budget/enjoy", "Plan something fun"),
            keep: style("#546E7A", "shield", "accounts/checking", "Leave in checking"),
        }
    }
}

/// Full engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tiers: TierTable,
    pub presentation: Presentation,
    /// Category substrings that mark a transaction as variable spending
    pub variable_markers: Vec<String>,
    pub default_thresholds: Thresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tiers: TierTable::default(),
            presentation: Presentation::default(),
            variable_markers: [
                "groceries",
                "dining",
                "restaurant",
                "shopping",
                "leisure",
                "entertainment",
                "variable",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
            default_thresholds: Thresholds {
                min: 5000.0,
                optimal: 10000.0,
                comfort: 20000.0,
            },
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML; absent sections keep their defaults
    pub fn from_toml_str(data: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an operator override file
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_toml_str(&data)
    }

    pub fn validate(&self) -> Result<()> {
        self.tiers.validate()?;
        Thresholds::new(
            self.default_thresholds.min,
            self.default_thresholds.optimal,
            self.default_thresholds.comfort,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rows_sum_to_100() {
        let table = TierTable::default();
        for tier in SavingsTier::ALL {
            assert_eq!(table.row(tier).sum(), 100.0, "tier {}", tier);
        }
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_row() {
        let table = TierTable {
            critical: Split::new(60.0, 0.0, 10.0, 20.0),
            ..TierTable::default()
        };
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_toml_overrides_single_row() {
        let config = EngineConfig::from_toml_str(
            r#"
            [tiers.critical]
            save = 70
            invest = 0
            enjoy = 5
            keep = 25
            "#,
        )
        .unwrap();
        assert_eq!(config.tiers.critical, Split::new(70.0, 0.0, 5.0, 25.0));
        // Untouched rows keep defaults
        assert_eq!(config.tiers.healthy, TierTable::default().healthy);
    }

    #[test]
    fn test_toml_rejects_invalid_table() {
        let err = EngineConfig::from_toml_str(
            r#"
            [tiers.healthy]
            save = 50
            invest = 50
            enjoy = 50
            keep = 50
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_toml_overrides_thresholds_and_markers() {
        let config = EngineConfig::from_toml_str(
            r#"
            variable_markers = ["fun"]

            [default_thresholds]
            min = 1000
            optimal = 2000
            comfort = 3000
            "#,
        )
        .unwrap();
        assert_eq!(config.variable_markers, vec!["fun".to_string()]);
        assert_eq!(config.default_thresholds.min, 1000.0);
    }
}
