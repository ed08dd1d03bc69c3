//! Domain models for Tally

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A financial account belonging to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub kind: AccountKind,
    /// Signed balance in the account currency
    pub balance: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "EUR".to_string()
}

/// Account categories the aggregator groups balances by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Investment,
    Other,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Investment => "investment",
            Self::Other => "other",
        }
    }
}

impl std::str::FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "investment" => Ok(Self::Investment),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown account kind: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ledger entry; positive amounts are inflows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: Option<String>,
    /// Known repeating charge (rent, subscriptions)
    #[serde(default)]
    pub is_recurring: bool,
    /// Expected but not yet posted
    #[serde(default)]
    pub is_forecast: bool,
}

/// A savings project with a monthly earmark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub target_amount: f64,
    /// Amount set aside every month while the project is active
    pub monthly_allocation: f64,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Paused,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A yearly target linked to a specific account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub id: i64,
    pub name: String,
    pub target_yearly_amount: f64,
    pub linked_account_id: Option<i64>,
    pub status: ObjectiveStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveStatus {
    Active,
    Paused,
    Completed,
}

/// User profile with optional savings-health thresholds
///
/// Absent thresholds fall back to the configured defaults; missing
/// values are not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub safety_threshold_min: Option<f64>,
    pub safety_threshold_optimal: Option<f64>,
    pub safety_threshold_comfort: Option<f64>,
}

/// Resolved savings-health thresholds, ordered min < optimal < comfort
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub min: f64,
    pub optimal: f64,
    pub comfort: f64,
}

impl Thresholds {
    pub fn new(min: f64, optimal: f64, comfort: f64) -> Result<Self> {
        if min < 0.0 || !(min < optimal && optimal < comfort) {
            return Err(Error::Config(format!(
                "thresholds must satisfy 0 <= min < optimal < comfort, got {}/{}/{}",
                min, optimal, comfort
            )));
        }
        Ok(Self {
            min,
            optimal,
            comfort,
        })
    }

    /// Resolve a profile against defaults, filling absent values
    pub fn resolve(profile: &Profile, defaults: Thresholds) -> Result<Self> {
        Self::new(
            profile.safety_threshold_min.unwrap_or(defaults.min),
            profile.safety_threshold_optimal.unwrap_or(defaults.optimal),
            profile.safety_threshold_comfort.unwrap_or(defaults.comfort),
        )
    }
}

/// Full set of records for one user, as supplied by the storage
/// collaborator
///
/// The pipeline only reads this; validation of amounts and dates is the
/// supplier's responsibility.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub objectives: Vec<Objective>,
    #[serde(default)]
    pub profile: Profile,
}

impl Snapshot {
    /// Parse a snapshot from JSON
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|e| Error::InvalidData(format!("snapshot: {}", e)))
    }
}
