//! Tally Core Library
//!
//! Shared functionality for the Tally budget-allocation advisor:
//! - Metric aggregation over accounts, transactions, and projects
//! - Savings-health tier classification against profile thresholds
//! - Allocation engine with contextual modifiers and exact-100 rounding
//! - Display-ready recommendation building
//! - Injected configuration (tier table, thresholds, presentation)
//! - Dismissal key-value port for the presentation layer

pub mod advisor;
pub mod allocation;
pub mod config;
pub mod dismissal;
pub mod error;
pub mod metrics;
pub mod models;
pub mod recommend;
pub mod tier;

pub use advisor::{Advice, Advisor};
pub use allocation::{Allocation, AllocationEngine, RecoType, Share, Split};
pub use config::{EngineConfig, Presentation, Style, TierTable};
pub use dismissal::{dismissal_key, filter_dismissed, DismissalStore, MemoryDismissalStore};
pub use error::{Error, Result};
pub use metrics::{aggregate, MetricSet};
pub use models::{
    Account, AccountKind, Objective, ObjectiveStatus, Profile, Project, ProjectStatus, Snapshot,
    Thresholds, Transaction,
};
pub use recommend::{build_recommendations, Recommendation};
pub use tier::SavingsTier;
