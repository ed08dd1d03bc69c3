//! Integration tests for tally-core
//!
//! These tests exercise the full snapshot -> metrics -> tier ->
//! allocation -> recommendations workflow.

use chrono::NaiveDate;

use tally_core::{
    dismissal::{dismissal_key, filter_dismissed, DismissalStore, MemoryDismissalStore},
    models::{Account, AccountKind, Profile, Project, ProjectStatus, Snapshot, Transaction},
    Advisor, EngineConfig, RecoType, SavingsTier,
};

fn account(id: i64, kind: AccountKind, balance: f64) -> Account {
    Account {
        id,
        name: format!("account-{}", id),
        kind,
        balance,
        currency: "EUR".to_string(),
    }
}

fn transaction(id: i64, date: &str, amount: f64, category: Option<&str>) -> Transaction {
    Transaction {
        id,
        account_id: 1,
        amount,
        date: date.parse().expect("valid test date"),
        category: category.map(|c| c.to_string()),
        is_recurring: false,
        is_forecast: false,
    }
}

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

/// Below-optimal tier with a low investment ratio: the investment
/// modifier moves 8 points from save to invest and nothing else fires.
#[test]
fn test_scenario_investment_modifier_on_below_optimal() {
    let snapshot = Snapshot {
        accounts: vec![
            account(1, AccountKind::Checking, 1000.0),
            account(2, AccountKind::Savings, 8000.0),
            account(3, AccountKind::Investment, 500.0), // < 15% of savings
        ],
        ..Default::default()
    };

    let advice = Advisor::default()
        .advise(&snapshot, reference_date())
        .unwrap();

    assert_eq!(advice.tier, SavingsTier::BelowOptimal);
    assert_eq!(advice.allocation.get(RecoType::Save), Some(32));
    assert_eq!(advice.allocation.get(RecoType::Invest), Some(23));
    assert_eq!(advice.allocation.get(RecoType::Enjoy), Some(20));
    assert_eq!(advice.allocation.get(RecoType::Keep), Some(25));
    assert_eq!(advice.allocation.total(), 100);

    // Budget 1000 splits exactly along the percentages
    assert_eq!(advice.metrics.safe_to_spend, 1000.0);
    let amounts: Vec<i64> = advice.recommendations.iter().map(|r| r.amount).collect();
    assert_eq!(amounts, vec![320, 230, 200, 250]);
}

/// Critical tier with no modifiers: the zero invest share is filtered
/// out and three recommendations remain, still summing to 100.
#[test]
fn test_scenario_critical_filters_zero_invest() {
    let snapshot = Snapshot {
        accounts: vec![
            account(1, AccountKind::Checking, 2000.0),
            account(2, AccountKind::Savings, 1000.0),
            account(3, AccountKind::Investment, 200.0), // ratio healthy, modifier idle
        ],
        ..Default::default()
    };

    let advice = Advisor::default()
        .advise(&snapshot, reference_date())
        .unwrap();

    assert_eq!(advice.tier, SavingsTier::Critical);
    assert_eq!(advice.allocation.shares.len(), 3);
    assert_eq!(advice.allocation.get(RecoType::Invest), None);
    assert_eq!(advice.allocation.get(RecoType::Save), Some(60));
    assert_eq!(advice.allocation.get(RecoType::Enjoy), Some(10));
    assert_eq!(advice.allocation.get(RecoType::Keep), Some(30));
    assert_eq!(advice.recommendations.len(), 3);
    assert_eq!(advice.allocation.total(), 100);
}

/// No variable history: the trend is 0 (not a division by zero) and the
/// underspend branch stays off.
#[test]
fn test_scenario_no_variable_history() {
    let snapshot = Snapshot {
        accounts: vec![
            account(1, AccountKind::Checking, 5000.0),
            account(2, AccountKind::Savings, 12000.0),
            account(3, AccountKind::Investment, 4000.0),
        ],
        transactions: vec![transaction(1, "2026-04-02", -180.0, Some("Groceries"))],
        ..Default::default()
    };

    let advice = Advisor::default()
        .advise(&snapshot, reference_date())
        .unwrap();

    assert_eq!(advice.metrics.avg_variable_expenses_3m, 0.0);
    assert_eq!(advice.metrics.variable_trend_percentage, 0.0);
    // Healthy base row passes through untouched
    assert_eq!(advice.allocation.get(RecoType::Enjoy), Some(30));
    assert_eq!(advice.allocation.get(RecoType::Keep), Some(20));
}

/// Safe-to-spend arithmetic, including the clamp at zero.
#[test]
fn test_scenario_safe_to_spend_formula() {
    let mut rent = transaction(1, "2026-04-01", -1200.0, Some("Rent"));
    rent.is_recurring = true;

    let snapshot = Snapshot {
        accounts: vec![account(1, AccountKind::Checking, 4500.0)],
        transactions: vec![rent.clone()],
        projects: vec![Project {
            id: 1,
            name: "Vacation".to_string(),
            target_amount: 3600.0,
            monthly_allocation: 300.0,
            status: ProjectStatus::Active,
        }],
        ..Default::default()
    };

    let advice = Advisor::default()
        .advise(&snapshot, reference_date())
        .unwrap();
    assert_eq!(advice.metrics.safe_to_spend, 3000.0);

    // Broke checking account: clamped to zero, empty recommendations
    let broke = Snapshot {
        accounts: vec![account(1, AccountKind::Checking, 0.0)],
        transactions: vec![rent],
        ..snapshot
    };
    let advice = Advisor::default().advise(&broke, reference_date()).unwrap();
    assert_eq!(advice.metrics.safe_to_spend, 0.0);
    assert!(advice.recommendations.is_empty());
}

// =============================================================================
// Pipeline properties
// =============================================================================

#[test]
fn test_allocation_invariants_hold_across_inputs() {
    let advisor = Advisor::default();

    for savings in [0.0, 4000.0, 8000.0, 15000.0, 50000.0] {
        for invested in [0.0, 1000.0, 20000.0] {
            for checking in [100.0, 3000.0, 20000.0] {
                let snapshot = Snapshot {
                    accounts: vec![
                        account(1, AccountKind::Checking, checking),
                        account(2, AccountKind::Savings, savings),
                        account(3, AccountKind::Investment, invested),
                    ],
                    transactions: vec![
                        {
                            let mut t = transaction(1, "2026-04-03", -800.0, Some("Rent"));
                            t.is_recurring = true;
                            t
                        },
                        transaction(2, "2026-01-10", -240.0, Some("Dining")),
                        transaction(3, "2026-02-10", -310.0, Some("Dining")),
                        transaction(4, "2026-03-10", -280.0, Some("Dining")),
                        transaction(5, "2026-04-10", -410.0, Some("Dining")),
                    ],
                    ..Default::default()
                };

                let advice = advisor.advise(&snapshot, reference_date()).unwrap();

                assert_eq!(advice.allocation.total(), 100);
                let entries = advice.allocation.shares.len();
                assert!((2..=4).contains(&entries), "{} entries", entries);
                assert!(advice.allocation.shares.iter().all(|s| s.percent > 0));

                // Rounding drift bound on amounts
                if !advice.recommendations.is_empty() {
                    let total: i64 = advice.recommendations.iter().map(|r| r.amount).sum();
                    let drift = (total as f64 - advice.metrics.safe_to_spend).abs();
                    assert!(
                        drift < advice.recommendations.len() as f64,
                        "drift {} for {} recommendations",
                        drift,
                        advice.recommendations.len()
                    );
                }
            }
        }
    }
}

#[test]
fn test_overspending_trend_shifts_allocation() {
    // 3-month average 200, current month 500 -> trend 250%, shift capped
    let snapshot = Snapshot {
        accounts: vec![
            account(1, AccountKind::Checking, 8000.0),
            account(2, AccountKind::Savings, 12000.0),
            account(3, AccountKind::Investment, 5000.0),
        ],
        transactions: vec![
            transaction(1, "2026-01-05", -200.0, Some("Shopping")),
            transaction(2, "2026-02-05", -200.0, Some("Shopping")),
            transaction(3, "2026-03-05", -200.0, Some("Shopping")),
            transaction(4, "2026-04-05", -500.0, Some("Shopping")),
        ],
        ..Default::default()
    };

    let advice = Advisor::default()
        .advise(&snapshot, reference_date())
        .unwrap();
    assert_eq!(advice.metrics.variable_trend_percentage, 250.0);
    assert_eq!(advice.tier, SavingsTier::Healthy);

    // Healthy base {15,35,30,20}: 13 points move from enjoy to keep
    assert_eq!(advice.allocation.get(RecoType::Enjoy), Some(17));
    assert_eq!(advice.allocation.get(RecoType::Keep), Some(33));
}

#[test]
fn test_tight_checking_shifts_toward_keep() {
    let mut rent = transaction(1, "2026-04-01", -1500.0, Some("Rent"));
    rent.is_recurring = true;

    let snapshot = Snapshot {
        accounts: vec![
            account(1, AccountKind::Checking, 2000.0), // < 2x commitments
            account(2, AccountKind::Savings, 12000.0),
            account(3, AccountKind::Investment, 5000.0),
        ],
        transactions: vec![rent],
        ..Default::default()
    };

    let advice = Advisor::default()
        .advise(&snapshot, reference_date())
        .unwrap();

    // Healthy base {15,35,30,20} -> {10,30,30,30}
    assert_eq!(advice.allocation.get(RecoType::Keep), Some(30));
    assert_eq!(advice.allocation.get(RecoType::Save), Some(10));
    assert_eq!(advice.allocation.get(RecoType::Invest), Some(30));
    assert_eq!(advice.allocation.total(), 100);
}

#[test]
fn test_custom_tier_table_flows_through() {
    let config = EngineConfig::from_toml_str(
        r#"
        [tiers.comfortable]
        save = 5
        invest = 55
        enjoy = 25
        keep = 15
        "#,
    )
    .unwrap();

    let snapshot = Snapshot {
        accounts: vec![
            account(1, AccountKind::Checking, 10000.0),
            account(2, AccountKind::Savings, 30000.0),
            account(3, AccountKind::Investment, 10000.0),
        ],
        ..Default::default()
    };

    let advice = Advisor::new(config)
        .unwrap()
        .advise(&snapshot, reference_date())
        .unwrap();

    assert_eq!(advice.tier, SavingsTier::Comfortable);
    // The 5-point save share survives the minimum-share filter (>= 5)
    assert_eq!(advice.allocation.get(RecoType::Save), Some(5));
    assert_eq!(advice.allocation.get(RecoType::Invest), Some(55));
}

#[test]
fn test_profile_thresholds_change_the_tier() {
    let snapshot = Snapshot {
        accounts: vec![
            account(1, AccountKind::Checking, 3000.0),
            account(2, AccountKind::Savings, 8000.0),
        ],
        profile: Profile {
            safety_threshold_min: Some(1000.0),
            safety_threshold_optimal: Some(3000.0),
            safety_threshold_comfort: Some(6000.0),
        },
        ..Default::default()
    };

    let advice = Advisor::default()
        .advise(&snapshot, reference_date())
        .unwrap();
    // 8000 clears the lowered comfort threshold
    assert_eq!(advice.tier, SavingsTier::Comfortable);
}

// =============================================================================
// Dismissal filtering (presentation-side)
// =============================================================================

#[test]
fn test_dismissed_kinds_are_filtered_by_the_caller() {
    let snapshot = Snapshot {
        accounts: vec![
            account(1, AccountKind::Checking, 5000.0),
            account(2, AccountKind::Savings, 12000.0),
            account(3, AccountKind::Investment, 4000.0),
        ],
        ..Default::default()
    };

    let advisor = Advisor::default();
    let advice = advisor.advise(&snapshot, reference_date()).unwrap();
    assert_eq!(advice.recommendations.len(), 4);

    let store = MemoryDismissalStore::new();
    let key = dismissal_key(reference_date());
    store.set(&key, &[RecoType::Enjoy]).unwrap();

    let dismissed = store.get(&key).unwrap();
    let visible = filter_dismissed(advice.recommendations.clone(), &dismissed);
    assert_eq!(visible.len(), 3);
    assert!(visible.iter().all(|r| r.kind != RecoType::Enjoy));

    // A new month starts clean
    let next_month = NaiveDate::from_ymd_opt(2026, 5, 2).unwrap();
    let dismissed = store.get(&dismissal_key(next_month)).unwrap();
    let visible = filter_dismissed(advice.recommendations, &dismissed);
    assert_eq!(visible.len(), 4);
}
