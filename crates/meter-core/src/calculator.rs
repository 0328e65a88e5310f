//! # Calculators
//!
//! Forward (units → cost) and inverse (amount → units) tier walks.
//!
//! ## Fill Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Both directions walk the tiers lowest → highest                        │
//! │                                                                         │
//! │  compute_cost(2500 units)                                               │
//! │    1-200      ████████ 200    × 2.19  =   438.00                        │
//! │    201-400    ████████ 200    × 5.63  =  1126.00                        │
//! │    401-700    ████████ 300    × 8.13  =  2439.00                        │
//! │    701-2000   ████████ 1300   × 11.25 = 14625.00                        │
//! │    2001-∞     ████     500    × 12.50 =  6250.00                        │
//! │                                         ─────────                       │
//! │                                          24878.00                       │
//! │                                                                         │
//! │  compute_units_for_budget(24878.00) walks the same bars, spending       │
//! │  each tier's full cost while the budget covers it, then divides the     │
//! │  remainder by the first tier it cannot fill.                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cheaper tiers are always exhausted before a higher one is touched, and
//! rates never decrease from one tier to the next in a sane schedule, so the
//! inverse walk recovers exactly the quantity the forward walk billed.
//!
//! Both functions are pure and allocate only their result.

use crate::error::{CoreError, CoreResult};
use crate::tariff::{ProgressiveSchedule, TariffCategory, FLAT_TIER_LABEL};
use crate::types::{BudgetResult, CalculationResult, TierContribution};
use crate::validation::validate_positive_quantity;

// =============================================================================
// Forward Calculator
// =============================================================================

/// Computes the cost of `units` under `category`.
///
/// ## Errors
/// [`CoreError::InvalidQuantity`] if `units` is not a positive finite
/// number, or if the cost overflows `f64` (`field = "total_cost"`).
///
/// ## Example
/// ```rust
/// use meter_core::{compute_cost, Category, TariffTable};
///
/// let table = TariffTable::standard();
/// let residential = table.rates_for(Category::Residential).unwrap();
///
/// let result = compute_cost(residential, 201.0).unwrap();
/// assert_eq!(result.breakdown.len(), 2);
/// assert_eq!(result.breakdown[1].tier_label, "201-400");
/// assert!((result.total_cost - 443.63).abs() < 1e-9);
/// ```
pub fn compute_cost(category: &TariffCategory, units: f64) -> CoreResult<CalculationResult> {
    let units = validate_positive_quantity("units", units)?;

    let breakdown = match category {
        TariffCategory::Flat(flat) => {
            vec![TierContribution::new(
                FLAT_TIER_LABEL,
                units,
                flat.rate_per_unit(),
            )]
        }
        TariffCategory::Progressive(schedule) => fill_tiers(schedule, units),
    };

    let result = CalculationResult::from_breakdown(breakdown);
    ensure_finite("total_cost", result.total_cost)?;
    Ok(result)
}

/// Greedy left-to-right fill. Tiers with zero usage produce no line.
fn fill_tiers(schedule: &ProgressiveSchedule, units: f64) -> Vec<TierContribution> {
    let mut breakdown = Vec::with_capacity(schedule.tiers().len());
    let mut remaining = units;

    for tier in schedule.tiers() {
        if remaining <= 0.0 {
            break;
        }

        let used = match tier.capacity() {
            Some(capacity) => remaining.min(capacity),
            None => remaining,
        };

        if used > 0.0 {
            breakdown.push(TierContribution::new(tier.label(), used, tier.rate_per_unit));
            remaining -= used;
        }
    }

    breakdown
}

// =============================================================================
// Inverse Calculator
// =============================================================================

/// Computes how many units `amount` buys under `category`.
///
/// The result is unrounded; use [`BudgetResult::rounded_units`] at the
/// presentation boundary.
///
/// ## Errors
/// [`CoreError::InvalidQuantity`] if `amount` is not a positive finite
/// number, or if the units bought overflow `f64` (`field = "units"`). A zero
/// budget is an error, not an empty result.
///
/// ## Example
/// ```rust
/// use meter_core::{compute_units_for_budget, Category, TariffTable};
///
/// let table = TariffTable::standard();
/// let residential = table.rates_for(Category::Residential).unwrap();
///
/// // Exactly the first tier: 200 × 2.19
/// let result = compute_units_for_budget(residential, 438.0).unwrap();
/// assert!((result.units - 200.0).abs() < 1e-9);
/// ```
pub fn compute_units_for_budget(category: &TariffCategory, amount: f64) -> CoreResult<BudgetResult> {
    let amount = validate_positive_quantity("amount", amount)?;

    let units = match category {
        TariffCategory::Flat(flat) => amount / flat.rate_per_unit(),
        TariffCategory::Progressive(schedule) => spend_tiers(schedule, amount),
    };

    ensure_finite("units", units)?;
    Ok(BudgetResult { amount, units })
}

/// Saturates tiers while the budget covers their full cost, then lets the
/// first tier it cannot fill absorb the rest.
fn spend_tiers(schedule: &ProgressiveSchedule, amount: f64) -> f64 {
    let mut units = 0.0;
    let mut remaining = amount;

    for tier in schedule.tiers() {
        match (tier.capacity(), tier.full_cost()) {
            (Some(capacity), Some(full_cost)) if remaining >= full_cost => {
                units += capacity;
                remaining -= full_cost;
            }
            _ => {
                units += remaining / tier.rate_per_unit;
                break;
            }
        }
    }

    units
}

/// Finite inputs can still overflow: `1e308 × 16.25` is `inf`.
fn ensure_finite(field: &str, value: f64) -> CoreResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CoreError::invalid_quantity(field, value))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
