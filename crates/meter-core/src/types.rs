//! # Result Types
//!
//! Value objects produced by the calculators.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Result Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────┐              │
//! │  │  CalculationResult   │        │     BudgetResult     │              │
//! │  │  ──────────────────  │        │  ──────────────────  │              │
//! │  │  total_units         │        │  amount              │              │
//! │  │  total_cost          │        │  units (unrounded)   │              │
//! │  │  breakdown ─────┐    │        └──────────────────────┘              │
//! │  └─────────────────┼────┘                                              │
//! │                    ▼                                                    │
//! │  ┌──────────────────────┐                                              │
//! │  │  TierContribution    │  one per tier with nonzero usage             │
//! │  │  tier_label "1-200"  │                                              │
//! │  │  units_in_tier       │                                              │
//! │  │  rate_per_unit       │                                              │
//! │  │  cost_in_tier        │                                              │
//! │  └──────────────────────┘                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is plain numbers and strings, so results serialize
//! straight into whatever history log the host keeps.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Tier Contribution
// =============================================================================

/// One line of a cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TierContribution {
    /// Bound range of the tier, e.g. `"201-400"` or `"2001-∞"`.
    pub tier_label: String,
    /// Units billed in this tier.
    pub units_in_tier: f64,
    /// Rate applied to those units.
    pub rate_per_unit: f64,
    /// `units_in_tier * rate_per_unit`.
    pub cost_in_tier: f64,
}

impl TierContribution {
    /// Creates a contribution; the cost is always derived, never passed in.
    pub fn new(tier_label: impl Into<String>, units_in_tier: f64, rate_per_unit: f64) -> Self {
        TierContribution {
            tier_label: tier_label.into(),
            units_in_tier,
            rate_per_unit,
            cost_in_tier: units_in_tier * rate_per_unit,
        }
    }
}

// =============================================================================
// Calculation Result
// =============================================================================

/// Output of the forward calculation.
///
/// Totals are the in-order sums of the breakdown, so
/// `total_cost == Σ cost_in_tier` holds bit-for-bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalculationResult {
    pub total_units: f64,
    pub total_cost: f64,
    pub breakdown: Vec<TierContribution>,
}

impl CalculationResult {
    /// Builds a result whose totals are summed from `breakdown`.
    pub fn from_breakdown(breakdown: Vec<TierContribution>) -> Self {
        let total_units = breakdown.iter().map(|c| c.units_in_tier).sum();
        let total_cost = breakdown.iter().map(|c| c.cost_in_tier).sum();
        CalculationResult {
            total_units,
            total_cost,
            breakdown,
        }
    }
}

// =============================================================================
// Budget Result
// =============================================================================

/// Output of the inverse calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BudgetResult {
    /// The amount that was spent.
    pub amount: f64,
    /// Units that amount buys, unrounded.
    pub units: f64,
}

impl BudgetResult {
    /// Units rounded for display.
    ///
    /// ```rust
    /// use meter_core::types::BudgetResult;
    ///
    /// let result = BudgetResult { amount: 100.0, units: 100.0 / 16.25 };
    /// assert_eq!(result.rounded_units(2), 6.15);
    /// ```
    pub fn rounded_units(&self, decimals: u32) -> f64 {
        round_to(self.units, decimals)
    }
}

/// Rounds half away from zero to `decimals` places.
///
/// Presentation only; calculators never call this.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contribution_derives_cost() {
        let line = TierContribution::new("1-200", 200.0, 2.5);
        assert_eq!(line.cost_in_tier, 500.0);
        assert_eq!(line.tier_label, "1-200");
    }

    #[test]
    fn test_result_totals_sum_breakdown() {
        let result = CalculationResult::from_breakdown(vec![
            TierContribution::new("1-200", 200.0, 2.19),
            TierContribution::new("201-400", 12.5, 5.63),
        ]);
        let expected_cost: f64 = result.breakdown.iter().map(|c| c.cost_in_tier).sum();
        assert_eq!(result.total_cost, expected_cost);
        assert_eq!(result.total_units, 212.5);
    }

    #[test]
    fn test_empty_breakdown_is_zero() {
        let result = CalculationResult::from_breakdown(Vec::new());
        assert_eq!(result.total_units, 0.0);
        assert_eq!(result.total_cost, 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(2499.99999, 2), 2500.0);
        assert_eq!(round_to(6.153846, 2), 6.15);
        assert_eq!(round_to(1.005, 0), 1.0);
        assert_eq!(round_to(12.345, 1), 12.3);
    }

    #[test]
    fn test_serializes_as_plain_tree() {
        let result = CalculationResult::from_breakdown(vec![TierContribution::new(
            "0-∞", 10.0, 6.75,
        )]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total_cost"], 67.5);
        assert_eq!(json["breakdown"][0]["tier_label"], "0-∞");
    }
}
