//! # Tariff Table
//!
//! Rate schedules per customer category.
//!
//! ## Schedule Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Standard Tariff Table                              │
//! │                                                                         │
//! │  residential (Progressive)                                             │
//! │  ┌──────────┬──────────┬──────────┬────────────┬────────────┐          │
//! │  │  1-200   │ 201-400  │ 401-700  │  701-2000  │  2001-∞    │          │
//! │  │  @ 2.19  │  @ 5.63  │  @ 8.13  │  @ 11.25   │  @ 12.50   │          │
//! │  └──────────┴──────────┴──────────┴────────────┴────────────┘          │
//! │   cheap ─────────────────────────────────────────────► expensive       │
//! │                                                                         │
//! │  commercial (Flat)   0-∞ @ 16.25                                       │
//! │  factory    (Flat)   0-∞ @ 6.75                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! A [`ProgressiveSchedule`] can only exist if its tiers are contiguous,
//! ascending, and end in exactly one unbounded tier. Both the constructor and
//! deserialization go through [`validate_tiers`], so calculators never need
//! to re-check the shape.
//!
//! The top tier is tagged [`UpperBound::Unbounded`] rather than carrying
//! `f64::INFINITY`, so capacity arithmetic never sees an infinite value.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::calculator::{compute_cost, compute_units_for_budget};
use crate::error::{CoreError, CoreResult};
use crate::types::{BudgetResult, CalculationResult};
use crate::validation::{validate_rate, validate_tiers};

/// Label used for the single breakdown line of a flat-rate category.
pub const FLAT_TIER_LABEL: &str = "0-∞";

// =============================================================================
// Category
// =============================================================================

/// Customer category selecting which schedule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Households, billed progressively.
    Residential,
    /// Shops and offices, flat rate.
    Commercial,
    /// Registered factories, flat rate.
    Factory,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 3] = [Category::Residential, Category::Commercial, Category::Factory];

    /// Returns the wire name (`"residential"`, `"commercial"`, `"factory"`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Residential => "residential",
            Category::Commercial => "commercial",
            Category::Factory => "factory",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a category name. Only the three exact lowercase names are accepted
/// (surrounding whitespace is ignored); anything else is
/// [`CoreError::UnknownCategory`].
impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "residential" => Ok(Category::Residential),
            "commercial" => Ok(Category::Commercial),
            "factory" => Ok(Category::Factory),
            other => Err(CoreError::UnknownCategory(other.to_string())),
        }
    }
}

// =============================================================================
// Rate Tier
// =============================================================================

/// Upper end of a tier.
///
/// Serialized as a plain number, or `null` for the open-ended top tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum UpperBound {
    /// Inclusive upper bound.
    Bounded(u32),
    /// No upper bound; the tier absorbs everything that reaches it.
    Unbounded,
}

impl From<Option<u32>> for UpperBound {
    fn from(value: Option<u32>) -> Self {
        match value {
            Some(upper) => UpperBound::Bounded(upper),
            None => UpperBound::Unbounded,
        }
    }
}

impl From<UpperBound> for Option<u32> {
    fn from(value: UpperBound) -> Self {
        match value {
            UpperBound::Bounded(upper) => Some(upper),
            UpperBound::Unbounded => None,
        }
    }
}

/// One bracket of a progressive schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTier {
    /// First unit billed in this tier (inclusive).
    pub lower_bound: u32,
    /// Last unit billed in this tier (inclusive), or unbounded.
    pub upper_bound: UpperBound,
    /// Price per consumption unit.
    pub rate_per_unit: f64,
}

impl RateTier {
    /// Creates a tier covering `lower..=upper`.
    pub const fn bounded(lower_bound: u32, upper_bound: u32, rate_per_unit: f64) -> Self {
        RateTier {
            lower_bound,
            upper_bound: UpperBound::Bounded(upper_bound),
            rate_per_unit,
        }
    }

    /// Creates the open-ended top tier starting at `lower`.
    pub const fn unbounded(lower_bound: u32, rate_per_unit: f64) -> Self {
        RateTier {
            lower_bound,
            upper_bound: UpperBound::Unbounded,
            rate_per_unit,
        }
    }

    /// Number of units this tier can hold, or `None` when unbounded.
    ///
    /// ```rust
    /// use meter_core::tariff::RateTier;
    ///
    /// assert_eq!(RateTier::bounded(1, 200, 2.19).capacity(), Some(200.0));
    /// assert_eq!(RateTier::unbounded(2001, 12.5).capacity(), None);
    /// ```
    pub fn capacity(&self) -> Option<f64> {
        match self.upper_bound {
            UpperBound::Bounded(upper) => {
                Some(f64::from(upper) - f64::from(self.lower_bound) + 1.0)
            }
            UpperBound::Unbounded => None,
        }
    }

    /// Cost of filling the whole tier, or `None` when unbounded.
    pub fn full_cost(&self) -> Option<f64> {
        self.capacity().map(|capacity| capacity * self.rate_per_unit)
    }

    /// Breakdown label: `"201-400"`, or `"2001-∞"` for the top tier.
    pub fn label(&self) -> String {
        match self.upper_bound {
            UpperBound::Bounded(upper) => format!("{}-{}", self.lower_bound, upper),
            UpperBound::Unbounded => format!("{}-∞", self.lower_bound),
        }
    }
}

// =============================================================================
// Schedules
// =============================================================================

/// Ordered, contiguous tiers ending in one unbounded tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSchedule")]
pub struct ProgressiveSchedule {
    tiers: Vec<RateTier>,
}

#[derive(Deserialize)]
struct RawSchedule {
    tiers: Vec<RateTier>,
}

impl TryFrom<RawSchedule> for ProgressiveSchedule {
    type Error = CoreError;

    fn try_from(raw: RawSchedule) -> Result<Self, Self::Error> {
        ProgressiveSchedule::new(raw.tiers)
    }
}

impl ProgressiveSchedule {
    /// Validates and wraps a tier list.
    ///
    /// ## Errors
    /// [`CoreError::Validation`] if the list is empty, has gaps or overlaps,
    /// has a non-positive rate, or does not end in exactly one unbounded tier.
    ///
    /// ## Example
    /// ```rust
    /// use meter_core::tariff::{ProgressiveSchedule, RateTier};
    ///
    /// let ok = ProgressiveSchedule::new(vec![
    ///     RateTier::bounded(1, 100, 1.0),
    ///     RateTier::unbounded(101, 2.0),
    /// ]);
    /// assert!(ok.is_ok());
    ///
    /// let gap = ProgressiveSchedule::new(vec![
    ///     RateTier::bounded(1, 100, 1.0),
    ///     RateTier::unbounded(150, 2.0),
    /// ]);
    /// assert!(gap.is_err());
    /// ```
    pub fn new(tiers: Vec<RateTier>) -> CoreResult<Self> {
        validate_tiers(&tiers)?;
        Ok(ProgressiveSchedule { tiers })
    }

    /// Tiers in ascending order.
    pub fn tiers(&self) -> &[RateTier] {
        &self.tiers
    }
}

/// Single rate applied to every unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFlatRate")]
pub struct FlatRate {
    rate_per_unit: f64,
}

#[derive(Deserialize)]
struct RawFlatRate {
    rate_per_unit: f64,
}

impl TryFrom<RawFlatRate> for FlatRate {
    type Error = CoreError;

    fn try_from(raw: RawFlatRate) -> Result<Self, Self::Error> {
        FlatRate::new(raw.rate_per_unit)
    }
}

impl FlatRate {
    /// Creates a flat rate; the rate must be positive and finite.
    pub fn new(rate_per_unit: f64) -> CoreResult<Self> {
        validate_rate("rate_per_unit", rate_per_unit)?;
        Ok(FlatRate { rate_per_unit })
    }

    /// Price per consumption unit.
    #[inline]
    pub fn rate_per_unit(&self) -> f64 {
        self.rate_per_unit
    }
}

/// The schedule active for one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TariffCategory {
    Progressive(ProgressiveSchedule),
    Flat(FlatRate),
}

// =============================================================================
// Tariff Table
// =============================================================================

/// Read-only mapping from [`Category`] to its schedule.
///
/// Built once (standard schedule, code, or JSON) and then only read.
/// Calculators borrow it, so a table can be shared across threads behind an
/// `Arc` without locking.
///
/// ## JSON Shape
/// ```json
/// {
///   "residential": { "type": "progressive", "tiers": [
///       { "lower_bound": 1,   "upper_bound": 200,  "rate_per_unit": 2.19 },
///       { "lower_bound": 201, "upper_bound": null, "rate_per_unit": 5.63 }
///   ]},
///   "commercial": { "type": "flat", "rate_per_unit": 16.25 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TariffTable {
    schedules: BTreeMap<Category, TariffCategory>,
}

impl TariffTable {
    /// Builds a table from explicit schedules. Categories left out will fail
    /// lookup with [`CoreError::UnknownCategory`].
    pub fn new(schedules: impl IntoIterator<Item = (Category, TariffCategory)>) -> Self {
        TariffTable {
            schedules: schedules.into_iter().collect(),
        }
    }

    /// The standard published schedule.
    ///
    /// ```rust
    /// use meter_core::tariff::{Category, TariffCategory, TariffTable};
    ///
    /// let table = TariffTable::standard();
    /// match table.rates_for(Category::Commercial).unwrap() {
    ///     TariffCategory::Flat(flat) => assert_eq!(flat.rate_per_unit(), 16.25),
    ///     other => panic!("unexpected schedule: {other:?}"),
    /// }
    /// ```
    pub fn standard() -> Self {
        let residential = ProgressiveSchedule {
            tiers: vec![
                RateTier::bounded(1, 200, 2.19),
                RateTier::bounded(201, 400, 5.63),
                RateTier::bounded(401, 700, 8.13),
                RateTier::bounded(701, 2000, 11.25),
                RateTier::unbounded(2001, 12.5),
            ],
        };

        TariffTable::new([
            (Category::Residential, TariffCategory::Progressive(residential)),
            (
                Category::Commercial,
                TariffCategory::Flat(FlatRate { rate_per_unit: 16.25 }),
            ),
            (
                Category::Factory,
                TariffCategory::Flat(FlatRate { rate_per_unit: 6.75 }),
            ),
        ])
    }

    /// Parses and validates a JSON tariff table.
    ///
    /// ## Errors
    /// [`CoreError::InvalidTariff`] for malformed JSON, unknown category keys,
    /// or schedules that break the tier invariants.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        serde_json::from_str(json).map_err(|e| CoreError::InvalidTariff {
            reason: e.to_string(),
        })
    }

    /// Looks up the schedule for a category.
    pub fn rates_for(&self, category: Category) -> CoreResult<&TariffCategory> {
        self.schedules
            .get(&category)
            .ok_or_else(|| CoreError::UnknownCategory(category.to_string()))
    }

    /// Parses a category name, then looks it up.
    ///
    /// ```rust
    /// use meter_core::{CoreError, TariffTable};
    ///
    /// let table = TariffTable::standard();
    /// assert!(table.rates_for_name("factory").is_ok());
    /// assert!(matches!(
    ///     table.rates_for_name("industrial"),
    ///     Err(CoreError::UnknownCategory(_))
    /// ));
    /// ```
    pub fn rates_for_name(&self, name: &str) -> CoreResult<&TariffCategory> {
        self.rates_for(name.parse()?)
    }

    /// Categories present in this table, in [`Category`] order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.schedules.keys().copied()
    }

    /// Looks up `category` and runs the forward calculation.
    pub fn cost(&self, category: Category, units: f64) -> CoreResult<CalculationResult> {
        compute_cost(self.rates_for(category)?, units)
    }

    /// Looks up `category` and runs the inverse calculation.
    pub fn units_for_budget(&self, category: Category, amount: f64) -> CoreResult<BudgetResult> {
        compute_units_for_budget(self.rates_for(category)?, amount)
    }
}

impl Default for TariffTable {
    fn default() -> Self {
        TariffTable::standard()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
