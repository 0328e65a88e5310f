//! # meter-core: Pure Tariff Engine
//!
//! This crate is the **heart** of the meter calculator. It turns consumption
//! into cost under a tiered tariff, and turns a budget back into consumption,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Meter Calculator Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    meter-cli (host)                              │   │
//! │  │   config ──► commands (kw_to_money, money_to_kw) ──► history    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ meter-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  tariff   │  │ calculator │  │   types   │  │ validation│  │   │
//! │  │   │  Table    │  │  forward   │  │  Result   │  │  readings │  │   │
//! │  │   │  Tiers    │  │  inverse   │  │ Breakdown │  │  tiers    │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STATE • NO LOCALE • PURE FUNCTIONS                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`tariff`] - Categories, rate tiers, schedules and the tariff table
//! - [`calculator`] - Forward and inverse calculations
//! - [`types`] - Calculation results and breakdown lines
//! - [`validation`] - Quantity, reading and tariff checks
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, no hidden state
//! 2. **Injected Tariffs**: calculators take the schedule by reference
//! 3. **No Mid-Walk Rounding**: `f64` all the way, round only for display
//! 4. **Explicit Errors**: bad input is an error, never a silent zero
//!
//! ## Example Usage
//!
//! ```rust
//! use meter_core::{Category, TariffTable};
//!
//! let table = TariffTable::standard();
//!
//! let bill = table.cost(Category::Residential, 250.0).unwrap();
//! // 200 × 2.19 + 50 × 5.63
//! assert!((bill.total_cost - 719.5).abs() < 1e-9);
//!
//! let bought = table.units_for_budget(Category::Residential, bill.total_cost).unwrap();
//! assert!((bought.units - 250.0).abs() < 1e-9);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod error;
pub mod tariff;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{compute_cost, compute_units_for_budget};
pub use error::{CoreError, CoreResult, ValidationError};
pub use tariff::{Category, FlatRate, ProgressiveSchedule, RateTier, TariffCategory, TariffTable, UpperBound};
pub use types::{BudgetResult, CalculationResult, TierContribution};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Decimal places the inverse result is rounded to for display.
///
/// Matches the two-decimal output users of the calculator already expect.
pub const DEFAULT_DISPLAY_DECIMALS: u32 = 2;

/// How many history entries a host shows by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;
