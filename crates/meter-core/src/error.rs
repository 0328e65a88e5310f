//! # Error Types
//!
//! Domain-specific error types for meter-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meter-core errors (this file)                                         │
//! │  ├── CoreError        - Calculation / lookup failures                  │
//! │  └── ValidationError  - Tariff shape and field validation failures     │
//! │                                                                         │
//! │  meter-cli errors (host crate)                                         │
//! │  ├── ConfigError      - Startup failures (tariff file, env values)     │
//! │  └── ApiError         - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → CLI output             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending value in the message
//! 3. Errors are enum variants, never String
//! 4. Every failure is deterministic: the same input fails the same way

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Tariff engine errors.
///
/// All of these are local to one calculation. None are transient, so none
/// carry retry semantics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Category name is not one of `residential`, `commercial`, `factory`,
    /// or the injected tariff table has no schedule for it.
    #[error("Unknown tariff category: {0}")]
    UnknownCategory(String),

    /// Units or amount was zero, negative, NaN or infinite.
    ///
    /// ## When This Occurs
    /// - `compute_cost` called with `units <= 0`
    /// - `compute_units_for_budget` called with `amount <= 0`
    /// - A meter reading could not be represented as a finite number
    #[error("{field} must be a positive finite number, got {value}")]
    InvalidQuantity { field: String, value: f64 },

    /// The current meter reading does not exceed the previous one.
    ///
    /// Kept apart from [`CoreError::InvalidQuantity`] because it names a
    /// different caller mistake (readings entered in the wrong order, or
    /// the same reading twice).
    ///
    /// ## User Workflow
    /// ```text
    /// Previous: 1520   Current: 1480
    ///      │
    ///      ▼
    /// consumption_from_readings()
    ///      │
    ///      ▼
    /// ReadingNotIncreasing { previous: 1520, current: 1480 }
    ///      │
    ///      ▼
    /// UI shows: "Current reading must be greater than previous reading"
    /// ```
    #[error("Current reading must be greater than previous reading (previous {previous}, current {current})")]
    ReadingNotIncreasing { previous: f64, current: f64 },

    /// A tariff table failed validation while being built or loaded.
    #[error("Invalid tariff: {reason}")]
    InvalidTariff { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an invalid quantity error for the named field.
    pub fn invalid_quantity(field: impl Into<String>, value: f64) -> Self {
        CoreError::InvalidQuantity {
            field: field.into(),
            value,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Tariff and field validation errors.
///
/// Raised while checking a rate schedule before it is accepted into a
/// [`TariffTable`](crate::tariff::TariffTable).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required collection is empty (e.g. a progressive schedule with no tiers).
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive and finite.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A tier's upper bound is below its lower bound.
    #[error("{field}: upper bound {upper} is below lower bound {lower}")]
    InvertedBounds { field: String, lower: u64, upper: u64 },

    /// Tiers leave a gap or overlap.
    #[error("{field} must start at {expected}, found {found}")]
    NotContiguous {
        field: String,
        expected: u64,
        found: u64,
    },

    /// An unbounded tier appears before the end of the schedule.
    #[error("{field} is unbounded but is not the last tier")]
    UnboundedNotLast { field: String },

    /// The last tier of a schedule has a finite upper bound.
    #[error("{field} must have an unbounded upper bound")]
    LastTierBounded { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownCategory("industrial".to_string());
        assert_eq!(err.to_string(), "Unknown tariff category: industrial");

        let err = CoreError::invalid_quantity("units", -5.0);
        assert_eq!(
            err.to_string(),
            "units must be a positive finite number, got -5"
        );
    }

    #[test]
    fn test_reading_error_is_distinguishable() {
        let err = CoreError::ReadingNotIncreasing {
            previous: 1520.0,
            current: 1480.0,
        };
        assert!(err
            .to_string()
            .starts_with("Current reading must be greater than previous reading"));
        assert!(!matches!(err, CoreError::InvalidQuantity { .. }));
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::NotContiguous {
            field: "tiers[1]".to_string(),
            expected: 201,
            found: 205,
        };
        assert_eq!(err.to_string(), "tiers[1] must start at 201, found 205");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "tiers".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
