//! # Validation Module
//!
//! Input and tariff validation for the meter engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Host command (meter-cli)                                     │
//! │  ├── Category name parsing                                             │
//! │  └── consumption_from_readings()  ◄── previous / current readings      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Calculators (this crate)                                     │
//! │  └── validate_positive_quantity() ◄── units / amount                   │
//! │                                                                         │
//! │  Load time: TariffTable construction                                   │
//! │  ├── validate_rate()                                                   │
//! │  └── validate_tiers()                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use meter_core::validation::consumption_from_readings;
//!
//! let units = consumption_from_readings(1200.0, 1450.0).unwrap();
//! assert_eq!(units, 250.0);
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::tariff::{RateTier, UpperBound};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Quantity Validators
// =============================================================================

/// Checks that `value` is a positive, finite number and returns it.
///
/// ## Rules
/// - NaN and ±∞ are rejected
/// - Zero and negatives are rejected
///
/// ## Example
/// ```rust
/// use meter_core::validation::validate_positive_quantity;
///
/// assert_eq!(validate_positive_quantity("units", 12.5).unwrap(), 12.5);
/// assert!(validate_positive_quantity("units", 0.0).is_err());
/// assert!(validate_positive_quantity("amount", f64::NAN).is_err());
/// ```
pub fn validate_positive_quantity(field: &str, value: f64) -> CoreResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(CoreError::invalid_quantity(field, value))
    }
}

/// Derives consumption from two meter readings.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Kilowatts → Money                                                      │
/// │                                                                         │
/// │  User enters previous = 1200, current = 1450                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  consumption_from_readings(1200, 1450) ← THIS FUNCTION                 │
/// │       │                                                                 │
/// │       ├── reading NaN / ∞?   → InvalidQuantity                         │
/// │       │                                                                 │
/// │       ├── current <= previous? → ReadingNotIncreasing                  │
/// │       │                                                                 │
/// │       └── OK(250) → compute_cost(category, 250)                        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn consumption_from_readings(previous: f64, current: f64) -> CoreResult<f64> {
    if !previous.is_finite() {
        return Err(CoreError::invalid_quantity("previous_reading", previous));
    }
    if !current.is_finite() {
        return Err(CoreError::invalid_quantity("current_reading", current));
    }
    if current <= previous {
        return Err(CoreError::ReadingNotIncreasing { previous, current });
    }

    // Two finite readings can still overflow when subtracted.
    validate_positive_quantity("consumption", current - previous)
}

// =============================================================================
// Tariff Validators
// =============================================================================

/// Validates a per-unit rate.
pub fn validate_rate(field: &str, rate: f64) -> ValidationResult<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::MustBePositive {
            field: field.to_string(),
        })
    }
}

/// Validates the shape of a progressive schedule.
///
/// ## Rules
/// - At least one tier
/// - Every rate positive and finite
/// - Bounded tiers have `upper >= lower`
/// - `tiers[i + 1].lower_bound == tiers[i].upper_bound + 1`
/// - Exactly the last tier is unbounded
///
/// Contiguity implies ascending order, so no separate sort check is needed.
pub fn validate_tiers(tiers: &[RateTier]) -> ValidationResult<()> {
    if tiers.is_empty() {
        return Err(ValidationError::Required {
            field: "tiers".to_string(),
        });
    }

    let last = tiers.len() - 1;
    for (i, tier) in tiers.iter().enumerate() {
        let field = format!("tiers[{i}]");
        validate_rate(&format!("{field}.rate_per_unit"), tier.rate_per_unit)?;

        match tier.upper_bound {
            UpperBound::Bounded(upper) => {
                if upper < tier.lower_bound {
                    return Err(ValidationError::InvertedBounds {
                        field,
                        lower: u64::from(tier.lower_bound),
                        upper: u64::from(upper),
                    });
                }
                if i == last {
                    return Err(ValidationError::LastTierBounded { field });
                }

                let next = &tiers[i + 1];
                let expected = u64::from(upper) + 1;
                if u64::from(next.lower_bound) != expected {
                    return Err(ValidationError::NotContiguous {
                        field: format!("tiers[{}]", i + 1),
                        expected,
                        found: u64::from(next.lower_bound),
                    });
                }
            }
            UpperBound::Unbounded => {
                if i != last {
                    return Err(ValidationError::UnboundedNotLast { field });
                }
            }
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_quantity() {
        assert!(validate_positive_quantity("units", 0.001).is_ok());
        assert!(validate_positive_quantity("units", 0.0).is_err());
        assert!(validate_positive_quantity("units", -5.0).is_err());
        assert!(validate_positive_quantity("units", f64::INFINITY).is_err());
        assert!(validate_positive_quantity("units", f64::NAN).is_err());
    }

    #[test]
    fn test_consumption_from_readings() {
        assert_eq!(consumption_from_readings(0.0, 200.0).unwrap(), 200.0);
        assert_eq!(consumption_from_readings(1200.5, 1300.5).unwrap(), 100.0);
    }

    #[test]
    fn test_non_increasing_readings_are_rejected() {
        assert_eq!(
            consumption_from_readings(500.0, 500.0),
            Err(CoreError::ReadingNotIncreasing {
                previous: 500.0,
                current: 500.0
            })
        );
        assert!(matches!(
            consumption_from_readings(500.0, 400.0),
            Err(CoreError::ReadingNotIncreasing { .. })
        ));
    }

    #[test]
    fn test_non_finite_readings_are_invalid_quantity() {
        assert!(matches!(
            consumption_from_readings(f64::NAN, 10.0),
            Err(CoreError::InvalidQuantity { ref field, .. }) if field == "previous_reading"
        ));
        assert!(matches!(
            consumption_from_readings(0.0, f64::INFINITY),
            Err(CoreError::InvalidQuantity { ref field, .. }) if field == "current_reading"
        ));
        assert!(matches!(
            consumption_from_readings(-f64::MAX, f64::MAX),
            Err(CoreError::InvalidQuantity { ref field, .. }) if field == "consumption"
        ));
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate("rate", 2.19).is_ok());
        assert!(validate_rate("rate", 0.0).is_err());
        assert!(validate_rate("rate", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_tiers_accepts_contiguous_schedule() {
        let tiers = [
            RateTier::bounded(1, 200, 2.19),
            RateTier::bounded(201, 400, 5.63),
            RateTier::unbounded(401, 8.13),
        ];
        assert!(validate_tiers(&tiers).is_ok());
        assert!(validate_tiers(&[RateTier::unbounded(0, 1.0)]).is_ok());
    }

    #[test]
    fn test_validate_tiers_rejections() {
        assert_eq!(
            validate_tiers(&[]),
            Err(ValidationError::Required {
                field: "tiers".to_string()
            })
        );

        let overlap = [RateTier::bounded(1, 200, 1.0), RateTier::unbounded(200, 2.0)];
        assert_eq!(
            validate_tiers(&overlap),
            Err(ValidationError::NotContiguous {
                field: "tiers[1]".to_string(),
                expected: 201,
                found: 200
            })
        );

        let inverted = [RateTier::bounded(10, 5, 1.0), RateTier::unbounded(6, 2.0)];
        assert!(matches!(
            validate_tiers(&inverted),
            Err(ValidationError::InvertedBounds { .. })
        ));

        let early_top = [RateTier::unbounded(1, 1.0), RateTier::unbounded(2, 2.0)];
        assert_eq!(
            validate_tiers(&early_top),
            Err(ValidationError::UnboundedNotLast {
                field: "tiers[0]".to_string()
            })
        );

        let free = [RateTier::unbounded(1, 0.0)];
        assert_eq!(
            validate_tiers(&free),
            Err(ValidationError::MustBePositive {
                field: "tiers[0].rate_per_unit".to_string()
            })
        );
    }
}
