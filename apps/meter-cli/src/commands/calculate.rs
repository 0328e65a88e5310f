//! # Calculation Commands
//!
//! The two directions the calculator offers.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kw_to_money { category, previousReading, currentReading }             │
//! │       │                                                                 │
//! │       ├── consumption_from_readings ──► INVALID_READING / QUANTITY     │
//! │       ├── category.parse()          ──► UNKNOWN_CATEGORY               │
//! │       ├── compute_cost                                                  │
//! │       └── history.push(entry) ──► { consumption, totalCost, breakdown } │
//! │                                                                         │
//! │  money_to_kw { category, amount }                                      │
//! │       │                                                                 │
//! │       ├── category.parse()          ──► UNKNOWN_CATEGORY               │
//! │       ├── compute_units_for_budget  ──► INVALID_QUANTITY               │
//! │       └── history.push(entry) ──► { amount, totalKw, totalKwExact }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rejected requests never reach the history log.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use meter_core::validation::consumption_from_readings;
use meter_core::{Category, TierContribution};

use crate::error::ApiError;
use crate::state::{ConfigState, HistoryEntry, HistoryState};

/// Readings → cost request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KwToMoneyRequest {
    pub category: String,
    pub previous_reading: f64,
    pub current_reading: f64,
}

/// Readings → cost response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KwToMoneyResponse {
    pub category: Category,
    pub consumption: f64,
    pub total_cost: f64,
    pub breakdown: Vec<TierContribution>,
}

/// Amount → units request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyToKwRequest {
    pub category: String,
    pub amount: f64,
}

/// Amount → units response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyToKwResponse {
    pub category: Category,
    pub amount: f64,
    /// Rounded to the configured display decimals.
    pub total_kw: f64,
    pub total_kw_exact: f64,
}

/// Computes the bill for the consumption between two readings.
///
/// ## Arguments
/// * `request.category` - `residential`, `commercial` or `factory`
/// * `request.previous_reading` / `request.current_reading` - meter values;
///   current must be greater than previous
///
/// ## Returns
/// Consumption, total cost and the per-tier breakdown
pub fn kw_to_money(
    config: &ConfigState,
    history: &HistoryState,
    request: KwToMoneyRequest,
) -> Result<KwToMoneyResponse, ApiError> {
    debug!(?request, "kw_to_money command");

    let units = consumption_from_readings(request.previous_reading, request.current_reading)
        .map_err(|e| {
            warn!(error = %e, "Rejected meter readings");
            ApiError::from(e)
        })?;
    let category: Category = request.category.parse()?;

    let result = config.tariff.cost(category, units)?;

    history.with_history_mut(|h| {
        h.push(HistoryEntry::kw_to_money(
            category,
            request.previous_reading,
            request.current_reading,
            &result,
        ))
    });

    debug!(%category, units, total_cost = result.total_cost, "Bill calculated");

    Ok(KwToMoneyResponse {
        category,
        consumption: result.total_units,
        total_cost: result.total_cost,
        breakdown: result.breakdown,
    })
}

/// Computes how many units an amount buys.
///
/// ## Returns
/// The amount, the units rounded for display, and the unrounded units
pub fn money_to_kw(
    config: &ConfigState,
    history: &HistoryState,
    request: MoneyToKwRequest,
) -> Result<MoneyToKwResponse, ApiError> {
    debug!(?request, "money_to_kw command");

    let category: Category = request.category.parse()?;
    let result = config
        .tariff
        .units_for_budget(category, request.amount)
        .map_err(|e| {
            warn!(error = %e, "Rejected budget amount");
            ApiError::from(e)
        })?;

    history.with_history_mut(|h| h.push(HistoryEntry::money_to_kw(category, &result)));

    Ok(MoneyToKwResponse {
        category,
        amount: result.amount,
        total_kw: result.rounded_units(config.display_decimals),
        total_kw_exact: result.units,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::{CalculationKind, History};

    fn kw_request(category: &str, previous: f64, current: f64) -> KwToMoneyRequest {
        KwToMoneyRequest {
            category: category.to_string(),
            previous_reading: previous,
            current_reading: current,
        }
    }

    #[test]
    fn test_kw_to_money_residential() {
        let config = ConfigState::default();
        let history = HistoryState::new();

        let response = kw_to_money(&config, &history, kw_request("residential", 1000.0, 3500.0)).unwrap();

        assert_eq!(response.category, Category::Residential);
        assert_eq!(response.consumption, 2500.0);
        assert!((response.total_cost - 24878.0).abs() < 1e-6);
        assert_eq!(response.breakdown.len(), 5);
        assert_eq!(history.with_history(History::len), 1);
    }

    #[test]
    fn test_kw_to_money_rejects_reversed_readings() {
        let config = ConfigState::default();
        let history = HistoryState::new();

        let err = kw_to_money(&config, &history, kw_request("residential", 500.0, 400.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidReading);
        assert!(err.message.starts_with("Current reading must be greater than previous reading"));
        assert!(history.with_history(History::is_empty));
    }

    #[test]
    fn test_kw_to_money_unknown_category() {
        let config = ConfigState::default();
        let history = HistoryState::new();

        let err = kw_to_money(&config, &history, kw_request("industrial", 0.0, 10.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownCategory);
        assert!(history.with_history(History::is_empty));
    }

    #[test]
    fn test_money_to_kw_rounds_for_display() {
        let config = ConfigState::default();
        let history = HistoryState::new();

        let response = money_to_kw(
            &config,
            &history,
            MoneyToKwRequest {
                category: "commercial".to_string(),
                amount: 100.0,
            },
        )
        .unwrap();

        assert_eq!(response.total_kw, 6.15);
        assert!((response.total_kw_exact - 100.0 / 16.25).abs() < 1e-12);

        let logged = history.with_history(|h| h.recent(1));
        assert_eq!(logged[0].kind, CalculationKind::MoneyToKw);
        assert_eq!(logged[0].consumption, Some(response.total_kw_exact));
    }

    #[test]
    fn test_money_to_kw_rejects_zero_amount() {
        let config = ConfigState::default();
        let history = HistoryState::new();

        let err = money_to_kw(
            &config,
            &history,
            MoneyToKwRequest {
                category: "factory".to_string(),
                amount: 0.0,
            },
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
        assert!(history.with_history(History::is_empty));
    }

    #[test]
    fn test_money_to_kw_residential_round_trip() {
        let config = ConfigState::default();
        let history = HistoryState::new();

        let response = money_to_kw(
            &config,
            &history,
            MoneyToKwRequest {
                category: "residential".to_string(),
                amount: 24865.5,
            },
        )
        .unwrap();
        assert_eq!(response.total_kw, 2499.0);
    }
}
