//! # History State
//!
//! Append-only log of past calculations for the running process.
//!
//! ## Log Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  entries (oldest → newest)                                              │
//! │  ┌──────┬──────┬──────┬─────┬──────┐                                   │
//! │  │  #1  │  #2  │  #3  │ ... │  #n  │ ◄── push()                         │
//! │  └──────┴──────┴──────┴─────┴──────┘                                   │
//! │                                                                         │
//! │  recent(10) → [#n, #n-1, ..., #n-9]   newest first, nothing removed     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is written to disk. Truncation happens only when reading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use meter_core::{BudgetResult, CalculationResult, Category, TierContribution};

// =============================================================================
// History Entry
// =============================================================================

/// Which direction a logged calculation ran in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationKind {
    /// Readings → cost.
    KwToMoney,
    /// Amount → units.
    MoneyToKw,
}

/// One logged calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub kind: CalculationKind,
    pub category: Category,
    pub previous_reading: Option<f64>,
    pub current_reading: Option<f64>,
    pub consumption: Option<f64>,
    pub amount: Option<f64>,
    pub total_cost: Option<f64>,
    pub breakdown: Option<Vec<TierContribution>>,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    /// Logs a readings → cost calculation.
    pub fn kw_to_money(
        category: Category,
        previous_reading: f64,
        current_reading: f64,
        result: &CalculationResult,
    ) -> Self {
        HistoryEntry {
            id: Uuid::new_v4().to_string(),
            kind: CalculationKind::KwToMoney,
            category,
            previous_reading: Some(previous_reading),
            current_reading: Some(current_reading),
            consumption: Some(result.total_units),
            amount: None,
            total_cost: Some(result.total_cost),
            breakdown: Some(result.breakdown.clone()),
            timestamp: Utc::now(),
        }
    }

    /// Logs an amount → units calculation. Consumption is stored unrounded.
    pub fn money_to_kw(category: Category, result: &BudgetResult) -> Self {
        HistoryEntry {
            id: Uuid::new_v4().to_string(),
            kind: CalculationKind::MoneyToKw,
            category,
            previous_reading: None,
            current_reading: None,
            consumption: Some(result.units),
            amount: Some(result.amount),
            total_cost: None,
            breakdown: None,
            timestamp: Utc::now(),
        }
    }
}

// =============================================================================
// History
// =============================================================================

/// The log itself.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Creates an empty log.
    pub fn new() -> Self {
        History::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        self.entries.iter().rev().take(limit).cloned().collect()
    }

    /// Drops every entry and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared history handle.
///
/// ## Thread Safety
/// `Arc<Mutex<History>>`: every operation is a short append or copy. A
/// poisoned lock is recovered rather than propagated, since no operation can
/// leave the log half-written.
#[derive(Debug, Clone, Default)]
pub struct HistoryState {
    history: Arc<Mutex<History>>,
}

impl HistoryState {
    /// Creates a new empty history state.
    pub fn new() -> Self {
        HistoryState::default()
    }

    /// Executes a function with read access to the log.
    pub fn with_history<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&History) -> R,
    {
        let history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        f(&history)
    }

    /// Executes a function with write access to the log.
    pub fn with_history_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut History) -> R,
    {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_core::TariffTable;

    fn budget_entry(amount: f64) -> HistoryEntry {
        let result = TariffTable::standard()
            .units_for_budget(Category::Factory, amount)
            .unwrap();
        HistoryEntry::money_to_kw(Category::Factory, &result)
    }

    #[test]
    fn test_recent_is_newest_first_and_limited() {
        let mut history = History::new();
        for amount in 1..=12 {
            history.push(budget_entry(f64::from(amount)));
        }

        let recent = history.recent(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].amount, Some(12.0));
        assert_eq!(recent[9].amount, Some(3.0));

        // Display truncation does not drop anything.
        assert_eq!(history.len(), 12);
    }

    #[test]
    fn test_clear_reports_count() {
        let mut history = History::new();
        history.push(budget_entry(5.0));
        history.push(budget_entry(6.0));
        assert_eq!(history.clear(), 2);
        assert!(history.is_empty());
        assert_eq!(history.clear(), 0);
    }

    #[test]
    fn test_kw_to_money_entry_fields() {
        let result = TariffTable::standard()
            .cost(Category::Residential, 250.0)
            .unwrap();
        let entry = HistoryEntry::kw_to_money(Category::Residential, 1000.0, 1250.0, &result);

        assert_eq!(entry.kind, CalculationKind::KwToMoney);
        assert_eq!(entry.consumption, Some(250.0));
        assert_eq!(entry.breakdown.as_ref().map(Vec::len), Some(2));
        assert!(Uuid::parse_str(&entry.id).is_ok());

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "kw_to_money");
        assert_eq!(json["category"], "residential");
        assert_eq!(json["previousReading"], 1000.0);
        assert!(json["amount"].is_null());
    }

    #[test]
    fn test_state_is_shared_between_clones() {
        let state = HistoryState::new();
        let other = state.clone();
        other.with_history_mut(|h| h.push(budget_entry(7.0)));
        assert_eq!(state.with_history(History::len), 1);
    }
}
