//! # Application State
//!
//! Each command only takes the state it needs:
//!
//! - [`ConfigState`] - tariff table and display settings (read-only)
//! - [`HistoryState`] - in-memory calculation log (`Arc<Mutex>`)

pub mod config;
pub mod history;

pub use config::ConfigState;
pub use history::{CalculationKind, History, HistoryEntry, HistoryState};
