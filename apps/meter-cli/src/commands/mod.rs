//! # Commands
//!
//! Request → engine → response functions. Each takes only the state it
//! needs and returns plain serializable values.
//!
//! ## Command Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  calculate.rs  kw_to_money, money_to_kw     (ConfigState, HistoryState) │
//! │  rates.rs      get_rates                    (ConfigState)               │
//! │  history.rs    get_history, clear_history   (HistoryState)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod calculate;
pub mod history;
pub mod rates;
