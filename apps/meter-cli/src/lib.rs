//! # meter-cli Library
//!
//! Host for the meter tariff engine: configuration, logging, history and the
//! command layer. The `meter` binary is a thin wrapper over this crate.
//!
//! ## Module Organization
//! ```text
//! meter_cli/
//! ├── lib.rs          ◄─── You are here (logging setup)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── Tariff table + display settings
//! │   └── history.rs  ◄─── In-memory calculation log
//! ├── commands/
//! │   ├── calculate.rs◄─── kw_to_money, money_to_kw
//! │   ├── rates.rs    ◄─── get_rates
//! │   └── history.rs  ◄─── get_history, clear_history
//! ├── output.rs       ◄─── Text / JSON rendering
//! ├── session.rs      ◄─── Interactive line loop
//! └── error.rs        ◄─── ApiError, ConfigError
//! ```
//!
//! ## State Management (Multiple State Types)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────────┐        ┌──────────────────────┐              │
//! │  │    ConfigState       │        │    HistoryState      │              │
//! │  │  • Tariff table      │        │  • Arc<Mutex<History>│              │
//! │  │  • History limit     │        │  • Append-only       │              │
//! │  │  • Display decimals  │        │                      │              │
//! │  └──────────────────────┘        └──────────────────────┘              │
//! │                                                                         │
//! │  Each command only takes the state it needs.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod output;
pub mod session;
pub mod state;

use tracing_subscriber::EnvFilter;

pub use error::{ApiError, ConfigError, ErrorCode};
pub use output::{OutputFormat, Render};
pub use state::{ConfigState, HistoryState};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn,meter_cli=info";

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=meter_cli=trace` - Trace the host only
/// - Default: [`DEFAULT_LOG_FILTER`]
///
/// Logs go to stderr so stdout stays clean for `--json` output.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
