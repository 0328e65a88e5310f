//! # History Commands
//!
//! Read and clear the in-memory calculation log.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::state::{ConfigState, HistoryEntry, HistoryState};

/// Response for [`clear_history`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearHistoryResponse {
    pub deleted_count: usize,
}

/// Returns the most recent entries, newest first.
///
/// ## Arguments
/// * `limit` - Maximum entries (default: `config.history_limit`)
pub fn get_history(
    config: &ConfigState,
    history: &HistoryState,
    limit: Option<usize>,
) -> Vec<HistoryEntry> {
    let limit = limit.unwrap_or(config.history_limit);
    debug!(limit, "get_history command");
    history.with_history(|h| h.recent(limit))
}

/// Empties the log.
pub fn clear_history(history: &HistoryState) -> ClearHistoryResponse {
    let deleted_count = history.with_history_mut(|h| h.clear());
    info!(deleted_count, "History cleared");
    ClearHistoryResponse { deleted_count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::calculate::{money_to_kw, MoneyToKwRequest};

    fn record(config: &ConfigState, history: &HistoryState, amount: f64) {
        money_to_kw(
            config,
            history,
            MoneyToKwRequest {
                category: "factory".to_string(),
                amount,
            },
        )
        .unwrap();
    }

    #[test]
    fn test_get_history_uses_configured_limit() {
        let config = ConfigState {
            history_limit: 3,
            ..ConfigState::default()
        };
        let history = HistoryState::new();
        for amount in [10.0, 20.0, 30.0, 40.0, 50.0] {
            record(&config, &history, amount);
        }

        let default_view = get_history(&config, &history, None);
        let amounts: Vec<Option<f64>> = default_view.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, [Some(50.0), Some(40.0), Some(30.0)]);

        assert_eq!(get_history(&config, &history, Some(100)).len(), 5);
    }

    #[test]
    fn test_clear_history() {
        let config = ConfigState::default();
        let history = HistoryState::new();
        record(&config, &history, 10.0);

        assert_eq!(clear_history(&history).deleted_count, 1);
        assert!(get_history(&config, &history, None).is_empty());
    }
}
