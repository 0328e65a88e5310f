//! # Rate Commands

use tracing::debug;

use meter_core::TariffTable;

use crate::state::ConfigState;

/// Returns the active tariff table.
///
/// Serializes to the same JSON shape `--tariff` files use, so the output of
/// `meter rates --json` can be edited and fed back in.
pub fn get_rates(config: &ConfigState) -> TariffTable {
    debug!(source = ?config.tariff_path, "get_rates command");
    config.tariff.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_rates_round_trips_through_json() {
        let config = ConfigState::default();
        let json = serde_json::to_string(&get_rates(&config)).unwrap();
        assert_eq!(TariffTable::from_json(&json).unwrap(), config.tariff);
    }
}
