//! # Output Rendering
//!
//! Turns command responses into text tables or JSON.
//!
//! Numbers are printed with two decimals and no currency symbol.

use serde::Serialize;
use std::fmt::Write as _;

use meter_core::{TariffCategory, TariffTable};

use crate::commands::calculate::{KwToMoneyResponse, MoneyToKwResponse};
use crate::commands::history::ClearHistoryResponse;
use crate::error::ApiError;
use crate::state::{CalculationKind, HistoryEntry};

/// How responses are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Aligned, human-readable text.
    #[default]
    Text,
    /// One pretty-printed JSON document per response.
    Json,
}

/// Something the CLI can print in either format.
pub trait Render: Serialize {
    fn render_text(&self) -> String;

    fn render(&self, format: OutputFormat) -> Result<String, ApiError> {
        match format {
            OutputFormat::Text => Ok(self.render_text()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Renders an error; JSON mode keeps the `{ code, message }` shape.
pub fn render_error(error: &ApiError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("error: {}", error.message),
        OutputFormat::Json => serde_json::to_string_pretty(error)
            .unwrap_or_else(|_| format!("{{\"message\":{:?}}}", error.message)),
    }
}

impl Render for KwToMoneyResponse {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Category:     {}", self.category);
        let _ = writeln!(out, "Consumption:  {:.2}", self.consumption);
        let _ = writeln!(out, "Breakdown:");
        for line in &self.breakdown {
            let _ = writeln!(
                out,
                "  {:<12} {:>12.2} x {:>6.2} = {:>12.2}",
                line.tier_label, line.units_in_tier, line.rate_per_unit, line.cost_in_tier
            );
        }
        let _ = write!(out, "Total cost:   {:.2}", self.total_cost);
        out
    }
}

impl Render for MoneyToKwResponse {
    fn render_text(&self) -> String {
        format!(
            "Category:     {}\nAmount:       {:.2}\nConsumption:  {}",
            self.category, self.amount, self.total_kw
        )
    }
}

impl Render for TariffTable {
    fn render_text(&self) -> String {
        let mut out = String::new();
        for category in self.categories() {
            let Ok(schedule) = self.rates_for(category) else {
                continue;
            };
            match schedule {
                TariffCategory::Progressive(progressive) => {
                    let _ = writeln!(out, "{category} (progressive)");
                    for tier in progressive.tiers() {
                        let _ = writeln!(out, "  {:<12} {:>6.2}", tier.label(), tier.rate_per_unit);
                    }
                }
                TariffCategory::Flat(flat) => {
                    let _ = writeln!(out, "{category} (flat)");
                    let _ = writeln!(
                        out,
                        "  {:<12} {:>6.2}",
                        meter_core::tariff::FLAT_TIER_LABEL,
                        flat.rate_per_unit()
                    );
                }
            }
        }
        out.trim_end().to_string()
    }
}

impl Render for Vec<HistoryEntry> {
    fn render_text(&self) -> String {
        if self.is_empty() {
            return "No calculations yet".to_string();
        }

        self.iter()
            .map(|entry| {
                let when = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
                match entry.kind {
                    CalculationKind::KwToMoney => format!(
                        "{when}  {:<12} consumption {:>10.2}  cost {:>12.2}",
                        entry.category.as_str(),
                        entry.consumption.unwrap_or_default(),
                        entry.total_cost.unwrap_or_default()
                    ),
                    CalculationKind::MoneyToKw => format!(
                        "{when}  {:<12} amount {:>15.2}  units {:>11.2}",
                        entry.category.as_str(),
                        entry.amount.unwrap_or_default(),
                        entry.consumption.unwrap_or_default()
                    ),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Render for ClearHistoryResponse {
    fn render_text(&self) -> String {
        format!("Cleared {} entries", self.deleted_count)
    }
}
