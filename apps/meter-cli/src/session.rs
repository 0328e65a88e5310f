//! # Interactive Session
//!
//! Line-oriented loop that keeps one [`HistoryState`] for the lifetime of the
//! process, so `history` shows the calculations made earlier in the session.
//!
//! ## Grammar
//! ```text
//! cost    <category> <previous> <current>
//! budget  <category> <amount>
//! history [limit]
//! clear
//! rates
//! help
//! quit | exit
//! ```
//!
//! A bad line prints an error and the loop continues.

use std::io::{self, BufRead, Write};
use tracing::{debug, info};

use crate::commands::calculate::{kw_to_money, money_to_kw, KwToMoneyRequest, MoneyToKwRequest};
use crate::commands::history::{clear_history, get_history};
use crate::commands::rates::get_rates;
use crate::error::ApiError;
use crate::output::{render_error, OutputFormat, Render};
use crate::state::{ConfigState, HistoryState};

const HELP: &str = "\
commands:
  cost <category> <previous> <current>   readings -> cost
  budget <category> <amount>             amount -> units
  history [limit]                        recent calculations, newest first
  clear                                  forget all calculations
  rates                                  show the tariff table
  quit                                   leave the session";

/// One parsed session line.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Cost {
        category: String,
        previous: f64,
        current: f64,
    },
    Budget {
        category: String,
        amount: f64,
    },
    History(Option<usize>),
    Clear,
    Rates,
    Help,
    Quit,
}

/// Parses one line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>, ApiError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    let command = match parts.as_slice() {
        ["cost", category, previous, current] => SessionCommand::Cost {
            category: category.to_string(),
            previous: parse_number("previous", previous)?,
            current: parse_number("current", current)?,
        },
        ["cost", ..] => {
            return Err(ApiError::bad_request(
                "expected: cost <category> <previous> <current>",
            ))
        }
        ["budget", category, amount] => SessionCommand::Budget {
            category: category.to_string(),
            amount: parse_number("amount", amount)?,
        },
        ["budget", ..] => return Err(ApiError::bad_request("expected: budget <category> <amount>")),
        ["history"] => SessionCommand::History(None),
        ["history", limit] => SessionCommand::History(Some(limit.parse().map_err(|_| {
            ApiError::bad_request(format!("limit must be a whole number, got '{limit}'"))
        })?)),
        ["clear"] => SessionCommand::Clear,
        ["rates"] => SessionCommand::Rates,
        ["help"] | ["?"] => SessionCommand::Help,
        ["quit"] | ["exit"] => SessionCommand::Quit,
        [other, ..] => {
            return Err(ApiError::bad_request(format!(
                "unknown command '{other}' (try 'help')"
            )))
        }
        [] => return Ok(None),
    };

    Ok(Some(command))
}

fn parse_number(field: &str, raw: &str) -> Result<f64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("{field} must be a number, got '{raw}'")))
}

/// Runs one command against the session state and renders the response.
pub fn execute(
    config: &ConfigState,
    history: &HistoryState,
    command: SessionCommand,
    format: OutputFormat,
) -> Result<String, ApiError> {
    match command {
        SessionCommand::Cost {
            category,
            previous,
            current,
        } => kw_to_money(
            config,
            history,
            KwToMoneyRequest {
                category,
                previous_reading: previous,
                current_reading: current,
            },
        )?
        .render(format),
        SessionCommand::Budget { category, amount } => {
            money_to_kw(config, history, MoneyToKwRequest { category, amount })?.render(format)
        }
        SessionCommand::History(limit) => get_history(config, history, limit).render(format),
        SessionCommand::Clear => clear_history(history).render(format),
        SessionCommand::Rates => get_rates(config).render(format),
        SessionCommand::Help => Ok(HELP.to_string()),
        SessionCommand::Quit => Ok(String::new()),
    }
}

/// Reads commands from `input` until EOF or `quit`.
pub fn run_session<R, W>(
    config: &ConfigState,
    history: &HistoryState,
    format: OutputFormat,
    input: R,
    mut output: W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    info!("Session started");

    for line in input.lines() {
        let line = line?;
        let rendered = match parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(SessionCommand::Quit)) => break,
            Ok(Some(command)) => {
                debug!(?command, "Session command");
                execute(config, history, command, format)
            }
            Err(e) => Err(e),
        };

        match rendered {
            Ok(text) => writeln!(output, "{text}")?,
            Err(e) => writeln!(output, "{}", render_error(&e, format))?,
        }
        output.flush()?;
    }

    info!(entries = history.with_history(|h| h.len()), "Session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(script: &str, format: OutputFormat) -> (String, HistoryState) {
        let config = ConfigState::default();
        let history = HistoryState::new();
        let mut out = Vec::new();
        run_session(&config, &history, format, Cursor::new(script), &mut out).unwrap();
        (String::from_utf8(out).unwrap(), history)
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# note").unwrap(), None);
        assert_eq!(
            parse_line("cost residential 100 350").unwrap(),
            Some(SessionCommand::Cost {
                category: "residential".to_string(),
                previous: 100.0,
                current: 350.0
            })
        );
        assert_eq!(parse_line("history 3").unwrap(), Some(SessionCommand::History(Some(3))));
        assert_eq!(parse_line("exit").unwrap(), Some(SessionCommand::Quit));
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(parse_line("cost residential 100").is_err());
        assert!(parse_line("budget factory lots").is_err());
        assert!(parse_line("history -1").is_err());
        assert!(parse_line("refund 10").unwrap_err().message.contains("unknown command"));
    }

    #[test]
    fn test_session_keeps_history_until_quit() {
        let script = "\
cost residential 0 250
budget commercial 100
cost residential 500 400
history
quit
budget factory 10
";
        let (out, history) = run(script, OutputFormat::Text);

        assert!(out.contains("Total cost:   719.50"));
        assert!(out.contains("Consumption:  6.15"));
        assert!(out.contains("error: Current reading must be greater than previous reading"));
        // Only the two successful calculations, and nothing after quit.
        assert_eq!(history.with_history(|h| h.len()), 2);

        let history_block = out.rsplit("Consumption:  6.15").next().unwrap();
        let commercial = history_block.find("commercial").unwrap();
        let residential = history_block.find("residential").unwrap();
        assert!(commercial < residential, "newest entry should be listed first");
    }

    #[test]
    fn test_session_clear() {
        let (out, history) = run("budget factory 67.5\nclear\nhistory\n", OutputFormat::Text);
        assert!(out.contains("Cleared 1 entries"));
        assert!(out.contains("No calculations yet"));
        assert!(history.with_history(|h| h.is_empty()));
    }

    #[test]
    fn test_session_json_errors() {
        let (out, _) = run("budget industrial 10\n", OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["code"], "UNKNOWN_CATEGORY");
    }
}
