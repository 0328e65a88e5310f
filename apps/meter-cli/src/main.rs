//! # meter: Electricity Meter Calculator
//!
//! ```text
//! meter cost    --category residential --previous 1200 --current 1450
//! meter budget  --category commercial --amount 500
//! meter rates   [--json]
//! meter session [--tariff rates.json]
//! ```
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (stderr)
//! 3. Build ConfigState (`--tariff` over env)
//! 4. Run one command, or the session loop

use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use meter_cli::commands::calculate::{kw_to_money, money_to_kw, KwToMoneyRequest, MoneyToKwRequest};
use meter_cli::commands::rates::get_rates;
use meter_cli::output::render_error;
use meter_cli::session::run_session;
use meter_cli::{ApiError, ConfigState, HistoryState, OutputFormat, Render};

#[derive(Parser)]
#[command(name = "meter", version, about = "Electricity meter tariff calculator")]
struct Cli {
    /// JSON tariff table to use instead of the standard schedule
    #[arg(long, global = true)]
    tariff: Option<PathBuf>,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Cost of the consumption between two meter readings
    Cost {
        /// residential, commercial or factory
        #[arg(long)]
        category: String,
        /// Previous meter reading
        #[arg(long, allow_negative_numbers = true)]
        previous: f64,
        /// Current meter reading
        #[arg(long, allow_negative_numbers = true)]
        current: f64,
    },
    /// Units an amount of money buys
    Budget {
        /// residential, commercial or factory
        #[arg(long)]
        category: String,
        /// Amount to spend
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
    },
    /// Show the active tariff table
    Rates,
    /// Read commands from stdin, keeping history for the session
    Session,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    meter_cli::init_tracing();

    let config = match ConfigState::from_env(cli.tariff) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    info!(
        tariff = ?config.tariff_path,
        history_limit = config.history_limit,
        "Starting meter calculator"
    );

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    // Only `session` keeps history past a single command.
    let history = HistoryState::new();

    let rendered = match cli.cmd {
        Command::Cost {
            category,
            previous,
            current,
        } => kw_to_money(
            &config,
            &history,
            KwToMoneyRequest {
                category,
                previous_reading: previous,
                current_reading: current,
            },
        )
        .and_then(|response| response.render(format)),
        Command::Budget { category, amount } => {
            money_to_kw(&config, &history, MoneyToKwRequest { category, amount })
                .and_then(|response| response.render(format))
        }
        Command::Rates => get_rates(&config).render(format),
        Command::Session => {
            let stdin = io::stdin();
            return match run_session(&config, &history, format, stdin.lock(), io::stdout()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::FAILURE
                }
            };
        }
    };

    report(rendered, format)
}

fn report(rendered: Result<String, ApiError>, format: OutputFormat) -> ExitCode {
    match rendered {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            match format {
                OutputFormat::Json => println!("{}", render_error(&e, format)),
                OutputFormat::Text => eprintln!("{}", render_error(&e, format)),
            }
            ExitCode::FAILURE
        }
    }
}
