//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvUniverseAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    read_bool, read_date, read_decimal, read_history_days, validate_config,
};
use crate::domain::error::ScreenError;
use crate::domain::history::{request_history, validate_history, HistorySettings};
use crate::domain::replay::{run_replay, ReplayConfig, ReplayResult, Resolution};
use crate::domain::selection::{
    default_min_buyback_percentage, default_min_usd_market_cap, SelectionCriteria,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::UniverseDataPort;
use rust_decimal::Decimal;

#[derive(Parser, Debug)]
#[command(name = "insider-screen", about = "Insider buyback universe screener")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay universe selection over the backtest window
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Do not check historical data before the window
        #[arg(long)]
        skip_history: bool,
    },
    /// Select the universe for a single date
    Select {
        #[arg(short, long)]
        config: PathBuf,
        /// Date in YYYY-MM-DD format
        #[arg(long)]
        date: String,
    },
    /// Request and validate historical universe data before the backtest start
    History {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides [history] days
        #[arg(long, value_parser = parse_days)]
        days: Option<usize>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List dates available in the data directory
    ListDates {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Everything a run needs, resolved from the config file.
#[derive(Debug, Clone)]
pub struct ScreenSettings {
    pub data_path: PathBuf,
    pub replay: ReplayConfig,
    pub criteria: SelectionCriteria,
    pub history: HistorySettings,
}

/// One line of the `history` command output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub record_count: usize,
    pub selected_count: usize,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Run {
            config,
            skip_history,
        } => run_replay_command(&config, skip_history),
        Command::Select { config, date } => run_select(&config, &date),
        Command::History { config, days } => run_history(&config, days),
        Command::Validate { config } => run_validate(&config),
        Command::ListDates { config } => run_list_dates(&config),
    }
}

fn parse_days(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("days must be at least 1".to_string()),
        Ok(days) => Ok(days),
        Err(_) => Err(format!("'{}' is not a positive whole number", value)),
    }
}

fn fail(err: ScreenError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ScreenError> {
    FileConfigAdapter::from_file(path).map_err(|e| ScreenError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn build_replay_config(adapter: &dyn ConfigPort) -> Result<ReplayConfig, ScreenError> {
    let start_date = read_date(adapter, "start_date")?;
    let end_date = read_date(adapter, "end_date")?;

    let initial_cash = read_decimal(adapter, "backtest", "initial_cash")?
        .unwrap_or_else(|| Decimal::from(100_000));

    let resolution = match adapter.get_string("backtest", "resolution") {
        Some(s) => s
            .parse::<Resolution>()
            .map_err(|reason| ScreenError::ConfigInvalid {
                section: "backtest".into(),
                key: "resolution".into(),
                reason,
            })?,
        None => Resolution::default(),
    };

    Ok(ReplayConfig {
        start_date,
        end_date,
        initial_cash,
        resolution,
    })
}

pub fn build_selection_criteria(adapter: &dyn ConfigPort) -> Result<SelectionCriteria, ScreenError> {
    let min_buyback_percentage = read_decimal(adapter, "universe", "min_buyback_percentage")?
        .unwrap_or_else(default_min_buyback_percentage);
    let min_usd_market_cap = read_decimal(adapter, "universe", "min_usd_market_cap")?
        .unwrap_or_else(default_min_usd_market_cap);
    Ok(SelectionCriteria::new(min_buyback_percentage, min_usd_market_cap))
}

pub fn build_history_settings(adapter: &dyn ConfigPort) -> Result<HistorySettings, ScreenError> {
    Ok(HistorySettings {
        days: read_history_days(adapter)?,
        require_selection: read_bool(adapter, "history", "require_selection")?.unwrap_or(false),
    })
}

pub fn build_settings(adapter: &dyn ConfigPort) -> Result<ScreenSettings, ScreenError> {
    validate_config(adapter)?;

    let data_path = adapter
        .get_string("data", "path")
        .map(PathBuf::from)
        .ok_or_else(|| ScreenError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;

    Ok(ScreenSettings {
        data_path,
        replay: build_replay_config(adapter)?,
        criteria: build_selection_criteria(adapter)?,
        history: build_history_settings(adapter)?,
    })
}

fn load_settings(config_path: &PathBuf) -> Result<ScreenSettings, ScreenError> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    build_settings(&adapter)
}

/// Fetch the history preceding the backtest start and check it.
pub fn history_pipeline(
    data_port: &dyn UniverseDataPort,
    settings: &ScreenSettings,
) -> Result<Vec<HistoryRow>, ScreenError> {
    let batches = request_history(
        data_port,
        settings.replay.start_date,
        settings.history.days,
    )?;
    let selections = validate_history(
        &batches,
        settings.history.days,
        &settings.criteria,
        settings.history.require_selection,
    )?;

    Ok(batches
        .iter()
        .zip(&selections)
        .map(|(b, selected)| HistoryRow {
            date: b.date,
            record_count: b.len(),
            selected_count: selected.len(),
        })
        .collect())
}

pub fn select_pipeline(
    data_port: &dyn UniverseDataPort,
    criteria: &SelectionCriteria,
    date: NaiveDate,
) -> Result<BTreeSet<String>, ScreenError> {
    let batch = data_port.fetch_batch(date)?;
    Ok(criteria.select(&batch.records))
}

pub fn replay_pipeline(
    data_port: &dyn UniverseDataPort,
    settings: &ScreenSettings,
    skip_history: bool,
) -> Result<ReplayResult, ScreenError> {
    if !skip_history {
        let rows = history_pipeline(data_port, settings)?;
        eprintln!("History check passed: {} dated batches", rows.len());
    }
    run_replay(data_port, &settings.criteria, &settings.replay)
}

fn run_replay_command(config_path: &PathBuf, skip_history: bool) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let data_port = CsvUniverseAdapter::new(settings.data_path.clone());

    eprintln!(
        "Replaying universe: {} to {}",
        settings.replay.start_date, settings.replay.end_date
    );

    let result = match replay_pipeline(&data_port, &settings, skip_history) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    for step in &result.steps {
        println!(
            "{}\t{} records\t{} selected\t{}",
            step.date,
            step.record_count,
            step.selected.len(),
            step.changes
        );
    }

    let final_selection = result.final_selection();
    eprintln!("\n=== Final Universe ===");
    eprintln!("Dates replayed:   {}", result.steps.len());
    eprintln!("Selection changes: {}", result.change_count());
    eprintln!("Symbols:          {}", final_selection.len());
    for symbol in &final_selection {
        println!("{}", symbol);
    }
    ExitCode::SUCCESS
}

fn run_select(config_path: &PathBuf, date_str: &str) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let date = match NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        Ok(d) => d,
        Err(_) => {
            eprintln!("error: invalid date '{}', expected YYYY-MM-DD", date_str);
            return ExitCode::from(2);
        }
    };

    let data_port = CsvUniverseAdapter::new(settings.data_path.clone());
    match select_pipeline(&data_port, &settings.criteria, date) {
        Ok(selected) => {
            eprintln!("{}: {} symbols selected", date, selected.len());
            for symbol in &selected {
                println!("{}", symbol);
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_history(config_path: &PathBuf, days_override: Option<usize>) -> ExitCode {
    let mut settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    if let Some(days) = days_override {
        settings.history.days = days;
    }

    eprintln!(
        "Requesting {} days of history before {}",
        settings.history.days, settings.replay.start_date
    );
    let data_port = CsvUniverseAdapter::new(settings.data_path.clone());
    match history_pipeline(&data_port, &settings) {
        Ok(rows) => {
            for row in &rows {
                println!("{}\t{}\t{}", row.date, row.record_count, row.selected_count);
            }
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    match load_settings(config_path) {
        Ok(settings) => {
            eprintln!("Config validated successfully");
            eprintln!(
                "  window:     {} to {}",
                settings.replay.start_date, settings.replay.end_date
            );
            eprintln!("  cash:       {}", settings.replay.initial_cash);
            eprintln!("  resolution: {}", settings.replay.resolution);
            eprintln!("  data:       {}", settings.data_path.display());
            eprintln!(
                "  criteria:   buyback > {}, market cap > {}",
                settings.criteria.min_buyback_percentage, settings.criteria.min_usd_market_cap
            );
            eprintln!("  history:    {} days", settings.history.days);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_list_dates(config_path: &PathBuf) -> ExitCode {
    let settings = match load_settings(config_path) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let data_port = CsvUniverseAdapter::new(settings.data_path.clone());
    match data_port.available_dates() {
        Ok(dates) => {
            for d in &dates {
                println!("{}", d);
            }
            eprintln!("{} dates available", dates.len());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}
