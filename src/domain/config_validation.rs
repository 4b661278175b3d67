//! Configuration validation.
//!
//! Validates all config fields before a replay runs.

use crate::domain::error::ScreenError;
use crate::domain::history::DEFAULT_HISTORY_DAYS;
use crate::domain::replay::Resolution;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), ScreenError> {
    validate_dates(config)?;
    validate_initial_cash(config)?;
    validate_resolution(config)?;
    validate_data_path(config)?;
    validate_thresholds(config)?;
    validate_history_section(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> ScreenError {
    ScreenError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn typed<T>(
    value: Result<Option<T>, String>,
    section: &str,
    key: &str,
) -> Result<Option<T>, ScreenError> {
    value.map_err(|reason| invalid(section, key, reason))
}

/// Required `[backtest]` date.
pub fn read_date(config: &dyn ConfigPort, field: &str) -> Result<NaiveDate, ScreenError> {
    typed(config.get_date("backtest", field), "backtest", field)?.ok_or_else(|| {
        ScreenError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }
    })
}

/// Optional decimal key. Absent keys yield `None`.
pub fn read_decimal(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<Decimal>, ScreenError> {
    typed(config.get_decimal(section, key), section, key)
}

pub fn read_bool(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<bool>, ScreenError> {
    typed(config.get_bool(section, key), section, key)
}

/// `[history] days`, defaulting to [`DEFAULT_HISTORY_DAYS`]. Must be at least 1.
pub fn read_history_days(config: &dyn ConfigPort) -> Result<usize, ScreenError> {
    let Some(days) = typed(config.get_int("history", "days"), "history", "days")? else {
        return Ok(DEFAULT_HISTORY_DAYS);
    };
    if days < 1 {
        return Err(invalid("history", "days", "days must be at least 1"));
    }
    usize::try_from(days).map_err(|_| invalid("history", "days", format!("{} is too large", days)))
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), ScreenError> {
    let start_date = read_date(config, "start_date")?;
    let end_date = read_date(config, "end_date")?;

    if start_date > end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must not be after end_date",
        ));
    }
    Ok(())
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), ScreenError> {
    if let Some(cash) = read_decimal(config, "backtest", "initial_cash")? {
        if cash <= Decimal::ZERO {
            return Err(invalid(
                "backtest",
                "initial_cash",
                "initial_cash must be positive",
            ));
        }
    }
    Ok(())
}

fn validate_resolution(config: &dyn ConfigPort) -> Result<(), ScreenError> {
    if let Some(value) = config.get_string("backtest", "resolution") {
        value
            .parse::<Resolution>()
            .map_err(|reason| invalid("backtest", "resolution", reason))?;
    }
    Ok(())
}

fn validate_data_path(config: &dyn ConfigPort) -> Result<(), ScreenError> {
    match config.get_string("data", "path") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(ScreenError::ConfigMissing {
            section: "data".to_string(),
            key: "path".to_string(),
        }),
    }
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), ScreenError> {
    for key in ["min_buyback_percentage", "min_usd_market_cap"] {
        if let Some(value) = read_decimal(config, "universe", key)? {
            if value.is_sign_negative() {
                return Err(invalid("universe", key, format!("{} must be non-negative", key)));
            }
        }
    }
    Ok(())
}

fn validate_history_section(config: &dyn ConfigPort) -> Result<(), ScreenError> {
    read_history_days(config)?;
    read_bool(config, "history", "require_selection")?;
    Ok(())
}
