//! Daily universe replay over the backtest window.
//!
//! ReplayConfig defines the window and account settings; `run_replay` walks
//! the dated batches in order, selecting and diffing one date at a time.

use crate::domain::changes::SecurityChanges;
use crate::domain::error::ScreenError;
use crate::domain::selection::SelectionCriteria;
use crate::ports::data_port::UniverseDataPort;
use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Data resolution for securities added by universe selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resolution {
    #[default]
    Daily,
    Hour,
    Minute,
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Resolution::Daily),
            "hour" | "hourly" => Ok(Resolution::Hour),
            "minute" => Ok(Resolution::Minute),
            other => Err(format!("unknown resolution '{other}' (expected daily, hour or minute)")),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resolution::Daily => "daily",
            Resolution::Hour => "hour",
            Resolution::Minute => "minute",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_cash: Decimal,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionStep {
    pub date: NaiveDate,
    pub record_count: usize,
    pub selected: BTreeSet<String>,
    pub changes: SecurityChanges,
}

#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub steps: Vec<SelectionStep>,
}

impl ReplayResult {
    pub fn final_selection(&self) -> BTreeSet<String> {
        self.steps
            .last()
            .map(|s| s.selected.clone())
            .unwrap_or_default()
    }

    /// Number of dates on which the selection changed.
    pub fn change_count(&self) -> usize {
        self.steps.iter().filter(|s| !s.changes.is_empty()).count()
    }
}

pub fn run_replay(
    data_port: &dyn UniverseDataPort,
    criteria: &SelectionCriteria,
    config: &ReplayConfig,
) -> Result<ReplayResult, ScreenError> {
    let batches = data_port.fetch_range(config.start_date, config.end_date)?;
    if batches.is_empty() {
        return Err(ScreenError::NoData {
            start: config.start_date,
            end: config.end_date,
        });
    }

    info!(
        "replaying {} dates from {} to {} ({} resolution, cash {})",
        batches.len(),
        config.start_date,
        config.end_date,
        config.resolution,
        config.initial_cash
    );

    let mut previous = BTreeSet::new();
    let mut steps = Vec::with_capacity(batches.len());

    for batch in &batches {
        let selected = criteria.select(&batch.records);
        let changes = SecurityChanges::between(&previous, &selected);
        if !changes.is_empty() {
            info!("{}: {}", batch.date, changes);
        }

        steps.push(SelectionStep {
            date: batch.date,
            record_count: batch.len(),
            selected: selected.clone(),
            changes,
        });
        previous = selected;
    }

    Ok(ReplayResult { steps })
}
