//! Historical universe replay and its sanity check.
//!
//! Before a run starts, the last N dated batches preceding the start date are
//! pulled from the data source and checked: the count must match exactly and
//! no batch may be empty. Any violation is fatal.

use crate::domain::batch::DatedBatch;
use crate::domain::error::{HistoryError, ScreenError};
use crate::domain::selection::SelectionCriteria;
use crate::ports::data_port::UniverseDataPort;
use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeSet;

pub const DEFAULT_HISTORY_DAYS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySettings {
    pub days: usize,
    /// Also fail when a batch has records but none of them pass the filter.
    pub require_selection: bool,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            days: DEFAULT_HISTORY_DAYS,
            require_selection: false,
        }
    }
}

/// The last `days` batches strictly before `as_of`, ascending by date.
///
/// If the source does not reach back far enough, fewer batches come back.
/// That short history is not accepted: [`validate_history`] rejects it with
/// [`HistoryError::UnexpectedCount`].
pub fn request_history(
    data_port: &dyn UniverseDataPort,
    as_of: NaiveDate,
    days: usize,
) -> Result<Vec<DatedBatch>, ScreenError> {
    let dates = data_port.available_dates()?;
    let before: Vec<NaiveDate> = dates.into_iter().filter(|d| *d < as_of).collect();
    let skip = before.len().saturating_sub(days);

    let batches = before[skip..]
        .iter()
        .map(|d| data_port.fetch_batch(*d))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "history: requested {} days before {}, got {}",
        days,
        as_of,
        batches.len()
    );
    Ok(batches)
}

/// Check the history and return each batch's selection, in batch order.
///
/// Every batch is filtered exactly once, so each record gets one audit line.
pub fn validate_history(
    batches: &[DatedBatch],
    expected: usize,
    criteria: &SelectionCriteria,
    require_selection: bool,
) -> Result<Vec<BTreeSet<String>>, HistoryError> {
    if batches.len() != expected {
        return Err(HistoryError::UnexpectedCount {
            expected,
            actual: batches.len(),
        });
    }

    if let Some(batch) = batches.iter().find(|b| b.is_empty()) {
        return Err(HistoryError::EmptyBatch { date: batch.date });
    }

    let mut selections = Vec::with_capacity(batches.len());
    for batch in batches {
        let selected = criteria.select(&batch.records);
        if require_selection && selected.is_empty() {
            return Err(HistoryError::EmptySelection { date: batch.date });
        }
        selections.push(selected);
    }

    Ok(selections)
}
