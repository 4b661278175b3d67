//! Per-date batches of universe records.

use crate::domain::transaction::InsiderTransaction;
use chrono::NaiveDate;

/// Every record the data source delivered for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedBatch {
    pub date: NaiveDate,
    pub records: Vec<InsiderTransaction>,
}

impl DatedBatch {
    pub fn new(date: NaiveDate, records: Vec<InsiderTransaction>) -> Self {
        Self { date, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
