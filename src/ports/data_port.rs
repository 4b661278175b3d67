//! Universe data access port trait.

use crate::domain::batch::DatedBatch;
use crate::domain::error::ScreenError;
use chrono::NaiveDate;

pub trait UniverseDataPort {
    /// Dates for which the source holds a batch, ascending.
    fn available_dates(&self) -> Result<Vec<NaiveDate>, ScreenError>;

    /// The batch for a single date. A date with no data yields an empty batch.
    fn fetch_batch(&self, date: NaiveDate) -> Result<DatedBatch, ScreenError>;

    /// Default implementation: one `fetch_batch` per available date inside
    /// `[start_date, end_date]`.
    fn fetch_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<DatedBatch>, ScreenError> {
        self.available_dates()?
            .into_iter()
            .filter(|d| *d >= start_date && *d <= end_date)
            .map(|d| self.fetch_batch(d))
            .collect()
    }
}
