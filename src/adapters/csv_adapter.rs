//! CSV universe data adapter.
//!
//! One file per date, named `YYYYMMDD.csv`, with a header row followed by one
//! line per transaction:
//!
//! `symbol,amount,minimum_execution_price,maximum_execution_price,usd_value,buyback_percentage,volume_percentage,usd_market_cap`

use crate::domain::batch::DatedBatch;
use crate::domain::error::ScreenError;
use crate::domain::transaction::InsiderTransaction;
use crate::ports::data_port::UniverseDataPort;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_DATE_FORMAT: &str = "%Y%m%d";

const COLUMNS: [&str; 8] = [
    "symbol",
    "amount",
    "minimum_execution_price",
    "maximum_execution_price",
    "usd_value",
    "buyback_percentage",
    "volume_percentage",
    "usd_market_cap",
];

pub struct CsvUniverseAdapter {
    base_path: PathBuf,
}

impl CsvUniverseAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, date: NaiveDate) -> PathBuf {
        self.base_path
            .join(format!("{}.csv", date.format(FILE_DATE_FORMAT)))
    }
}

fn parse_error(path: &Path, line: u64, column: &str, reason: String) -> ScreenError {
    ScreenError::DataParse {
        file: path.display().to_string(),
        line,
        column: column.to_string(),
        reason,
    }
}

fn decimal_field(
    record: &csv::StringRecord,
    index: usize,
    path: &Path,
    line: u64,
) -> Result<Decimal, ScreenError> {
    let column = COLUMNS[index];
    let raw = record
        .get(index)
        .ok_or_else(|| parse_error(path, line, column, "missing column".into()))?
        .trim();
    if raw.is_empty() {
        return Err(parse_error(path, line, column, "empty value".into()));
    }
    raw.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| parse_error(path, line, column, format!("invalid decimal '{}': {}", raw, e)))
}

/// Columns are read by position, so the header must name them in order.
fn check_header(header: &csv::StringRecord, path: &Path) -> Result<(), ScreenError> {
    for (index, expected) in COLUMNS.iter().enumerate() {
        match header.get(index).map(str::trim) {
            Some(found) if found == *expected => {}
            Some(found) => {
                return Err(parse_error(
                    path,
                    1,
                    expected,
                    format!("header has '{}' where '{}' is expected", found, expected),
                ));
            }
            None => return Err(parse_error(path, 1, expected, "missing header column".into())),
        }
    }
    Ok(())
}

impl UniverseDataPort for CsvUniverseAdapter {
    fn available_dates(&self) -> Result<Vec<NaiveDate>, ScreenError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| ScreenError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut dates = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ScreenError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if let Some(stem) = name_str.strip_suffix(".csv") {
                if let Ok(date) = NaiveDate::parse_from_str(stem, FILE_DATE_FORMAT) {
                    dates.push(date);
                }
            }
        }

        dates.sort();
        Ok(dates)
    }

    fn fetch_batch(&self, date: NaiveDate) -> Result<DatedBatch, ScreenError> {
        let path = self.csv_path(date);
        if !path.exists() {
            return Ok(DatedBatch::new(date, Vec::new()));
        }

        let content = fs::read_to_string(&path).map_err(|e| ScreenError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let header = rdr.headers().map_err(|e| ScreenError::DataSource {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        check_header(header, &path)?;

        let mut records = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| ScreenError::DataSource {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            let symbol = record
                .get(0)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| parse_error(&path, line, COLUMNS[0], "missing symbol".into()))?;

            records.push(InsiderTransaction {
                symbol: symbol.to_string(),
                date,
                amount: decimal_field(&record, 1, &path, line)?,
                minimum_execution_price: decimal_field(&record, 2, &path, line)?,
                maximum_execution_price: decimal_field(&record, 3, &path, line)?,
                usd_value: decimal_field(&record, 4, &path, line)?,
                buyback_percentage: decimal_field(&record, 5, &path, line)?,
                volume_percentage: decimal_field(&record, 6, &path, line)?,
                usd_market_cap: decimal_field(&record, 7, &path, line)?,
            });
        }

        Ok(DatedBatch::new(date, records))
    }
}
