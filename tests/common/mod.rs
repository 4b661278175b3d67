#![allow(dead_code)]

use chrono::NaiveDate;
use insider_screen::cli::ScreenSettings;
use insider_screen::domain::batch::DatedBatch;
use insider_screen::domain::error::ScreenError;
use insider_screen::domain::history::HistorySettings;
use insider_screen::domain::replay::{ReplayConfig, Resolution};
use insider_screen::domain::selection::SelectionCriteria;
pub use insider_screen::domain::transaction::InsiderTransaction;
use insider_screen::ports::data_port::UniverseDataPort;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

pub struct MockUniverseDataPort {
    pub batches: BTreeMap<NaiveDate, Vec<InsiderTransaction>>,
    pub errors: HashMap<NaiveDate, String>,
}

impl MockUniverseDataPort {
    pub fn new() -> Self {
        Self {
            batches: BTreeMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_records(mut self, date: NaiveDate, records: Vec<InsiderTransaction>) -> Self {
        self.batches.insert(date, records);
        self
    }

    pub fn with_error(mut self, date: NaiveDate, reason: &str) -> Self {
        self.batches.entry(date).or_default();
        self.errors.insert(date, reason.to_string());
        self
    }
}

impl UniverseDataPort for MockUniverseDataPort {
    fn available_dates(&self) -> Result<Vec<NaiveDate>, ScreenError> {
        Ok(self.batches.keys().copied().collect())
    }

    fn fetch_batch(&self, date: NaiveDate) -> Result<DatedBatch, ScreenError> {
        if let Some(reason) = self.errors.get(&date) {
            return Err(ScreenError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(DatedBatch::new(
            date,
            self.batches.get(&date).cloned().unwrap_or_default(),
        ))
    }
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_tx(symbol: &str, on: NaiveDate, buyback: &str, market_cap: &str) -> InsiderTransaction {
    InsiderTransaction {
        symbol: symbol.to_string(),
        date: on,
        amount: dec("25000"),
        minimum_execution_price: dec("41.10"),
        maximum_execution_price: dec("42.35"),
        usd_value: dec("1043000"),
        buyback_percentage: dec(buyback),
        volume_percentage: dec("0.08"),
        usd_market_cap: dec(market_cap),
    }
}

/// Weekdays (Mon-Fri) from `start`, `count` of them.
pub fn trading_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    use chrono::{Datelike, Weekday};
    start
        .iter_days()
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(count)
        .collect()
}

/// A source with one large-cap buyback on each trading day from 2022-01-31,
/// ten days before the 2022-02-14 start, and the five days of the window.
pub fn february_source() -> MockUniverseDataPort {
    let mut port = MockUniverseDataPort::new();
    for d in trading_days(date(2022, 1, 31), 15) {
        port = port.with_records(
            d,
            vec![
                make_tx("AAA", d, "0.01", "200000000"),
                make_tx("BBB", d, "0.001", "500000000"),
            ],
        );
    }
    port
}

pub fn sample_settings() -> ScreenSettings {
    ScreenSettings {
        data_path: PathBuf::from("unused"),
        replay: ReplayConfig {
            start_date: date(2022, 2, 14),
            end_date: date(2022, 2, 18),
            initial_cash: Decimal::from(100_000),
            resolution: Resolution::Daily,
        },
        criteria: SelectionCriteria::default(),
        history: HistorySettings::default(),
    }
}
