//! Insider buyback transaction record.
//!
//! One row of the universe data source: what a company disclosed about a
//! share buyback on a given date, together with its market capitalisation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsiderTransaction {
    pub symbol: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub minimum_execution_price: Decimal,
    pub maximum_execution_price: Decimal,
    pub usd_value: Decimal,
    /// Fraction of outstanding shares bought back, on a 0-1 scale.
    pub buyback_percentage: Decimal,
    pub volume_percentage: Decimal,
    pub usd_market_cap: Decimal,
}

impl InsiderTransaction {
    /// Audit line: symbol followed by the seven numeric fields, comma separated.
    pub fn audit_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InsiderTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{}",
            self.symbol,
            self.amount,
            self.minimum_execution_price,
            self.maximum_execution_price,
            self.usd_value,
            self.buyback_percentage,
            self.volume_percentage,
            self.usd_market_cap
        )
    }
}
