//! Point-in-time universe filter.
//!
//! Given every transaction record for one date, pick the symbols whose
//! buyback percentage and USD market cap both exceed fixed thresholds.

use crate::domain::transaction::InsiderTransaction;
use log::info;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

pub const AUDIT_TARGET: &str = "insider_screen::universe";

/// 0.5% of outstanding shares.
pub fn default_min_buyback_percentage() -> Decimal {
    Decimal::new(5, 3)
}

/// USD 100 million.
pub fn default_min_usd_market_cap() -> Decimal {
    Decimal::from(100_000_000u64)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionCriteria {
    pub min_buyback_percentage: Decimal,
    pub min_usd_market_cap: Decimal,
}

impl Default for SelectionCriteria {
    fn default() -> Self {
        Self {
            min_buyback_percentage: default_min_buyback_percentage(),
            min_usd_market_cap: default_min_usd_market_cap(),
        }
    }
}

impl SelectionCriteria {
    pub fn new(min_buyback_percentage: Decimal, min_usd_market_cap: Decimal) -> Self {
        Self {
            min_buyback_percentage,
            min_usd_market_cap,
        }
    }

    /// Both thresholds are strict: a record sitting exactly on either is excluded.
    pub fn accepts(&self, record: &InsiderTransaction) -> bool {
        record.buyback_percentage > self.min_buyback_percentage
            && record.usd_market_cap > self.min_usd_market_cap
    }

    /// Log every record, then return the symbols of the accepted ones.
    ///
    /// Records with the same symbol are judged independently; the symbol is
    /// selected if any of them passes.
    pub fn select(&self, records: &[InsiderTransaction]) -> BTreeSet<String> {
        for record in records {
            info!(target: AUDIT_TARGET, "{}", record.audit_line());
        }

        records
            .iter()
            .filter(|r| self.accepts(r))
            .map(|r| r.symbol.clone())
            .collect()
    }
}
