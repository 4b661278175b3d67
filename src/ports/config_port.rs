//! Configuration access port trait.
//!
//! Typed getters return `Ok(None)` for an absent key and `Err(reason)` for a
//! key that is present but does not parse, so callers never mistake a typo
//! for a default.

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String>;
    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, String>;
    fn get_decimal(&self, section: &str, key: &str) -> Result<Option<Decimal>, String>;
    /// `YYYY-MM-DD`.
    fn get_date(&self, section: &str, key: &str) -> Result<Option<NaiveDate>, String>;
}
