//! INI file configuration adapter.
//!
//! Values are trimmed before parsing. Decimals accept plain and scientific
//! notation (`1e8`), booleans accept `true/false`, `yes/no` and `1/0`.

use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use configparser::ini::Ini;
use rust_decimal::Decimal;
use std::path::Path;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug)]
pub struct FileConfigAdapter {
    ini: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut ini = Ini::new();
        ini.load(path).map_err(std::io::Error::other)?;
        Ok(Self { ini })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut ini = Ini::new();
        ini.read(content.to_string())?;
        Ok(Self { ini })
    }

    /// Trimmed value, with blank values treated as absent.
    fn value(&self, section: &str, key: &str) -> Option<String> {
        self.ini
            .get(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn typed<T>(
        &self,
        section: &str,
        key: &str,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<Option<T>, String> {
        self.value(section, key).as_deref().map(parse).transpose()
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(format!("'{}' is not a boolean (true/false, yes/no, 1/0)", value)),
    }
}

fn parse_decimal(value: &str) -> Result<Decimal, String> {
    value
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|e| format!("'{}' is not a decimal number: {}", value, e))
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.value(section, key)
    }

    fn get_int(&self, section: &str, key: &str) -> Result<Option<i64>, String> {
        self.typed(section, key, |v| {
            v.parse::<i64>()
                .map_err(|_| format!("'{}' is not an integer", v))
        })
    }

    fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>, String> {
        self.typed(section, key, parse_bool)
    }

    fn get_decimal(&self, section: &str, key: &str) -> Result<Option<Decimal>, String> {
        self.typed(section, key, parse_decimal)
    }

    fn get_date(&self, section: &str, key: &str) -> Result<Option<NaiveDate>, String> {
        self.typed(section, key, |v| {
            NaiveDate::parse_from_str(v, DATE_FORMAT)
                .map_err(|_| format!("'{}' is not a date, expected YYYY-MM-DD", v))
        })
    }
}
