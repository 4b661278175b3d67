//! Core domain types and logic.

pub mod transaction;
pub mod batch;
pub mod selection;
pub mod history;
pub mod changes;
pub mod replay;
pub mod config_validation;
pub mod error;

#[cfg(test)]
pub(crate) mod test_logger;
