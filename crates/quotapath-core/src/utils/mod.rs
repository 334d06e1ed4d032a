//! Formatting helpers for money, rates and dates.

pub mod format;

pub use format::{format_currency, format_date, format_percentage, truncate_string};
