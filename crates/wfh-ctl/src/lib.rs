pub mod commands;
pub mod config;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use wfh_common::DateKey;

pub use config::CtlConfig;

/// Accepts a schedule date key (`DDMMYY`) or an ISO date (`YYYY-MM-DD`).
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    if input.len() == 6 && input.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(DateKey::new(input).to_date()?);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date '{}', expected DDMMYY or YYYY-MM-DD", input))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
