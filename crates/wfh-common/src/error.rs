use chrono::NaiveDate;
use thiserror::Error;

use crate::types::RequestStatus;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid date key '{0}': expected DDMMYY")]
    InvalidDateKey(String),

    #[error("Invalid day status {0}: expected 0-3")]
    InvalidDayStatus(u8),

    #[error("Invalid duration '{0}': expected AM, PM or FD")]
    InvalidDuration(String),

    #[error("Invalid request status '{0}'")]
    InvalidStatus(String),

    #[error("Request {request_id} dated {date_requested} is outside the withdrawal window")]
    OutsideWithdrawWindow { request_id: u64, date_requested: NaiveDate },

    #[error("Cannot {action} a request that is {from}")]
    InvalidTransition { from: RequestStatus, action: &'static str },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
