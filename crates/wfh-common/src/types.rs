use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Staff ID recorded on status changes made by the system rather than a person.
pub const SYSTEM_ACTOR_ID: &str = "000000";

/// One employee's arrangement on one calendar day.
///
/// Serialized as the integer codes used by the schedule API
/// (0 = in office, 1 = AM, 2 = PM, 3 = full day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DayStatus {
    InOffice,
    AmWfh,
    PmWfh,
    FullDayWfh,
}

impl DayStatus {
    /// The WFH duration this status represents, or `None` when in office.
    pub fn duration(self) -> Option<Duration> {
        match self {
            DayStatus::InOffice => None,
            DayStatus::AmWfh => Some(Duration::Am),
            DayStatus::PmWfh => Some(Duration::Pm),
            DayStatus::FullDayWfh => Some(Duration::FullDay),
        }
    }

    pub fn is_wfh(self) -> bool {
        self != DayStatus::InOffice
    }
}

impl TryFrom<u8> for DayStatus {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(DayStatus::InOffice),
            1 => Ok(DayStatus::AmWfh),
            2 => Ok(DayStatus::PmWfh),
            3 => Ok(DayStatus::FullDayWfh),
            other => Err(Error::InvalidDayStatus(other)),
        }
    }
}

impl From<DayStatus> for u8 {
    fn from(status: DayStatus) -> u8 {
        match status {
            DayStatus::InOffice => 0,
            DayStatus::AmWfh => 1,
            DayStatus::PmWfh => 2,
            DayStatus::FullDayWfh => 3,
        }
    }
}

impl From<Duration> for DayStatus {
    fn from(duration: Duration) -> Self {
        match duration {
            Duration::Am => DayStatus::AmWfh,
            Duration::Pm => DayStatus::PmWfh,
            Duration::FullDay => DayStatus::FullDayWfh,
        }
    }
}

/// Length of a WFH arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Duration {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
    #[serde(rename = "FD")]
    FullDay,
}

impl Duration {
    pub const ALL: [Duration; 3] = [Duration::Am, Duration::Pm, Duration::FullDay];

    pub fn as_str(self) -> &'static str {
        match self {
            Duration::Am => "AM",
            Duration::Pm => "PM",
            Duration::FullDay => "FD",
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Duration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Duration::Am),
            "PM" => Ok(Duration::Pm),
            "FD" => Ok(Duration::FullDay),
            _ => Err(Error::InvalidDuration(s.to_string())),
        }
    }
}

/// A `DDMMYY` day key as used by schedule snapshots, e.g. `"050824"`.
///
/// Keys are opaque: construction never validates them. Ordering follows
/// the calendar date when both keys parse, so maps keyed by `DateKey`
/// iterate chronologically rather than in string order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    const FORMAT: &'static str = "%d%m%y";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(Self::FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the key into a calendar date.
    pub fn to_date(&self) -> Result<NaiveDate> {
        if self.0.len() != 6 || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidDateKey(self.0.clone()));
        }
        NaiveDate::parse_from_str(&self.0, Self::FORMAT)
            .map_err(|_| Error::InvalidDateKey(self.0.clone()))
    }
}

impl From<&str> for DateKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Ord for DateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Unparseable keys sort first, among themselves by string.
        let lhs = self.to_date().ok();
        let rhs = other.to_date().ok();
        lhs.cmp(&rhs).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for DateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-employee, per-day statuses: employee id -> date key -> status.
///
/// A missing date key means "no data", which is distinct from an explicit
/// [`DayStatus::InOffice`] entry.
pub type TeamSchedule = BTreeMap<String, BTreeMap<DateKey, DayStatus>>;

/// Lifecycle state of a WFH request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Withdrawn,
    #[serde(rename = "Withdraw Pending")]
    WithdrawPending,
    #[serde(rename = "Withdraw Rejected")]
    WithdrawRejected,
    #[serde(rename = "Withdrawn by Manager")]
    WithdrawnByManager,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
            RequestStatus::Withdrawn => "Withdrawn",
            RequestStatus::WithdrawPending => "Withdraw Pending",
            RequestStatus::WithdrawRejected => "Withdraw Rejected",
            RequestStatus::WithdrawnByManager => "Withdrawn by Manager",
        }
    }

    /// Whether a manager still has a decision to make on this request.
    pub fn awaits_decision(self) -> bool {
        matches!(self, RequestStatus::Pending | RequestStatus::WithdrawPending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(RequestStatus::Pending),
            "approved" => Ok(RequestStatus::Approved),
            "rejected" => Ok(RequestStatus::Rejected),
            "withdrawn" => Ok(RequestStatus::Withdrawn),
            "withdraw pending" => Ok(RequestStatus::WithdrawPending),
            "withdraw rejected" => Ok(RequestStatus::WithdrawRejected),
            "withdrawn by manager" => Ok(RequestStatus::WithdrawnByManager),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// A single-day WFH request as returned by the request API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WfhRequest {
    pub request_id: u64,
    pub requestor_id: String,
    pub approver_id: String,
    pub status: RequestStatus,
    pub date_requested: NaiveDate,
    /// Shared by every occurrence of a recurring request.
    #[serde(default)]
    pub request_batch: Option<u64>,
    pub date_of_request: NaiveDate,
    pub duration: Duration,
}

/// Record of a request moving between states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub request_id: u64,
    pub previous_state: RequestStatus,
    pub new_state: RequestStatus,
    pub employee_id: String,
    pub date: NaiveDate,
    pub remarks: String,
}
