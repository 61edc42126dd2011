use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A calendar distance. Month spans clamp to the last valid day of the
/// target month, so 31 March minus one month is the end of February.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Span {
    Days(u32),
    Weeks(u32),
    Months(u32),
}

impl Span {
    /// `date` moved back by this span. Saturates at the calendar minimum.
    pub fn before(self, date: NaiveDate) -> NaiveDate {
        match self {
            Span::Days(n) => date.checked_sub_days(Days::new(n as u64)),
            Span::Weeks(n) => date.checked_sub_days(Days::new(n as u64 * 7)),
            Span::Months(n) => date.checked_sub_months(Months::new(n)),
        }
        .unwrap_or(NaiveDate::MIN)
    }

    /// `date` moved forward by this span. Saturates at the calendar maximum.
    pub fn after(self, date: NaiveDate) -> NaiveDate {
        match self {
            Span::Days(n) => date.checked_add_days(Days::new(n as u64)),
            Span::Weeks(n) => date.checked_add_days(Days::new(n as u64 * 7)),
            Span::Months(n) => date.checked_add_months(Months::new(n)),
        }
        .unwrap_or(NaiveDate::MAX)
    }
}

/// How far a window reaches back and forward from its anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSpec {
    pub back: Span,
    pub forward: Span,
}

impl WindowSpec {
    pub const fn new(back: Span, forward: Span) -> Self {
        Self { back, forward }
    }
}

/// How a recurring batch is checked against the team threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// One proportion for the whole batch plus `pending / team_size`.
    #[default]
    Uniform,
    /// Every date+duration in the batch is checked against its own proportion.
    PerDate,
}

/// First day of a calendar week for week navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Highest team WFH proportion an approval may produce.
    pub wfh_threshold: f64,
    pub request_window: WindowSpec,
    pub manager_withdraw_window: WindowSpec,
    pub employee_withdraw_window: WindowSpec,
    /// Pending requests dated further back than this are auto-rejected.
    pub stale_pending_after: Span,
    pub batch_mode: BatchMode,
    pub week_start: WeekStart,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            wfh_threshold: 0.5,
            request_window: WindowSpec::new(Span::Months(2), Span::Months(3)),
            manager_withdraw_window: WindowSpec::new(Span::Months(1), Span::Months(3)),
            employee_withdraw_window: WindowSpec::new(Span::Weeks(2), Span::Weeks(2)),
            stale_pending_after: Span::Months(2),
            batch_mode: BatchMode::Uniform,
            week_start: WeekStart::Sunday,
        }
    }
}

impl PolicyConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.wfh_threshold) {
            return Err(Error::InvalidConfig(format!(
                "wfh_threshold must be between 0 and 1, got {}",
                self.wfh_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string() }
    }
}
