use chrono::NaiveDate;
use serde::Serialize;
use wfh_common::{DateWindow, DateWindowPolicy, Direction, PolicyConfig, WithdrawActor};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowReport {
    pub date: NaiveDate,
    pub window: DateWindow,
    pub within: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationReport {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub blocked: bool,
}

pub fn request_window(policy: &PolicyConfig, date: NaiveDate, today: NaiveDate) -> WindowReport {
    let windows = DateWindowPolicy::new(policy);
    WindowReport {
        date,
        window: windows.request_window(today),
        within: windows.is_within_request_window(date, today),
    }
}

/// Whether `actor` may still withdraw an arrangement for `date` on `today`.
pub fn withdraw_window(
    policy: &PolicyConfig,
    date: NaiveDate,
    actor: WithdrawActor,
    today: NaiveDate,
) -> WindowReport {
    let windows = DateWindowPolicy::new(policy);
    WindowReport {
        date,
        window: windows.withdraw_window(actor, date),
        within: windows.is_within_withdraw_window(actor, date, today),
    }
}

pub fn navigate(
    policy: &PolicyConfig,
    date: NaiveDate,
    direction: Direction,
    week: bool,
    today: NaiveDate,
) -> NavigationReport {
    let windows = DateWindowPolicy::new(policy);
    let to = if week {
        windows.next_week(date, direction, today)
    } else {
        windows.next_day(date, direction, today)
    };
    NavigationReport { from: date, to, blocked: to.is_none() }
}
