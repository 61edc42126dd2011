// Date window policy
//
// Calendar arithmetic for the request window, the two withdrawal windows,
// and day/week navigation bounded by a window. All comparisons are at day
// granularity and "today" is always passed in by the caller.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{PolicyConfig, WeekStart, WindowSpec};

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateWindow {
    pub fn new(min: NaiveDate, max: NaiveDate) -> Self {
        Self { min, max }
    }

    /// Window reaching `spec.back` before and `spec.forward` after `anchor`.
    pub fn around(anchor: NaiveDate, spec: &WindowSpec) -> Self {
        Self { min: spec.back.before(anchor), max: spec.forward.after(anchor) }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }

    pub fn overlaps(&self, other: &DateWindow) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Every day in the window, oldest first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let max = self.max;
        self.min.iter_days().take_while(move |day| *day <= max)
    }
}

/// Which side of the approval relationship is withdrawing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawActor {
    /// Manager withdrawing an approved request from the approval view.
    Manager,
    /// Employee withdrawing their own request from the history view.
    Employee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Step `date` one day in `direction`. `None` means navigation is blocked
/// because the stepped day would leave `window`.
pub fn next_navigable_date(
    date: NaiveDate,
    direction: Direction,
    window: &DateWindow,
) -> Option<NaiveDate> {
    let stepped = match direction {
        Direction::Forward => date.checked_add_days(Days::new(1)),
        Direction::Backward => date.checked_sub_days(Days::new(1)),
    }?;

    if window.contains(stepped) {
        Some(stepped)
    } else {
        debug!("Day navigation from {} blocked at {}", date, stepped);
        None
    }
}

/// The calendar week containing `date`.
pub fn week_of(date: NaiveDate, week_start: WeekStart) -> DateWindow {
    let offset = match week_start {
        WeekStart::Monday => date.weekday().num_days_from_monday(),
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
    };
    let start = date.checked_sub_days(Days::new(offset as u64)).unwrap_or(NaiveDate::MIN);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX);
    DateWindow::new(start, end)
}

/// Move to the start of the previous or next week. Blocked only when no day
/// of the target week falls inside `window`.
pub fn next_navigable_week(
    date: NaiveDate,
    direction: Direction,
    window: &DateWindow,
    week_start: WeekStart,
) -> Option<NaiveDate> {
    let stepped = match direction {
        Direction::Forward => date.checked_add_days(Days::new(7)),
        Direction::Backward => date.checked_sub_days(Days::new(7)),
    }?;
    let week = week_of(stepped, week_start);

    if week.overlaps(window) {
        Some(week.min)
    } else {
        debug!("Week navigation from {} blocked: week of {} is outside window", date, week.min);
        None
    }
}

/// Request and withdrawal windows derived from a [`PolicyConfig`].
#[derive(Debug, Clone)]
pub struct DateWindowPolicy {
    request: WindowSpec,
    manager_withdraw: WindowSpec,
    employee_withdraw: WindowSpec,
    week_start: WeekStart,
}

impl Default for DateWindowPolicy {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}

impl DateWindowPolicy {
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            request: config.request_window,
            manager_withdraw: config.manager_withdraw_window,
            employee_withdraw: config.employee_withdraw_window,
            week_start: config.week_start,
        }
    }

    /// Days that may be requested or browsed, relative to `today`.
    pub fn request_window(&self, today: NaiveDate) -> DateWindow {
        DateWindow::around(today, &self.request)
    }

    pub fn is_within_request_window(&self, date: NaiveDate, today: NaiveDate) -> bool {
        self.request_window(today).contains(date)
    }

    /// Days on which `actor` may withdraw a request dated `date_requested`.
    pub fn withdraw_window(&self, actor: WithdrawActor, date_requested: NaiveDate) -> DateWindow {
        let spec = match actor {
            WithdrawActor::Manager => &self.manager_withdraw,
            WithdrawActor::Employee => &self.employee_withdraw,
        };
        DateWindow::around(date_requested, spec)
    }

    pub fn is_within_withdraw_window(
        &self,
        actor: WithdrawActor,
        date_requested: NaiveDate,
        today: NaiveDate,
    ) -> bool {
        self.withdraw_window(actor, date_requested).contains(today)
    }

    pub fn next_day(
        &self,
        date: NaiveDate,
        direction: Direction,
        today: NaiveDate,
    ) -> Option<NaiveDate> {
        next_navigable_date(date, direction, &self.request_window(today))
    }

    pub fn next_week(
        &self,
        date: NaiveDate,
        direction: Direction,
        today: NaiveDate,
    ) -> Option<NaiveDate> {
        next_navigable_week(date, direction, &self.request_window(today), self.week_start)
    }

    pub fn week_of(&self, date: NaiveDate) -> DateWindow {
        week_of(date, self.week_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Span;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_request_window_inclusive_bounds() {
        let policy = DateWindowPolicy::default();
        let today = date(2024, 8, 15);

        assert!(policy.is_within_request_window(today, today));
        assert!(policy.is_within_request_window(date(2024, 6, 15), today));
        assert!(policy.is_within_request_window(date(2024, 11, 15), today));
        assert!(!policy.is_within_request_window(date(2024, 6, 14), today));
        assert!(!policy.is_within_request_window(date(2024, 11, 16), today));
    }

    #[test]
    fn test_request_window_month_end() {
        let policy = DateWindowPolicy::default();
        let window = policy.request_window(date(2024, 4, 30));
        assert_eq!(window.min, date(2024, 2, 29));
        assert_eq!(window.max, date(2024, 7, 30));
    }

    #[test]
    fn test_employee_withdraw_window_two_weeks() {
        let policy = DateWindowPolicy::default();
        let requested = date(2024, 8, 20);

        assert!(policy.is_within_withdraw_window(WithdrawActor::Employee, requested, date(2024, 8, 6)));
        assert!(policy.is_within_withdraw_window(WithdrawActor::Employee, requested, date(2024, 9, 3)));
        assert!(!policy.is_within_withdraw_window(WithdrawActor::Employee, requested, date(2024, 8, 5)));
        assert!(!policy.is_within_withdraw_window(WithdrawActor::Employee, requested, date(2024, 9, 4)));
    }

    #[test]
    fn test_manager_withdraw_window() {
        let policy = DateWindowPolicy::default();
        let requested = date(2024, 8, 20);

        assert!(policy.is_within_withdraw_window(WithdrawActor::Manager, requested, date(2024, 7, 20)));
        assert!(policy.is_within_withdraw_window(WithdrawActor::Manager, requested, date(2024, 11, 20)));
        assert!(!policy.is_within_withdraw_window(WithdrawActor::Manager, requested, date(2024, 7, 19)));
        assert!(!policy.is_within_withdraw_window(WithdrawActor::Manager, requested, date(2024, 11, 21)));
    }

    #[test]
    fn test_custom_withdraw_window() {
        let config = PolicyConfig {
            employee_withdraw_window: WindowSpec::new(Span::Days(1), Span::Days(0)),
            ..Default::default()
        };
        let policy = DateWindowPolicy::new(&config);
        let requested = date(2024, 8, 20);

        assert!(policy.is_within_withdraw_window(WithdrawActor::Employee, requested, date(2024, 8, 19)));
        assert!(!policy.is_within_withdraw_window(WithdrawActor::Employee, requested, date(2024, 8, 21)));
    }

    #[test]
    fn test_day_navigation_blocked_at_bounds() {
        let window = DateWindow::new(date(2024, 8, 1), date(2024, 8, 31));

        assert_eq!(
            next_navigable_date(date(2024, 8, 10), Direction::Forward, &window),
            Some(date(2024, 8, 11))
        );
        assert_eq!(next_navigable_date(date(2024, 8, 31), Direction::Forward, &window), None);
        assert_eq!(next_navigable_date(date(2024, 8, 1), Direction::Backward, &window), None);
        assert_eq!(
            next_navigable_date(date(2024, 8, 2), Direction::Backward, &window),
            Some(date(2024, 8, 1))
        );
    }

    #[test]
    fn test_week_of_sunday_start() {
        // 2024-08-07 is a Wednesday
        let week = week_of(date(2024, 8, 7), WeekStart::Sunday);
        assert_eq!(week.min, date(2024, 8, 4));
        assert_eq!(week.max, date(2024, 8, 10));

        let week = week_of(date(2024, 8, 7), WeekStart::Monday);
        assert_eq!(week.min, date(2024, 8, 5));
        assert_eq!(week.max, date(2024, 8, 11));
    }

    #[test]
    fn test_week_navigation_allows_partial_overlap() {
        // window ends on a Monday; the following week still touches it
        let window = DateWindow::new(date(2024, 8, 1), date(2024, 8, 12));

        assert_eq!(
            next_navigable_week(date(2024, 8, 7), Direction::Forward, &window, WeekStart::Sunday),
            Some(date(2024, 8, 11))
        );
        assert_eq!(
            next_navigable_week(date(2024, 8, 12), Direction::Forward, &window, WeekStart::Sunday),
            None
        );
        assert_eq!(
            next_navigable_week(date(2024, 8, 7), Direction::Backward, &window, WeekStart::Sunday),
            Some(date(2024, 7, 28))
        );
        assert_eq!(
            next_navigable_week(date(2024, 8, 1), Direction::Backward, &window, WeekStart::Sunday),
            None
        );
    }

    #[test]
    fn test_window_days() {
        let window = DateWindow::new(date(2024, 2, 27), date(2024, 3, 1));
        let days: Vec<_> = window.days().collect();
        assert_eq!(days, vec![date(2024, 2, 27), date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]);
    }
}
