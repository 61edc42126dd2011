use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use wfh_common::{DateKey, DayStatus, Duration, TeamSchedule};

/// Head counts for one day of a team schedule.
///
/// Only employees with an entry for the day are counted; an employee with
/// no data is not assumed to be in the office.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAggregate {
    pub am_count: usize,
    pub pm_count: usize,
    pub full_day_count: usize,
    pub in_office_count: usize,
    pub am_users: Vec<String>,
    pub pm_users: Vec<String>,
    pub full_day_users: Vec<String>,
    /// Employees in the schedule, with or without an entry for the day.
    pub total_strength: usize,
}

impl DayAggregate {
    /// Employees that have an entry for the day.
    pub fn reported_count(&self) -> usize {
        self.am_count + self.pm_count + self.full_day_count + self.in_office_count
    }

    pub fn wfh_count(&self) -> usize {
        self.am_count + self.pm_count + self.full_day_count
    }

    pub fn count_for(&self, duration: Duration) -> usize {
        match duration {
            Duration::Am => self.am_count,
            Duration::Pm => self.pm_count,
            Duration::FullDay => self.full_day_count,
        }
    }

    /// Everyone working from home that day, in schedule order without repeats.
    pub fn wfh_users(&self) -> Vec<&str> {
        let mut users: Vec<&str> = Vec::with_capacity(self.wfh_count());
        for user in self.am_users.iter().chain(&self.pm_users).chain(&self.full_day_users) {
            if !users.contains(&user.as_str()) {
                users.push(user);
            }
        }
        users
    }
}

/// Team WFH proportion per day and duration, as served by the
/// `proportionOfTeam` endpoint: `{"050824": {"AM": 0.25, "PM": 0.0, "FD": 0.5}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProportionTable(BTreeMap<DateKey, BTreeMap<Duration, f64>>);

impl ProportionTable {
    /// Proportion for a slot, 0 when the table has nothing for it.
    pub fn proportion(&self, date_key: &DateKey, duration: Duration) -> f64 {
        self.0.get(date_key).and_then(|by_duration| by_duration.get(&duration)).copied().unwrap_or(0.0)
    }

    pub fn get(&self, date_key: &DateKey) -> Option<&BTreeMap<Duration, f64>> {
        self.0.get(date_key)
    }

    pub fn insert(&mut self, date_key: DateKey, duration: Duration, proportion: f64) {
        self.0.entry(date_key).or_default().insert(duration, proportion);
    }

    pub fn date_keys(&self) -> impl Iterator<Item = &DateKey> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `count / team_size`, or 0 for an empty team.
pub fn share_of_team(count: usize, team_size: usize) -> f64 {
    if team_size == 0 {
        return 0.0;
    }
    count as f64 / team_size as f64
}

/// Fold a schedule into per-day, per-duration proportions of `team_size`.
///
/// The table only has rows for date keys that appear in the schedule, and
/// every row carries all three durations. Keys are not validated.
pub fn aggregate(schedule: &TeamSchedule, team_size: usize) -> ProportionTable {
    let mut counts: BTreeMap<&DateKey, [usize; 3]> = BTreeMap::new();

    for days in schedule.values() {
        for (date_key, status) in days {
            let slot = counts.entry(date_key).or_default();
            match status.duration() {
                Some(Duration::Am) => slot[0] += 1,
                Some(Duration::Pm) => slot[1] += 1,
                Some(Duration::FullDay) => slot[2] += 1,
                None => {}
            }
        }
    }

    if team_size == 0 {
        debug!("Aggregating schedule with empty team, all proportions are 0");
    }

    let mut table = ProportionTable::default();
    for (date_key, [am, pm, full_day]) in counts {
        table.insert(date_key.clone(), Duration::Am, share_of_team(am, team_size));
        table.insert(date_key.clone(), Duration::Pm, share_of_team(pm, team_size));
        table.insert(date_key.clone(), Duration::FullDay, share_of_team(full_day, team_size));
    }

    debug!("Aggregated {} employees over {} days", schedule.len(), table.len());
    table
}

/// Who is where on `date_key`.
pub fn day_aggregate(schedule: &TeamSchedule, date_key: &DateKey) -> DayAggregate {
    let mut day = DayAggregate { total_strength: schedule.len(), ..Default::default() };

    for (employee, days) in schedule {
        let Some(status) = days.get(date_key) else {
            continue;
        };
        match status {
            DayStatus::InOffice => day.in_office_count += 1,
            DayStatus::AmWfh => {
                day.am_count += 1;
                day.am_users.push(employee.clone());
            }
            DayStatus::PmWfh => {
                day.pm_count += 1;
                day.pm_users.push(employee.clone());
            }
            DayStatus::FullDayWfh => {
                day.full_day_count += 1;
                day.full_day_users.push(employee.clone());
            }
        }
    }

    day
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(entries: &[(&str, &str, u8)]) -> TeamSchedule {
        let mut schedule = TeamSchedule::new();
        for (employee, key, code) in entries {
            schedule
                .entry(employee.to_string())
                .or_default()
                .insert(DateKey::new(*key), DayStatus::try_from(*code).unwrap());
        }
        schedule
    }

    #[test]
    fn test_day_aggregate_one_of_each() {
        let schedule =
            schedule(&[("A", "050824", 1), ("B", "050824", 2), ("C", "050824", 3), ("D", "050824", 0)]);

        let day = day_aggregate(&schedule, &DateKey::new("050824"));

        assert_eq!(day.am_count, 1);
        assert_eq!(day.pm_count, 1);
        assert_eq!(day.full_day_count, 1);
        assert_eq!(day.in_office_count, 1);
        assert_eq!(day.am_users, vec!["A"]);
        assert_eq!(day.pm_users, vec!["B"]);
        assert_eq!(day.full_day_users, vec!["C"]);
        assert_eq!(day.total_strength, 4);
    }

    #[test]
    fn test_day_aggregate_skips_missing_entries() {
        let schedule = schedule(&[("A", "050824", 3), ("B", "060824", 0), ("C", "050824", 0)]);

        let day = day_aggregate(&schedule, &DateKey::new("050824"));

        assert_eq!(day.reported_count(), 2);
        assert_eq!(day.in_office_count, 1);
        assert_eq!(day.total_strength, 3);
    }

    #[test]
    fn test_day_aggregate_unknown_day_is_empty() {
        let schedule = schedule(&[("A", "050824", 3)]);
        let day = day_aggregate(&schedule, &DateKey::new("010124"));
        assert_eq!(day.reported_count(), 0);
        assert!(day.wfh_users().is_empty());
    }

    #[test]
    fn test_wfh_users_in_schedule_order() {
        let schedule = schedule(&[("A", "050824", 3), ("B", "050824", 1), ("C", "050824", 2)]);
        let day = day_aggregate(&schedule, &DateKey::new("050824"));
        assert_eq!(day.wfh_users(), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_aggregate_proportions() {
        let schedule = schedule(&[
            ("A", "050824", 1),
            ("B", "050824", 1),
            ("C", "050824", 3),
            ("D", "050824", 0),
            ("A", "060824", 2),
        ]);

        let table = aggregate(&schedule, 4);
        let monday = DateKey::new("050824");
        let tuesday = DateKey::new("060824");

        assert_eq!(table.len(), 2);
        assert_eq!(table.proportion(&monday, Duration::Am), 0.5);
        assert_eq!(table.proportion(&monday, Duration::Pm), 0.0);
        assert_eq!(table.proportion(&monday, Duration::FullDay), 0.25);
        assert_eq!(table.proportion(&tuesday, Duration::Pm), 0.25);
        assert_eq!(table.get(&tuesday).map(|row| row.len()), Some(3));
    }

    #[test]
    fn test_aggregate_is_sparse() {
        let schedule = schedule(&[("A", "050824", 0)]);
        let table = aggregate(&schedule, 3);

        assert_eq!(table.date_keys().collect::<Vec<_>>(), vec![&DateKey::new("050824")]);
        assert_eq!(table.proportion(&DateKey::new("060824"), Duration::FullDay), 0.0);
    }

    #[test]
    fn test_aggregate_zero_team_size() {
        let schedule = schedule(&[("A", "050824", 3), ("B", "050824", 1)]);
        let table = aggregate(&schedule, 0);

        for duration in Duration::ALL {
            assert_eq!(table.proportion(&DateKey::new("050824"), duration), 0.0);
        }
    }

    #[test]
    fn test_aggregate_passes_malformed_keys_through() {
        let schedule = schedule(&[("A", "not-a-date", 3)]);
        let table = aggregate(&schedule, 2);
        assert_eq!(table.proportion(&DateKey::new("not-a-date"), Duration::FullDay), 0.5);
    }

    #[test]
    fn test_proportion_table_json_shape() {
        let schedule = schedule(&[("A", "050824", 2)]);
        let json = serde_json::to_value(aggregate(&schedule, 2)).unwrap();
        assert_eq!(json["050824"]["PM"], 0.5);
        assert_eq!(json["050824"]["FD"], 0.0);
    }
}
