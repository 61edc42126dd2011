use chrono::NaiveDate;
use tracing::info;
use wfh_common::{DateKey, TeamSchedule};
use wfh_policy::{aggregate, day_aggregate, DayAggregate, ProportionTable};

pub fn day(schedule: &TeamSchedule, date: NaiveDate) -> DayAggregate {
    day_aggregate(schedule, &DateKey::from_date(date))
}

/// Proportion table for the schedule; team size defaults to the number of
/// employees in it.
pub fn proportions(schedule: &TeamSchedule, team_size: Option<usize>) -> ProportionTable {
    let team_size = team_size.unwrap_or(schedule.len());
    let table = aggregate(schedule, team_size);
    info!("Aggregated {} days for a team of {}", table.len(), team_size);
    table
}
