use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::debug;
use wfh_common::{DateKey, DateWindow, DayStatus, Duration, RequestStatus, TeamSchedule, WfhRequest};

/// Approved arrangements keyed by (requestor, day). The first approved
/// request for a day wins.
fn approved_index(requests: &[WfhRequest]) -> HashMap<(&str, NaiveDate), Duration> {
    let mut index = HashMap::new();
    for request in requests.iter().filter(|r| r.status == RequestStatus::Approved) {
        index.entry((request.requestor_id.as_str(), request.date_requested)).or_insert(request.duration);
    }
    index
}

fn member_days(
    index: &HashMap<(&str, NaiveDate), Duration>,
    member: &str,
    window: &DateWindow,
) -> BTreeMap<DateKey, DayStatus> {
    window
        .days()
        .map(|day| {
            let status = index.get(&(member, day)).map_or(DayStatus::InOffice, |d| DayStatus::from(*d));
            (DateKey::from_date(day), status)
        })
        .collect()
}

/// One employee's status for every day of `window`. Days without an
/// approved request are explicit in-office entries.
pub fn build_member_schedule(
    requests: &[WfhRequest],
    member: &str,
    window: &DateWindow,
) -> BTreeMap<DateKey, DayStatus> {
    member_days(&approved_index(requests), member, window)
}

/// Dense schedule for every member over `window`.
pub fn build_team_schedule<'a, I>(requests: &[WfhRequest], members: I, window: &DateWindow) -> TeamSchedule
where
    I: IntoIterator<Item = &'a str>,
{
    let index = approved_index(requests);
    let schedule: TeamSchedule = members
        .into_iter()
        .map(|member| (member.to_string(), member_days(&index, member, window)))
        .collect();

    debug!(
        "Built schedule for {} members from {} to {} ({} approved arrangements)",
        schedule.len(),
        window.min,
        window.max,
        index.len()
    );
    schedule
}
