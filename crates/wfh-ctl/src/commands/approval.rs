use chrono::NaiveDate;
use wfh_common::{Duration, PolicyConfig, TeamSchedule, WfhRequest};
use wfh_policy::{
    aggregate, Assessment, BatchAssessment, EligibilityDecision, EligibilityEvaluator,
    PendingApproval,
};

pub fn evaluate(
    policy: &PolicyConfig,
    proportion: f64,
    team_size: usize,
    pending: usize,
) -> EligibilityDecision {
    EligibilityEvaluator::new(policy).evaluate(proportion, team_size, pending)
}

pub fn assess(
    policy: &PolicyConfig,
    schedule: &TeamSchedule,
    date: NaiveDate,
    duration: Duration,
    team_size: Option<usize>,
    today: NaiveDate,
) -> Assessment {
    let team_size = team_size.unwrap_or(schedule.len());
    let table = aggregate(schedule, team_size);
    let approval = PendingApproval { date_requested: date, duration, team_size };

    EligibilityEvaluator::new(policy).assess(&approval, &table, today)
}

/// Checks a recurring batch. With `batch` set, only requests carrying that
/// batch id are considered.
pub fn assess_batch(
    policy: &PolicyConfig,
    schedule: &TeamSchedule,
    requests: &[WfhRequest],
    batch: Option<u64>,
    team_size: Option<usize>,
    today: NaiveDate,
) -> BatchAssessment {
    let team_size = team_size.unwrap_or(schedule.len());
    let table = aggregate(schedule, team_size);
    let selected: Vec<WfhRequest> = requests
        .iter()
        .filter(|request| batch.map_or(true, |id| request.request_batch == Some(id)))
        .cloned()
        .collect();

    EligibilityEvaluator::new(policy).assess_batch(&selected, &table, team_size, today)
}
