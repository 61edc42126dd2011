use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use wfh_common::{PolicyConfig, RequestStatus, StatusChange, WfhRequest, WithdrawActor};
use wfh_policy::RequestLifecycle;

pub fn expire(policy: &PolicyConfig, requests: &[WfhRequest], today: NaiveDate) -> Vec<StatusChange> {
    RequestLifecycle::new(policy).auto_reject_stale(requests, today)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawOutcome {
    pub request_id: u64,
    pub previous_state: RequestStatus,
    pub new_state: RequestStatus,
}

/// Applies a withdrawal by `actor` to the request with `request_id`.
pub fn withdraw_request(
    policy: &PolicyConfig,
    requests: &[WfhRequest],
    request_id: u64,
    actor: WithdrawActor,
    today: NaiveDate,
) -> Result<WithdrawOutcome> {
    let request = requests
        .iter()
        .find(|request| request.request_id == request_id)
        .ok_or_else(|| anyhow::anyhow!("Request {} not found", request_id))?;

    let lifecycle = RequestLifecycle::new(policy);
    let new_state = match actor {
        WithdrawActor::Employee => lifecycle.employee_withdraw(request, today)?,
        WithdrawActor::Manager => lifecycle.manager_withdraw(request, today)?,
    };

    Ok(WithdrawOutcome { request_id, previous_state: request.status, new_state })
}
