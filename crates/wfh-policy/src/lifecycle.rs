use chrono::NaiveDate;
use tracing::{info, warn};
use wfh_common::{
    DateWindowPolicy, Error, PolicyConfig, RequestStatus, Result, Span, StatusChange, WfhRequest,
    WithdrawActor, SYSTEM_ACTOR_ID,
};

pub const AUTO_REJECT_REMARK: &str = "Automatic Rejection";

/// State transitions of a WFH request.
#[derive(Debug, Clone)]
pub struct RequestLifecycle {
    windows: DateWindowPolicy,
    stale_pending_after: Span,
}

impl Default for RequestLifecycle {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}

impl RequestLifecycle {
    pub fn new(config: &PolicyConfig) -> Self {
        Self {
            windows: DateWindowPolicy::new(config),
            stale_pending_after: config.stale_pending_after,
        }
    }

    /// Manager approval: grants a pending request or a pending withdrawal.
    pub fn approve(&self, request: &WfhRequest) -> Result<RequestStatus> {
        match request.status {
            RequestStatus::Pending => Ok(RequestStatus::Approved),
            RequestStatus::WithdrawPending => Ok(RequestStatus::Withdrawn),
            from => Err(refuse(request, from, "approve")),
        }
    }

    /// Manager rejection of a pending request or a pending withdrawal.
    pub fn reject(&self, request: &WfhRequest) -> Result<RequestStatus> {
        match request.status {
            RequestStatus::Pending => Ok(RequestStatus::Rejected),
            RequestStatus::WithdrawPending => Ok(RequestStatus::WithdrawRejected),
            from => Err(refuse(request, from, "reject")),
        }
    }

    /// Employee withdrawing their own request.
    ///
    /// A pending request is withdrawn outright. An approved request (or one
    /// whose withdrawal was rejected) goes back to the manager as a pending
    /// withdrawal, but only inside the employee withdrawal window. Rejected
    /// requests stay rejected.
    pub fn employee_withdraw(&self, request: &WfhRequest, today: NaiveDate) -> Result<RequestStatus> {
        match request.status {
            RequestStatus::Pending => Ok(RequestStatus::Withdrawn),
            RequestStatus::Rejected => Ok(RequestStatus::Rejected),
            RequestStatus::Approved | RequestStatus::WithdrawRejected => {
                self.require_window(WithdrawActor::Employee, request, today)?;
                Ok(RequestStatus::WithdrawPending)
            }
            from => Err(refuse(request, from, "withdraw")),
        }
    }

    /// Manager withdrawing an approved request on the employee's behalf.
    pub fn manager_withdraw(&self, request: &WfhRequest, today: NaiveDate) -> Result<RequestStatus> {
        match request.status {
            RequestStatus::Approved => {
                self.require_window(WithdrawActor::Manager, request, today)?;
                Ok(RequestStatus::WithdrawnByManager)
            }
            from => Err(refuse(request, from, "withdraw")),
        }
    }

    pub fn can_withdraw(&self, actor: WithdrawActor, request: &WfhRequest, today: NaiveDate) -> bool {
        match actor {
            WithdrawActor::Employee => self.employee_withdraw(request, today).is_ok(),
            WithdrawActor::Manager => self.manager_withdraw(request, today).is_ok(),
        }
    }

    /// A pending request dated before `today - stale_pending_after`.
    pub fn is_stale(&self, request: &WfhRequest, today: NaiveDate) -> bool {
        request.status == RequestStatus::Pending
            && request.date_requested < self.stale_pending_after.before(today)
    }

    /// Rejections for every stale pending request, attributed to the system.
    pub fn auto_reject_stale(&self, requests: &[WfhRequest], today: NaiveDate) -> Vec<StatusChange> {
        let changes: Vec<StatusChange> = requests
            .iter()
            .filter(|request| self.is_stale(request, today))
            .map(|request| StatusChange {
                request_id: request.request_id,
                previous_state: RequestStatus::Pending,
                new_state: RequestStatus::Rejected,
                employee_id: SYSTEM_ACTOR_ID.to_string(),
                date: today,
                remarks: AUTO_REJECT_REMARK.to_string(),
            })
            .collect();

        if !changes.is_empty() {
            info!("Auto-rejecting {} stale pending requests", changes.len());
        }
        changes
    }

    fn require_window(&self, actor: WithdrawActor, request: &WfhRequest, today: NaiveDate) -> Result<()> {
        if self.windows.is_within_withdraw_window(actor, request.date_requested, today) {
            return Ok(());
        }
        warn!(
            "Request {} dated {} is outside the {:?} withdrawal window on {}",
            request.request_id, request.date_requested, actor, today
        );
        Err(Error::OutsideWithdrawWindow {
            request_id: request.request_id,
            date_requested: request.date_requested,
        })
    }
}

fn refuse(request: &WfhRequest, from: RequestStatus, action: &'static str) -> Error {
    warn!("Refusing to {} request {} in state {}", action, request.request_id, from);
    Error::InvalidTransition { from, action }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wfh_common::Duration;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(status: RequestStatus, day: NaiveDate) -> WfhRequest {
        WfhRequest {
            request_id: 42,
            requestor_id: "140879".to_string(),
            approver_id: "140001".to_string(),
            status,
            date_requested: day,
            request_batch: None,
            date_of_request: date(2024, 7, 1),
            duration: Duration::FullDay,
        }
    }

    #[test]
    fn test_manager_decisions() {
        let lifecycle = RequestLifecycle::default();
        let day = date(2024, 8, 20);

        assert_eq!(lifecycle.approve(&request(RequestStatus::Pending, day)).unwrap(), RequestStatus::Approved);
        assert_eq!(
            lifecycle.approve(&request(RequestStatus::WithdrawPending, day)).unwrap(),
            RequestStatus::Withdrawn
        );
        assert_eq!(lifecycle.reject(&request(RequestStatus::Pending, day)).unwrap(), RequestStatus::Rejected);
        assert_eq!(
            lifecycle.reject(&request(RequestStatus::WithdrawPending, day)).unwrap(),
            RequestStatus::WithdrawRejected
        );
        assert!(matches!(
            lifecycle.approve(&request(RequestStatus::Rejected, day)),
            Err(Error::InvalidTransition { from: RequestStatus::Rejected, action: "approve" })
        ));
    }

    #[test]
    fn test_employee_withdraw_pending() {
        let lifecycle = RequestLifecycle::default();
        // no window applies to pending requests
        let status = lifecycle
            .employee_withdraw(&request(RequestStatus::Pending, date(2024, 12, 1)), date(2024, 8, 1))
            .unwrap();
        assert_eq!(status, RequestStatus::Withdrawn);
    }

    #[test]
    fn test_employee_withdraw_approved_within_two_weeks() {
        let lifecycle = RequestLifecycle::default();
        let approved = request(RequestStatus::Approved, date(2024, 8, 20));

        assert_eq!(
            lifecycle.employee_withdraw(&approved, date(2024, 8, 10)).unwrap(),
            RequestStatus::WithdrawPending
        );
        assert!(matches!(
            lifecycle.employee_withdraw(&approved, date(2024, 8, 5)),
            Err(Error::OutsideWithdrawWindow { request_id: 42, .. })
        ));
    }

    #[test]
    fn test_employee_withdraw_other_states() {
        let lifecycle = RequestLifecycle::default();
        let today = date(2024, 8, 20);

        assert_eq!(
            lifecycle.employee_withdraw(&request(RequestStatus::Rejected, today), today).unwrap(),
            RequestStatus::Rejected
        );
        assert_eq!(
            lifecycle.employee_withdraw(&request(RequestStatus::WithdrawRejected, today), today).unwrap(),
            RequestStatus::WithdrawPending
        );
        assert!(lifecycle.employee_withdraw(&request(RequestStatus::Withdrawn, today), today).is_err());
        assert!(lifecycle.employee_withdraw(&request(RequestStatus::WithdrawPending, today), today).is_err());
    }

    #[test]
    fn test_manager_withdraw_window() {
        let lifecycle = RequestLifecycle::default();
        let approved = request(RequestStatus::Approved, date(2024, 3, 31));

        // one month back from 31 March clamps to 29 February
        assert_eq!(
            lifecycle.manager_withdraw(&approved, date(2024, 2, 29)).unwrap(),
            RequestStatus::WithdrawnByManager
        );
        assert!(lifecycle.manager_withdraw(&approved, date(2024, 2, 28)).is_err());
        assert!(lifecycle.manager_withdraw(&approved, date(2024, 6, 30)).is_ok());
        assert!(lifecycle.manager_withdraw(&approved, date(2024, 7, 1)).is_err());

        assert!(!lifecycle.can_withdraw(
            WithdrawActor::Manager,
            &request(RequestStatus::Pending, date(2024, 3, 31)),
            date(2024, 3, 31)
        ));
    }

    #[test]
    fn test_auto_reject_stale() {
        let lifecycle = RequestLifecycle::default();
        let today = date(2023, 6, 1);

        let mut old = request(RequestStatus::Pending, date(2023, 3, 1));
        old.request_id = 1;
        let mut boundary = request(RequestStatus::Pending, date(2023, 4, 1));
        boundary.request_id = 2;
        let mut approved = request(RequestStatus::Approved, date(2023, 3, 1));
        approved.request_id = 3;

        let changes = lifecycle.auto_reject_stale(&[old, boundary, approved], today);

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].request_id, 1);
        assert_eq!(changes[0].previous_state, RequestStatus::Pending);
        assert_eq!(changes[0].new_state, RequestStatus::Rejected);
        assert_eq!(changes[0].employee_id, "000000");
        assert_eq!(changes[0].remarks, "Automatic Rejection");
        assert_eq!(changes[0].date, today);
    }
}
