// Approval eligibility
//
// Decides whether approving WFH requests would push a team over the WFH
// threshold for a date and duration. Only requests dated today or later are
// checked; approving past requests never blocks.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wfh_common::{BatchMode, DateKey, Duration, PolicyConfig, RequestStatus, WfhRequest};

use crate::aggregator::{share_of_team, ProportionTable};

pub const DEFAULT_WFH_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityDecision {
    pub allowed: bool,
    pub proportion_after_approval: f64,
}

/// A request awaiting approval, reduced to what the threshold check needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApproval {
    pub date_requested: NaiveDate,
    pub duration: Duration,
    pub team_size: usize,
}

impl PendingApproval {
    pub fn from_request(request: &WfhRequest, team_size: usize) -> Self {
        Self { date_requested: request.date_requested, duration: request.duration, team_size }
    }

    pub fn date_key(&self) -> DateKey {
        DateKey::from_date(self.date_requested)
    }

    pub fn is_future(&self, today: NaiveDate) -> bool {
        self.date_requested >= today
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalState {
    Approvable,
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub state: ApprovalState,
    pub is_future: bool,
    pub decision: EligibilityDecision,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchAssessment {
    pub state: ApprovalState,
    pub decision: EligibilityDecision,
    /// Future-dated occurrences that would exceed the threshold on their own slot.
    pub exceeding: Vec<u64>,
    pub pending_count: usize,
}

/// Threshold check for team WFH proportions.
#[derive(Debug, Clone)]
pub struct EligibilityEvaluator {
    threshold: f64,
    batch_mode: BatchMode,
}

impl Default for EligibilityEvaluator {
    fn default() -> Self {
        Self { threshold: DEFAULT_WFH_THRESHOLD, batch_mode: BatchMode::Uniform }
    }
}

impl EligibilityEvaluator {
    pub fn new(config: &PolicyConfig) -> Self {
        Self { threshold: config.wfh_threshold, batch_mode: config.batch_mode }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Proportion after approving `pending_count` more requests on a slot
    /// currently at `current_proportion`. Allowed while it stays at or
    /// below the threshold; an empty team adds nothing.
    pub fn evaluate(
        &self,
        current_proportion: f64,
        team_size: usize,
        pending_count: usize,
    ) -> EligibilityDecision {
        let proportion_after_approval = current_proportion + share_of_team(pending_count, team_size);
        EligibilityDecision {
            allowed: proportion_after_approval <= self.threshold,
            proportion_after_approval,
        }
    }

    /// Same check for a whole recurring batch sharing one proportion.
    pub fn evaluate_batch(
        &self,
        current_proportion: f64,
        team_size: usize,
        pending_count: usize,
    ) -> EligibilityDecision {
        self.evaluate(current_proportion, team_size, pending_count)
    }

    /// Check one pending request against the team's current proportions.
    pub fn assess(
        &self,
        approval: &PendingApproval,
        proportions: &ProportionTable,
        today: NaiveDate,
    ) -> Assessment {
        let current = proportions.proportion(&approval.date_key(), approval.duration);
        let decision = self.evaluate(current, approval.team_size, 1);
        let is_future = approval.is_future(today);

        let state = if !is_future || decision.allowed {
            ApprovalState::Approvable
        } else {
            info!(
                "Approval for {} {} blocked: team proportion would be {:.2}",
                approval.date_requested, approval.duration, decision.proportion_after_approval
            );
            ApprovalState::Blocked
        };

        Assessment { state, is_future, decision }
    }

    /// Check the pending occurrences of a recurring batch. Requests in any
    /// other state are ignored.
    pub fn assess_batch(
        &self,
        requests: &[WfhRequest],
        proportions: &ProportionTable,
        team_size: usize,
        today: NaiveDate,
    ) -> BatchAssessment {
        let pending: Vec<&WfhRequest> =
            requests.iter().filter(|r| r.status == RequestStatus::Pending).collect();

        let exceeding = self.exceeding_occurrences(&pending, proportions, team_size, today);
        let decision = match self.batch_mode {
            BatchMode::Uniform => self.uniform_decision(&pending, &exceeding, proportions, team_size),
            BatchMode::PerDate => self.per_date_decision(&pending, proportions, team_size, today),
        };

        let state = if decision.allowed { ApprovalState::Approvable } else { ApprovalState::Blocked };
        if state == ApprovalState::Blocked {
            info!(
                "Batch approval of {} requests blocked, {} occurrences exceed the threshold",
                pending.len(),
                exceeding.len()
            );
        }

        BatchAssessment { state, decision, exceeding, pending_count: pending.len() }
    }

    fn exceeding_occurrences(
        &self,
        pending: &[&WfhRequest],
        proportions: &ProportionTable,
        team_size: usize,
        today: NaiveDate,
    ) -> Vec<u64> {
        pending
            .iter()
            .filter(|request| request.date_requested >= today)
            .filter(|request| {
                let key = DateKey::from_date(request.date_requested);
                !self.evaluate(proportions.proportion(&key, request.duration), team_size, 1).allowed
            })
            .map(|request| request.request_id)
            .collect()
    }

    // One proportion (taken from the last pending occurrence) stands in for
    // the whole batch. Blocking still follows the per-occurrence check.
    fn uniform_decision(
        &self,
        pending: &[&WfhRequest],
        exceeding: &[u64],
        proportions: &ProportionTable,
        team_size: usize,
    ) -> EligibilityDecision {
        let base = pending
            .last()
            .map(|request| {
                proportions.proportion(&DateKey::from_date(request.date_requested), request.duration)
            })
            .unwrap_or(0.0);
        let summary = self.evaluate_batch(base, team_size, pending.len());

        EligibilityDecision {
            allowed: exceeding.is_empty(),
            proportion_after_approval: summary.proportion_after_approval,
        }
    }

    // Each future date+duration slot gets its own proportion plus every
    // occurrence in the batch that lands on it.
    fn per_date_decision(
        &self,
        pending: &[&WfhRequest],
        proportions: &ProportionTable,
        team_size: usize,
        today: NaiveDate,
    ) -> EligibilityDecision {
        let mut slots: BTreeMap<(NaiveDate, Duration), usize> = BTreeMap::new();
        for request in pending.iter().filter(|r| r.date_requested >= today) {
            *slots.entry((request.date_requested, request.duration)).or_default() += 1;
        }

        let mut allowed = true;
        let mut worst = 0.0_f64;
        for ((date, duration), count) in slots {
            let current = proportions.proportion(&DateKey::from_date(date), duration);
            let decision = self.evaluate(current, team_size, count);
            if !decision.allowed {
                debug!(
                    "Batch slot {} {} would reach {:.2}",
                    date, duration, decision.proportion_after_approval
                );
                allowed = false;
            }
            worst = worst.max(decision.proportion_after_approval);
        }

        EligibilityDecision { allowed, proportion_after_approval: worst }
    }
}

/// [`EligibilityEvaluator::evaluate`] with the default 50% threshold.
pub fn evaluate(current_proportion: f64, team_size: usize, pending_count: usize) -> EligibilityDecision {
    EligibilityEvaluator::default().evaluate(current_proportion, team_size, pending_count)
}

/// [`EligibilityEvaluator::evaluate_batch`] with the default 50% threshold.
pub fn evaluate_batch(
    current_proportion: f64,
    team_size: usize,
    pending_count: usize,
) -> EligibilityDecision {
    EligibilityEvaluator::default().evaluate_batch(current_proportion, team_size, pending_count)
}
