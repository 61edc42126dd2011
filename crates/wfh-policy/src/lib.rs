pub mod aggregator;
pub mod eligibility;
pub mod lifecycle;
pub mod schedule_builder;

pub use aggregator::{aggregate, day_aggregate, share_of_team, DayAggregate, ProportionTable};
pub use eligibility::{
    evaluate, evaluate_batch, ApprovalState, Assessment, BatchAssessment, EligibilityDecision,
    EligibilityEvaluator, PendingApproval, DEFAULT_WFH_THRESHOLD,
};
pub use lifecycle::{RequestLifecycle, AUTO_REJECT_REMARK};
pub use schedule_builder::{build_member_schedule, build_team_schedule};
