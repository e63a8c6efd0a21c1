pub mod challenge_type;
pub mod cycle_outcome;
pub mod member_record;
pub mod outcome_kind;
pub mod weekly_submission;
