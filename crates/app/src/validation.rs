//! Validators: structural, contextual and safety checks for automations.
//!
//! Leaves first: [`cron_safety`] and [`action_validator`] check single
//! pieces, [`conflict_analyzer`] compares actions pairwise, and
//! [`chain_validator`] composes them into one ordered pass.

pub mod action_validator;
pub mod chain_validator;
pub mod conflict_analyzer;
pub mod cron_safety;

pub use action_validator::ActionValidator;
pub use chain_validator::{ChainValidator, ExecutionEstimate};
pub use conflict_analyzer::{ConflictAnalyzer, ConflictReport};
pub use cron_safety::{CronSafetyValidator, CronValidation, validate_cron_expression};
