//! # fleetops-app
//!
//! Engines that validate and inspect automation definitions.
//!
//! ## Responsibilities
//! - Validate cron schedules and assess their safety ([`validation::cron_safety`])
//! - Validate single actions, with or without a resource snapshot
//!   ([`validation::action_validator`])
//! - Detect opposing container operations within a chain
//!   ([`validation::conflict_analyzer`])
//! - Compose all of the above into one ordered chain validation, plus cost
//!   estimation and risk classification ([`validation::chain_validator`])
//! - Instantiate templates through whitelist substitution ([`templates`])
//! - Derive statistics, trend and attention signals from execution logs
//!   ([`execution_health`])
//!
//! Every operation is synchronous and free of IO: inputs are borrowed
//! snapshots, results are fresh values. Thresholds come from [`policy::Policy`]
//! and "now" from the [`ports::Clock`] port.
//!
//! ## Dependency rule
//! Depends on `fleetops-domain` only. Callers own fetching resources,
//! persisting definitions and actually running chains.

pub mod execution_health;
pub mod policy;
pub mod ports;
pub mod templates;
pub mod validation;

pub use execution_health::ExecutionHealthTracker;
pub use policy::{Policy, PolicyError};
pub use templates::{TemplateEngine, TemplateError};
pub use validation::{
    ActionValidator, ChainValidator, ConflictAnalyzer, CronSafetyValidator, validate_cron_expression,
};
