//! # fleetops-domain
//!
//! Pure domain model for fleet automations.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Automation definitions** (cron trigger → ordered action chain)
//! - Define **Actions** (run a playbook, operate containers, operate volumes)
//! - Parse and evaluate **cron expressions**
//! - Define **Resource snapshots** used for contextual validation
//! - Define **Templates** (parametrised chains with `{{key}}` placeholders)
//! - Define **Execution logs** and the statistics derived from them
//!
//! ## Dependency rule
//! This crate has **no internal dependencies** and performs no IO.
//! Validators, the template engine and health tracking live in `fleetops-app`.

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod cron;
pub mod execution;
pub mod resource;
pub mod template;
pub mod validation;
