//! Common error types used across the workspace.
//!
//! Expected validation findings are *data* ([`ValidationOutcome`]) rather
//! than errors. The types here cover invariant violations raised by builders
//! and executability checks.
//!
//! [`ValidationOutcome`]: crate::validation::ValidationOutcome

/// Top-level domain error.
#[derive(Debug, thiserror::Error)]
pub enum FleetOpsError {
    #[error("validation error")]
    Validation(#[from] ValidationError),
}

/// A domain invariant that does not hold.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("at least one action is required")]
    NoActions,
    #[error("automation is disabled")]
    Disabled,
}
