//! Trigger: what makes an automation fire.

use serde::{Deserialize, Serialize};

/// Describes when an automation should run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// Fires on a five-field cron schedule (e.g. `"0 2 * * *"`).
    Cron {
        #[serde(default)]
        cron_value: String,
    },
    /// Any trigger tag this version does not recognise.
    #[serde(other)]
    Unsupported,
}

impl Trigger {
    /// Convenience constructor for a cron trigger.
    #[must_use]
    pub fn cron(value: impl Into<String>) -> Self {
        Self::Cron {
            cron_value: value.into(),
        }
    }

    /// The cron expression, when schedule-based.
    #[must_use]
    pub fn cron_value(&self) -> Option<&str> {
        match self {
            Self::Cron { cron_value } => Some(cron_value),
            Self::Unsupported => None,
        }
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cron { cron_value } => write!(f, "cron({cron_value})"),
            Self::Unsupported => f.write_str("unsupported"),
        }
    }
}
