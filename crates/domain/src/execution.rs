//! Execution history: records of automation run attempts and derived health.

use serde::{Deserialize, Serialize};

use crate::id::{AutomationId, ExecutionId};
use crate::time::Timestamp;

/// Lifecycle state of one run attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Pending,
    Running,
    Success,
    Failed,
    Cancelled,
    Timeout,
}

/// Human-facing description of an [`ExecutionStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusInfo {
    pub message: &'static str,
    pub can_retry: bool,
}

impl ExecutionStatus {
    /// Whether the attempt has finished, one way or another.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }

    /// Describe the status; only finished attempts may be retried.
    #[must_use]
    pub fn info(self) -> StatusInfo {
        let message = match self {
            Self::Pending => "Waiting to execute",
            Self::Running => "Currently executing",
            Self::Success => "Executed successfully",
            Self::Failed => "Execution failed",
            Self::Cancelled => "Execution cancelled",
            Self::Timeout => "Execution timed out",
        };
        StatusInfo {
            message,
            can_retry: self.is_terminal(),
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Timeout => "timeout",
        })
    }
}

/// A historical record of one run attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionLogEntry {
    pub id: ExecutionId,
    pub automation_id: AutomationId,
    pub status: ExecutionStatus,
    pub start_time: Timestamp,
    #[serde(default)]
    pub end_time: Option<Timestamp>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ExecutionLogEntry {
    /// Create a builder for constructing an [`ExecutionLogEntry`].
    #[must_use]
    pub fn builder() -> ExecutionLogEntryBuilder {
        ExecutionLogEntryBuilder::default()
    }

    /// Elapsed time, for entries that have finished.
    #[must_use]
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }
}

/// Step-by-step builder for [`ExecutionLogEntry`].
#[derive(Debug, Default)]
pub struct ExecutionLogEntryBuilder {
    id: Option<ExecutionId>,
    automation_id: Option<AutomationId>,
    status: Option<ExecutionStatus>,
    start_time: Option<Timestamp>,
    end_time: Option<Timestamp>,
    error: Option<String>,
}

impl ExecutionLogEntryBuilder {
    #[must_use]
    pub fn id(mut self, id: ExecutionId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn automation_id(mut self, automation_id: AutomationId) -> Self {
        self.automation_id = Some(automation_id);
        self
    }

    #[must_use]
    pub fn status(mut self, status: ExecutionStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn start_time(mut self, start_time: Timestamp) -> Self {
        self.start_time = Some(start_time);
        self
    }

    #[must_use]
    pub fn end_time(mut self, end_time: Timestamp) -> Self {
        self.end_time = Some(end_time);
        self
    }

    #[must_use]
    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Consume the builder and return an [`ExecutionLogEntry`].
    #[must_use]
    pub fn build(self) -> ExecutionLogEntry {
        ExecutionLogEntry {
            id: self.id.unwrap_or_default(),
            automation_id: self.automation_id.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            start_time: self.start_time.unwrap_or_else(crate::time::now),
            end_time: self.end_time,
            error: self.error,
        }
    }
}

/// Aggregated figures over the logs of one automation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStats {
    pub total_executions: usize,
    pub success_count: usize,
    pub failure_count: usize,
    /// `0.0` when there are no executions.
    pub success_rate_percent: f64,
    /// Mean over entries with an end time; `0.0` when none finished.
    pub average_duration_ms: f64,
    pub last_execution_time: Option<Timestamp>,
    pub next_execution_time: Option<Timestamp>,
}

/// Direction in which the success rate is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionTrend {
    Improving,
    Stable,
    Declining,
    Unknown,
}

impl std::fmt::Display for ExecutionTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Declining => "declining",
            Self::Unknown => "unknown",
        })
    }
}

/// Whether an automation should be looked at by an operator, and why.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attention {
    pub flagged: bool,
    pub reason: Option<String>,
}

impl Attention {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn flagged(reason: impl Into<String>) -> Self {
        Self {
            flagged: true,
            reason: Some(reason.into()),
        }
    }
}
