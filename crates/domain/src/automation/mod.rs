//! Automation: a schedule trigger paired with an ordered chain of actions.
//!
//! An [`AutomationDefinition`] is authored externally and handed to the
//! validators by value or reference; nothing here persists or schedules it.

mod action;
mod trigger;

pub use action::{Action, ActionKind, ContainerOp, VolumeOp};
pub use trigger::Trigger;

use serde::{Deserialize, Serialize};

use crate::error::{FleetOpsError, ValidationError};
use crate::id::AutomationId;
use crate::time::Timestamp;

/// The trigger and the ordered actions of one automation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationChain {
    pub trigger: Trigger,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl AutomationChain {
    /// Build a cron-triggered chain.
    #[must_use]
    pub fn cron(cron_value: impl Into<String>, actions: Vec<Action>) -> Self {
        Self {
            trigger: Trigger::cron(cron_value),
            actions,
        }
    }
}

/// A named automation as stored by the surrounding application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationDefinition {
    pub id: AutomationId,
    pub name: String,
    pub enabled: bool,
    pub chain: AutomationChain,
    pub last_execution_time: Option<Timestamp>,
}

impl AutomationDefinition {
    /// Create a builder for constructing an [`AutomationDefinition`].
    #[must_use]
    pub fn builder() -> AutomationDefinitionBuilder {
        AutomationDefinitionBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when `name` is blank.
    pub fn validate(&self) -> Result<(), FleetOpsError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }

    /// Check that the automation may run unattended.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Disabled`] when the automation is disabled
    /// and [`ValidationError::NoActions`] when its chain is empty.
    pub fn ensure_executable(&self) -> Result<(), FleetOpsError> {
        if !self.enabled {
            return Err(ValidationError::Disabled.into());
        }
        if self.chain.actions.is_empty() {
            return Err(ValidationError::NoActions.into());
        }
        Ok(())
    }

    /// Whether the automation is enabled and has at least one action.
    #[must_use]
    pub fn can_execute(&self) -> bool {
        self.ensure_executable().is_ok()
    }
}

/// Step-by-step builder for [`AutomationDefinition`].
///
/// Unlike [`AutomationDefinition::ensure_executable`], building accepts an
/// empty action list so that drafts can be validated and reported on.
#[derive(Debug, Default)]
pub struct AutomationDefinitionBuilder {
    id: Option<AutomationId>,
    name: Option<String>,
    enabled: Option<bool>,
    trigger: Option<Trigger>,
    actions: Vec<Action>,
    last_execution_time: Option<Timestamp>,
}

impl AutomationDefinitionBuilder {
    #[must_use]
    pub fn id(mut self, id: AutomationId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    #[must_use]
    pub fn cron(self, cron_value: impl Into<String>) -> Self {
        self.trigger(Trigger::cron(cron_value))
    }

    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    #[must_use]
    pub fn last_execution_time(mut self, ts: Timestamp) -> Self {
        self.last_execution_time = Some(ts);
        self
    }

    /// Consume the builder, validate, and return an [`AutomationDefinition`].
    ///
    /// # Errors
    ///
    /// Returns [`FleetOpsError::Validation`] if the name is missing or blank.
    pub fn build(self) -> Result<AutomationDefinition, FleetOpsError> {
        let definition = AutomationDefinition {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            enabled: self.enabled.unwrap_or(true),
            chain: AutomationChain {
                trigger: self.trigger.unwrap_or_else(|| Trigger::cron("")),
                actions: self.actions,
            },
            last_execution_time: self.last_execution_time,
        };
        definition.validate()?;
        Ok(definition)
    }
}

/// Coarse estimate of how disruptive a misfired automation could be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}
