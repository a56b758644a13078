//! Full, ordered validation pass over an automation chain.
//!
//! Passes run in a fixed order and accumulate into one [`ValidationOutcome`]:
//! trigger, non-empty chain, each action (structure then context), conflicts,
//! and finally chain-level safety heuristics.

use fleetops_domain::automation::{
    Action, ActionKind, AutomationChain, AutomationDefinition, RiskLevel, Trigger,
};
use fleetops_domain::id::AutomationId;
use fleetops_domain::resource::ResourceContext;
use fleetops_domain::validation::ValidationOutcome;

use super::action_validator::ActionValidator;
use super::conflict_analyzer::ConflictAnalyzer;
use super::cron_safety::CronSafetyValidator;
use crate::policy::{ChainPolicy, NamingPolicy, Policy};

/// Rough duration of a chain run and what it is made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEstimate {
    /// Never below 1.
    pub minutes: usize,
    pub factors: Vec<String>,
}

/// Composes the cron, action and conflict validators with chain heuristics.
#[derive(Debug, Clone)]
pub struct ChainValidator {
    chain_policy: ChainPolicy,
    naming: NamingPolicy,
    cron: CronSafetyValidator,
    actions: ActionValidator,
    conflicts: ConflictAnalyzer,
}

impl Default for ChainValidator {
    fn default() -> Self {
        Self::new(&Policy::default())
    }
}

impl ChainValidator {
    /// Create a chain validator, and the validators it composes, from `policy`.
    #[must_use]
    pub fn new(policy: &Policy) -> Self {
        Self {
            chain_policy: policy.chain.clone(),
            naming: policy.naming.clone(),
            cron: CronSafetyValidator::new(&policy.chain),
            actions: ActionValidator::new(&policy.chain),
            conflicts: ConflictAnalyzer::new(),
        }
    }

    /// Validate a chain, optionally resolving its references in `context`.
    #[tracing::instrument(skip_all, fields(actions = chain.actions.len(), with_context = context.is_some()))]
    pub fn validate(
        &self,
        chain: &AutomationChain,
        context: Option<&ResourceContext>,
    ) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();

        self.check_trigger(&chain.trigger, &mut outcome);

        if chain.actions.is_empty() {
            outcome.error("At least one action is required");
        }

        for (index, action) in chain.actions.iter().enumerate() {
            let mut findings = self.actions.validate_structure(action);
            if let Some(context) = context {
                if action.kind().is_some() {
                    findings.merge(self.actions.validate_with_context(action, context));
                }
            }
            outcome.merge_prefixed(&format!("Action {}", index + 1), findings);
        }

        let conflicts = self.conflicts.analyze(&chain.actions);
        outcome.warnings.extend(conflicts.warnings);
        outcome.errors.extend(conflicts.errors);

        self.check_chain_safety(&chain.actions, &mut outcome);

        tracing::debug!(
            valid = outcome.is_valid(),
            errors = outcome.errors.len(),
            warnings = outcome.warnings.len(),
            "chain validated"
        );
        outcome
    }

    /// Estimate how long a chain takes: 2 min per playbook device, 1 min per
    /// container action, 3 min per volume.
    #[must_use]
    pub fn estimate_execution_minutes(&self, chain: &AutomationChain) -> ExecutionEstimate {
        let mut minutes = 0;
        let mut factors = Vec::new();

        for action in &chain.actions {
            match action {
                Action::Playbook { devices, .. } => {
                    minutes += devices.len() * 2;
                    factors.push(format!("Playbook on {} devices", devices.len()));
                }
                Action::Container { .. } => {
                    minutes += 1;
                    factors.push("Docker container operations".to_string());
                }
                Action::Volume { volumes, .. } => {
                    minutes += volumes.len() * 3;
                    factors.push(format!("Volume operations on {} volumes", volumes.len()));
                }
                Action::Unknown => {}
            }
        }

        ExecutionEstimate {
            minutes: minutes.max(1),
            factors,
        }
    }

    /// Check an automation name: required, length bounds, unique among
    /// `existing` except the definition identified by `self_id`.
    #[must_use]
    pub fn validate_name(
        &self,
        name: &str,
        existing: &[AutomationDefinition],
        self_id: Option<AutomationId>,
    ) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        let name = name.trim();
        if name.is_empty() {
            outcome.error("Automation name is required");
            return outcome;
        }

        let length = name.chars().count();
        if length < self.naming.min_length {
            outcome.error(format!(
                "Automation name must be at least {} characters long",
                self.naming.min_length
            ));
        }
        if length > self.naming.max_length {
            outcome.error(format!(
                "Automation name must be at most {} characters long",
                self.naming.max_length
            ));
        }

        let taken = existing
            .iter()
            .any(|other| other.name.trim() == name && Some(other.id) != self_id);
        if taken {
            outcome.error("Name already exists");
        }
        outcome
    }

    /// Name validation followed by [`validate`](Self::validate) without context.
    #[tracing::instrument(skip(self, chain, existing), fields(existing = existing.len()))]
    pub fn validate_complete_automation(
        &self,
        name: &str,
        chain: &AutomationChain,
        existing: &[AutomationDefinition],
        self_id: Option<AutomationId>,
    ) -> ValidationOutcome {
        let mut outcome = self.validate_name(name, existing, self_id);
        outcome.merge(self.validate(chain, None));
        outcome
    }

    /// Classify how disruptive a definition could be if it misfired.
    #[must_use]
    pub fn execution_risk_level(&self, definition: &AutomationDefinition) -> RiskLevel {
        execution_risk_level(&definition.chain.actions)
    }

    fn check_trigger(&self, trigger: &Trigger, outcome: &mut ValidationOutcome) {
        match trigger {
            Trigger::Cron { cron_value } if cron_value.trim().is_empty() => {
                outcome.error("Cron expression is required");
            }
            Trigger::Cron { cron_value } => {
                let syntax = self.cron.validate(cron_value);
                if let Some(error) = syntax.error {
                    outcome.error(format!("Cron validation failed: {error}"));
                }
                outcome.merge(self.cron.assess_safety(cron_value));
            }
            Trigger::Unsupported => outcome.error("Unknown trigger type"),
        }
    }

    fn check_chain_safety(&self, actions: &[Action], outcome: &mut ValidationOutcome) {
        let has_volume = actions
            .iter()
            .any(|a| a.kind() == Some(ActionKind::Volume));
        let has_destructive = actions.iter().any(Action::is_destructive_container_op);
        if has_volume && has_destructive {
            outcome.warn("Chain contains both volume and destructive operations");
            outcome.suggest("Consider splitting into separate automations for better safety");
        }

        if actions.len() > self.chain_policy.max_actions {
            outcome.warn("Complex automation with many actions may be harder to debug");
            outcome.suggest("Consider breaking into smaller, focused automations");
        }

        let playbooks = actions
            .iter()
            .filter(|a| a.kind() == Some(ActionKind::Playbook))
            .count();
        if playbooks > 1 {
            outcome.suggest(
                "Multiple playbook actions can be combined into a single playbook for better performance",
            );
        }
    }
}

/// `high` with any volume action, `medium` with any container action or a
/// multi-device playbook, `low` otherwise.
#[must_use]
pub fn execution_risk_level(actions: &[Action]) -> RiskLevel {
    if actions.iter().any(|a| matches!(a, Action::Volume { .. })) {
        return RiskLevel::High;
    }
    let medium = actions.iter().any(|a| match a {
        Action::Container { .. } => true,
        Action::Playbook { devices, .. } => devices.len() > 1,
        Action::Volume { .. } | Action::Unknown => false,
    });
    if medium {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
