//! Template engine: whitelist-based placeholder substitution and form checks.
//!
//! Substitution never evaluates anything: the only placeholders replaced are
//! `{{key}}` for keys declared by the template, and the scan is a single
//! left-to-right pass so text coming from a substituted value is never
//! scanned again.

use std::collections::BTreeMap;

use fleetops_domain::automation::{ActionKind, AutomationChain};
use fleetops_domain::template::{Template, TemplateFormData, VariableType, VariableValues};
use fleetops_domain::validation::ValidationOutcome;
use serde_json::Value;

use crate::policy::{NamingPolicy, Policy};

const PLACEHOLDER_OPEN: &str = "{{";
const PLACEHOLDER_CLOSE: &str = "}}";
const MAX_COMPLEXITY: usize = 5;

/// Errors raised while turning an instantiated template into a typed chain.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The substituted structure is not a valid chain.
    #[error("instantiated template is not a valid chain: {0}")]
    Json(#[from] serde_json::Error),
}

/// Instantiates and inspects templates.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    naming: NamingPolicy,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new(&Policy::default())
    }
}

impl TemplateEngine {
    /// Create an engine applying the naming rules of `policy` to form data.
    #[must_use]
    pub fn new(policy: &Policy) -> Self {
        Self {
            naming: policy.naming.clone(),
        }
    }

    /// Substitute declared placeholders into a copy of the template's base chain.
    ///
    /// Each variable resolves to its provided value, falling back to its
    /// default. Values of the wrong type are dropped, leaving their
    /// placeholder in place. The template itself is never modified.
    #[tracing::instrument(skip_all, fields(template = %template.name, provided = provided.len()))]
    #[must_use]
    pub fn instantiate(&self, template: &Template, provided: &VariableValues) -> Value {
        let mut substitutions = BTreeMap::new();
        for spec in &template.variables {
            let Some(value) = provided
                .get(&spec.key)
                .filter(|v| !v.is_null())
                .or(spec.default_value.as_ref())
            else {
                continue;
            };
            if is_valid_variable_value(value, spec.kind) {
                substitutions.insert(spec.key.as_str(), value_to_text(value));
            } else {
                tracing::warn!(key = %spec.key, expected = ?spec.kind, "rejected template variable value");
            }
        }

        let mut chain = template.base_chain.clone();
        if !substitutions.is_empty() {
            substitute(&mut chain, &substitutions);
        }
        tracing::debug!(substituted = substitutions.len(), "template instantiated");
        chain
    }

    /// [`instantiate`](Self::instantiate), then read the result as a typed chain.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Json`] when the substituted structure does not
    /// describe a chain, e.g. when a placeholder was left in an enum field.
    pub fn instantiate_chain(
        &self,
        template: &Template,
        provided: &VariableValues,
    ) -> Result<AutomationChain, TemplateError> {
        let value = self.instantiate(template, provided);
        Ok(serde_json::from_value(value)?)
    }

    /// Check what a user entered before creating an automation from `template`.
    #[must_use]
    pub fn validate_form_data(
        &self,
        template: &Template,
        form: &TemplateFormData,
    ) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();

        let name = form.name.trim();
        if name.is_empty() {
            outcome.error("Automation name is required");
        } else if name.chars().count() < self.naming.min_length {
            outcome.error(format!(
                "Automation name must be at least {} characters long",
                self.naming.min_length
            ));
        }

        for spec in &template.variables {
            let value = form.variables.get(&spec.key).filter(|v| !is_empty_value(v));
            if spec.required && value.is_none() {
                outcome.error(format!("{} is required", spec.label));
            }
            let Some(value) = value else {
                continue;
            };
            match spec.kind {
                VariableType::Number if !is_numeric(value) => {
                    outcome.error(format!("{} must be a valid number", spec.label));
                }
                VariableType::Boolean if !value.is_boolean() => {
                    outcome.error(format!("{} must be a valid boolean value", spec.label));
                }
                VariableType::Select
                    if !spec.options.is_empty()
                        && !spec.options.iter().any(|option| &option.value == value) =>
                {
                    outcome.error(format!("{} must be one of the provided options", spec.label));
                }
                _ => {}
            }
        }

        outcome
    }

    /// The default of every variable that declares one.
    #[must_use]
    pub fn default_values(&self, template: &Template) -> VariableValues {
        template
            .variables
            .iter()
            .filter_map(|spec| {
                spec.default_value
                    .as_ref()
                    .map(|value| (spec.key.clone(), value.clone()))
            })
            .collect()
    }

    /// Whether every action kind used by the template is available.
    ///
    /// An action with an unrecognised kind is never available.
    #[must_use]
    pub fn is_compatible(&self, template: &Template, available: &[ActionKind]) -> bool {
        template
            .action_outlines()
            .iter()
            .all(|outline| outline.kind.is_some_and(|kind| available.contains(&kind)))
    }

    /// Rough difficulty of a template, from 1 to 5.
    #[must_use]
    pub fn complexity_score(&self, template: &Template) -> u8 {
        let outlines = template.action_outlines();
        let mut score = outlines.len();
        for outline in &outlines {
            score += match outline.kind {
                Some(ActionKind::Volume) => 2,
                Some(ActionKind::Container) => 1,
                Some(ActionKind::Playbook) => usize::from(outline.target_count > 1),
                None => 0,
            };
        }
        if template.variables.len() > 3 {
            score += 1;
        }
        u8::try_from(score.clamp(1, MAX_COMPLEXITY)).unwrap_or(u8::MAX)
    }
}

/// Structural type check of a variable value.
///
/// `select` accepts strings and numbers; membership in the options is a
/// form-validation concern.
#[must_use]
pub fn is_valid_variable_value(value: &Value, kind: VariableType) -> bool {
    match kind {
        VariableType::String => value.is_string(),
        VariableType::Number => value.is_number(),
        VariableType::Boolean => value.is_boolean(),
        VariableType::Select => value.is_string() || value.is_number(),
    }
}

fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(text) => text.trim().parse::<f64>().is_ok_and(f64::is_finite),
        _ => false,
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn substitute(value: &mut Value, substitutions: &BTreeMap<&str, String>) {
    match value {
        Value::String(text) => {
            if text.contains(PLACEHOLDER_OPEN) {
                *text = substitute_text(text, substitutions);
            }
        }
        Value::Array(items) => {
            for item in items {
                substitute(item, substitutions);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                substitute(item, substitutions);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

// Unknown keys and an unterminated `{{` are copied through untouched.
fn substitute_text(text: &str, substitutions: &BTreeMap<&str, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
        let after = &rest[start + PLACEHOLDER_OPEN.len()..];
        let Some(end) = after.find(PLACEHOLDER_CLOSE) else {
            break;
        };
        out.push_str(&rest[..start]);
        if let Some(replacement) = substitutions.get(&after[..end]) {
            out.push_str(replacement);
            rest = &after[end + PLACEHOLDER_CLOSE.len()..];
        } else {
            out.push_str(PLACEHOLDER_OPEN);
            rest = after;
        }
    }
    out.push_str(rest);
    out
}
