//! Template: a reusable, parametrised automation chain.
//!
//! The base chain is kept as loosely typed JSON because `{{key}}` placeholders
//! may appear anywhere a string can, including in fields that are enums once
//! the chain is typed (e.g. `"op": "{{operation}}"`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::automation::ActionKind;
use crate::id::TemplateId;

/// Variable values keyed by [`VariableSpec::key`].
pub type VariableValues = BTreeMap<String, Value>;

/// Catalog category of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Maintenance,
    Monitoring,
    Backup,
    Deployment,
    Security,
}

impl TemplateCategory {
    pub const ALL: [Self; 5] = [
        Self::Maintenance,
        Self::Monitoring,
        Self::Backup,
        Self::Deployment,
        Self::Security,
    ];

    /// Machine key, as serialized.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Maintenance => "maintenance",
            Self::Monitoring => "monitoring",
            Self::Backup => "backup",
            Self::Deployment => "deployment",
            Self::Security => "security",
        }
    }
}

impl std::fmt::Display for TemplateCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Declared type of a template variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Number,
    Boolean,
    Select,
}

/// One allowed value of a `select` variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: Value,
}

/// Declaration of a `{{key}}` placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: VariableType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<Value>,
    /// Only meaningful for [`VariableType::Select`].
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A parametrised automation blueprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub category: TemplateCategory,
    /// Chain-shaped JSON (`{"trigger": …, "actions": […]}`) with placeholders.
    pub base_chain: Value,
    #[serde(default)]
    pub variables: Vec<VariableSpec>,
}

/// What can be told about a base-chain action without instantiating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutline {
    /// `None` when the `type` tag is missing or not recognised.
    pub kind: Option<ActionKind>,
    pub target_count: usize,
}

impl Template {
    /// Outline every entry of `base_chain.actions`, in order.
    #[must_use]
    pub fn action_outlines(&self) -> Vec<ActionOutline> {
        let Some(actions) = self.base_chain.get("actions").and_then(Value::as_array) else {
            return Vec::new();
        };
        actions
            .iter()
            .map(|action| {
                let kind = action
                    .get("type")
                    .and_then(|tag| serde_json::from_value::<ActionKind>(tag.clone()).ok());
                let targets = match kind {
                    Some(ActionKind::Playbook) => "devices",
                    Some(ActionKind::Container) => "containers",
                    Some(ActionKind::Volume) => "volumes",
                    None => "",
                };
                let target_count = action
                    .get(targets)
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                ActionOutline { kind, target_count }
            })
            .collect()
    }
}

/// Values entered by a user when creating an automation from a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateFormData {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variables: VariableValues,
}
