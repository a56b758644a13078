//! Validation outcome: errors block, warnings and suggestions advise.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Accumulated findings of a validation pass.
///
/// Validity is derived: an outcome is valid exactly when it carries no
/// errors. Warnings and suggestions never affect it. The serialized form
/// carries it as a `valid` field, which is ignored when reading back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidationOutcome {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

impl ValidationOutcome {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn suggest(&mut self, message: impl Into<String>) {
        self.suggestions.push(message.into());
    }

    /// Append every finding of `other`, keeping order.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.suggestions.extend(other.suggestions);
    }

    /// Append every finding of `other`, each prefixed with `"{prefix}: "`.
    pub fn merge_prefixed(&mut self, prefix: &str, other: Self) {
        let prefixed = |items: Vec<String>| items.into_iter().map(move |m| format!("{prefix}: {m}"));
        self.errors.extend(prefixed(other.errors));
        self.warnings.extend(prefixed(other.warnings));
        self.suggestions.extend(prefixed(other.suggestions));
    }
}

impl Serialize for ValidationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationOutcome", 4)?;
        state.serialize_field("valid", &self.is_valid())?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("warnings", &self.warnings)?;
        state.serialize_field("suggestions", &self.suggestions)?;
        state.end()
    }
}
