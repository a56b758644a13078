//! Typed identifier newtypes.
//!
//! Records owned by the automation tool itself (definitions, executions,
//! templates) use UUIDs. Fleet resources are referenced by the opaque strings
//! their owning system hands out (device UUIDs, docker container ids, volume
//! names, playbook paths), so they are string-backed. Inside a
//! [`Template`](crate::template::Template) those strings may still hold
//! `{{key}}` placeholders.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the inner UUID.
            #[must_use]
            pub fn as_uuid(self) -> uuid::Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

macro_rules! define_ref {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the reference is blank (empty or whitespace only).
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Unique identifier for an [`AutomationDefinition`](crate::automation::AutomationDefinition).
    AutomationId
);

define_id!(
    /// Unique identifier for an [`ExecutionLogEntry`](crate::execution::ExecutionLogEntry).
    ExecutionId
);

define_id!(
    /// Unique identifier for a [`Template`](crate::template::Template).
    TemplateId
);

define_ref!(
    /// Reference to a managed device (server) of the fleet.
    DeviceId
);

define_ref!(
    /// Reference to a docker container running on a managed device.
    ContainerId
);

define_ref!(
    /// Reference to a docker volume.
    VolumeId
);

define_ref!(
    /// Reference to a playbook, either by id or by name.
    PlaybookRef
);
