//! Action: one unit of work in an automation chain.

use serde::{Deserialize, Serialize};

use crate::id::{ContainerId, DeviceId, PlaybookRef, VolumeId};

/// An operation executed, in order, when the automation fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Run an Ansible playbook against a set of devices.
    Playbook {
        playbook: PlaybookRef,
        #[serde(default)]
        devices: Vec<DeviceId>,
    },
    /// Operate one or more docker containers.
    Container {
        op: ContainerOp,
        #[serde(default)]
        containers: Vec<ContainerId>,
    },
    /// Operate one or more docker volumes.
    Volume {
        op: VolumeOp,
        #[serde(default)]
        volumes: Vec<VolumeId>,
    },
    /// Any tag this version does not recognise.
    #[serde(other)]
    Unknown,
}

impl Action {
    /// The action's kind, or `None` for [`Action::Unknown`].
    #[must_use]
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Self::Playbook { .. } => Some(ActionKind::Playbook),
            Self::Container { .. } => Some(ActionKind::Container),
            Self::Volume { .. } => Some(ActionKind::Volume),
            Self::Unknown => None,
        }
    }

    /// Number of resources (devices, containers or volumes) the action targets.
    #[must_use]
    pub fn target_count(&self) -> usize {
        match self {
            Self::Playbook { devices, .. } => devices.len(),
            Self::Container { containers, .. } => containers.len(),
            Self::Volume { volumes, .. } => volumes.len(),
            Self::Unknown => 0,
        }
    }

    /// Whether this is a container operation that deletes containers.
    #[must_use]
    pub fn is_destructive_container_op(&self) -> bool {
        matches!(self, Self::Container { op, .. } if op.is_destructive())
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Playbook { playbook, devices } => {
                write!(f, "playbook({playbook}, {} devices)", devices.len())
            }
            Self::Container { op, containers } => {
                write!(f, "container_{op}({} containers)", containers.len())
            }
            Self::Volume { op, volumes } => {
                write!(f, "volume_{op}({} volumes)", volumes.len())
            }
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Discriminant of a recognised [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Playbook,
    Container,
    Volume,
}

/// Docker container operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerOp {
    Start,
    Stop,
    Restart,
    Pause,
    Kill,
    Remove,
    Prune,
}

impl ContainerOp {
    /// Operations that permanently delete containers and their data.
    #[must_use]
    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Remove | Self::Prune)
    }
}

impl std::fmt::Display for ContainerOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Pause => "pause",
            Self::Kill => "kill",
            Self::Remove => "remove",
            Self::Prune => "prune",
        })
    }
}

/// Docker volume operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeOp {
    Backup,
    Restore,
    Remove,
}

impl std::fmt::Display for VolumeOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Backup => "backup",
            Self::Restore => "restore",
            Self::Remove => "remove",
        })
    }
}
