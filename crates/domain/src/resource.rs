//! Resource snapshots supplied by the caller for contextual validation.
//!
//! The surrounding application fetches devices, containers, volumes and
//! playbooks and passes them in as a [`ResourceContext`]. Lookups are linear;
//! snapshots are small and short-lived.

use serde::{Deserialize, Serialize};

use crate::id::{ContainerId, DeviceId, PlaybookRef, VolumeId};

/// Connectivity of a managed device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
    #[default]
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        })
    }
}

/// A managed server of the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub status: DeviceStatus,
}

impl Device {
    /// Hostname when known, otherwise the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.hostname.as_deref().unwrap_or(self.id.as_str())
    }
}

/// Runtime state of a docker container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Running,
    #[serde(alias = "exited")]
    Stopped,
    Paused,
    #[default]
    #[serde(other)]
    Unknown,
}

/// A docker container known to the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    pub name: String,
    #[serde(default)]
    pub status: ContainerStatus,
}

/// A docker volume known to the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub id: VolumeId,
    #[serde(default)]
    pub name: Option<String>,
}

/// A playbook available for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playbook {
    pub id: String,
    pub name: String,
}

impl Playbook {
    /// A playbook reference resolves either by id or by name.
    #[must_use]
    pub fn is_referenced_by(&self, reference: &PlaybookRef) -> bool {
        self.id == reference.as_str() || self.name == reference.as_str()
    }
}

/// Read-only snapshot of the resources an automation may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceContext {
    pub devices: Vec<Device>,
    pub containers: Vec<Container>,
    pub volumes: Vec<Volume>,
    pub playbooks: Vec<Playbook>,
}

impl ResourceContext {
    #[must_use]
    pub fn device(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|d| &d.id == id)
    }

    #[must_use]
    pub fn container(&self, id: &ContainerId) -> Option<&Container> {
        self.containers.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn volume(&self, id: &VolumeId) -> Option<&Volume> {
        self.volumes.iter().find(|v| &v.id == id)
    }

    #[must_use]
    pub fn playbook(&self, reference: &PlaybookRef) -> Option<&Playbook> {
        self.playbooks.iter().find(|p| p.is_referenced_by(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ResourceContext {
        ResourceContext {
            devices: vec![Device {
                id: DeviceId::new("d1"),
                hostname: Some("web-01".to_string()),
                status: DeviceStatus::Online,
            }],
            containers: vec![Container {
                id: ContainerId::new("c1"),
                name: "nginx".to_string(),
                status: ContainerStatus::Running,
            }],
            volumes: vec![Volume {
                id: VolumeId::new("v1"),
                name: None,
            }],
            playbooks: vec![Playbook {
                id: "pb-1".to_string(),
                name: "upgrade.yml".to_string(),
            }],
        }
    }

    #[test]
    fn should_find_resources_by_id() {
        let ctx = context();
        assert!(ctx.device(&DeviceId::new("d1")).is_some());
        assert!(ctx.container(&ContainerId::new("c1")).is_some());
        assert!(ctx.volume(&VolumeId::new("v1")).is_some());
        assert!(ctx.device(&DeviceId::new("missing")).is_none());
    }

    #[test]
    fn should_resolve_playbook_by_id_or_name() {
        let ctx = context();
        assert!(ctx.playbook(&PlaybookRef::new("pb-1")).is_some());
        assert!(ctx.playbook(&PlaybookRef::new("upgrade.yml")).is_some());
        assert!(ctx.playbook(&PlaybookRef::new("other.yml")).is_none());
    }

    #[test]
    fn should_fall_back_to_id_when_hostname_missing() {
        let device = Device {
            id: DeviceId::new("d9"),
            hostname: None,
            status: DeviceStatus::Offline,
        };
        assert_eq!(device.display_name(), "d9");
    }

    #[test]
    fn should_map_unrecognised_status_to_unknown() {
        let status: DeviceStatus = serde_json::from_str("\"rebooting\"").unwrap();
        assert_eq!(status, DeviceStatus::Unknown);
        let status: ContainerStatus = serde_json::from_str("\"restarting\"").unwrap();
        assert_eq!(status, ContainerStatus::Unknown);
        let status: ContainerStatus = serde_json::from_str("\"exited\"").unwrap();
        assert_eq!(status, ContainerStatus::Stopped);
    }
}
