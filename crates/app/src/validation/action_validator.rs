//! Action validation: required fields, referenced resources and op safety.

use fleetops_domain::automation::{Action, ContainerOp, VolumeOp};
use fleetops_domain::id::{ContainerId, DeviceId, PlaybookRef, VolumeId};
use fleetops_domain::resource::{ContainerStatus, DeviceStatus, ResourceContext};
use fleetops_domain::validation::ValidationOutcome;

use crate::policy::ChainPolicy;

pub(crate) const UNKNOWN_ACTION: &str = "Unknown action type";

/// Validates a single [`Action`], with or without a resource snapshot.
#[derive(Debug, Clone)]
pub struct ActionValidator {
    policy: ChainPolicy,
}

impl Default for ActionValidator {
    fn default() -> Self {
        Self::new(&ChainPolicy::default())
    }
}

impl ActionValidator {
    /// Create a validator using the fan-out and backup limits of `policy`.
    #[must_use]
    pub fn new(policy: &ChainPolicy) -> Self {
        Self {
            policy: policy.clone(),
        }
    }

    /// Check the fields each variant requires, without looking anything up.
    #[must_use]
    pub fn validate_structure(&self, action: &Action) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();
        match action {
            Action::Playbook { playbook, devices } => {
                if playbook.is_blank() {
                    outcome.error("Playbook is required");
                }
                if devices.is_empty() {
                    outcome.error("At least one target device is required");
                }
            }
            Action::Container { containers, .. } => {
                if containers.is_empty() {
                    outcome.error("At least one container is required");
                }
            }
            Action::Volume { volumes, .. } => {
                if volumes.is_empty() {
                    outcome.error("At least one volume is required");
                }
            }
            Action::Unknown => outcome.error(UNKNOWN_ACTION),
        }
        outcome
    }

    /// Resolve every referenced resource in `context` and flag risky operations.
    #[must_use]
    pub fn validate_with_context(
        &self,
        action: &Action,
        context: &ResourceContext,
    ) -> ValidationOutcome {
        match action {
            Action::Playbook { playbook, devices } => {
                self.check_playbook(playbook, devices, context)
            }
            Action::Container { op, containers } => check_containers(*op, containers, context),
            Action::Volume { op, volumes } => self.check_volumes(*op, volumes, context),
            Action::Unknown => {
                let mut outcome = ValidationOutcome::new();
                outcome.error(UNKNOWN_ACTION);
                outcome
            }
        }
    }

    fn check_playbook(
        &self,
        playbook: &PlaybookRef,
        devices: &[DeviceId],
        context: &ResourceContext,
    ) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();

        if !playbook.is_blank() && context.playbook(playbook).is_none() {
            outcome.error(format!("Playbook \"{playbook}\" not found"));
        }

        for id in devices {
            match context.device(id) {
                None => outcome.error(format!("Device {id} not found")),
                Some(device) if device.status != DeviceStatus::Online => outcome.warn(format!(
                    "Device {} is currently {}",
                    device.display_name(),
                    device.status
                )),
                Some(_) => {}
            }
        }

        if devices.len() > self.policy.max_fan_out_devices {
            outcome.warn(format!(
                "Running playbook on {} devices simultaneously may impact performance",
                devices.len()
            ));
            outcome.suggest("Consider running in batches or during off-peak hours");
        }

        outcome
    }

    fn check_volumes(
        &self,
        op: VolumeOp,
        volumes: &[VolumeId],
        context: &ResourceContext,
    ) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::new();

        for id in volumes {
            if context.volume(id).is_none() {
                outcome.error(format!("Volume {id} not found"));
            }
        }

        match op {
            VolumeOp::Backup => {
                outcome.suggest("Ensure sufficient disk space for backup files");
                if volumes.len() > self.policy.max_concurrent_volume_backups {
                    outcome.warn(
                        "Backing up many volumes simultaneously may impact system performance",
                    );
                }
            }
            VolumeOp::Restore => {
                outcome.warn("Volume restore will overwrite existing data");
                outcome.suggest("Stop containers using these volumes before restoration");
            }
            VolumeOp::Remove => {
                outcome.warn("Volume removal will permanently delete all data");
                outcome.suggest("Create backups before removing volumes");
            }
        }

        outcome
    }
}

fn check_containers(
    op: ContainerOp,
    containers: &[ContainerId],
    context: &ResourceContext,
) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::new();

    for id in containers {
        let Some(container) = context.container(id) else {
            outcome.error(format!("Container {id} not found"));
            continue;
        };
        match (op, container.status) {
            (ContainerOp::Start, ContainerStatus::Running) => {
                outcome.warn(format!("Container {} is already running", container.name));
            }
            (ContainerOp::Stop, ContainerStatus::Stopped) => {
                outcome.warn(format!("Container {} is already stopped", container.name));
            }
            (ContainerOp::Restart, _) => {
                outcome.suggest(format!(
                    "Restarting {} will cause brief downtime",
                    container.name
                ));
            }
            _ => {}
        }
    }

    if op.is_destructive() {
        outcome.warn("This action will permanently delete containers and their data");
        outcome.suggest("Ensure you have backups before proceeding");
    }

    outcome
}
