//! Conflict analysis: opposing container operations on shared containers.
//!
//! Conflicts are reported as warnings only: a chain may legitimately stop a
//! container and later start it again. The analyzer does not reason about
//! ordering, so its output is the same whatever order the actions come in.

use std::collections::BTreeSet;

use fleetops_domain::automation::{Action, ContainerOp};
use fleetops_domain::id::ContainerId;

/// Findings of a conflict pass. `errors` is reserved and currently always empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// Detects pairwise conflicts among the container actions of a chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictAnalyzer;

impl ConflictAnalyzer {
    /// Create a new analyzer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emit one warning per unordered pair of container actions that share
    /// containers and whose operations oppose each other.
    #[must_use]
    pub fn analyze(&self, actions: &[Action]) -> ConflictReport {
        let container_ops: Vec<(ContainerOp, &[ContainerId])> = actions
            .iter()
            .filter_map(|action| match action {
                Action::Container { op, containers } => Some((*op, containers.as_slice())),
                _ => None,
            })
            .collect();

        let mut warnings = Vec::new();
        for (i, (first_op, first)) in container_ops.iter().enumerate() {
            for (second_op, second) in &container_ops[i + 1..] {
                if !ops_conflict(*first_op, *second_op) {
                    continue;
                }
                let shared: BTreeSet<&str> = first
                    .iter()
                    .filter(|id| second.contains(id))
                    .map(ContainerId::as_str)
                    .collect();
                if shared.is_empty() {
                    continue;
                }
                let (a, b) = if first_op <= second_op {
                    (first_op, second_op)
                } else {
                    (second_op, first_op)
                };
                warnings.push(format!(
                    "Conflicting actions on containers {}: {a} and {b}",
                    shared.into_iter().collect::<Vec<_>>().join(", ")
                ));
            }
        }
        warnings.sort();

        if !warnings.is_empty() {
            tracing::debug!(conflicts = warnings.len(), "container conflicts detected");
        }
        ConflictReport {
            warnings,
            errors: Vec::new(),
        }
    }
}

/// Operations that oppose `op` when applied to the same container.
fn opposing(op: ContainerOp) -> &'static [ContainerOp] {
    match op {
        ContainerOp::Start => &[ContainerOp::Stop, ContainerOp::Remove],
        ContainerOp::Stop => &[ContainerOp::Start, ContainerOp::Restart],
        ContainerOp::Remove => &[ContainerOp::Start, ContainerOp::Stop, ContainerOp::Restart],
        ContainerOp::Restart => &[ContainerOp::Stop, ContainerOp::Remove],
        ContainerOp::Pause | ContainerOp::Kill | ContainerOp::Prune => &[],
    }
}

/// Whether two operations conflict, looked up in both directions.
#[must_use]
pub fn ops_conflict(a: ContainerOp, b: ContainerOp) -> bool {
    opposing(a).contains(&b) || opposing(b).contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(op: ContainerOp, ids: &[&str]) -> Action {
        Action::Container {
            op,
            containers: ids.iter().map(|id| ContainerId::new(*id)).collect(),
        }
    }

    #[test]
    fn should_warn_when_start_and_stop_share_a_container() {
        let report = ConflictAnalyzer::new().analyze(&[
            container(ContainerOp::Start, &["web", "db"]),
            container(ContainerOp::Stop, &["db", "cache"]),
        ]);
        assert!(report.errors.is_empty());
        assert_eq!(
            report.warnings,
            vec!["Conflicting actions on containers db: start and stop"]
        );
    }

    #[test]
    fn should_ignore_conflicting_ops_on_disjoint_containers() {
        let report = ConflictAnalyzer::new().analyze(&[
            container(ContainerOp::Start, &["web"]),
            container(ContainerOp::Stop, &["db"]),
        ]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn should_ignore_compatible_ops_on_same_container() {
        let report = ConflictAnalyzer::new().analyze(&[
            container(ContainerOp::Start, &["web"]),
            container(ContainerOp::Restart, &["web"]),
        ]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn should_treat_stop_and_remove_as_conflicting_in_either_order() {
        assert!(ops_conflict(ContainerOp::Stop, ContainerOp::Remove));
        assert!(ops_conflict(ContainerOp::Remove, ContainerOp::Stop));
        assert!(!ops_conflict(ContainerOp::Pause, ContainerOp::Start));
    }

    #[test]
    fn should_produce_same_warnings_regardless_of_order() {
        let a = container(ContainerOp::Remove, &["web", "db"]);
        let b = container(ContainerOp::Restart, &["db", "web"]);
        let c = container(ContainerOp::Start, &["web"]);
        let analyzer = ConflictAnalyzer::new();
        let forward = analyzer.analyze(&[a.clone(), b.clone(), c.clone()]);
        let backward = analyzer.analyze(&[c, b, a]);
        assert_eq!(forward, backward);
        assert_eq!(forward.warnings.len(), 2);
    }

    #[test]
    fn should_skip_non_container_actions() {
        let report = ConflictAnalyzer::new().analyze(&[Action::Unknown]);
        assert_eq!(report, ConflictReport::default());
    }
}
