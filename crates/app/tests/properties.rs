//! Property-based tests for the validation engines.
//!
//! These tests verify:
//! - Cron range acceptance and rejection
//! - Conflict detection does not depend on action order
//! - Template instantiation never mutates the template
//! - Complexity scores stay bounded and grow with the template
//! - Validation is deterministic and empty chains are always invalid
//! - Staleness only ever flags enabled definitions

use chrono::{Duration, TimeZone, Utc};
use fleetops_app::ports::FixedClock;
use fleetops_app::{
    ChainValidator, ConflictAnalyzer, ExecutionHealthTracker, Policy, TemplateEngine,
    validate_cron_expression,
};
use fleetops_domain::automation::{
    Action, AutomationChain, AutomationDefinition, ContainerOp, VolumeOp,
};
use fleetops_domain::id::{ContainerId, DeviceId, PlaybookRef, TemplateId, VolumeId};
use fleetops_domain::template::{
    Template, TemplateCategory, VariableSpec, VariableType, VariableValues,
};
use proptest::prelude::*;
use serde_json::{Value, json};

// =============================================================================
// Cron
// =============================================================================

/// Strategy for a cron field: `*`, a value, a range, a list or a step, all within bounds.
fn field_strategy(min: u32, max: u32) -> impl Strategy<Value = String> {
    prop_oneof![
        Just("*".to_string()),
        (min..=max).prop_map(|v| v.to_string()),
        (min..=max, min..=max).prop_map(|(a, b)| format!("{}-{}", a.min(b), a.max(b))),
        (min..=max, min..=max).prop_map(|(a, b)| format!("{a},{b}")),
        (1..=max.max(1)).prop_map(|step| format!("*/{step}")),
    ]
}

fn cron_strategy() -> impl Strategy<Value = String> {
    (
        field_strategy(0, 59),
        field_strategy(0, 23),
        field_strategy(1, 31),
        field_strategy(1, 12),
        field_strategy(0, 7),
    )
        .prop_map(|(m, h, d, mo, w)| format!("{m} {h} {d} {mo} {w}"))
}

proptest! {
    /// Every in-range five-field expression is accepted.
    #[test]
    fn cron_in_range_is_valid(cron in cron_strategy()) {
        let result = validate_cron_expression(&cron);
        prop_assert!(result.valid, "{cron}: {:?}", result.error);
    }

    /// An out-of-range minute is rejected with a message naming it.
    #[test]
    fn cron_minute_out_of_range_is_invalid(minute in 60u32..10_000) {
        let result = validate_cron_expression(&format!("{minute} 2 * * *"));
        prop_assert!(!result.valid);
        let error = result.error.unwrap_or_default();
        prop_assert!(error.contains(&minute.to_string()));
        prop_assert!(error.contains("out of range"));
    }
}

// =============================================================================
// Conflicts
// =============================================================================

fn container_op_strategy() -> impl Strategy<Value = ContainerOp> {
    prop_oneof![
        Just(ContainerOp::Start),
        Just(ContainerOp::Stop),
        Just(ContainerOp::Restart),
        Just(ContainerOp::Pause),
        Just(ContainerOp::Kill),
        Just(ContainerOp::Remove),
        Just(ContainerOp::Prune),
    ]
}

fn container_action_strategy() -> impl Strategy<Value = Action> {
    (
        container_op_strategy(),
        proptest::sample::subsequence(vec!["web", "db", "cache"], 1..=3),
    )
        .prop_map(|(op, ids)| Action::Container {
            op,
            containers: ids.into_iter().map(ContainerId::new).collect(),
        })
}

proptest! {
    /// Reversing the actions leaves the conflict report unchanged.
    #[test]
    fn conflicts_are_order_independent(
        actions in proptest::collection::vec(container_action_strategy(), 0..6)
    ) {
        let analyzer = ConflictAnalyzer::new();
        let mut reversed = actions.clone();
        reversed.reverse();
        let forward = analyzer.analyze(&actions);
        prop_assert!(forward.errors.is_empty());
        prop_assert_eq!(forward, analyzer.analyze(&reversed));
    }
}

// =============================================================================
// Templates
// =============================================================================

/// `(kind, targets)` pairs rendered as base-chain actions.
fn outline_strategy() -> impl Strategy<Value = (u8, usize)> {
    (0u8..4, 0usize..4)
}

fn outline_to_json((kind, targets): (u8, usize)) -> Value {
    let ids: Vec<String> = (0..targets).map(|i| format!("t{i}")).collect();
    match kind {
        0 => json!({ "type": "playbook", "playbook": "p.yml", "devices": ids }),
        1 => json!({ "type": "container", "op": "restart", "containers": ids }),
        2 => json!({ "type": "volume", "op": "backup", "volumes": ids }),
        _ => json!({ "type": "webhook" }),
    }
}

fn template(outlines: &[(u8, usize)], variable_count: usize) -> Template {
    let actions: Vec<Value> = outlines.iter().copied().map(outline_to_json).collect();
    Template {
        id: TemplateId::new(),
        name: "Generated".to_string(),
        description: "Generated template".to_string(),
        category: TemplateCategory::Maintenance,
        base_chain: json!({
            "trigger": { "type": "cron", "cron_value": "{{schedule}}" },
            "actions": actions,
        }),
        variables: (0..variable_count)
            .map(|i| VariableSpec {
                key: if i == 0 { "schedule".to_string() } else { format!("var{i}") },
                label: format!("Variable {i}"),
                kind: VariableType::String,
                required: false,
                default_value: None,
                options: Vec::new(),
                description: None,
            })
            .collect(),
    }
}

proptest! {
    /// Instantiation leaves the template exactly as it was.
    #[test]
    fn instantiate_never_mutates_template(
        outlines in proptest::collection::vec(outline_strategy(), 0..5),
        value in ".*",
    ) {
        let template = template(&outlines, 2);
        let snapshot = template.clone();
        let provided: VariableValues = [("schedule".to_string(), json!(value))].into();
        let _ = TemplateEngine::default().instantiate(&template, &provided);
        prop_assert_eq!(template, snapshot);
    }

    /// Scores stay within 1..=5 and never drop when the template grows.
    #[test]
    fn complexity_is_bounded_and_monotonic(
        outlines in proptest::collection::vec(outline_strategy(), 0..8),
        extra in outline_strategy(),
        variables in 0usize..6,
    ) {
        let engine = TemplateEngine::default();
        let base = engine.complexity_score(&template(&outlines, variables));
        prop_assert!((1..=5).contains(&base));

        let mut grown = outlines.clone();
        grown.push(extra);
        let with_action = engine.complexity_score(&template(&grown, variables));
        let with_variable = engine.complexity_score(&template(&outlines, variables + 1));
        prop_assert!((1..=5).contains(&with_action));
        prop_assert!(with_action >= base);
        prop_assert!(with_variable >= base);
    }
}

// =============================================================================
// Chains
// =============================================================================

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        proptest::collection::vec("[a-z]{1,6}", 0..4).prop_map(|devices| Action::Playbook {
            playbook: PlaybookRef::new("site.yml"),
            devices: devices.into_iter().map(DeviceId::new).collect(),
        }),
        container_action_strategy(),
        (
            prop_oneof![Just(VolumeOp::Backup), Just(VolumeOp::Restore), Just(VolumeOp::Remove)],
            proptest::collection::vec("[a-z]{1,6}", 0..4),
        )
            .prop_map(|(op, volumes)| Action::Volume {
                op,
                volumes: volumes.into_iter().map(VolumeId::new).collect(),
            }),
        Just(Action::Unknown),
    ]
}

proptest! {
    /// A chain without actions is never valid, whatever its trigger.
    #[test]
    fn empty_chain_is_always_invalid(cron in prop_oneof![cron_strategy(), ".*"]) {
        let outcome = ChainValidator::default().validate(&AutomationChain::cron(cron, Vec::new()), None);
        prop_assert!(!outcome.is_valid());
        prop_assert!(outcome.errors.iter().any(|e| e == "At least one action is required"));
    }

    /// Identical inputs give identical outcomes.
    #[test]
    fn chain_validation_is_deterministic(
        cron in cron_strategy(),
        actions in proptest::collection::vec(action_strategy(), 0..7),
    ) {
        let validator = ChainValidator::default();
        let chain = AutomationChain::cron(cron, actions);
        let first = validator.validate(&chain, None);
        prop_assert_eq!(first.is_valid(), first.errors.is_empty());
        prop_assert_eq!(first, validator.validate(&chain, None));
        prop_assert_eq!(
            validator.estimate_execution_minutes(&chain),
            validator.estimate_execution_minutes(&chain)
        );
    }
}

// =============================================================================
// Execution health
// =============================================================================

proptest! {
    /// Staleness flags enabled definitions and never disabled ones.
    #[test]
    fn staleness_only_flags_enabled_definitions(days in 8i64..400) {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let tracker = ExecutionHealthTracker::new(FixedClock(now), &Policy::default());
        let enabled = AutomationDefinition::builder()
            .name("Weekly cleanup")
            .cron("0 3 * * 0")
            .last_execution_time(now - Duration::days(days))
            .build()
            .unwrap();
        let mut disabled = enabled.clone();
        disabled.enabled = false;

        prop_assert!(tracker.needs_attention(&enabled, &[]).flagged);
        prop_assert!(!tracker.needs_attention(&disabled, &[]).flagged);
    }
}
