//! Execution health: statistics, trend and attention signals from run logs.
//!
//! Logs are supplied per call and filtered to the definition being inspected;
//! nothing is cached between calls. "Now" always comes from the injected
//! [`Clock`].

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use fleetops_domain::automation::AutomationDefinition;
use fleetops_domain::cron::CronExpression;
use fleetops_domain::execution::{
    Attention, ExecutionLogEntry, ExecutionStats, ExecutionStatus, ExecutionTrend,
};
use fleetops_domain::time::Timestamp;

use crate::policy::{HealthPolicy, Policy};
use crate::ports::clock::Clock;

/// Consecutive failures below this count are not a pattern.
const MIN_RECENT_FAILURES: usize = 2;

/// Derives health signals for automation definitions.
#[derive(Debug, Clone)]
pub struct ExecutionHealthTracker<C> {
    clock: C,
    policy: HealthPolicy,
}

impl<C: Clock> ExecutionHealthTracker<C> {
    /// Create a tracker reading "now" from `clock` and thresholds from `policy`.
    #[must_use]
    pub fn new(clock: C, policy: &Policy) -> Self {
        Self {
            clock,
            policy: policy.health.clone(),
        }
    }

    /// Counts, success rate and mean duration over the definition's logs.
    ///
    /// The mean only covers logs that have an end time.
    #[must_use]
    pub fn compute_stats(
        &self,
        definition: &AutomationDefinition,
        logs: &[ExecutionLogEntry],
    ) -> ExecutionStats {
        let logs = logs_for(definition, logs);
        let total_executions = logs.len();
        let success_count = count_status(&logs, ExecutionStatus::Success);
        let failure_count = count_status(&logs, ExecutionStatus::Failed);

        let durations: Vec<i64> = logs
            .iter()
            .filter_map(|log| log.duration())
            .map(|d| d.num_milliseconds())
            .collect();

        let last_execution_time = definition
            .last_execution_time
            .or_else(|| logs.iter().map(|log| log.start_time).max());

        ExecutionStats {
            total_executions,
            success_count,
            failure_count,
            success_rate_percent: success_rate(success_count, total_executions) * 100.0,
            average_duration_ms: mean(&durations),
            last_execution_time,
            next_execution_time: self.next_execution_time(definition),
        }
    }

    /// Flag a definition with a poor success rate, a run of recent failures,
    /// or (when enabled) no execution for too long.
    #[tracing::instrument(skip_all, fields(automation = %definition.id, logs = logs.len()))]
    #[must_use]
    pub fn needs_attention(
        &self,
        definition: &AutomationDefinition,
        logs: &[ExecutionLogEntry],
    ) -> Attention {
        let stats = self.compute_stats(definition, logs);

        if stats.total_executions >= self.policy.min_executions_for_rate
            && stats.success_rate_percent < self.policy.success_rate_floor_percent
        {
            return flag(format!(
                "Low success rate: {:.1}%",
                stats.success_rate_percent
            ));
        }

        let mut recent = logs_for(definition, logs);
        recent.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        recent.truncate(self.policy.recent_window);
        if recent.len() >= MIN_RECENT_FAILURES
            && recent.iter().all(|log| log.status == ExecutionStatus::Failed)
        {
            return flag("Recent executions failed".to_string());
        }

        if definition.enabled {
            let stale_after = Duration::try_days(self.policy.stale_after_days);
            if let (Some(last), Some(stale_after)) = (stats.last_execution_time, stale_after) {
                if self.clock.now() - last > stale_after {
                    return flag("No recent executions".to_string());
                }
            }
        }

        Attention::none()
    }

    /// Compare the success rate of the newer half of the logs with the older half.
    #[must_use]
    pub fn trend(
        &self,
        definition: &AutomationDefinition,
        logs: &[ExecutionLogEntry],
    ) -> ExecutionTrend {
        let mut logs = logs_for(definition, logs);
        if logs.len() < self.policy.trend_min_logs {
            return ExecutionTrend::Unknown;
        }
        logs.sort_by_key(|log| log.start_time);

        let (older, recent) = logs.split_at(logs.len() / 2);
        let delta = success_rate(count_status(recent, ExecutionStatus::Success), recent.len())
            - success_rate(count_status(older, ExecutionStatus::Success), older.len());

        if delta > self.policy.trend_threshold {
            ExecutionTrend::Improving
        } else if delta < -self.policy.trend_threshold {
            ExecutionTrend::Declining
        } else {
            ExecutionTrend::Stable
        }
    }

    /// Whether any of the definition's logs is still running.
    #[must_use]
    pub fn is_running(&self, definition: &AutomationDefinition, logs: &[ExecutionLogEntry]) -> bool {
        logs.iter().any(|log| {
            log.automation_id == definition.id && log.status == ExecutionStatus::Running
        })
    }

    /// Next time an enabled cron-triggered definition fires, after now.
    #[must_use]
    pub fn next_execution_time(&self, definition: &AutomationDefinition) -> Option<Timestamp> {
        if !definition.enabled {
            return None;
        }
        let expression = CronExpression::parse(definition.chain.trigger.cron_value()?).ok()?;
        expression.next_after(self.clock.now())
    }

    /// Human-readable elapsed time, e.g. `"1m 5s"` or `"2h"`.
    ///
    /// A missing `end` means the run is still going and is measured up to now.
    #[must_use]
    pub fn format_duration(&self, start: Timestamp, end: Option<Timestamp>) -> String {
        let end = end.unwrap_or_else(|| self.clock.now());
        let elapsed = (end - start).num_milliseconds();
        if elapsed < 1000 {
            return "< 1s".to_string();
        }

        let seconds = elapsed / 1000;
        if seconds < 60 {
            return format!("{seconds}s");
        }
        let (minutes, seconds) = (seconds / 60, seconds % 60);
        if minutes < 60 {
            return if seconds > 0 {
                format!("{minutes}m {seconds}s")
            } else {
                format!("{minutes}m")
            };
        }
        let (hours, minutes) = (minutes / 60, minutes % 60);
        if minutes > 0 {
            format!("{hours}h {minutes}m")
        } else {
            format!("{hours}h")
        }
    }

    /// How long ago the last execution happened, largest unit first.
    #[must_use]
    pub fn time_since(&self, last: Option<Timestamp>) -> String {
        let Some(last) = last else {
            return "Never executed".to_string();
        };
        let elapsed = self.clock.now() - last;

        let days = elapsed.num_days();
        if days > 0 {
            return ago(days, "day");
        }
        let hours = elapsed.num_hours();
        if hours > 0 {
            return ago(hours, "hour");
        }
        let minutes = elapsed.num_minutes();
        if minutes > 0 {
            return ago(minutes, "minute");
        }
        "Just now".to_string()
    }
}

/// Logs keyed by the UTC calendar date they started on.
#[must_use]
pub fn group_logs_by_date(logs: &[ExecutionLogEntry]) -> BTreeMap<NaiveDate, Vec<&ExecutionLogEntry>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&ExecutionLogEntry>> = BTreeMap::new();
    for log in logs {
        groups.entry(log.start_time.date_naive()).or_default().push(log);
    }
    groups
}

fn logs_for<'a>(
    definition: &AutomationDefinition,
    logs: &'a [ExecutionLogEntry],
) -> Vec<&'a ExecutionLogEntry> {
    logs.iter()
        .filter(|log| log.automation_id == definition.id)
        .collect()
}

fn count_status(logs: &[&ExecutionLogEntry], status: ExecutionStatus) -> usize {
    logs.iter().filter(|log| log.status == status).count()
}

/// Fraction in `0..=1`; zero when there is nothing to count.
#[allow(clippy::cast_precision_loss)]
fn success_rate(successes: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        successes as f64 / total as f64
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

fn flag(reason: String) -> Attention {
    tracing::debug!(%reason, "automation needs attention");
    Attention::flagged(reason)
}

fn ago(count: i64, unit: &str) -> String {
    let plural = if count > 1 { "s" } else { "" };
    format!("{count} {unit}{plural} ago")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use fleetops_domain::automation::Action;
    use fleetops_domain::id::{AutomationId, DeviceId, PlaybookRef};

    use super::*;
    use crate::ports::clock::FixedClock;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn tracker() -> ExecutionHealthTracker<FixedClock> {
        ExecutionHealthTracker::new(FixedClock(now()), &Policy::default())
    }

    fn definition(enabled: bool) -> AutomationDefinition {
        AutomationDefinition::builder()
            .name("Nightly upgrade")
            .enabled(enabled)
            .cron("0 2 * * *")
            .action(Action::Playbook {
                playbook: PlaybookRef::new("upgrade.yml"),
                devices: vec![DeviceId::new("d1")],
            })
            .build()
            .unwrap()
    }

    fn log(
        automation: &AutomationDefinition,
        status: ExecutionStatus,
        hours_ago: i64,
        duration_ms: Option<i64>,
    ) -> ExecutionLogEntry {
        let start = now() - Duration::hours(hours_ago);
        let mut builder = ExecutionLogEntry::builder()
            .automation_id(automation.id)
            .status(status)
            .start_time(start);
        if let Some(ms) = duration_ms {
            builder = builder.end_time(start + Duration::milliseconds(ms));
        }
        builder.build()
    }

    #[test]
    fn should_compute_stats_over_completed_logs() {
        let def = definition(true);
        let logs = vec![
            log(&def, ExecutionStatus::Success, 10, Some(300_000)),
            log(&def, ExecutionStatus::Failed, 8, Some(120_000)),
            log(&def, ExecutionStatus::Success, 6, Some(180_000)),
            log(&def, ExecutionStatus::Running, 1, None),
        ];
        let stats = tracker().compute_stats(&def, &logs);
        assert_eq!(stats.total_executions, 4);
        assert_eq!(stats.success_count, 2);
        assert_eq!(stats.failure_count, 1);
        assert!((stats.success_rate_percent - 50.0).abs() < f64::EPSILON);
        assert!((stats.average_duration_ms - 200_000.0).abs() < f64::EPSILON);
        assert_eq!(stats.last_execution_time, Some(now() - Duration::hours(1)));
    }

    #[test]
    fn should_ignore_logs_of_other_automations() {
        let def = definition(true);
        let other = ExecutionLogEntry::builder()
            .automation_id(AutomationId::new())
            .status(ExecutionStatus::Running)
            .start_time(now())
            .build();
        let stats = tracker().compute_stats(&def, std::slice::from_ref(&other));
        assert_eq!(stats.total_executions, 0);
        assert!(stats.success_rate_percent.abs() < f64::EPSILON);
        assert!(stats.average_duration_ms.abs() < f64::EPSILON);
        assert!(!tracker().is_running(&def, &[other]));
    }

    #[test]
    fn should_prefer_recorded_last_execution_time() {
        let mut def = definition(true);
        let recorded = now() - Duration::minutes(5);
        def.last_execution_time = Some(recorded);
        let logs = vec![log(&def, ExecutionStatus::Success, 3, Some(1_000))];
        assert_eq!(
            tracker().compute_stats(&def, &logs).last_execution_time,
            Some(recorded)
        );
    }

    #[test]
    fn should_fill_next_execution_time_for_enabled_cron_definitions() {
        let expected = Utc.with_ymd_and_hms(2026, 10, 20, 2, 0, 0).unwrap();
        assert_eq!(
            tracker().compute_stats(&definition(true), &[]).next_execution_time,
            Some(expected)
        );
        assert_eq!(tracker().next_execution_time(&definition(false)), None);
    }

    #[test]
    fn should_flag_low_success_rate() {
        let def = definition(true);
        let logs = vec![
            log(&def, ExecutionStatus::Success, 3, Some(1_000)),
            log(&def, ExecutionStatus::Failed, 2, Some(1_000)),
            log(&def, ExecutionStatus::Failed, 1, Some(1_000)),
        ];
        assert_eq!(
            tracker().needs_attention(&def, &logs),
            Attention::flagged("Low success rate: 33.3%")
        );
    }

    #[test]
    fn should_flag_recent_failures() {
        let def = definition(true);
        let logs = vec![
            log(&def, ExecutionStatus::Failed, 2, Some(1_000)),
            log(&def, ExecutionStatus::Failed, 1, Some(1_000)),
        ];
        assert_eq!(
            tracker().needs_attention(&def, &logs),
            Attention::flagged("Recent executions failed")
        );
    }

    #[test]
    fn should_not_flag_single_recent_failure() {
        let def = definition(true);
        let logs = vec![log(&def, ExecutionStatus::Failed, 1, Some(1_000))];
        assert_eq!(tracker().needs_attention(&def, &logs), Attention::none());
    }

    #[test]
    fn should_flag_stale_enabled_definition_only() {
        let mut enabled = definition(true);
        enabled.last_execution_time = Some(now() - Duration::days(30));
        let mut disabled = enabled.clone();
        disabled.enabled = false;

        assert_eq!(
            tracker().needs_attention(&enabled, &[]),
            Attention::flagged("No recent executions")
        );
        assert_eq!(tracker().needs_attention(&disabled, &[]), Attention::none());
    }

    #[test]
    fn should_skip_staleness_when_threshold_exceeds_duration_range() {
        let mut policy = Policy::default();
        policy.health.stale_after_days = i64::MAX;
        let tracker = ExecutionHealthTracker::new(FixedClock(now()), &policy);
        let mut def = definition(true);
        def.last_execution_time = Some(now() - Duration::days(30));
        assert_eq!(tracker.needs_attention(&def, &[]), Attention::none());
    }

    #[test]
    fn should_detect_trend_direction() {
        let def = definition(true);
        let run = |statuses: [ExecutionStatus; 4]| {
            let logs: Vec<_> = statuses
                .iter()
                .enumerate()
                .map(|(i, status)| log(&def, *status, 10 - i64::try_from(i).unwrap(), Some(1_000)))
                .collect();
            tracker().trend(&def, &logs)
        };
        use ExecutionStatus::{Failed, Success};

        assert_eq!(run([Failed, Failed, Success, Success]), ExecutionTrend::Improving);
        assert_eq!(run([Success, Success, Failed, Failed]), ExecutionTrend::Declining);
        assert_eq!(run([Failed, Success, Failed, Success]), ExecutionTrend::Stable);
    }

    #[test]
    fn should_return_unknown_trend_with_few_logs() {
        let def = definition(true);
        let logs = vec![log(&def, ExecutionStatus::Success, 1, Some(1_000))];
        assert_eq!(tracker().trend(&def, &logs), ExecutionTrend::Unknown);
    }

    #[test]
    fn should_report_running_execution() {
        let def = definition(true);
        let logs = vec![log(&def, ExecutionStatus::Running, 1, None)];
        assert!(tracker().is_running(&def, &logs));
    }

    #[test]
    fn should_format_durations_dropping_zero_components() {
        let t = tracker();
        let start = now() - Duration::hours(10);
        let after = |ms: i64| Some(start + Duration::milliseconds(ms));
        assert_eq!(t.format_duration(start, after(999)), "< 1s");
        assert_eq!(t.format_duration(start, after(45_000)), "45s");
        assert_eq!(t.format_duration(start, after(65_000)), "1m 5s");
        assert_eq!(t.format_duration(start, after(120_000)), "2m");
        assert_eq!(t.format_duration(start, after(3_900_000)), "1h 5m");
        assert_eq!(t.format_duration(start, after(7_200_000)), "2h");
        assert_eq!(t.format_duration(start, None), "10h");
    }

    #[test]
    fn should_describe_time_since_last_execution() {
        let t = tracker();
        assert_eq!(t.time_since(None), "Never executed");
        assert_eq!(t.time_since(Some(now() - Duration::seconds(30))), "Just now");
        assert_eq!(t.time_since(Some(now() - Duration::minutes(1))), "1 minute ago");
        assert_eq!(t.time_since(Some(now() - Duration::minutes(5))), "5 minutes ago");
        assert_eq!(t.time_since(Some(now() - Duration::hours(1))), "1 hour ago");
        assert_eq!(t.time_since(Some(now() - Duration::days(3))), "3 days ago");
    }

    #[test]
    fn should_group_logs_by_start_date() {
        let def = definition(true);
        let logs = vec![
            log(&def, ExecutionStatus::Success, 1, None),
            log(&def, ExecutionStatus::Success, 2, None),
            log(&def, ExecutionStatus::Failed, 30, None),
        ];
        let groups = group_logs_by_date(&logs);
        let today = now().date_naive();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&today].len(), 2);
        assert_eq!(groups[&today.pred_opt().unwrap()].len(), 1);
    }
}
