//! Policy: the thresholds behind every safety heuristic.
//!
//! Every field has a default, so an empty document is a valid policy. The
//! embedding application reads the TOML text from wherever it keeps its
//! configuration and hands it to [`Policy::from_toml_str`].

use serde::Deserialize;

/// Upper bound for `health.stale_after_days`, roughly a century.
pub const MAX_STALE_AFTER_DAYS: i64 = 36_500;

/// Top-level policy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Chain and action heuristics.
    pub chain: ChainPolicy,
    /// Execution-health thresholds.
    pub health: HealthPolicy,
    /// Automation naming rules.
    pub naming: NamingPolicy,
}

/// Thresholds used while validating chains and actions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChainPolicy {
    /// A playbook targeting more devices than this is a large fan-out.
    pub max_fan_out_devices: usize,
    /// A chain with more actions than this should be split.
    pub max_actions: usize,
    /// Backing up more volumes than this at once may hurt performance.
    pub max_concurrent_volume_backups: usize,
    /// Hours (inclusive start, exclusive end) considered peak business hours.
    pub business_hours: (u32, u32),
}

/// Thresholds used by the execution-health tracker.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HealthPolicy {
    /// Minimum executions before the success rate is judged.
    pub min_executions_for_rate: usize,
    /// Success rates strictly below this percentage need attention.
    pub success_rate_floor_percent: f64,
    /// Number of most recent executions inspected for consecutive failures.
    pub recent_window: usize,
    /// Enabled automations idle for more days than this need attention.
    pub stale_after_days: i64,
    /// Minimum number of logs before a trend is computed.
    pub trend_min_logs: usize,
    /// Success-rate delta (0..1) separating a trend from noise.
    pub trend_threshold: f64,
}

/// Length and uniqueness rules for automation names.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NamingPolicy {
    pub min_length: usize,
    pub max_length: usize,
}

impl Policy {
    /// Parse a TOML document, then check it for coherence.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Parse`] on malformed TOML and
    /// [`PolicyError::Validation`] on incoherent values.
    pub fn from_toml_str(text: &str) -> Result<Self, PolicyError> {
        let policy: Self = toml::from_str(text)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reject values that would make the heuristics meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::Validation`] describing the first problem found.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.naming.min_length > self.naming.max_length {
            return Err(PolicyError::Validation(
                "naming.min_length must not exceed naming.max_length".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.health.success_rate_floor_percent) {
            return Err(PolicyError::Validation(
                "health.success_rate_floor_percent must be within 0-100".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.health.trend_threshold) {
            return Err(PolicyError::Validation(
                "health.trend_threshold must be within 0-1".to_string(),
            ));
        }
        if !(0..=MAX_STALE_AFTER_DAYS).contains(&self.health.stale_after_days) {
            return Err(PolicyError::Validation(format!(
                "health.stale_after_days must be within 0-{MAX_STALE_AFTER_DAYS}"
            )));
        }
        if self.health.trend_min_logs < 2 {
            return Err(PolicyError::Validation(
                "health.trend_min_logs must be at least 2".to_string(),
            ));
        }
        let (start, end) = self.chain.business_hours;
        if start >= end || end > 24 {
            return Err(PolicyError::Validation(
                "chain.business_hours must be an increasing range within 0-24".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for ChainPolicy {
    fn default() -> Self {
        Self {
            max_fan_out_devices: 10,
            max_actions: 5,
            max_concurrent_volume_backups: 5,
            business_hours: (9, 17),
        }
    }
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self {
            min_executions_for_rate: 3,
            success_rate_floor_percent: 50.0,
            recent_window: 3,
            stale_after_days: 7,
            trend_min_logs: 4,
            trend_threshold: 0.10,
        }
    }
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            min_length: 3,
            max_length: 50,
        }
    }
}

/// Policy loading errors.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// TOML parse failure.
    #[error("failed to parse policy")]
    Parse(#[from] toml::de::Error),
    /// Semantic validation failure.
    #[error("invalid policy: {0}")]
    Validation(String),
}
