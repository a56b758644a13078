//! Cron safety: syntax validation plus advisory checks on the schedule.

use fleetops_domain::cron::CronExpression;
use fleetops_domain::validation::ValidationOutcome;

use crate::policy::ChainPolicy;

/// Result of checking a cron string's syntax and ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronValidation {
    pub valid: bool,
    pub error: Option<String>,
}

/// Validate `cron` with the default policy.
#[must_use]
pub fn validate_cron_expression(cron: &str) -> CronValidation {
    CronSafetyValidator::default().validate(cron)
}

/// Validates cron strings and flags schedules that are risky to run unattended.
#[derive(Debug, Clone, Copy)]
pub struct CronSafetyValidator {
    business_hours: (u32, u32),
}

impl Default for CronSafetyValidator {
    fn default() -> Self {
        Self::new(&ChainPolicy::default())
    }
}

impl CronSafetyValidator {
    /// Create a validator that treats `policy.business_hours` as peak time.
    #[must_use]
    pub fn new(policy: &ChainPolicy) -> Self {
        Self {
            business_hours: policy.business_hours,
        }
    }

    /// Check arity, characters, ranges and steps of a five-field expression.
    #[must_use]
    pub fn validate(&self, cron: &str) -> CronValidation {
        match CronExpression::parse(cron) {
            Ok(_) => CronValidation {
                valid: true,
                error: None,
            },
            Err(err) => {
                tracing::debug!(cron, error = %err, "rejected cron expression");
                CronValidation {
                    valid: false,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// Advisory warnings and suggestions for a schedule.
    ///
    /// The returned outcome never carries errors. Malformed expressions yield
    /// no advice; [`validate`](Self::validate) reports them.
    #[must_use]
    pub fn assess_safety(&self, cron: &str) -> ValidationOutcome {
        let mut advice = ValidationOutcome::new();
        let parts: Vec<&str> = cron.split_whitespace().collect();
        let [minute, hour, day, _, _] = parts.as_slice() else {
            return advice;
        };

        if *minute == "*" {
            advice.warn("Automation will run every minute - risk of system overload");
            advice.suggest("Consider using a specific minute interval (e.g., */5 for every 5 minutes)");
        }

        if *hour == "*" && *day == "*" {
            advice.suggest("Specify a specific hour for daily automations to avoid conflicts");
        }

        if let Ok(expr) = CronExpression::parse(cron) {
            let (start, end) = self.business_hours;
            if expr.hours().range(start..end).next().is_some() {
                advice.suggest(format!(
                    "Consider avoiding peak business hours ({} - {}) for heavy operations",
                    clock_hour(start),
                    clock_hour(end),
                ));
            }
        }

        advice
    }
}

fn clock_hour(hour: u32) -> String {
    let suffix = if hour % 24 < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display} {suffix}")
}
