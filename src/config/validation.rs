//! Validation with error accumulation for configuration.
//!
//! Every check runs and all problems are reported together, so a user fixing
//! `.canteiro.toml` sees the whole list in one pass.

use super::CanteiroConfig;
use crate::errors::{Error, Result};

const MAX_PERCENT: f64 = 1000.0;
const MAX_BUFFER_DAYS: i64 = 3650;

/// Collect every validation problem as `field: message` strings.
pub fn collect_errors(config: &CanteiroConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if config.pagination.items_per_page == 0 {
        errors.push("pagination.items_per_page: must be at least 1".to_string());
    }

    check_percent(
        &mut errors,
        "deadlines.near_deadline_pct",
        config.deadlines.near_deadline_pct,
    );
    check_percent(&mut errors, "budget.warning_pct", config.budget.warning_pct);
    check_percent(&mut errors, "budget.critical_pct", config.budget.critical_pct);
    if config.budget.warning_pct > config.budget.critical_pct {
        errors.push(format!(
            "budget: warning_pct ({}) must not exceed critical_pct ({})",
            config.budget.warning_pct, config.budget.critical_pct
        ));
    }

    if !(0..=MAX_BUFFER_DAYS).contains(&config.timeline.buffer_days) {
        errors.push(format!(
            "timeline.buffer_days: out of range (expected: 0-{MAX_BUFFER_DAYS}, got: {})",
            config.timeline.buffer_days
        ));
    }
    let min_width = config.timeline.min_bar_width_pct;
    if !min_width.is_finite() || !(0.0..=100.0).contains(&min_width) {
        errors.push(format!(
            "timeline.min_bar_width_pct: out of range (expected: 0-100, got: {min_width})"
        ));
    }

    if config.costs.top_n == 0 {
        errors.push("costs.top_n: must be at least 1".to_string());
    }

    for (field, value) in config.labels.entries() {
        if value.trim().is_empty() {
            errors.push(format!("labels.{field}: must not be empty"));
        }
    }

    errors
}

/// Validate the configuration, failing with all problems joined.
pub fn validate_config(config: &CanteiroConfig) -> Result<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Configuration(errors.join("; ")))
    }
}

fn check_percent(errors: &mut Vec<String>, field: &str, value: f64) {
    if !value.is_finite() || !(0.0..=MAX_PERCENT).contains(&value) {
        errors.push(format!(
            "{field}: out of range (expected: 0-{MAX_PERCENT}, got: {value})"
        ));
    }
}
