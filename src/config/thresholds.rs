use serde::{Deserialize, Serialize};

/// Threshold at which an event counts as "near deadline" (inclusive, percent elapsed).
pub const DEFAULT_NEAR_DEADLINE_PCT: f64 = 50.0;
/// Budget consumption above which a roll-up turns to `Warning`.
pub const DEFAULT_WARNING_PCT: f64 = 75.0;
/// Budget consumption above which a roll-up turns to `Critical`.
pub const DEFAULT_CRITICAL_PCT: f64 = 90.0;
/// Page size used by the list screens.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;
/// Padding added on both sides of the timeline axis.
pub const DEFAULT_TIMELINE_BUFFER_DAYS: i64 = 7;
/// Narrowest bar drawn on the timeline, so zero-length events stay visible.
pub const DEFAULT_MIN_BAR_WIDTH_PCT: f64 = 0.5;
/// Entries shown in the cost ranking chart.
pub const DEFAULT_TOP_N: usize = 5;

/// How the near-deadline toggle treats events that are already overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NearDeadlinePolicy {
    /// `>= threshold` regardless of whether the deadline has passed.
    #[default]
    IncludeOverdue,
    /// `>= threshold` and not yet overdue.
    ExcludeOverdue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            items_per_page: default_items_per_page(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineConfig {
    #[serde(default = "default_near_deadline_pct")]
    pub near_deadline_pct: f64,

    #[serde(default)]
    pub near_deadline_policy: NearDeadlinePolicy,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self {
            near_deadline_pct: default_near_deadline_pct(),
            near_deadline_policy: NearDeadlinePolicy::default(),
        }
    }
}

/// Cut points for budget progress bars.
///
/// Bands are upper-inclusive: a consumption of exactly `warning_pct` is
/// still healthy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BudgetBands {
    #[serde(default = "default_warning_pct")]
    pub warning_pct: f64,

    #[serde(default = "default_critical_pct")]
    pub critical_pct: f64,
}

impl Default for BudgetBands {
    fn default() -> Self {
        Self {
            warning_pct: default_warning_pct(),
            critical_pct: default_critical_pct(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    #[serde(default = "default_buffer_days")]
    pub buffer_days: i64,

    #[serde(default = "default_min_bar_width_pct")]
    pub min_bar_width_pct: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            buffer_days: default_buffer_days(),
            min_bar_width_pct: default_min_bar_width_pct(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}
fn default_near_deadline_pct() -> f64 {
    DEFAULT_NEAR_DEADLINE_PCT
}
fn default_warning_pct() -> f64 {
    DEFAULT_WARNING_PCT
}
fn default_critical_pct() -> f64 {
    DEFAULT_CRITICAL_PCT
}
fn default_buffer_days() -> i64 {
    DEFAULT_TIMELINE_BUFFER_DAYS
}
fn default_min_bar_width_pct() -> f64 {
    DEFAULT_MIN_BAR_WIDTH_PCT
}
fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_kebab_case() {
        let parsed: DeadlineConfig =
            toml::from_str("near_deadline_policy = \"exclude-overdue\"").unwrap();
        assert_eq!(parsed.near_deadline_policy, NearDeadlinePolicy::ExcludeOverdue);
        assert_eq!(parsed.near_deadline_pct, 50.0);
    }

    #[test]
    fn test_partial_budget_section_keeps_defaults() {
        let parsed: BudgetBands = toml::from_str("critical_pct = 95.0").unwrap();
        assert_eq!(parsed.warning_pct, DEFAULT_WARNING_PCT);
        assert_eq!(parsed.critical_pct, 95.0);
    }
}
