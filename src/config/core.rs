use serde::{Deserialize, Serialize};

use super::labels::Labels;
use super::thresholds::{BudgetBands, CostConfig, DeadlineConfig, PaginationConfig, TimelineConfig};

/// Root configuration structure for canteiro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CanteiroConfig {
    /// List pagination
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Overdue / near-deadline predicates
    #[serde(default)]
    pub deadlines: DeadlineConfig,

    /// Budget progress bands
    #[serde(default)]
    pub budget: BudgetBands,

    /// Timeline axis
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// Cost report ranking
    #[serde(default)]
    pub costs: CostConfig,

    /// Fallback labels
    #[serde(default)]
    pub labels: Labels,
}

impl CanteiroConfig {
    /// Check every section, reporting all problems at once.
    pub fn validate(&self) -> crate::errors::Result<()> {
        super::validation::validate_config(self)
    }
}
