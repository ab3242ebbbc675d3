//! Budget roll-ups for progress indicators.

use serde::Serialize;

use crate::config::BudgetBands;

/// Consumed amount against a budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetRollup {
    pub consumed: f64,
    pub budget: f64,
}

impl BudgetRollup {
    pub fn new(consumed: f64, budget: f64) -> Self {
        Self { consumed, budget }
    }

    /// `100 * consumed / budget`, or `None` when the budget is not positive.
    pub fn percentage(&self) -> Option<f64> {
        if self.budget > 0.0 && self.budget.is_finite() {
            Some(100.0 * self.consumed / self.budget)
        } else {
            None
        }
    }

    pub fn band(&self, bands: &BudgetBands) -> Option<BudgetBand> {
        self.percentage().map(|pct| BudgetBand::classify(pct, bands))
    }
}

/// Health classification of a budget percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetBand {
    Healthy,
    Warning,
    Critical,
}

impl BudgetBand {
    /// Upper-inclusive classification against the configured cut points.
    pub fn classify(pct: f64, bands: &BudgetBands) -> Self {
        if pct > bands.critical_pct {
            BudgetBand::Critical
        } else if pct > bands.warning_pct {
            BudgetBand::Warning
        } else {
            BudgetBand::Healthy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetBand::Healthy => "healthy",
            BudgetBand::Warning => "warning",
            BudgetBand::Critical => "critical",
        }
    }
}
