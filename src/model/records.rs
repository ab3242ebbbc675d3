//! Purchase-order documents as deserialized from the backend.

use serde::{Deserialize, Serialize};

use super::{non_empty, ChildRecord, Record};

/// Construction work (the top-level grouping key for OCs).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Work {
    pub id: String,
    #[serde(default)]
    pub regional: Option<String>,
    #[serde(default)]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub city: Option<String>,
}

/// Purchase order ("Ordem de Compra") tracked per work.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Oc {
    pub id: String,
    #[serde(default)]
    pub work_id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: Option<String>,
    /// Budgeted value.
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub events: Vec<OcEvent>,
    #[serde(default)]
    pub financial_records: Vec<FinancialRecord>,
}

impl Oc {
    /// Sum of all financial record values (consumed against `value`).
    pub fn consumed(&self) -> f64 {
        self.financial_records
            .iter()
            .filter_map(|r| r.value)
            .filter(|v| v.is_finite())
            .sum()
    }
}

impl Record for Oc {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent_key(&self) -> Option<&str> {
        non_empty(Some(self.work_id.as_str()))
    }

    fn status(&self) -> Option<&str> {
        non_empty(self.status.as_deref())
    }
}

/// Milestone attached to an OC.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcEvent {
    pub id: String,
    pub oc_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub status_options: Vec<String>,
}

impl ChildRecord for OcEvent {
    fn description(&self) -> &str {
        &self.description
    }

    fn start_date(&self) -> Option<&str> {
        non_empty(self.start_date.as_deref())
    }

    fn end_date(&self) -> Option<&str> {
        non_empty(self.end_date.as_deref())
    }

    fn status(&self) -> Option<&str> {
        non_empty(self.status.as_deref())
    }
}

/// Invoice line recorded against an OC.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    pub id: String,
    pub invoice_number: String,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub issuance_date: Option<String>,
    #[serde(default)]
    pub approval_date: Option<String>,
    #[serde(default)]
    pub billing_date: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub payment_date: Option<String>,
    /// Retained balance flag.
    #[serde(default)]
    pub retention: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}
