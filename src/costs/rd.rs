//! RD documents: one per user per month, as stored by the back office.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::currency::MoneyValue;
use crate::model::non_empty;

/// Month-keyed operation assignments for one user.
///
/// Keys are [`YearMonth::storage_key`](super::YearMonth::storage_key)
/// strings, values are operation names.
pub type Assignments = HashMap<String, String>;

/// A user who files RDs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdUser {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl RdUser {
    /// Full name, then e-mail, then a placeholder.
    pub fn display_name(&self) -> &str {
        non_empty(self.full_name.as_deref())
            .or_else(|| non_empty(self.email.as_deref()))
            .unwrap_or("Sem Nome")
    }

    pub fn first_name(&self) -> &str {
        self.display_name()
            .split_whitespace()
            .next()
            .unwrap_or_default()
    }
}

/// Reference to a sub-operation ("obra") of an operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubOperationRef {
    #[serde(default)]
    pub obra: Option<String>,
}

impl SubOperationRef {
    pub fn obra(&self) -> Option<&str> {
        non_empty(self.obra.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InvoiceData {
    /// Locale-formatted amount, e.g. `"R$ 1.234,56"`
    #[serde(default)]
    pub value: Option<String>,
}

/// A reimbursement attached to an RD.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refund {
    #[serde(default)]
    pub value: Option<MoneyValue>,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub sub_operation: Option<SubOperationRef>,
    #[serde(default)]
    pub expense_type: Option<String>,
}

/// Monthly expense report for one user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdDocument {
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub sub_operation: Option<SubOperationRef>,
    #[serde(default)]
    pub invoice_data: Option<InvoiceData>,
    #[serde(default)]
    pub invoice_rejected: bool,
    #[serde(default)]
    pub refunds: Vec<Refund>,
    /// Worked minutes, stored as a number or numeric text
    #[serde(default)]
    pub total_minutes: Option<MoneyValue>,
}

impl RdDocument {
    pub fn operation(&self) -> Option<&str> {
        non_empty(self.operation.as_deref())
    }

    pub fn sub_operation_obra(&self) -> Option<&str> {
        self.sub_operation.as_ref().and_then(SubOperationRef::obra)
    }

    pub fn minutes(&self) -> f64 {
        self.total_minutes
            .as_ref()
            .and_then(MoneyValue::amount)
            .unwrap_or(0.0)
    }
}
