use serde::{Deserialize, Serialize};

/// Fallback labels used when a record or entry lacks a value.
///
/// Defaults are the Portuguese labels shown by the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    /// Group key for records without a work.
    #[serde(default = "default_no_parent")]
    pub no_parent: String,

    /// Kanban column for records without a status.
    #[serde(default = "default_status")]
    pub default_status: String,

    /// Cost category when neither the entry nor the assignment names one.
    #[serde(default = "default_uncategorized")]
    pub uncategorized: String,

    /// Cost sub-category when an entry resolves to an empty name.
    #[serde(default = "default_general_subcategory")]
    pub general_subcategory: String,

    /// Sub-category for invoice values without a sub-operation.
    #[serde(default = "default_invoice_subcategory")]
    pub invoice_subcategory: String,

    /// Sub-category for refunds without sub-operation or expense type.
    #[serde(default = "default_refund_subcategory")]
    pub refund_subcategory: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            no_parent: default_no_parent(),
            default_status: default_status(),
            uncategorized: default_uncategorized(),
            general_subcategory: default_general_subcategory(),
            invoice_subcategory: default_invoice_subcategory(),
            refund_subcategory: default_refund_subcategory(),
        }
    }
}

impl Labels {
    /// All labels with their field names, for validation.
    pub(crate) fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("no_parent", &self.no_parent),
            ("default_status", &self.default_status),
            ("uncategorized", &self.uncategorized),
            ("general_subcategory", &self.general_subcategory),
            ("invoice_subcategory", &self.invoice_subcategory),
            ("refund_subcategory", &self.refund_subcategory),
        ]
    }
}

fn default_no_parent() -> String {
    "Sem Obra".to_string()
}
fn default_status() -> String {
    "Pendente".to_string()
}
fn default_uncategorized() -> String {
    "OUTROS".to_string()
}
fn default_general_subcategory() -> String {
    "Geral".to_string()
}
fn default_invoice_subcategory() -> String {
    "Mão de Obra".to_string()
}
fn default_refund_subcategory() -> String {
    "Reembolso".to_string()
}
