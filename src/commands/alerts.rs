use anyhow::Result;
use comfy_table::Cell;

use super::{new_table, NO_RESULTS};
use crate::alerts::{Alert, AlertBook, AlertStore};
use crate::clock::Clock;
use crate::formatting::{FormattingConfig, OutputFormatter};

/// Fields of `canteiro alerts set`.
#[derive(Debug, Clone)]
pub struct AlertDraft {
    pub id: String,
    pub work_id: String,
    pub event_filter: String,
    pub recurrence_days: Option<u32>,
    pub lead_time_days: Option<u32>,
}

impl AlertDraft {
    /// A schedule left unset is stored as inactive with zero days.
    pub fn into_alert(self, clock: &dyn Clock) -> Alert {
        Alert {
            id: self.id,
            work_id: self.work_id,
            event_filter: self.event_filter,
            recurrence_days: self.recurrence_days.unwrap_or(0),
            recurrence_active: self.recurrence_days.is_some(),
            lead_time_days: self.lead_time_days.unwrap_or(0),
            lead_time_active: self.lead_time_days.is_some(),
            created_at: clock.now().timestamp_millis(),
        }
    }
}

pub fn list_alerts<S: AlertStore>(
    book: &AlertBook<S>,
    work: Option<&str>,
    formatting: &FormattingConfig,
) -> Result<String> {
    let alerts = match work {
        Some(work_id) => book.for_work(work_id)?,
        None => book.alerts()?,
    };
    Ok(render_alerts(&alerts, formatting))
}

pub fn set_alert<S: AlertStore>(
    book: &AlertBook<S>,
    draft: AlertDraft,
    clock: &dyn Clock,
) -> Result<()> {
    book.upsert(draft.into_alert(clock))?;
    Ok(())
}

pub fn remove_alert<S: AlertStore>(
    book: &AlertBook<S>,
    id: &str,
    fmt: &dyn OutputFormatter,
) -> Result<()> {
    if !book.remove(id)? {
        eprintln!("{}", fmt.warning(&format!("No alert with id '{id}'")));
    }
    Ok(())
}

fn schedule(days: u32, active: bool) -> String {
    if active {
        format!("{days}d")
    } else {
        "off".to_string()
    }
}

pub fn render_alerts(alerts: &[Alert], formatting: &FormattingConfig) -> String {
    if alerts.is_empty() {
        return NO_RESULTS.to_string();
    }
    let mut table = new_table(formatting, vec!["ID", "Work", "Event", "Every", "Lead"]);
    for alert in alerts {
        table.add_row(vec![
            Cell::new(&alert.id),
            Cell::new(&alert.work_id),
            Cell::new(&alert.event_filter),
            Cell::new(schedule(alert.recurrence_days, alert.recurrence_active)),
            Cell::new(schedule(alert.lead_time_days, alert.lead_time_active)),
        ]);
    }
    table.to_string()
}
