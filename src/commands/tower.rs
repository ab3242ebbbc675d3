use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::{band_cell, new_table, NO_RESULTS};
use crate::clock::{Clock, FixedClock, SystemClock};
use crate::config::{CanteiroConfig, NearDeadlinePolicy};
use crate::costs::format_brl;
use crate::dates::parse_date;
use crate::edits::{apply_edits, ControlTowerState, OcEdit};
use crate::formatting::{format_percentage, FormattingConfig, OutputFormatter};
use crate::io::load_snapshot;
use crate::model::{oc_view, ChildRecord, Oc, OcEvent, Work};
use crate::results::{
    render_view, summarize, BudgetRollup, DeadlineRules, FilterState, SortCriteria,
    TimelineOutcome, ViewMode, ViewOutput, ViewRequest,
};

/// Parsed `tower` arguments.
#[derive(Debug, Clone)]
pub struct TowerConfig {
    pub snapshot: PathBuf,
    pub view: ViewMode,
    pub filter: FilterState,
    pub sort: SortCriteria,
    pub page: usize,
    pub per_page: Option<usize>,
    pub now: Option<String>,
    pub policy: Option<NearDeadlinePolicy>,
    pub edits: Option<PathBuf>,
}

pub fn run_tower(
    args: TowerConfig,
    config: &CanteiroConfig,
    formatting: &FormattingConfig,
    fmt: &dyn OutputFormatter,
) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let mut state = ControlTowerState::new(snapshot.ocs.iter().cloned(), snapshot.all_events());

    if let Some(path) = &args.edits {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Reading edits from {}", path.display()))?;
        let edits: Vec<OcEdit> = serde_json::from_str(&raw)
            .with_context(|| format!("Parsing edits from {}", path.display()))?;
        log::debug!("Applying {} local edits", edits.len());
        state = apply_edits(&state, &edits);
    }

    let clock: Box<dyn Clock> = match &args.now {
        Some(raw) => Box::new(FixedClock::new(parse_now(raw)?)),
        None => Box::new(SystemClock),
    };
    let mut rules = DeadlineRules::from_config(&config.deadlines, clock.as_ref());
    if let Some(policy) = args.policy {
        rules = rules.with_policy(policy);
    }

    let ocs: Vec<Oc> = state.ocs.iter().cloned().collect();
    let events: Vec<OcEvent> = state.events.iter().cloned().collect();

    let filters = args.filter.active_filters();
    if !filters.is_empty() {
        let names: Vec<String> = filters.iter().map(|f| f.display_name()).collect();
        println!("{}", fmt.dim(&format!("Filters: {}", names.join(", "))));
    }

    let text = render_tower(&snapshot.works, &ocs, &events, &args, rules, config, formatting);
    println!("{text}");
    Ok(())
}

fn parse_now(raw: &str) -> Result<DateTime<Utc>> {
    parse_date(raw).with_context(|| format!("Invalid --now value '{raw}'"))
}

/// Render the requested view as text.
pub fn render_tower(
    works: &[Work],
    ocs: &[Oc],
    events: &[OcEvent],
    args: &TowerConfig,
    rules: DeadlineRules,
    config: &CanteiroConfig,
    formatting: &FormattingConfig,
) -> String {
    let view = oc_view(works, events);
    let mut request = ViewRequest::from_config(args.view, rules, config);
    request.filter = args.filter.clone();
    request.sort = args.sort;
    request.page = args.page;
    if let Some(per_page) = args.per_page {
        request.items_per_page = per_page;
    }

    let output = render_view(ocs, &view, &request);
    if output.is_empty() {
        if let ViewOutput::Timeline(TimelineOutcome::Empty(reason)) = &output {
            return reason.message().to_string();
        }
        return NO_RESULTS.to_string();
    }

    match output {
        ViewOutput::List(page) => {
            let mut table = new_table(
                formatting,
                vec!["OC", "Work", "Description", "Status", "Value", "Consumed"],
            );
            for oc in &page.items {
                let rollup = BudgetRollup::new(oc.consumed(), oc.value);
                table.add_row(vec![
                    comfy_table::Cell::new(&oc.id),
                    comfy_table::Cell::new(&oc.work_id),
                    comfy_table::Cell::new(&oc.description),
                    comfy_table::Cell::new(oc.status.as_deref().unwrap_or("-")),
                    comfy_table::Cell::new(format_brl(oc.value)),
                    band_cell(
                        format_percentage(rollup.percentage()),
                        rollup.band(&config.budget),
                    ),
                ]);
            }
            format!(
                "{table}\nPage {} of {} ({} items)",
                page.current_page, page.total_pages, page.total_items
            )
        }
        ViewOutput::Grouped(groups) => {
            let mut table = new_table(formatting, vec!["Work", "OCs", "Budget", "Consumed", "%"]);
            for group in &groups {
                let summary = summarize(group, |oc: &Oc| oc.value, Oc::consumed);
                table.add_row(vec![
                    comfy_table::Cell::new(&summary.key),
                    comfy_table::Cell::new(summary.record_count),
                    comfy_table::Cell::new(format_brl(summary.budget_total)),
                    comfy_table::Cell::new(format_brl(summary.consumed_total)),
                    band_cell(
                        format_percentage(summary.rollup.percentage()),
                        summary.band(&config.budget),
                    ),
                ]);
            }
            table.to_string()
        }
        ViewOutput::Kanban(board) => {
            let mut header: Vec<String> = board
                .columns
                .iter()
                .map(|c| format!("{} ({})", c.key, c.len()))
                .collect();
            let mut lanes: Vec<Vec<&Oc>> =
                board.columns.iter().map(|c| c.records.clone()).collect();
            if !board.unassigned.is_empty() {
                header.push(format!("Other ({})", board.unassigned.len()));
                lanes.push(board.unassigned.clone());
            }

            let mut table = new_table(formatting, header.iter().map(String::as_str).collect());
            let depth = lanes.iter().map(Vec::len).max().unwrap_or(0);
            for row in 0..depth {
                table.add_row(lanes.iter().map(|lane| {
                    lane.get(row)
                        .map(|oc| format!("{} {}", oc.id, oc.description))
                        .unwrap_or_default()
                }));
            }
            table.to_string()
        }
        ViewOutput::Timeline(TimelineOutcome::Drawn(timeline)) => {
            const BAR_WIDTH: f64 = 40.0;
            let mut table = new_table(formatting, vec!["Event", "Start", "End", "Status", "Bar"]);
            for bar in &timeline.bars {
                let lead = (bar.left_pct / 100.0 * BAR_WIDTH).round() as usize;
                let len = ((bar.width_pct / 100.0 * BAR_WIDTH).round() as usize).max(1);
                table.add_row(vec![
                    bar.child.description().to_string(),
                    bar.child.start_date().unwrap_or("-").to_string(),
                    bar.child.end_date().unwrap_or("-").to_string(),
                    bar.child.status().unwrap_or("-").to_string(),
                    format!("{}{}", " ".repeat(lead), "#".repeat(len)),
                ]);
            }
            let mut text = format!(
                "{} .. {}\n{table}",
                timeline.axis_start.format("%Y-%m-%d"),
                timeline.axis_end.format("%Y-%m-%d")
            );
            if timeline.undated > 0 {
                text.push_str(&format!("\n{} events without dates", timeline.undated));
            }
            text
        }
        ViewOutput::Timeline(TimelineOutcome::Empty(reason)) => reason.message().to_string(),
    }
}
