use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Cell;
use serde::Serialize;

use super::{new_table, NO_RESULTS};
use crate::config::CanteiroConfig;
use crate::costs::{
    build_cost_report, format_brl, CostReport, MonthRange, RankedItem, Scope, YearMonth,
};
use crate::errors::ResultExt;
use crate::formatting::{format_percentage, FormattingConfig, OutputFormatter};
use crate::io::{load_snapshot, SnapshotRdSource};

#[derive(Debug, Clone)]
pub struct CostsConfig {
    pub snapshot: PathBuf,
    pub from: String,
    pub to: String,
    pub operation: Option<String>,
    pub top: Option<usize>,
    pub json: bool,
}

#[derive(Serialize)]
struct CostsJson<'a> {
    report: &'a CostReport,
    ranking: Vec<RankedItem>,
}

pub fn parse_range(from: &str, to: &str) -> crate::errors::Result<MonthRange> {
    let start: YearMonth = from.parse().context("Reading --from")?;
    let end: YearMonth = to.parse().context("Reading --to")?;
    MonthRange::new(start, end)
}

pub fn run_costs(
    args: CostsConfig,
    config: &CanteiroConfig,
    formatting: &FormattingConfig,
    fmt: &dyn OutputFormatter,
) -> Result<()> {
    let range = parse_range(&args.from, &args.to)?;
    let snapshot = load_snapshot(&args.snapshot)?;
    let run = build_cost_report(&SnapshotRdSource::new(&snapshot), &range, &config.labels)?;

    for failure in &run.failures {
        eprintln!("{}", fmt.warning(&format!("Skipped: {failure}")));
    }

    let scope = Scope::from_selection(args.operation.as_deref());
    let top = args.top.unwrap_or(config.costs.top_n);

    if args.json {
        let out = CostsJson {
            report: &run.report,
            ranking: run.report.top_n(&scope, top),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", fmt.header(&scope_title(&scope, &run.report, &range)));
    println!("{}", render_costs(&run.report, &scope, top, formatting));
    Ok(())
}

fn scope_title(scope: &Scope, report: &CostReport, range: &MonthRange) -> String {
    match scope {
        Scope::Category(name) if report.category(name).is_some() => {
            format!("{name}, {} to {}", range.start(), range.end())
        }
        _ => format!("All operations, {} to {}", range.start(), range.end()),
    }
}

/// Ranking table followed by the per-month totals.
pub fn render_costs(
    report: &CostReport,
    scope: &Scope,
    top: usize,
    formatting: &FormattingConfig,
) -> String {
    if report.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut ranking = new_table(formatting, vec!["Name", "Total", "Share"]);
    for item in report.top_n(scope, top) {
        ranking.add_row(vec![
            Cell::new(&item.name),
            Cell::new(format_brl(item.total)),
            Cell::new(format_percentage(item.percentage)),
        ]);
    }

    let mut months = new_table(formatting, vec!["Month", "Total"]);
    for (month, total) in &report.monthly_totals {
        months.add_row(vec![Cell::new(month), Cell::new(format_brl(*total))]);
    }

    format!(
        "{ranking}\nTotal: {}\n{months}",
        format_brl(report.total())
    )
}
