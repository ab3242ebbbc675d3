use std::path::PathBuf;

use anyhow::Result;
use comfy_table::Cell;

use super::{new_table, NO_RESULTS};
use crate::costs::{format_minutes, load_hours, HoursMatrix, MonthRange, YearMonth};
use crate::formatting::{FormattingConfig, OutputFormatter};
use crate::io::{load_snapshot, SnapshotRdSource};

#[derive(Debug, Clone)]
pub struct HoursConfig {
    pub snapshot: PathBuf,
    pub year: i32,
    pub month: Option<u32>,
}

/// A single month, or the whole year when `month` is `None`.
pub fn hours_range(year: i32, month: Option<u32>) -> crate::errors::Result<MonthRange> {
    match month {
        Some(m) => Ok(MonthRange::single(YearMonth::new(year, m)?)),
        None => Ok(MonthRange::year(year)),
    }
}

pub fn run_hours(
    args: HoursConfig,
    formatting: &FormattingConfig,
    fmt: &dyn OutputFormatter,
) -> Result<()> {
    let range = hours_range(args.year, args.month)?;
    let snapshot = load_snapshot(&args.snapshot)?;
    let matrix = load_hours(&SnapshotRdSource::new(&snapshot), &range)?;

    println!(
        "{}",
        fmt.header(&format!("Hours, {} to {}", range.start(), range.end()))
    );
    println!("{}", render_hours(&matrix, formatting));
    Ok(())
}

/// One row per cost center, one column per user, plus a totals row.
pub fn render_hours(matrix: &HoursMatrix, formatting: &FormattingConfig) -> String {
    if matrix.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut header = vec!["Operation", "CTE", "Accounting", "Cost center"];
    header.extend(matrix.users.iter().map(|u| u.first_name.as_str()));
    let mut table = new_table(formatting, header);

    for row in &matrix.rows {
        let mut cells = vec![
            Cell::new(&row.operation),
            Cell::new(row.cte),
            Cell::new(&row.contabil),
            Cell::new(&row.obra),
        ];
        cells.extend(
            matrix
                .users
                .iter()
                .map(|u| Cell::new(format_minutes(matrix.minutes(&u.id, &row.obra)))),
        );
        table.add_row(cells);
    }

    let mut totals = vec![Cell::new("Total"), Cell::new(""), Cell::new(""), Cell::new("")];
    totals.extend(
        matrix
            .users
            .iter()
            .map(|u| Cell::new(format_minutes(matrix.user_total(&u.id)))),
    );
    table.add_row(totals);

    table.to_string()
}
