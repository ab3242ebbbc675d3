//! Sub-command handlers behind the `canteiro` binary.
//!
//! Each handler loads its inputs, runs the library pipeline and renders a
//! table. Rendering is split from printing so the text can be checked in
//! tests.

pub mod alerts;
pub mod costs;
pub mod hours;
pub mod init;
pub mod tower;

use comfy_table::presets::{ASCII_FULL, UTF8_FULL};
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::formatting::FormattingConfig;
use crate::results::BudgetBand;

/// Line printed instead of an empty table.
pub const NO_RESULTS: &str = "No results";

pub(crate) fn new_table(formatting: &FormattingConfig, header: Vec<&str>) -> Table {
    let mut table = Table::new();
    if formatting.color.should_use_color() {
        table.load_preset(UTF8_FULL).enforce_styling();
    } else {
        table.load_preset(ASCII_FULL).force_no_tty();
    }
    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub(crate) fn band_cell(text: String, band: Option<BudgetBand>) -> Cell {
    let cell = Cell::new(text);
    match band {
        Some(BudgetBand::Healthy) => cell.fg(Color::Green),
        Some(BudgetBand::Warning) => cell.fg(Color::Yellow),
        Some(BudgetBand::Critical) => cell.fg(Color::Red),
        None => cell,
    }
}
