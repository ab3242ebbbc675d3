use colored::*;
use std::env;
use std::io::IsTerminal;

use crate::config::BudgetBands;
use crate::results::{BudgetBand, BudgetRollup};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto, // Detect based on terminal
    Always,
    Never,
}

impl ColorMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    /// Apply `NO_COLOR`, `CLICOLOR` and `CLICOLOR_FORCE` on top of `color`.
    pub fn from_env(color: ColorMode) -> Self {
        Self {
            color: color_from_vars(
                color,
                env::var("NO_COLOR").ok().as_deref(),
                env::var("CLICOLOR").ok().as_deref(),
                env::var("CLICOLOR_FORCE").ok().as_deref(),
            ),
        }
    }

    pub fn plain() -> Self {
        Self {
            color: ColorMode::Never,
        }
    }
}

fn color_from_vars(
    requested: ColorMode,
    no_color: Option<&str>,
    clicolor: Option<&str>,
    clicolor_force: Option<&str>,
) -> ColorMode {
    // an explicit --color always/never wins over the environment
    if requested != ColorMode::Auto {
        return requested;
    }
    // NO_COLOR disables regardless of value (no-color.org)
    if no_color.is_some() {
        return ColorMode::Never;
    }
    if clicolor_force == Some("1") {
        return ColorMode::Always;
    }
    if clicolor == Some("0") {
        return ColorMode::Never;
    }
    ColorMode::Auto
}

pub trait OutputFormatter {
    fn header(&self, text: &str) -> String;
    fn warning(&self, text: &str) -> String;
    fn error(&self, text: &str) -> String;
    fn dim(&self, text: &str) -> String;
    /// Color `text` by budget band
    fn band(&self, text: &str, band: BudgetBand) -> String;
}

pub struct ColoredFormatter {
    enabled: bool,
}

impl ColoredFormatter {
    pub fn new(config: FormattingConfig) -> Self {
        let enabled = config.color.should_use_color();
        colored::control::set_override(enabled);
        Self { enabled }
    }

    fn paint(&self, text: &str, f: impl FnOnce(&str) -> ColoredString) -> String {
        if self.enabled {
            f(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn header(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().bold())
    }

    fn warning(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow())
    }

    fn error(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }

    fn band(&self, text: &str, band: BudgetBand) -> String {
        match band {
            BudgetBand::Healthy => self.paint(text, |t| t.green()),
            BudgetBand::Warning => self.paint(text, |t| t.yellow()),
            BudgetBand::Critical => self.paint(text, |t| t.red().bold()),
        }
    }
}

pub struct PlainFormatter;

impl OutputFormatter for PlainFormatter {
    fn header(&self, text: &str) -> String {
        text.to_string()
    }

    fn warning(&self, text: &str) -> String {
        text.to_string()
    }

    fn error(&self, text: &str) -> String {
        text.to_string()
    }

    fn dim(&self, text: &str) -> String {
        text.to_string()
    }

    fn band(&self, text: &str, _band: BudgetBand) -> String {
        text.to_string()
    }
}

pub fn formatter(config: FormattingConfig) -> Box<dyn OutputFormatter> {
    match config.color {
        ColorMode::Never => Box::new(PlainFormatter),
        _ => Box::new(ColoredFormatter::new(config)),
    }
}

/// `"75.0%"`, or `"-"` when there is no budget to measure against.
pub fn format_percentage(pct: Option<f64>) -> String {
    pct.map(|p| format!("{p:.1}%")).unwrap_or_else(|| "-".to_string())
}

/// Percentage of a roll-up, colored by its band.
pub fn format_rollup(
    fmt: &dyn OutputFormatter,
    rollup: &BudgetRollup,
    bands: &BudgetBands,
) -> String {
    let text = format_percentage(rollup.percentage());
    match rollup.band(bands) {
        Some(band) => fmt.band(&text, band),
        None => text,
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}
