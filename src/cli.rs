use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::NearDeadlinePolicy;
use crate::formatting::ColorMode;
use crate::results::{SortCriteria, ViewMode};

#[derive(Parser, Debug)]
#[command(name = "canteiro")]
#[command(about = "Purchase-order control tower and cost reports over back-office snapshots", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the nearest .canteiro.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// When to use colors
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    /// Increase verbosity level (can be repeated: -v, -vv)
    /// -v: debug logging
    /// -vv: trace logging
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter and display purchase orders
    Tower {
        /// Snapshot file with works, OCs and events
        #[arg(short, long)]
        snapshot: PathBuf,

        /// How to lay out the results
        #[arg(long, value_enum, default_value = "list")]
        view: ViewArg,

        /// Case-insensitive text search (also matches event descriptions)
        #[arg(short, long)]
        query: Option<String>,

        /// Only OCs with an overdue event
        #[arg(long)]
        overdue: bool,

        /// Only OCs with an event past the near-deadline threshold
        #[arg(long = "near-deadline")]
        near_deadline: bool,

        /// Only OCs with an event in this status
        #[arg(long)]
        status: Option<String>,

        /// Sort order applied after filtering
        #[arg(long, value_enum, default_value = "input")]
        sort: SortArg,

        /// Page to show (list view only)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Items per page (defaults to the configured value)
        #[arg(long = "per-page")]
        per_page: Option<usize>,

        /// Evaluate deadlines at this instant (RFC 3339) instead of now
        #[arg(long)]
        now: Option<String>,

        /// Whether overdue events also count as near the deadline
        #[arg(long = "near-deadline-policy", value_enum)]
        near_deadline_policy: Option<PolicyArg>,

        /// JSON list of local edits applied before rendering
        #[arg(long)]
        edits: Option<PathBuf>,
    },

    /// Cost report by operation over a month range
    Costs {
        /// Snapshot file with users, RDs and assignments
        #[arg(short, long)]
        snapshot: PathBuf,

        /// First month (YYYY-MM)
        #[arg(long)]
        from: String,

        /// Last month, inclusive (YYYY-MM)
        #[arg(long)]
        to: String,

        /// Drill into one operation's sub-categories
        #[arg(long)]
        operation: Option<String>,

        /// Rows in the ranking (defaults to the configured value)
        #[arg(long)]
        top: Option<usize>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },

    /// Hours worked per user and cost center
    Hours {
        /// Snapshot file with users, RDs, assignments and operations
        #[arg(short, long)]
        snapshot: PathBuf,

        #[arg(long)]
        year: i32,

        /// Single month (1-12); the whole year when omitted
        #[arg(long)]
        month: Option<u32>,
    },

    /// Manage deadline alerts
    Alerts {
        /// JSON file holding the alerts
        #[arg(long, default_value = "alerts.json")]
        store: PathBuf,

        #[command(subcommand)]
        action: AlertAction,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AlertAction {
    /// List alerts
    List {
        /// Only alerts of this work
        #[arg(long)]
        work: Option<String>,
    },
    /// Create or replace an alert
    Set {
        #[arg(long)]
        id: String,
        #[arg(long)]
        work: String,
        /// Event description the alert watches
        #[arg(long = "event")]
        event_filter: String,
        /// Repeat every N days
        #[arg(long = "every")]
        recurrence_days: Option<u32>,
        /// Warn N days before the deadline
        #[arg(long = "lead")]
        lead_time_days: Option<u32>,
    },
    /// Delete an alert
    Remove { id: String },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    List,
    Grouped,
    Kanban,
    Timeline,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Input,
    Description,
    Value,
    Work,
    Status,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    IncludeOverdue,
    ExcludeOverdue,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Terminal,
}

impl From<ViewArg> for ViewMode {
    fn from(v: ViewArg) -> Self {
        match v {
            ViewArg::List => ViewMode::List,
            ViewArg::Grouped => ViewMode::Grouped,
            ViewArg::Kanban => ViewMode::Kanban,
            ViewArg::Timeline => ViewMode::Timeline,
        }
    }
}

impl From<SortArg> for SortCriteria {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Input => SortCriteria::Input,
            SortArg::Description => SortCriteria::Description,
            SortArg::Value => SortCriteria::ValueDesc,
            SortArg::Work => SortCriteria::WorkId,
            SortArg::Status => SortCriteria::Status,
        }
    }
}

impl From<PolicyArg> for NearDeadlinePolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::IncludeOverdue => NearDeadlinePolicy::IncludeOverdue,
            PolicyArg::ExcludeOverdue => NearDeadlinePolicy::ExcludeOverdue,
        }
    }
}

impl From<ColorChoice> for ColorMode {
    fn from(c: ColorChoice) -> Self {
        match c {
            ColorChoice::Auto => ColorMode::Auto,
            ColorChoice::Always => ColorMode::Always,
            ColorChoice::Never => ColorMode::Never,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
