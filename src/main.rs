use anyhow::Result;
use canteiro::alerts::{AlertBook, JsonFileAlertStore};
use canteiro::cli::{AlertAction, Cli, Commands, OutputFormat};
use canteiro::clock::SystemClock;
use canteiro::commands::{alerts, costs, hours, init, tower};
use canteiro::config::{load_config, load_config_from, CanteiroConfig};
use canteiro::formatting::{formatter, FormattingConfig};
use canteiro::results::FilterState;

// Main orchestrator function
fn main() -> Result<()> {
    let cli = canteiro::cli::parse_args();
    init_logging(cli.verbosity);

    let config = resolve_config(&cli)?;
    let formatting = FormattingConfig::from_env(cli.color.into());
    let fmt = formatter(formatting);

    match cli.command {
        Commands::Tower {
            snapshot,
            view,
            query,
            overdue,
            near_deadline,
            status,
            sort,
            page,
            per_page,
            now,
            near_deadline_policy,
            edits,
        } => {
            let filter = build_filter(query, overdue, near_deadline, status);
            let args = tower::TowerConfig {
                snapshot,
                view: view.into(),
                filter,
                sort: sort.into(),
                page,
                per_page,
                now,
                policy: near_deadline_policy.map(Into::into),
                edits,
            };
            tower::run_tower(args, &config, &formatting, fmt.as_ref())
        }
        Commands::Costs {
            snapshot,
            from,
            to,
            operation,
            top,
            format,
        } => {
            let args = costs::CostsConfig {
                snapshot,
                from,
                to,
                operation,
                top,
                json: format == OutputFormat::Json,
            };
            costs::run_costs(args, &config, &formatting, fmt.as_ref())
        }
        Commands::Hours {
            snapshot,
            year,
            month,
        } => hours::run_hours(
            hours::HoursConfig {
                snapshot,
                year,
                month,
            },
            &formatting,
            fmt.as_ref(),
        ),
        Commands::Alerts { store, action } => {
            let book = AlertBook::new(JsonFileAlertStore::new(store));
            handle_alert_action(&book, action, &formatting, fmt.as_ref())
        }
        Commands::Init { force } => init::init_config(&std::env::current_dir()?, force),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    // RUST_LOG overrides the -v flags
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<CanteiroConfig> {
    match &cli.config {
        Some(path) => Ok(load_config_from(path)?),
        None => Ok(load_config()),
    }
}

fn build_filter(
    query: Option<String>,
    overdue: bool,
    near_deadline: bool,
    status: Option<String>,
) -> FilterState {
    let mut filter = FilterState::new()
        .with_query(query.unwrap_or_default())
        .with_overdue(overdue)
        .with_near_deadline(near_deadline);
    if let Some(status) = status {
        filter = filter.with_status(status);
    }
    filter
}

fn handle_alert_action(
    book: &AlertBook<JsonFileAlertStore>,
    action: AlertAction,
    formatting: &FormattingConfig,
    fmt: &dyn canteiro::formatting::OutputFormatter,
) -> Result<()> {
    match action {
        AlertAction::List { work } => {
            println!("{}", alerts::list_alerts(book, work.as_deref(), formatting)?);
            Ok(())
        }
        AlertAction::Set {
            id,
            work,
            event_filter,
            recurrence_days,
            lead_time_days,
        } => {
            let draft = alerts::AlertDraft {
                id,
                work_id: work,
                event_filter,
                recurrence_days,
                lead_time_days,
            };
            alerts::set_alert(book, draft, &SystemClock)
        }
        AlertAction::Remove { id } => alerts::remove_alert(book, &id, fmt),
    }
}
