//! Configuration for the pipeline and the command-line front end.
//!
//! Every section of `.canteiro.toml` is optional; missing values take the
//! defaults used by the back-office screens (20 items per page, 50%
//! near-deadline threshold, 75/90% budget bands, 7-day timeline padding,
//! top 5 cost ranking).

mod core;
mod labels;
mod loader;
mod thresholds;
pub mod validation;

pub use self::core::CanteiroConfig;
pub use labels::Labels;
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_near,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use thresholds::{
    BudgetBands, CostConfig, DeadlineConfig, NearDeadlinePolicy, PaginationConfig,
    TimelineConfig, DEFAULT_CRITICAL_PCT, DEFAULT_ITEMS_PER_PAGE, DEFAULT_MIN_BAR_WIDTH_PCT,
    DEFAULT_NEAR_DEADLINE_PCT, DEFAULT_TIMELINE_BUFFER_DAYS, DEFAULT_TOP_N, DEFAULT_WARNING_PCT,
};
pub use validation::validate_config;
