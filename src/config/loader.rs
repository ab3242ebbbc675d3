use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::CanteiroConfig;
use super::validation::validate_config;
use crate::errors::{Error, Result, ResultExt};

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".canteiro.toml";

/// Pure function to read config file contents
pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<CanteiroConfig> {
    let config = toml::from_str::<CanteiroConfig>(contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load an explicitly named config file. Errors are returned, not swallowed.
pub fn load_config_from(path: &Path) -> Result<CanteiroConfig> {
    let contents = read_config_file(path)
        .map_err(Error::from)
        .context(format!("Reading {}", path.display()))?;
    parse_and_validate_config(&contents).context(format!("Parsing {}", path.display()))
}

/// Try loading config from a specific path, falling back on any problem
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<CanteiroConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!(
                "Invalid config {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

/// Handle file read errors with appropriate logging
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.canteiro.toml`.
pub fn load_config_near(start: PathBuf) -> CanteiroConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            CanteiroConfig::default()
        })
}

pub fn load_config() -> CanteiroConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_near(dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            CanteiroConfig::default()
        }
    }
}
