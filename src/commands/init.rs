use anyhow::Result;
use std::path::Path;

use crate::config::{CanteiroConfig, CONFIG_FILE_NAME};

/// Default configuration as written by `canteiro init`.
pub fn default_config_toml() -> Result<String> {
    let body = toml::to_string_pretty(&CanteiroConfig::default())?;
    Ok(format!("# canteiro configuration\n\n{body}"))
}

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    std::fs::write(&config_path, default_config_toml()?)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_and_validate_config;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_round_trips() {
        let text = default_config_toml().unwrap();
        assert!(text.contains("[pagination]"));
        let parsed = parse_and_validate_config(&text).unwrap();
        assert_eq!(parsed, CanteiroConfig::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        init_config(temp.path(), false).unwrap();
        assert!(init_config(temp.path(), false).is_err());
        assert!(init_config(temp.path(), true).is_ok());
    }
}
