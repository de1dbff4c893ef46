//! TOML run configuration.

use anyhow::{Context, Result};
use cea_algo::CeaConfig;
use std::fs;
use std::path::Path;

/// Read a [`CeaConfig`] from a TOML file and validate it.
///
/// Sections and keys missing from the file keep their defaults.
pub fn load_config(path: &Path) -> Result<CeaConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: CeaConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating config {}", path.display()))?;
    Ok(config)
}

/// Load `path` when given, otherwise fall back to the defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<CeaConfig> {
    match path {
        Some(path) => load_config(path),
        None => Ok(CeaConfig::default()),
    }
}

pub fn save_config(config: &CeaConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config).context("serializing config to TOML")?;
    fs::write(path, contents).with_context(|| format!("writing config {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cea.toml");
        fs::write(
            &path,
            "[planning]\ninterest_rate = 0.03\n\n[genetic]\npopulation_size = 16\nseed = 9\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.planning.interest_rate, 0.03);
        assert_eq!(config.genetic.population_size, 16);
        assert_eq!(config.genetic.seed, 9);
        let defaults = CeaConfig::default();
        assert_eq!(config.storage.t_max_k, defaults.storage.t_max_k);
        assert_eq!(config.dispatch.max_cop, defaults.dispatch.max_cop);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[genetic]\npopulation_size = 0\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.toml"));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = CeaConfig::default();
        config.storage.loss_factor = 0.05;
        config.genetic.threads = 2;
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.storage.loss_factor, 0.05);
        assert_eq!(loaded.genetic.threads, 2);
    }

    #[test]
    fn missing_file_names_path() {
        let err = load_config(Path::new("/nonexistent/cea.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cea.toml"));
    }
}
