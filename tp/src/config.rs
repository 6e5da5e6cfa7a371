//! texplate configuration loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults applied when the command line leaves a setting unset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format used when `--output-format` is not given
    #[serde(rename = "output-format", skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,

    /// Log level used when `--log-level` is not given
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::candidate_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::info!("Skipping config {}: {:#}", candidate.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed here; [`Config::load`] reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        match config_path {
            Some(path) => Self::read(path).ok()?.log_level,
            None => Self::candidate_paths()
                .into_iter()
                .find(|candidate| candidate.exists())
                .and_then(|candidate| Self::read(&candidate).ok())
                .and_then(|config| config.log_level),
        }
    }

    /// `./.texplate.yml`, then `<config dir>/texplate/texplate.yml`
    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".texplate.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("texplate").join("texplate.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::read(path.as_ref())?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("texplate.yml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_default_config_is_empty() {
        let config = Config::default();
        assert_eq!(config.output_format, None);
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
output-format: json
log-level: debug
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.output_format.as_deref(), Some("json"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_yaml::from_str("log-level: trace\n").unwrap();
        assert_eq!(config.output_format, None);
        assert_eq!(config.log_level.as_deref(), Some("trace"));
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "output-format: yaml\n");
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.output_format.as_deref(), Some("yaml"));
    }

    #[test]
    fn test_load_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "");
        assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.yml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("nope.yml"));
    }

    #[test]
    fn test_load_invalid_yaml_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "output-format: [unclosed");
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_log_level() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "log-level: info\n");
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("info"));

        let missing = dir.path().join("missing.yml");
        assert_eq!(Config::load_log_level(Some(&missing)), None);
    }

    #[test]
    fn test_serialize_skips_unset_fields() {
        let config = Config {
            output_format: Some("json".to_string()),
            log_level: None,
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(yaml, "output-format: json\n");
    }
}
