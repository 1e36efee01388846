/// CLI configuration
use crate::error::{CliError, Result};
use outertune_queue::BoardConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "outertune.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub board: BoardConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `outertune.toml` in the
    /// working directory is used when present. `OUTERTUNE_*` variables
    /// override both, with `__` between nested keys
    /// (`OUTERTUNE_STORAGE__DATABASE_URL`, `OUTERTUNE_BOARD__MAX_QUEUES`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// `load` with the environment replaced by `env` (when given)
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("OUTERTUNE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: Self = settings
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CliError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.is_empty() {
            return Err(CliError::Config(
                "database URL is required (set OUTERTUNE_STORAGE__DATABASE_URL)".to_string(),
            ));
        }
        if self.board.max_queues == 0 {
            return Err(CliError::Config("board.max_queues must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://./data/outertune.db".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        )
    }

    #[test]
    fn defaults_without_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();

        let config = AppConfig::load_with_env(Some(&path), env(&[])).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.board.max_queues, 20);
    }

    #[test]
    fn file_values_are_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outertune.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[storage]\ndatabase_url = \"sqlite://queues.db\"\n").unwrap();
        writeln!(file, "[board]\nmax_queues = 5\npersist = false").unwrap();

        let config = AppConfig::load_with_env(Some(&path), env(&[])).unwrap();

        assert_eq!(config.storage.database_url, "sqlite://queues.db");
        assert_eq!(config.board.max_queues, 5);
        assert!(!config.board.persist);
        assert_eq!(config.board.extension_marker, "\u{200B}");
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outertune.toml");
        std::fs::write(&path, "[board]\nmax_queues = 5\n").unwrap();

        let config = AppConfig::load_with_env(
            Some(&path),
            env(&[
                ("OUTERTUNE_BOARD__MAX_QUEUES", "12"),
                ("OUTERTUNE_STORAGE__DATABASE_URL", "sqlite://env.db"),
            ]),
        )
        .unwrap();

        assert_eq!(config.board.max_queues, 12);
        assert_eq!(config.storage.database_url, "sqlite://env.db");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load_with_env(Some(Path::new("/nonexistent/outertune.toml")), env(&[]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut config = AppConfig::default();
        config.board.max_queues = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_output_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.toml");
        let mut original = AppConfig::default();
        original.board.max_queues = 7;
        std::fs::write(&path, original.to_toml().unwrap()).unwrap();

        let reloaded = AppConfig::load_with_env(Some(&path), env(&[])).unwrap();

        assert_eq!(reloaded, original);
    }
}
