use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{error::AppError, query::SortBy, theme::Theme};

/// User settings, stored as TOML in the platform config directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Theme,

    #[serde(default)]
    pub default_sort: SortBy,

    /// JSON file replacing the built-in records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            default_sort: SortBy::default(),
            seed_file: None,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            file: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load from `path`, or from the default location, creating it there if missing
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => Self::read(path),
            None => {
                let path = Self::config_path();
                if path.exists() {
                    Self::read(&path)
                } else {
                    let config = Config::default();
                    config.write(&path)?;
                    Ok(config)
                }
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("pkgdesk.toml"))
    }

    /// Configured log file, or `pkgdesk.log` in the data directory
    pub fn log_path(&self) -> PathBuf {
        if let Some(file) = &self.log.file {
            return file.clone();
        }
        Self::project_dirs()
            .map(|dirs| dirs.data_local_dir().join("pkgdesk.log"))
            .unwrap_or_else(|| PathBuf::from("pkgdesk.log"))
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "pkgdesk", "pkgdesk")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, Theme::Default);
        assert_eq!(config.default_sort, SortBy::LastUpdated);
        assert_eq!(config.log.level, "info");
        assert!(config.seed_file.is_none());
    }

    #[test]
    fn test_partial_file() {
        let config: Config = toml::from_str(
            r#"
            theme = "amoled"
            default_sort = "name"

            [log]
            file = "/tmp/pkgdesk.log"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme, Theme::Amoled);
        assert_eq!(config.default_sort, SortBy::Name);
        assert_eq!(config.log.level, "info");
        assert_eq!(config.log_path(), PathBuf::from("/tmp/pkgdesk.log"));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            theme: Theme::Light,
            seed_file: Some(PathBuf::from("records.json")),
            ..Default::default()
        };
        config.write(&path).unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = 3").unwrap();
        assert!(matches!(Config::read(&path), Err(AppError::Config(_))));
    }
}
