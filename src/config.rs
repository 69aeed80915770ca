use crate::error::{MapperError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SERVER_ENV: &str = "SNOMED_MAPPER_SERVER";
pub const REFERENCE_ENV: &str = "SNOMED_MAPPER_REFERENCE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL used by the `match`/`upload` commands
    pub server_url: String,
    pub host: String,
    pub port: u16,
    pub reference_path: PathBuf,
    pub static_dir: PathBuf,
    pub output_dir: PathBuf,
    pub max_upload_mb: usize,
    /// Generated workbooks older than this are deleted
    pub retention_hours: u64,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            host: "0.0.0.0".into(),
            port: 8000,
            reference_path: PathBuf::from("reference_map.json"),
            static_dir: PathBuf::from("static"),
            output_dir: std::env::temp_dir().join("snomed-mapper"),
            max_upload_mb: 20,
            retention_hours: 24,
            timeout_seconds: 120,
        }
    }
}

impl Config {
    /// Config file, then environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::read_file(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    /// Stored settings only, defaults when the file is missing
    pub fn read_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Edit the stored file; environment overrides never reach it
    pub fn update_file(path: &Path, edit: impl FnOnce(&mut Config)) -> Result<()> {
        let mut stored = Self::read_file(path)?;
        edit(&mut stored);
        stored.write_file(path)
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MapperError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("snomed-mapper").join("config.json"))
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(SERVER_ENV) {
            if !url.trim().is_empty() {
                self.server_url = url.trim().to_string();
            }
        }
        if let Ok(path) = std::env::var(REFERENCE_ENV) {
            if !path.trim().is_empty() {
                self.reference_path = PathBuf::from(path.trim());
            }
        }
    }

    pub fn set_server_url(&mut self, url: String) -> Result<()> {
        let url = url.trim_end_matches('/').to_string();
        self.server_url = url.clone();
        Self::update_file(&Self::config_path()?, |stored| stored.server_url = url)
    }

    pub fn set_reference_path(&mut self, path: PathBuf) -> Result<()> {
        self.reference_path = path.clone();
        Self::update_file(&Self::config_path()?, |stored| stored.reference_path = path)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours * 60 * 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_file_keeps_stored_values() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"reference_path": "stored.json", "port": 9000}"#).unwrap();

        Config::update_file(&path, |c| c.server_url = "http://mapper:8000".into()).unwrap();

        let stored = Config::read_file(&path).unwrap();
        assert_eq!(stored.server_url, "http://mapper:8000");
        assert_eq!(stored.reference_path, PathBuf::from("stored.json"));
        assert_eq!(stored.port, 9000);
    }

    #[test]
    fn test_read_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Config::read_file(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.max_upload_mb, 20);
    }

    #[test]
    fn test_max_upload_bytes() {
        let config = Config {
            max_upload_mb: 2,
            ..Config::default()
        };
        assert_eq!(config.max_upload_bytes(), 2 * 1024 * 1024);
    }
}
