use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::schema::{MetricSchema, SchemaPreset};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub recording_ms: u64,
    pub analysis_ms: u64,
    pub schema: SchemaPreset,
    /// Replaces the preset when present.
    pub custom_schema: Option<MetricSchema>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recording_ms: 3000,
            analysis_ms: 2000,
            schema: SchemaPreset::Dashboard,
            custom_schema: None,
        }
    }
}

impl Config {
    pub fn metric_schema(&self) -> MetricSchema {
        self.custom_schema
            .clone()
            .unwrap_or_else(|| self.schema.schema())
    }

    pub fn recording_delay(&self) -> Duration {
        Duration::from_millis(self.recording_ms)
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_ms)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "pitchr") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("pitchr_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable config, using defaults");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

/// Where the terminal UI writes its log file.
pub fn log_path() -> PathBuf {
    ProjectDirs::from("", "", "pitchr")
        .map(|pd| pd.data_local_dir().join("pitchr.log"))
        .unwrap_or_else(|| PathBuf::from("pitchr.log"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MetricSpec;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            recording_ms: 60_000,
            analysis_ms: 500,
            schema: SchemaPreset::Trainer,
            custom_schema: Some(MetricSchema {
                headline: vec![MetricSpec::new("pace", "Pace")],
                categories: vec![],
            }),
        };
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
        assert_eq!(loaded.metric_schema().headline[0].key, "pace");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn garbage_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{not json").unwrap();
        assert_eq!(FileConfigStore::with_path(&path).load(), Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{"schema":"trainer"}"#).unwrap();
        let cfg = FileConfigStore::with_path(&path).load();
        assert_eq!(cfg.schema, SchemaPreset::Trainer);
        assert_eq!(cfg.recording_ms, 3000);
        assert_eq!(cfg.metric_schema(), MetricSchema::trainer());
    }
}
