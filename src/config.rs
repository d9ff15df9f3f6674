use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Config file read from the working directory unless overridden.
pub const DEFAULT_CONFIG_FILE: &str = "pipeline_dashboard.json";
pub const CONFIG_PATH_ENV: &str = "PIPELINE_DASHBOARD_CONFIG";
pub const DATA_DIR_ENV: &str = "PIPELINE_DATA_DIR";

/// How categorical filters are rendered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterStyle {
    #[default]
    Multiselect,
    Checkboxes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub data_file: String,
    /// Loaded when `data_file` does not exist yet.
    pub seed_file: String,
    pub filter_style: FilterStyle,
    /// Height of the data table in points.
    pub table_height: f32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_dir: PathBuf::from("data"),
            data_file: "pipeline_data.csv".to_string(),
            seed_file: "sample_pipeline_data.csv".to_string(),
            filter_style: FilterStyle::default(),
            table_height: 400.0,
        }
    }
}

impl DashboardConfig {
    /// Read the config file named by `PIPELINE_DASHBOARD_CONFIG` (or the
    /// default file) and apply `PIPELINE_DATA_DIR`. Never fails: a missing
    /// file means defaults, a malformed one is logged and ignored.
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::from_file(&path);
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        config
    }

    pub fn from_file(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("Cannot read {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Malformed config {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn data_path(&self) -> PathBuf {
        self.data_dir.join(&self.data_file)
    }

    pub fn seed_path(&self) -> PathBuf {
        self.data_dir.join(&self.seed_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{ "data_dir": "/srv/lines", "filter_style": "checkboxes" }"#)
            .unwrap();

        let config = DashboardConfig::from_file(&path);
        assert_eq!(config.filter_style, FilterStyle::Checkboxes);
        assert_eq!(config.data_path(), PathBuf::from("/srv/lines/pipeline_data.csv"));
        assert_eq!(config.table_height, 400.0);
    }

    #[test]
    fn missing_or_malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            DashboardConfig::from_file(&dir.path().join("absent.json")),
            DashboardConfig::default()
        );

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ data_dir = 3 ").unwrap();
        assert_eq!(DashboardConfig::from_file(&bad), DashboardConfig::default());
    }
}
