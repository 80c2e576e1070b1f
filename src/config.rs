//! Configuration management.
//!
//! Settings resolve in three layers: built-in defaults, then an optional
//! TOML config file, then environment variables. The `.env` file is loaded
//! by `main` before any of this runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::repository::DbContext;

/// Default database filename inside the data directory.
pub const DEFAULT_DATABASE_FILENAME: &str = "agrodoctor.db";

/// Subdirectory of the data directory holding stored uploads.
const UPLOADS_SUBDIR: &str = "uploads";

/// Default filename of the frozen classifier model.
const DEFAULT_MODEL_FILENAME: &str = "plant_model_v5-beta.rten";

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Database filename inside the data directory.
    pub database_filename: String,
    /// Database URL (overrides data_dir/database_filename if set).
    pub database_url: Option<String>,
    /// Directory for storing uploaded images.
    pub uploads_dir: PathBuf,
    /// Path to the frozen classifier model file.
    pub model_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = PathBuf::from("data");
        Self {
            uploads_dir: data_dir.join(UPLOADS_SUBDIR),
            model_path: data_dir.join(DEFAULT_MODEL_FILENAME),
            data_dir,
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            database_url: None,
        }
    }
}

impl Settings {
    /// Effective database URL.
    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| self.data_dir.join(&self.database_filename).display().to_string())
    }

    /// Create a database context for these settings.
    pub fn create_db_context(&self) -> DbContext {
        DbContext::from_url(&self.database_url())
    }

    /// Ensure the data and uploads directories exist.
    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.uploads_dir)?;
        Ok(())
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Database filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Uploads directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploads_dir: Option<String>,
    /// Path to the frozen classifier model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
}

impl Config {
    /// Parse a config file; missing file yields the empty config.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Apply file-level overrides onto settings.
    pub fn apply_to_settings(&self, settings: &mut Settings) {
        if let Some(ref dir) = self.data_dir {
            settings.data_dir = PathBuf::from(dir);
            settings.uploads_dir = settings.data_dir.join(UPLOADS_SUBDIR);
            settings.model_path = settings.data_dir.join(DEFAULT_MODEL_FILENAME);
        }
        if let Some(ref db) = self.database {
            settings.database_filename = db.clone();
        }
        if let Some(ref dir) = self.uploads_dir {
            settings.uploads_dir = PathBuf::from(dir);
        }
        if let Some(ref path) = self.model_path {
            settings.model_path = PathBuf::from(path);
        }
    }
}

/// Load settings: defaults, then the config file, then environment.
///
/// `data_dir_flag` is the CLI `--data-dir` override, applied last together
/// with the environment.
pub fn load_settings(data_dir_flag: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let config_path = std::env::var("AGRO_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("agrodoctor.toml"));
    Config::load(&config_path)?.apply_to_settings(&mut settings);

    if let Ok(dir) = std::env::var("AGRO_DATA_DIR") {
        settings.data_dir = PathBuf::from(&dir);
        settings.uploads_dir = settings.data_dir.join(UPLOADS_SUBDIR);
        settings.model_path = settings.data_dir.join(DEFAULT_MODEL_FILENAME);
    }
    if let Some(dir) = data_dir_flag {
        settings.data_dir = dir.to_path_buf();
        settings.uploads_dir = settings.data_dir.join(UPLOADS_SUBDIR);
        settings.model_path = settings.data_dir.join(DEFAULT_MODEL_FILENAME);
    }
    if let Ok(url) = std::env::var("DATABASE_URL") {
        settings.database_url = Some(url);
    }
    if let Ok(path) = std::env::var("AGRO_MODEL_PATH") {
        settings.model_path = PathBuf::from(path);
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let settings = Settings::default();
        assert_eq!(settings.database_url(), format!("data/{DEFAULT_DATABASE_FILENAME}"));
        assert_eq!(settings.uploads_dir, PathBuf::from("data/uploads"));
        assert_eq!(
            settings.model_path,
            PathBuf::from("data").join(DEFAULT_MODEL_FILENAME)
        );
    }

    #[test]
    fn test_config_overrides() {
        let config: Config = toml::from_str(
            r#"
            data_dir = "/srv/agro"
            database = "plants.db"
            model_path = "/models/leaf.rten"
            "#,
        )
        .unwrap();

        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings);

        assert_eq!(settings.database_url(), "/srv/agro/plants.db");
        assert_eq!(settings.uploads_dir, PathBuf::from("/srv/agro/uploads"));
        assert_eq!(settings.model_path, PathBuf::from("/models/leaf.rten"));
    }

    #[test]
    fn test_empty_config_changes_nothing() {
        let mut settings = Settings::default();
        Config::default().apply_to_settings(&mut settings);
        assert_eq!(settings.database_filename, DEFAULT_DATABASE_FILENAME);
    }
}
