use crate::constants::*;
use crate::error::AppError;
use crate::tracker::TrackerConfig;
use crate::validation::{validate_heartbeat_secs, validate_nudge_pixels, validate_sample_secs};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// User preferences persisted as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub heartbeat_interval_secs: u64,
    pub sample_interval_secs: u64,
    pub activity_log: bool,
    pub nudge_pixels: i16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: DEFAULT_HEARTBEAT_SECS,
            sample_interval_secs: DEFAULT_SAMPLE_SECS,
            activity_log: false,
            nudge_pixels: DEFAULT_NUDGE_PIXELS,
        }
    }
}

impl Settings {
    /// Read settings from `path`, writing the defaults there first if the file
    /// does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            let settings = Self::default();
            settings.save(path)?;
            return Ok(settings);
        }

        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| AppError::Settings {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_heartbeat_secs(self.heartbeat_interval_secs)?;
        validate_sample_secs(self.sample_interval_secs, self.heartbeat_interval_secs)?;
        validate_nudge_pixels(self.nudge_pixels)
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            heartbeat_interval: Duration::from_secs(self.heartbeat_interval_secs),
            sample_interval: Duration::from_secs(self.sample_interval_secs),
        }
    }
}

/// Well-known file locations.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub settings_file: PathBuf,
    pub activity_log: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self, AppError> {
        let proj_dirs =
            ProjectDirs::from("com", APP_NAME, "IdleMover").ok_or(AppError::NoProjectDirs)?;
        Ok(Self {
            settings_file: proj_dirs.config_dir().join(SETTINGS_FILE_NAME),
            activity_log: proj_dirs.data_dir().join("logs").join(ACTIVITY_LOG_FILE_NAME),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);

        let settings = Settings::load_or_create(&path).unwrap();

        assert_eq!(settings, Settings::default());
        assert!(path.exists());
        let on_disk: Settings = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, Settings::default());
    }

    #[test]
    fn test_existing_file_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        let saved = Settings {
            heartbeat_interval_secs: 30,
            sample_interval_secs: 5,
            activity_log: true,
            nudge_pixels: 2,
        };
        saved.save(&path).unwrap();

        assert_eq!(Settings::load_or_create(&path).unwrap(), saved);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, r#"{"activity_log": true}"#).unwrap();

        let settings = Settings::load_or_create(&path).unwrap();
        assert!(settings.activity_log);
        assert_eq!(settings.heartbeat_interval_secs, DEFAULT_HEARTBEAT_SECS);
        assert_eq!(settings.nudge_pixels, DEFAULT_NUDGE_PIXELS);
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            Settings::load_or_create(&path),
            Err(AppError::Settings { .. })
        ));
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_sample_longer_than_heartbeat() {
        let settings = Settings {
            heartbeat_interval_secs: 10,
            sample_interval_secs: 20,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(AppError::InvalidInput {
                field: "sample_interval_secs",
                ..
            })
        ));
    }

    #[test]
    fn test_tracker_config_from_settings() {
        let config = Settings::default().tracker_config();
        assert_eq!(config, TrackerConfig::default());
    }
}
