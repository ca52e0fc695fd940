//! Configuration handling for the TUI

use crate::state::FormSettings;
use crate::submission::JsonFileSink;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TuiConfig {
    /// Directory submissions are written to
    pub submissions_dir: Option<PathBuf>,
    /// Value the progress bar reaches on the final section
    pub progress_max: Option<u32>,
    /// Upper bound of the children stepper
    pub max_children: Option<u32>,
    /// Upper bound of the friends stepper
    pub max_friends: Option<u32>,
}

impl TuiConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "rego", "rego-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`, falling back to defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: TuiConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Form limits with defaults filled in
    pub fn form_settings(&self) -> FormSettings {
        let defaults = FormSettings::default();
        FormSettings {
            progress_max: self.progress_max.unwrap_or(defaults.progress_max).max(1),
            max_children: self.max_children.unwrap_or(defaults.max_children),
            max_friends: self.max_friends.unwrap_or(defaults.max_friends).max(1),
        }
    }

    pub fn submissions_dir(&self) -> PathBuf {
        self.submissions_dir
            .clone()
            .unwrap_or_else(JsonFileSink::default_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl TuiConfig {
        fn save_to(&self, path: &Path) -> Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, serde_json::to_string_pretty(self)?)?;
            Ok(())
        }
    }

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert!(config.submissions_dir.is_none());
        assert!(config.progress_max.is_none());
        assert!(config.max_children.is_none());
        assert!(config.max_friends.is_none());
    }

    #[test]
    fn test_default_settings() {
        let settings = TuiConfig::default().form_settings();
        assert_eq!(settings.progress_max, 100);
        assert_eq!(settings.max_children, 10);
        assert_eq!(settings.max_friends, 10);
    }

    #[test]
    fn test_settings_override_and_floor() {
        let config = TuiConfig {
            progress_max: Some(0),
            max_children: Some(3),
            max_friends: Some(0),
            ..Default::default()
        };
        let settings = config.form_settings();
        assert_eq!(settings.progress_max, 1);
        assert_eq!(settings.max_children, 3);
        assert_eq!(settings.max_friends, 1);
    }

    #[test]
    fn test_partial_serialization() {
        let config = TuiConfig {
            max_children: Some(4),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let parsed: TuiConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.max_children, Some(4));
        assert!(parsed.max_friends.is_none());
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: TuiConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, TuiConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Unknown fields are ignored
        let json = r#"{"max_friends": 5, "unknown_field": "value"}"#;
        let parsed: TuiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.max_friends, Some(5));
    }

    #[test]
    fn test_load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = TuiConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, TuiConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = TuiConfig {
            submissions_dir: Some(dir.path().join("out")),
            progress_max: Some(50),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(TuiConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(TuiConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_submissions_dir_override() {
        let config = TuiConfig {
            submissions_dir: Some(PathBuf::from("/tmp/rego")),
            ..Default::default()
        };
        assert_eq!(config.submissions_dir(), PathBuf::from("/tmp/rego"));
    }
}
