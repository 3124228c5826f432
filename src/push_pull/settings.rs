use crate::push_pull::{DEFAULT_ORTHO_SPEED, DEFAULT_SENSITIVITY};
use bevy::prelude::Resource;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierSetting {
    Ctrl,
    Shift,
    Alt,
}

impl ModifierSetting {
    pub fn is_held(self, modifiers: Modifiers) -> bool {
        match self {
            Self::Ctrl => modifiers.ctrl,
            Self::Shift => modifiers.shift,
            Self::Alt => modifiers.alt,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ctrl => "Ctrl",
            Self::Shift => "Shift",
            Self::Alt => "Alt",
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushPullSettings {
    /// `KeyCode` debug name of the hold-to-activate key.
    pub hotkey: String,
    /// Depth change per pixel of horizontal drag.
    pub sensitivity: f32,
    pub ortho_speed: f32,
    pub compensate_modifier: ModifierSetting,
    /// Entering the tool from one of these turns scale compensation on.
    pub scale_tools: Vec<String>,
    pub min_depth_factor: Option<f32>,
}

impl Default for PushPullSettings {
    fn default() -> Self {
        Self {
            hotkey: "KeyB".to_string(),
            sensitivity: DEFAULT_SENSITIVITY,
            ortho_speed: DEFAULT_ORTHO_SPEED,
            compensate_modifier: ModifierSetting::Ctrl,
            scale_tools: vec!["scale".to_string()],
            min_depth_factor: None,
        }
    }
}

impl PushPullSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.sensitivity.is_finite() || self.sensitivity <= 0.0 {
            return Err(SettingsError::Invalid(
                "sensitivity must be a positive number".to_string(),
            ));
        }
        if !self.ortho_speed.is_finite() || self.ortho_speed <= 0.0 {
            return Err(SettingsError::Invalid(
                "ortho_speed must be a positive number".to_string(),
            ));
        }
        if let Some(min) = self.min_depth_factor {
            if !min.is_finite() {
                return Err(SettingsError::Invalid(
                    "min_depth_factor must be finite".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn is_scale_tool(&self, tool: &str) -> bool {
        self.scale_tools.iter().any(|name| name == tool)
    }

    pub fn from_ron(text: &str, path: &Path) -> Result<Self, SettingsError> {
        let settings =
            ron::de::from_str::<Self>(text).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text, path)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = ron::ser::to_string_pretty(self, PrettyConfig::new())?;
        fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Loads settings, falling back to defaults when the file is unusable.
pub fn load_or_default(path: &Path) -> PushPullSettings {
    PushPullSettings::load(path).unwrap_or_else(|err| {
        warn!("Falling back to default push/pull settings: {err}");
        PushPullSettings::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let settings =
            PushPullSettings::from_ron("(sensitivity: 0.01, hotkey: \"KeyP\")", Path::new("t.ron"))
                .unwrap();
        assert_eq!(settings.hotkey, "KeyP");
        assert_eq!(settings.sensitivity, 0.01);
        assert_eq!(settings.ortho_speed, DEFAULT_ORTHO_SPEED);
        assert_eq!(settings.scale_tools, vec!["scale".to_string()]);
    }

    #[test]
    fn rejects_non_positive_sensitivity() {
        let err = PushPullSettings::from_ron("(sensitivity: 0.0)", Path::new("t.ron")).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = PushPullSettings::from_ron("(sensitivity: ", Path::new("cfg/x.ron")).unwrap_err();
        assert!(err.to_string().contains("cfg/x.ron"));
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = std::env::temp_dir().join(format!("pushpull-settings-{}", std::process::id()));
        let path = dir.join("pushpull.ron");
        let settings = PushPullSettings {
            compensate_modifier: ModifierSetting::Shift,
            min_depth_factor: Some(0.1),
            ..PushPullSettings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(PushPullSettings::load(&path).unwrap(), settings);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_file_means_defaults() {
        let path = Path::new("definitely/not/here/pushpull.ron");
        assert_eq!(load_or_default(path), PushPullSettings::default());
    }

    #[test]
    fn modifier_setting_reads_matching_key() {
        let held = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        assert!(ModifierSetting::Shift.is_held(held));
        assert!(!ModifierSetting::Ctrl.is_held(held));
    }
}
