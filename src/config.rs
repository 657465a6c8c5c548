//! User settings persisted as TOML in the platform config directory.
//!
//! - macOS: ~/Library/Application Support/com.car-sales.Car-Sales-Dashboard/
//! - Windows: %APPDATA%/car-sales/Car Sales Dashboard/config/
//! - Linux: ~/.config/carsalesdashboard/

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "car-sales";
const APP_NAME: &str = "Car Sales Dashboard";
const CONFIG_FILENAME: &str = "settings.toml";

/// Overrides `data.path` when set.
pub const DATA_PATH_ENV: &str = "CAR_SALES_DATA";
const DEFAULT_DATA_FILE: &str = "car_sales.csv";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub charts: ChartSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Last dataset opened.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    /// Trailing window of the SUV/Sedan moving average.
    pub smoothing_window: usize,
    /// Plot height in points.
    pub height: f32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            smoothing_window: 3,
            height: 260.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub sidebar_open: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self { sidebar_open: true }
    }
}

impl Settings {
    /// Parse settings from TOML text, clamping values that make no sense.
    pub fn from_toml(text: &str) -> Result<Self> {
        let mut settings: Settings = toml::from_str(text).context("parsing settings TOML")?;
        settings.charts.smoothing_window = settings.charts.smoothing_window.max(1);
        Ok(settings)
    }

    /// Dataset to open at startup: env override, then the saved path, then
    /// `car_sales.csv` in the working directory.
    pub fn data_path(&self, env_override: Option<PathBuf>) -> PathBuf {
        env_override
            .or_else(|| self.data.path.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }
}

/// Get the path to the settings file, if the platform has a config directory.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings, falling back to defaults on any problem.
pub fn load_settings() -> Settings {
    let Some(path) = settings_path() else {
        log::warn!("Could not determine settings path, using defaults");
        return Settings::default();
    };
    load_settings_from(&path)
}

pub fn load_settings_from(path: &Path) -> Settings {
    match fs::read_to_string(path) {
        Ok(content) => match Settings::from_toml(&content) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e:#}, using defaults");
                Settings::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("No settings file at {}, using defaults", path.display());
            Settings::default()
        }
        Err(e) => {
            log::warn!("Failed to read settings file: {e}, using defaults");
            Settings::default()
        }
    }
}

/// Save settings, creating the config directory if needed.
pub fn save_settings(settings: &Settings) -> Result<()> {
    let path = settings_path().context("could not determine settings path")?;
    save_settings_to(settings, &path)
}

pub fn save_settings_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating config directory")?;
    }
    let content = toml::to_string_pretty(settings).context("serializing settings")?;
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml("[charts]\nheight = 300.0\n").unwrap();
        assert_eq!(settings.charts.height, 300.0);
        assert_eq!(settings.charts.smoothing_window, 3);
        assert!(settings.ui.sidebar_open);
        assert_eq!(settings.data.path, None);
    }

    #[test]
    fn zero_window_is_clamped() {
        let settings = Settings::from_toml("[charts]\nsmoothing_window = 0\n").unwrap();
        assert_eq!(settings.charts.smoothing_window, 1);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "charts = [not toml").unwrap();
        assert_eq!(load_settings_from(&path), Settings::default());
        assert_eq!(
            load_settings_from(&dir.path().join("absent.toml")),
            Settings::default()
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let mut settings = Settings::default();
        settings.data.path = Some(PathBuf::from("/data/car_sales.csv"));
        settings.ui.sidebar_open = false;
        save_settings_to(&settings, &path).unwrap();
        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn data_path_precedence() {
        let mut settings = Settings::default();
        assert_eq!(settings.data_path(None), PathBuf::from("car_sales.csv"));
        settings.data.path = Some(PathBuf::from("saved.csv"));
        assert_eq!(settings.data_path(None), PathBuf::from("saved.csv"));
        assert_eq!(
            settings.data_path(Some(PathBuf::from("env.json"))),
            PathBuf::from("env.json")
        );
    }
}
