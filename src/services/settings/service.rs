use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::models::settings::PlannerSettings;

const SETTINGS_FILE: &str = "alarms.toml";

/// Loads and stores [`PlannerSettings`] as a TOML file.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file in the platform's configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "KenBoyle", "RustCalendar")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn at_default_location() -> Result<Self> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow!("Failed to determine configuration directory"))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current settings. A missing file yields the defaults.
    pub fn get(&self) -> Result<PlannerSettings> {
        if !self.path.exists() {
            log::debug!("No settings at {}, using defaults", self.path.display());
            return Ok(PlannerSettings::default());
        }

        let source = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings from {}", self.path.display()))?;
        let settings = PlannerSettings::from_toml_str(&source)
            .with_context(|| format!("Failed to parse settings in {}", self.path.display()))?;

        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        Ok(settings)
    }

    /// Update settings
    pub fn update(&self, settings: &PlannerSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory {}", parent.display())
            })?;
        }

        let source = toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        fs::write(&self.path, source)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))?;

        Ok(())
    }

    /// Reset settings to defaults
    pub fn reset(&self) -> Result<()> {
        self.update(&PlannerSettings::default())
    }
}
