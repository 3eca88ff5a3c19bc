use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::PathBuf};

use crate::config::Config;

/// Preference key the theme is stored under.
pub const THEME_KEY: &str = "weather-app-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Anything but `"dark"` reads as light.
    pub fn parse(value: &str) -> Self {
        if value == "dark" { Theme::Dark } else { Theme::Light }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat string key/value preferences kept in a TOML file.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `preferences.toml` in the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = Config::project_dirs()?;
        Ok(Self::at(dirs.data_dir().join("preferences.toml")))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences: {}", self.path.display()))
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value.to_string());

        let parent = self
            .path
            .parent()
            .ok_or_else(|| anyhow!("Preferences path has no parent: {}", self.path.display()))?;
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create preferences directory: {}", parent.display())
        })?;

        let toml = toml::to_string(&all).context("Failed to serialize preferences")?;
        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preferences: {}", self.path.display()))
    }
}

/// The active theme, written through to the store on every change.
#[derive(Debug, Clone)]
pub struct ThemeSetting {
    store: PreferenceStore,
    current: Theme,
}

impl ThemeSetting {
    /// Reads the stored theme; light when nothing was stored yet.
    pub fn load(store: PreferenceStore) -> Result<Self> {
        let current = store
            .get(THEME_KEY)?
            .map(|v| Theme::parse(&v))
            .unwrap_or_default();
        Ok(Self { store, current })
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn toggle(&mut self) -> Result<Theme> {
        let next = self.current.toggled();
        self.store.set(THEME_KEY, next.as_str())?;
        self.current = next;
        Ok(next)
    }
}
