//! Settings persistence
//!
//! A small string-keyed store of serde values, kept as one TOML table on disk.

use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::direction::Mode;

pub const KEY_MODE: &str = "mode";
pub const KEY_THEME: &str = "theme";
pub const KEY_ALARM_SOUND: &str = "alarm_sound";
pub const KEY_CLOCK_TIMEZONE: &str = "clock_timezone";

pub const DEFAULT_ALARM_SOUND: &str = "digital";

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Get the base configuration directory for the timer
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "time-timer", "time-timer").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the settings file path for a named store
pub fn config_path(name: &str) -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(format!("{}.toml", name)))
}

/// String-keyed get/set of serializable values
pub trait SettingsStore {
    fn get_value(&self, key: &str) -> Option<&toml::Value>;

    fn set_value(&mut self, key: &str, value: toml::Value) -> Result<(), ConfigError>;

    /// Read and decode a value. Values that fail to decode read as missing.
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T>
    where
        Self: Sized,
    {
        let value = self.get_value(key)?.clone();
        match value.try_into() {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("Ignoring malformed setting '{}': {}", key, e);
                None
            }
        }
    }

    fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), ConfigError>
    where
        Self: Sized,
    {
        let value = toml::Value::try_from(value)?;
        self.set_value(key, value)
    }
}

/// A TOML table, optionally mirrored to a file on every write
#[derive(Debug, Default)]
pub struct TableStore {
    table: toml::Table,
    path: Option<PathBuf>,
}

impl TableStore {
    /// A store that lives only in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store named `name` in the config directory
    ///
    /// A missing file gives an empty store. An unreadable one is an error.
    pub fn open(name: &str) -> Result<Self, ConfigError> {
        let path = config_path(name).ok_or(ConfigError::NoConfigDir)?;
        Self::open_at(path)
    }

    pub fn open_at(path: PathBuf) -> Result<Self, ConfigError> {
        let table = if path.exists() {
            fs::read_to_string(&path)?.parse::<toml::Table>()?
        } else {
            toml::Table::new()
        };
        Ok(Self {
            table,
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    fn save(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(&self.table)?)?;
        Ok(())
    }
}

impl SettingsStore for TableStore {
    fn get_value(&self, key: &str) -> Option<&toml::Value> {
        self.table.get(key)
    }

    fn set_value(&mut self, key: &str, value: toml::Value) -> Result<(), ConfigError> {
        self.table.insert(key.to_string(), value);
        self.save()
    }
}

/// Colour scheme of the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Everything restored at startup
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub mode: Mode,
    pub theme: Theme,
    pub alarm_sound: String,
    /// IANA zone for the wall clock. None means local time.
    pub clock_timezone: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            theme: Theme::default(),
            alarm_sound: DEFAULT_ALARM_SOUND.to_string(),
            clock_timezone: None,
        }
    }
}

impl Settings {
    /// Read settings, substituting defaults for anything missing or malformed
    pub fn load<S: SettingsStore>(store: &S) -> Self {
        let defaults = Self::default();
        Self {
            mode: store.get(KEY_MODE).unwrap_or(defaults.mode),
            theme: store.get(KEY_THEME).unwrap_or(defaults.theme),
            alarm_sound: store
                .get::<String>(KEY_ALARM_SOUND)
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.alarm_sound),
            clock_timezone: store
                .get::<String>(KEY_CLOCK_TIMEZONE)
                .filter(|s| !s.is_empty()),
        }
    }
}
