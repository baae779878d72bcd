//! Configuration management module.
//!
//! This module handles loading, saving, and managing application configuration,
//! including splash and simulated latency timings, the catalog location and
//! the theme preference.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const DEFAULT_DIRECTORY_PATH: &str = ".config/citizen-portal";

/// Inclusive range of milliseconds a simulated request waits.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        DelayRange { min_ms, max_ms }
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

/// Fixed waits and simulated latencies.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Splash display time before the login screen.
    #[serde(default = "default_splash_ms")]
    pub splash_ms: u64,
    /// Shorter splash used when a stored session skips the login screen.
    #[serde(default = "default_restore_splash_ms")]
    pub restore_splash_ms: u64,
    #[serde(default = "default_payment_delay")]
    pub payment_delay: DelayRange,
    #[serde(default = "default_tracking_delay")]
    pub tracking_delay: DelayRange,
    #[serde(default = "default_download_delay")]
    pub download_delay: DelayRange,
}

fn default_splash_ms() -> u64 {
    3000
}

fn default_restore_splash_ms() -> u64 {
    2500
}

fn default_payment_delay() -> DelayRange {
    DelayRange::new(1500, 3000)
}

fn default_tracking_delay() -> DelayRange {
    DelayRange::new(800, 2000)
}

fn default_download_delay() -> DelayRange {
    DelayRange::new(1000, 1000)
}

fn default_payment_success_rate() -> f64 {
    0.9
}

fn default_theme_name() -> String {
    "dawn".to_string()
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            splash_ms: default_splash_ms(),
            restore_splash_ms: default_restore_splash_ms(),
            payment_delay: default_payment_delay(),
            tracking_delay: default_tracking_delay(),
            download_delay: default_download_delay(),
        }
    }
}

impl Timing {
    pub fn splash(&self) -> Duration {
        Duration::from_millis(self.splash_ms)
    }

    pub fn restore_splash(&self) -> Duration {
        Duration::from_millis(self.restore_splash_ms)
    }
}

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub timing: Timing,
    pub payment_success_rate: f64,
    pub catalog_path: Option<PathBuf>,
    pub theme_name: String,
    file_path: Option<PathBuf>,
}

/// On-disk layout of the configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileLayout {
    #[serde(default)]
    pub timing: Timing,
    #[serde(default = "default_payment_success_rate")]
    pub payment_success_rate: f64,
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    #[serde(default = "default_theme_name")]
    pub theme_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance holding the default values.
    ///
    pub fn new() -> Config {
        Config {
            timing: Timing::default(),
            payment_success_rate: default_payment_success_rate(),
            catalog_path: None,
            theme_name: default_theme_name(),
            file_path: None,
        }
    }

    /// Returns the directory holding the configuration file, once loaded.
    ///
    pub fn directory(&self) -> Option<&Path> {
        self.file_path.as_ref().and_then(|path| path.parent())
    }

    /// Try to load an existing configuration from the disk using the custom
    /// path if provided. If no file exists yet, write one holding the defaults
    /// so it can be edited.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }

        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileLayout = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.timing = data.timing;
            self.payment_success_rate = data.payment_success_rate;
            self.catalog_path = data.catalog;
            self.theme_name = data.theme_name;
            self.validate()?;
        } else {
            self.save()?;
        }

        Ok(())
    }

    /// Reject values the simulations cannot work with.
    ///
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.payment_success_rate) {
            return Err(ConfigError::InvalidValue {
                field: "payment_success_rate",
                message: format!("{} is not between 0 and 1", self.payment_success_rate),
            });
        }
        let ranges = [
            ("timing.payment_delay", self.timing.payment_delay),
            ("timing.tracking_delay", self.timing.tracking_delay),
            ("timing.download_delay", self.timing.download_delay),
        ];
        for (field, range) in ranges {
            if range.min_ms > range.max_ms {
                return Err(ConfigError::InvalidValue {
                    field,
                    message: format!("min_ms {} exceeds max_ms {}", range.min_ms, range.max_ms),
                });
            }
        }
        Ok(())
    }

    /// Save the current configuration to disk.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let data = FileLayout {
            timing: self.timing,
            payment_success_rate: self.payment_success_rate,
            catalog: self.catalog_path.clone(),
            theme_name: self.theme_name.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    /// Returns the path buffer for the default path to the configuration file
    /// or an error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}
