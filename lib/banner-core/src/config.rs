use crate::paths;
use crate::profile::{AnimationCurve, AnimationOptions, SlideDirection};
use log::{trace, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine default config directory")]
    NoConfigDir,
    #[error("Failed to read config file '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to write config file '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The path the config file was loaded from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// How long a banner stays up before dismissing itself, in seconds
    pub default_duration_secs: f64,
    /// Length of the slide in and out, in seconds
    pub animation_duration_secs: f64,
    /// Which edge banners slide in from (top or bottom)
    pub direction: SlideDirection,
    /// Easing curve of the slide
    pub curve: AnimationCurve,
    /// Whether banners accept input while they are sliding
    pub allow_interaction_while_animating: bool,
    /// Frames per second while a banner is animating
    pub animation_fps: u32,
}

static CURRENT_CONFIG: Lazy<Arc<RwLock<Config>>> =
    Lazy::new(|| Arc::new(RwLock::new(Config::default())));

impl Config {
    pub fn load(config_path: Option<&Path>, save: bool) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => paths::default_config_path().ok_or(ConfigError::NoConfigDir)?,
        };

        if !path.exists() {
            Config::default().save_to_file(&path)?;
            trace!("Created default config file at: {}", path.display());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let mut config: Config =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        config.validate()?;
        config.config_path = Some(path.clone());

        // Write back so newly added fields show up in the file
        if save {
            if let Err(e) = config.save_to_file(&path) {
                warn!("Failed to update config file with missing fields: {e}");
            }
        }

        Ok(config)
    }

    /// Rejects values the banner controller would fault on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.animation_duration_secs.is_finite() || self.animation_duration_secs < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "animation_duration_secs must be a finite, non-negative number (got {})",
                self.animation_duration_secs
            )));
        }
        if !self.default_duration_secs.is_finite()
            || self.default_duration_secs <= self.animation_duration_secs
        {
            return Err(ConfigError::Invalid(format!(
                "default_duration_secs ({}) must be longer than animation_duration_secs ({})",
                self.default_duration_secs, self.animation_duration_secs
            )));
        }
        if self.animation_fps == 0 {
            return Err(ConfigError::Invalid("animation_fps must be at least 1".into()));
        }
        Ok(())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let header = "# Banner Configuration File\n# Timing and motion of transient banners.\n\n";
        let serialized_config = serde_yaml::to_string(self)?;
        let config_content = format!("{}{}", header, serialized_config);

        fs::write(path, config_content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Installs `config` as the current config. Invalid configs are rejected and the current one
    /// is kept.
    pub fn set_config(config: Config) -> Result<(), ConfigError> {
        if let Err(e) = config.validate() {
            warn!("Rejected config: {e}");
            return Err(e);
        }
        if let Ok(mut global_config) = CURRENT_CONFIG.write() {
            *global_config = config;
        }
        Ok(())
    }

    pub fn current() -> RwLockReadGuard<'static, Config> {
        CURRENT_CONFIG
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Edits the current config in place. The edit is discarded if it leaves the config invalid.
    pub fn update<F>(f: F) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut Config),
    {
        let Ok(mut config) = CURRENT_CONFIG.write() else {
            return Ok(());
        };
        let mut updated = config.clone();
        f(&mut updated);
        if let Err(e) = updated.validate() {
            warn!("Rejected config update: {e}");
            return Err(e);
        }
        *config = updated;
        Ok(())
    }

    pub fn reset() {
        if let Ok(mut config) = CURRENT_CONFIG.write() {
            *config = Config::default();
        }
    }

    pub fn default_duration() -> Duration {
        Duration::from_secs_f64(Self::current().default_duration_secs)
    }

    pub fn animation_duration() -> Duration {
        Duration::from_secs_f64(Self::current().animation_duration_secs)
    }

    pub fn direction() -> SlideDirection {
        Self::current().direction
    }

    pub fn animation_options() -> AnimationOptions {
        let config = Self::current();
        AnimationOptions {
            curve: config.curve,
            allow_user_interaction: config.allow_interaction_while_animating,
        }
    }

    pub fn animation_fps() -> u32 {
        Self::current().animation_fps.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: None,
            default_duration_secs: 60.0,
            animation_duration_secs: 0.28,
            direction: SlideDirection::Top,
            curve: AnimationCurve::EaseInOut,
            allow_interaction_while_animating: true,
            animation_fps: 60,
        }
    }
}
