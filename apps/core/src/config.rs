use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::candidate_source::{RetrievalLimits, DEFAULT_FUZZY_MAX_DEPTH};
use crate::gateway::DEFAULT_PACKAGE_EXTENSIONS;
use crate::keys::{Key, KeyEvent, KeyParseError, Modifiers};
use crate::ranker::DEFAULT_MAX_RESULTS;

const APP_DIR_NAME: &str = "fastfind";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_results: usize,
    pub fuzzy_max_depth: usize,
    pub fuzzy_trigger: String,
    pub package_extensions: Vec<String>,
    pub log_level: String,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            fuzzy_max_depth: DEFAULT_FUZZY_MAX_DEPTH,
            fuzzy_trigger: default_fuzzy_trigger().to_string(),
            package_extensions: DEFAULT_PACKAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            log_level: "info".to_string(),
            config_path: default_config_path(),
        }
    }
}

impl Config {
    pub fn retrieval_limits(&self) -> RetrievalLimits {
        RetrievalLimits {
            max_results: self.max_results,
            fuzzy_max_depth: self.fuzzy_max_depth,
        }
    }

    pub fn fuzzy_trigger_key(&self) -> Result<KeyEvent, KeyParseError> {
        KeyEvent::parse(&self.fuzzy_trigger)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write config '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Per-user data directory, falling back to the temp dir when the platform
/// has no config location.
pub fn stable_app_data_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    stable_app_data_dir().join(CONFIG_FILE_NAME)
}

pub fn default_fuzzy_trigger() -> KeyEvent {
    KeyEvent::new(
        Key::Char('f'),
        Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        },
    )
}

/// Reads the config at `path` (or the default location). A missing file
/// yields defaults; anything present must parse and validate.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    let mut cfg = match fs::read_to_string(&path) {
        Ok(raw) => toml::from_str::<Config>(&raw)?,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => Config::default(),
        Err(source) => return Err(ConfigError::Read { path, source }),
    };
    cfg.config_path = path;
    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg).map_err(ConfigError::Invalid)?;
    let raw = toml::to_string_pretty(cfg)?;
    let write_error = |source| ConfigError::Write {
        path: cfg.config_path.clone(),
        source,
    };
    if let Some(parent) = cfg.config_path.parent() {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(&cfg.config_path, raw).map_err(write_error)
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.max_results == 0 || cfg.max_results > 200 {
        return Err("max_results out of range".into());
    }

    if cfg.fuzzy_max_depth == 0 || cfg.fuzzy_max_depth > 32 {
        return Err("fuzzy_max_depth out of range".into());
    }

    match cfg.fuzzy_trigger_key() {
        Err(error) => return Err(format!("fuzzy_trigger '{}': {error}", cfg.fuzzy_trigger)),
        Ok(trigger) if trigger.is_plain_text() => {
            return Err(format!(
                "fuzzy_trigger '{}' needs Ctrl, Alt or Meta",
                cfg.fuzzy_trigger
            ))
        }
        Ok(_) => {}
    }

    if cfg.log_level.trim().is_empty() {
        return Err("log_level is required".into());
    }

    if cfg.config_path.as_os_str().is_empty() {
        return Err("config_path is required".into());
    }

    Ok(())
}
