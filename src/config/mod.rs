use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub model: String,
    pub endpoint: String,
    pub timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
        }
    }
}

impl Settings {
    pub fn default_path() -> PathBuf {
        let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config/ai-interpreter/config.toml")
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let settings = Self::parse(&contents).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let doc = contents
            .parse::<toml_edit::DocumentMut>()
            .map_err(|source| ConfigError::Parse {
                path: String::new(),
                source,
            })?;

        let mut settings = Self::default();

        if let Some(item) = doc.get("model") {
            settings.model = item
                .as_str()
                .ok_or_else(|| invalid("model", "a string"))?
                .to_string();
        }

        if let Some(item) = doc.get("endpoint") {
            settings.endpoint = item
                .as_str()
                .ok_or_else(|| invalid("endpoint", "a string"))?
                .trim_end_matches('/')
                .to_string();
        }

        if let Some(item) = doc.get("timeout_secs") {
            let secs = item
                .as_integer()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| invalid("timeout_secs", "a positive integer"))?;
            settings.timeout = Some(Duration::from_secs(secs as u64));
        }

        Ok(settings)
    }

    pub fn to_document(&self) -> toml_edit::DocumentMut {
        let mut doc = toml_edit::DocumentMut::new();
        doc["model"] = toml_edit::value(self.model.as_str());
        doc["endpoint"] = toml_edit::value(self.endpoint.as_str());
        if let Some(timeout) = self.timeout {
            doc["timeout_secs"] = toml_edit::value(timeout.as_secs() as i64);
        }
        doc
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents = format!("# ai-interpreter settings\n{}", self.to_document());
        fs::write(path, contents).map_err(io_err)?;
        info!("Saved settings to {}", path.display());
        Ok(())
    }
}

fn invalid(key: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        expected,
    }
}

/// API key for the generative-language service
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Empty or whitespace-only keys count as absent.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    /// Read the key from the process environment, after merging a local `.env` file.
    pub fn from_env() -> Option<Self> {
        if let Ok(path) = dotenv::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }
        env::var(API_KEY_VAR).ok().and_then(Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
