//! Configuration for the medteam diagnostics service.
//!
//! Configuration is resolved once at startup and then shared read-only:
//!
//! 1. Built-in defaults
//! 2. Optional TOML file
//! 3. `.env` file in the working directory (seeds the process environment,
//!    see [`load_dotenv`])
//! 4. Process environment variables
//!
//! A missing model credential is not a startup error. Calls that need it
//! fail at call time instead.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum accepted upload size (16 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Default port, matching the original deployment
pub const DEFAULT_PORT: u16 = 5000;

/// Environment variable pointing at an optional TOML config file
pub const CONFIG_FILE_ENV: &str = "MEDTEAM_CONFIG";

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while building the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("Failed to load .env: {0}")]
    Dotenv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Seed the process environment from the nearest `.env` file.
///
/// `Ok(None)` when there is no `.env`. Variables already set in the
/// environment win.
pub fn load_dotenv() -> Result<Option<PathBuf>> {
    dotenv_outcome(dotenvy::dotenv())
}

/// [`load_dotenv`] for an explicit file
pub fn load_dotenv_from(path: &Path) -> Result<Option<PathBuf>> {
    dotenv_outcome(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

fn dotenv_outcome(result: std::result::Result<PathBuf, dotenvy::Error>) -> Result<Option<PathBuf>> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::Dotenv(e.to_string())),
    }
}

/// Settings for the hosted language model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmSettings {
    /// OpenAI-compatible API base URL
    pub api_base: String,

    /// Bearer credential for the API
    pub api_key: Option<String>,

    /// Model identifier sent with every request
    pub model: String,

    /// Sampling temperature; `None` leaves the backend default
    pub temperature: Option<f32>,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: None,
            request_timeout_secs: 120,
        }
    }
}

/// Process-wide configuration, immutable after startup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Where uploaded case reports are stored
    pub upload_dir: PathBuf,

    /// Where rendered reports are written before download
    pub report_dir: PathBuf,

    /// Listen address
    pub host: String,
    pub port: u16,

    /// Upper bound on request bodies, uploads included
    pub max_upload_bytes: usize,

    /// Upper bound on extracted text, in characters
    pub max_extracted_chars: usize,

    pub llm: LlmSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            report_dir: std::env::temp_dir(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_extracted_chars: 1_000_000,
            llm: LlmSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load the full configuration chain.
    ///
    /// `file` takes precedence over `MEDTEAM_CONFIG`. Environment variables
    /// override file values; call [`load_dotenv`] first for `.env` to count.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let env_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);
        let mut config = match file.map(Path::to_path_buf).or(env_file) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML file; fields it omits keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Reading config file");
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay values from an environment lookup.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get("UPLOAD_FOLDER") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(dir) = get("REPORT_FOLDER") {
            self.report_dir = PathBuf::from(dir);
        }
        if let Some(host) = get("HOST") {
            self.host = host;
        }
        if let Some(port) = get("PORT") {
            self.port = parse_value("PORT", &port)?;
        }
        if let Some(base) = get("OPENAI_API_BASE") {
            self.llm.api_base = base.trim_end_matches('/').to_string();
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = get("MEDTEAM_MODEL") {
            self.llm.model = model;
        }
        if let Some(temp) = get("MEDTEAM_TEMPERATURE") {
            self.llm.temperature = Some(parse_value("MEDTEAM_TEMPERATURE", &temp)?);
        }
        if let Some(secs) = get("MEDTEAM_REQUEST_TIMEOUT_SECS") {
            self.llm.request_timeout_secs = parse_value("MEDTEAM_REQUEST_TIMEOUT_SECS", &secs)?;
        }

        Ok(())
    }

    /// Ensure upload and report directories exist
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.upload_dir, &self.report_dir] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
