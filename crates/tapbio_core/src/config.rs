//! Runtime configuration.
//!
//! Values resolve in order: explicit overrides (CLI flags), then the
//! `TAPBIO_*` environment, then defaults. Relative directories are anchored
//! at the working directory so the log backend always gets an absolute path.

use crate::logging::LogLevel;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "TAPBIO_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "TAPBIO_LOG_LEVEL";
pub const ENV_PUBLIC_BASE_URL: &str = "TAPBIO_PUBLIC_BASE_URL";

pub const DEFAULT_DATA_DIRNAME: &str = ".tapbio";
pub const DB_FILE_NAME: &str = "tapbio.sqlite3";
pub const LOG_DIRNAME: &str = "logs";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "https://tap.bio";

#[derive(Debug)]
pub enum ConfigError {
    InvalidLogLevel(String),
    InvalidBaseUrl(String),
    WorkingDir(std::io::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(level) => write!(
                f,
                "invalid configuration: unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidBaseUrl(value) => write!(
                f,
                "invalid configuration: public base URL `{value}` must start with http:// or https://"
            ),
            Self::WorkingDir(err) => write!(f, "cannot resolve working directory: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidLogLevel(_) | Self::InvalidBaseUrl(_) => None,
            Self::WorkingDir(err) => Some(err),
        }
    }
}

/// Explicit values from the command line; `None` defers to env/defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: LogLevel,
    pub public_base_url: String,
}

impl StudioConfig {
    /// Resolves against the process environment and working directory.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(ConfigError::WorkingDir)?;
        Self::resolve_with(overrides, &cwd, env_var)
    }

    /// Resolves with an injected environment lookup.
    pub fn resolve_with(
        overrides: ConfigOverrides,
        cwd: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let data_dir = overrides
            .data_dir
            .or_else(|| env(ENV_DATA_DIR).map(PathBuf::from))
            .or_else(|| env("HOME").map(|home| Path::new(&home).join(DEFAULT_DATA_DIRNAME)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIRNAME));
        let data_dir = anchor(cwd, data_dir);

        let log_dir = overrides
            .log_dir
            .map(|dir| anchor(cwd, dir))
            .unwrap_or_else(|| data_dir.join(LOG_DIRNAME));

        let log_level = match overrides.log_level.or_else(|| env(ENV_LOG_LEVEL)) {
            Some(raw) => {
                LogLevel::parse(&raw).map_err(|_| ConfigError::InvalidLogLevel(raw.clone()))?
            }
            None => LogLevel::build_default(),
        };

        let public_base_url = overrides
            .public_base_url
            .or_else(|| env(ENV_PUBLIC_BASE_URL))
            .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.to_string());
        let lower = public_base_url.to_ascii_lowercase();
        if !lower.starts_with("http://") && !lower.starts_with("https://") {
            return Err(ConfigError::InvalidBaseUrl(public_base_url));
        }

        Ok(Self {
            db_path: data_dir.join(DB_FILE_NAME),
            data_dir,
            log_dir,
            log_level,
            public_base_url,
        })
    }
}

fn anchor(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
