use super::app_config::{APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, AppConfig};
use directories::ProjectDirs;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("missing configuration setting: {0}")]
    MissingSetting(&'static str),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub struct StorageManager {
    config_dir: PathBuf,
}

impl StorageManager {
    /// Create a new `StorageManager`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration directory cannot be determined.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or(ConfigError::ConfigDirNotFound)?;

        Ok(Self { config_dir })
    }

    /// Creates a new `StorageManager` with a specific directory (useful for testing).
    #[must_use]
    pub fn with_dir(path: PathBuf) -> Self {
        Self { config_dir: path }
    }

    /// Returns the configuration directory path.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Loads the application configuration, writing defaults on first use.
    ///
    /// Nothing is logged here since this runs before logging is set up; the
    /// returned [`ConfigOrigin`] is logged by the caller afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or created.
    pub fn load_config(
        &self,
        path_override: Option<&Path>,
    ) -> Result<(AppConfig, ConfigOrigin), ConfigError> {
        let config_path = path_override.map_or_else(
            || self.config_dir.join(CONFIG_FILE_NAME),
            Path::to_path_buf,
        );

        if !config_path.exists() {
            let default_config = AppConfig::default();
            let content = toml::to_string_pretty(&default_config)?;
            persist_atomically(&config_path, content.as_bytes())?;
            return Ok((default_config, ConfigOrigin::Created(config_path)));
        }

        let content = fs::read_to_string(&config_path)?;
        match toml::from_str::<AppConfig>(&content) {
            Ok(config) => Ok((config, ConfigOrigin::Loaded(config_path))),
            Err(e) => Ok((
                AppConfig::default(),
                ConfigOrigin::Invalid {
                    path: config_path,
                    reason: e.to_string(),
                },
            )),
        }
    }
}

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Read from an existing file.
    Loaded(PathBuf),
    /// No file existed; defaults were written to this path.
    Created(PathBuf),
    /// The file could not be parsed; defaults are used and the file is left
    /// untouched.
    Invalid {
        /// Config file path.
        path: PathBuf,
        /// Parse error.
        reason: String,
    },
}

impl ConfigOrigin {
    /// Emits the log line describing this origin.
    pub fn log(&self) {
        match self {
            Self::Loaded(path) => debug!(path = %path.display(), "Loaded config file"),
            Self::Created(path) => {
                info!(path = %path.display(), "Config file not found, created default");
            }
            Self::Invalid { path, reason } => {
                warn!(path = %path.display(), "Failed to parse config file: {reason}. Using defaults.");
            }
        }
    }
}

/// Writes `content` to `path` through a temp file in the same directory, so
/// readers see either the old or the new file.
///
/// # Errors
///
/// Returns the I/O error of any step.
pub(crate) fn persist_atomically(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| std::io::Error::other("Invalid path"))?;
    fs::create_dir_all(parent)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content)?;
    temp_file.persist(path).map_err(|e| e.error)?;

    Ok(())
}
