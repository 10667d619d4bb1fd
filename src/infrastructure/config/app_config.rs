//! Application configuration.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use super::storage::ConfigError;
use crate::infrastructure::cloudinary::{ApiSecret, CloudinaryCredentials};

pub(crate) const APP_NAME: &str = "pqa-media";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "pqa";

const ENV_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
const ENV_UPLOAD_PRESET: &str = "CLOUDINARY_UPLOAD_PRESET";
const ENV_API_KEY: &str = "CLOUDINARY_API_KEY";
const ENV_API_SECRET: &str = "CLOUDINARY_API_SECRET";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration loaded from `config.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path; logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory holding saved documents.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Media store settings.
    #[serde(default)]
    pub cloudinary: CloudinaryConfig,
}

/// Cloudinary settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudinaryConfig {
    /// Cloud name.
    #[serde(default)]
    pub cloud_name: Option<String>,

    /// Unsigned upload preset.
    #[serde(default)]
    pub upload_preset: Option<String>,

    /// Admin API key, needed for deletions.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Admin API secret, needed for deletions.
    #[serde(default)]
    pub api_secret: Option<ApiSecret>,

    /// API host override.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Folder new uploads are stored in.
    #[serde(default)]
    pub folder: Option<String>,
}

impl CloudinaryConfig {
    /// Builds client credentials.
    ///
    /// # Errors
    /// Returns error if no cloud name is configured.
    pub fn credentials(&self) -> Result<CloudinaryCredentials, ConfigError> {
        let cloud_name = self
            .cloud_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .ok_or(ConfigError::MissingSetting("cloudinary.cloud_name"))?;

        let mut credentials = CloudinaryCredentials::new(cloud_name, self.upload_preset.clone());
        if let (Some(key), Some(secret)) = (&self.api_key, &self.api_secret) {
            credentials = credentials.with_admin(key.clone(), secret.clone());
        }
        Ok(credentials)
    }
}

impl AppConfig {
    /// Overrides Cloudinary settings from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overrides Cloudinary settings from a variable lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(cloud_name) = var(ENV_CLOUD_NAME) {
            self.cloudinary.cloud_name = Some(cloud_name);
        }
        if let Some(preset) = var(ENV_UPLOAD_PRESET) {
            self.cloudinary.upload_preset = Some(preset);
        }
        if let Some(api_key) = var(ENV_API_KEY) {
            self.cloudinary.api_key = Some(api_key);
        }
        if let Some(api_secret) = var(ENV_API_SECRET) {
            self.cloudinary.api_secret = Some(ApiSecret::new(api_secret));
        }
    }

    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(data_dir) = &args.data_dir {
            self.data_dir = Some(data_dir.clone());
        }
    }

    /// Returns default document directory.
    #[must_use]
    pub fn default_data_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().to_path_buf())
    }

    /// Returns effective document directory.
    #[must_use]
    pub fn effective_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(Self::default_data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
            log_level = "debug"
            data_dir = "/srv/papers"

            [cloudinary]
            cloud_name = "demo"
            upload_preset = "qa_unsigned"
            api_key = "1234"
            api_secret = "s3cr3t-value"
            folder = "qa-images"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/papers")));
        assert_eq!(config.cloudinary.folder.as_deref(), Some("qa-images"));

        let credentials = config.cloudinary.credentials().unwrap();
        assert_eq!(credentials.cloud_name, "demo");
        assert!(credentials.admin().is_some());
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.log_path.is_none());
        assert!(matches!(
            config.cloudinary.credentials(),
            Err(ConfigError::MissingSetting("cloudinary.cloud_name"))
        ));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: AppConfig = toml::from_str(
            r#"
            [cloudinary]
            cloud_name = "from-file"
            upload_preset = "file-preset"
            "#,
        )
        .unwrap();

        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_CLOUD_NAME, "from-env"),
            (ENV_UPLOAD_PRESET, ""),
            (ENV_API_SECRET, "env-secret"),
        ]);
        config.apply_env_from(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.cloudinary.cloud_name.as_deref(), Some("from-env"));
        assert_eq!(
            config.cloudinary.upload_preset.as_deref(),
            Some("file-preset")
        );
        assert_eq!(
            config.cloudinary.api_secret.as_ref().map(ApiSecret::expose),
            Some("env-secret")
        );
        assert!(config.cloudinary.api_key.is_none());
    }
}
