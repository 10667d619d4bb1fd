//! Cloudinary account credentials.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Admin API secret, wiped from memory on drop and masked when printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct ApiSecret(String);

impl ApiSecret {
    /// Wraps a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into().trim().to_string())
    }

    /// Returns the raw secret for request signing.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns masked secret for display.
    #[must_use]
    pub fn masked(&self) -> String {
        if self.0.len() <= 8 {
            return "*".repeat(self.0.len());
        }
        let prefix: String = self.0.chars().take(3).collect();
        format!("{prefix}...")
    }
}

impl fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiSecret").field(&self.masked()).finish()
    }
}

impl fmt::Display for ApiSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Everything needed to talk to one Cloudinary cloud.
#[derive(Debug, Clone)]
pub struct CloudinaryCredentials {
    /// Cloud name used in API paths.
    pub cloud_name: String,
    /// Unsigned upload preset; uploads are disabled without it.
    pub upload_preset: Option<String>,
    /// Admin API key; deletions are disabled without it.
    pub api_key: Option<String>,
    /// Admin API secret paired with `api_key`.
    pub api_secret: Option<ApiSecret>,
}

impl CloudinaryCredentials {
    /// Creates credentials for unsigned uploads only.
    #[must_use]
    pub fn new(cloud_name: impl Into<String>, upload_preset: Option<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            upload_preset,
            api_key: None,
            api_secret: None,
        }
    }

    /// Adds admin API credentials.
    #[must_use]
    pub fn with_admin(mut self, api_key: impl Into<String>, api_secret: ApiSecret) -> Self {
        self.api_key = Some(api_key.into());
        self.api_secret = Some(api_secret);
        self
    }

    /// Returns the admin key pair if both halves are present.
    #[must_use]
    pub fn admin(&self) -> Option<(&str, &ApiSecret)> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() => Some((key.as_str(), secret)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_masked() {
        let secret = ApiSecret::new("abcdefghijklmnop");
        assert_eq!(secret.to_string(), "abc...");
        assert!(!format!("{secret:?}").contains("defghijk"));
        assert_eq!(secret.expose(), "abcdefghijklmnop");
    }

    #[test]
    fn test_admin_requires_both_halves() {
        let upload_only = CloudinaryCredentials::new("demo", Some("preset".into()));
        assert!(upload_only.admin().is_none());

        let admin = upload_only.with_admin("1234", ApiSecret::new("secret-value"));
        assert_eq!(admin.admin().map(|(key, _)| key), Some("1234"));
    }
}
