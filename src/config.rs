//! Configuration for the catalog and login endpoints

use crate::error::{Result, TagsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_AUTH_URL: &str = "https://hub.docker.com/v2/users/login/";
pub const DEFAULT_REPOSITORY_BASE_URL: &str = "https://hub.docker.com/v2/repositories";
pub const DEFAULT_NAMESPACE: &str = "library";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_WORKERS: usize = 20;

/// Endpoints and transport settings for talking to the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub repository_base_url: String,
    pub auth_url: String,
    /// Namespace prepended to names without a `/`
    pub default_namespace: String,
    pub page_size: u32,
    /// Per-request timeout in seconds
    pub timeout: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            repository_base_url: DEFAULT_REPOSITORY_BASE_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository_base_url(mut self, url: impl Into<String>) -> Self {
        self.repository_base_url = url.into();
        self
    }

    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("Repository base URL", &self.repository_base_url),
            ("Auth URL", &self.auth_url),
        ] {
            if value.is_empty() {
                return Err(TagsError::Configuration(format!("{} cannot be empty", name)));
            }
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(TagsError::Configuration(format!(
                    "Invalid {}: {}. Must start with http:// or https://",
                    name.to_lowercase(),
                    value
                )));
            }
            url::Url::parse(value).map_err(|e| {
                TagsError::Configuration(format!("Invalid {}: {}: {}", name.to_lowercase(), value, e))
            })?;
        }

        if self.default_namespace.is_empty() || self.default_namespace.contains('/') {
            return Err(TagsError::Configuration(format!(
                "Invalid default namespace: {:?}",
                self.default_namespace
            )));
        }

        if self.page_size == 0 {
            return Err(TagsError::Configuration(
                "Page size must be greater than 0".to_string(),
            ));
        }

        if self.timeout == 0 {
            return Err(TagsError::Configuration(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Login credentials, exchanged once for a token
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
