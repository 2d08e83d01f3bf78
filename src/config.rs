//! Client configuration
//!
//! A [`ClientConfig`] is read from YAML and then overridden from the
//! environment:
//!
//! | Variable                      | Field             |
//! |-------------------------------|-------------------|
//! | `RESOURCE_PAGER_BASE_URL`     | `base_url`        |
//! | `RESOURCE_PAGER_SUBSCRIPTION` | `subscription_id` |
//! | `RESOURCE_PAGER_API_VERSION`  | `api_version`     |
//! | `RESOURCE_PAGER_TOKEN`        | `token`           |

use crate::auth::{Credential, StaticToken};
use crate::client::ResourceClient;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig, DEFAULT_BASE_URL};
use crate::lro::PollerConfig;
use crate::request::{ResourceIdentity, ResourceType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const ENV_BASE_URL: &str = "RESOURCE_PAGER_BASE_URL";
pub const ENV_SUBSCRIPTION: &str = "RESOURCE_PAGER_SUBSCRIPTION";
pub const ENV_API_VERSION: &str = "RESOURCE_PAGER_API_VERSION";
pub const ENV_TOKEN: &str = "RESOURCE_PAGER_TOKEN";

/// Everything needed to build a [`ResourceClient`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Management endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Default subscription for commands that take none
    #[serde(default)]
    pub subscription_id: Option<String>,

    /// `api-version` pinned on every initial request
    pub api_version: String,

    /// Provider namespace and collection
    pub resource_type: ResourceType,

    /// Pre-acquired bearer token
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Optional client-side throttle
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Long-running operation polling
    #[serde(default)]
    pub polling: PollerConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_accept_language() -> String {
    "en-US".to_string()
}

fn default_timeout() -> u64 {
    60
}

impl ClientConfig {
    pub fn new(resource_type: ResourceType, api_version: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            subscription_id: None,
            api_version: api_version.into(),
            resource_type,
            token: None,
            accept_language: default_accept_language(),
            timeout_seconds: default_timeout(),
            headers: HashMap::new(),
            rate_limit: None,
            polling: PollerConfig::default(),
        }
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup; empty values are ignored
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_BASE_URL) {
            debug!(base_url = %url, "Base URL from environment");
            self.base_url = url;
        }
        if let Some(sub) = get(ENV_SUBSCRIPTION) {
            self.subscription_id = Some(sub);
        }
        if let Some(version) = get(ENV_API_VERSION) {
            self.api_version = version;
        }
        if let Some(token) = get(ENV_TOKEN) {
            self.token = Some(token);
        }
    }

    /// Check the fields every client needs
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::config("base_url cannot be empty"));
        }
        self.http_config().parsed_base_url()?;
        if self.api_version.trim().is_empty() {
            return Err(Error::config("api_version cannot be empty"));
        }
        if self.resource_type.namespace.trim().is_empty()
            || self.resource_type.collection.trim().is_empty()
        {
            return Err(Error::config(
                "resource_type needs both a namespace and a type",
            ));
        }
        if self.polling.max_attempts == 0 {
            return Err(Error::config("polling.max_attempts must be at least 1"));
        }
        Ok(())
    }

    /// Transport settings
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_seconds))
            .accept_language(&self.accept_language);
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        if let Some(limit) = &self.rate_limit {
            builder = builder.rate_limit(limit.clone());
        }
        builder.build()
    }

    pub fn credential(&self) -> Result<Option<Arc<dyn Credential>>> {
        match &self.token {
            Some(token) => {
                let credential: Arc<dyn Credential> = Arc::new(StaticToken::new(token.as_str())?);
                Ok(Some(credential))
            }
            None => Ok(None),
        }
    }

    /// Identity for the configured default subscription
    pub fn subscription(&self) -> Result<ResourceIdentity> {
        match &self.subscription_id {
            Some(sub) => Ok(ResourceIdentity::subscription(sub.as_str())),
            None => Err(Error::required("subscription_id")),
        }
    }

    /// Validate and build the client
    pub fn build_client(&self) -> Result<ResourceClient> {
        self.validate()?;
        let mut http = HttpClient::with_config(self.http_config())?;
        if let Some(credential) = self.credential()? {
            http = http.with_credential(credential);
        }
        Ok(
            ResourceClient::new(Arc::new(http), self.resource_type.clone(), &self.api_version)
                .with_poller_config(self.polling.clone()),
        )
    }
}

/// Load a config file and apply environment overrides
pub fn load_config(path: impl AsRef<Path>) -> Result<ClientConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    let mut config = load_config_from_str(&content)?;
    config.apply_env();
    config.validate()?;
    Ok(config)
}

/// Parse a config from YAML without touching the environment
pub fn load_config_from_str(yaml: &str) -> Result<ClientConfig> {
    let config: ClientConfig = serde_yaml::from_str(yaml)?;
    Ok(config)
}
