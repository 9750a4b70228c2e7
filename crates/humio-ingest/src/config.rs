// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use core::time::Duration;
use std::env;
use std::fmt;

use crate::constants::{
    DEFAULT_BASE_URL, ENV_BASE_URL, ENV_ENVIRONMENT, ENV_HOST, ENV_PROXY_HTTPS, ENV_SOURCE,
    ENV_TIMEOUT_SECS, ENV_TOKEN,
};
use crate::error::ConstructionError;

/// Settings shared by [`crate::EventSender`] and [`crate::LogHandler`].
#[derive(Clone, PartialEq, Eq)]
pub struct HumioConfig {
    /// Logical name of the emitting service
    pub source: String,
    /// Ingest token, sent as a bearer credential
    pub token: String,
    /// Deployment tag (e.g., dev, prod)
    pub environment: Option<String>,
    /// Host tag; the source is used when unset
    pub host: Option<String>,
    /// Cluster base URL, without the ingest path
    pub base_url: String,
    /// Per-request deadline
    pub timeout: Option<Duration>,
    /// HTTPS proxy URL
    pub https_proxy: Option<String>,
}

impl Default for HumioConfig {
    fn default() -> Self {
        Self {
            source: String::new(),
            token: String::new(),
            environment: None,
            host: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            https_proxy: None,
        }
    }
}

impl HumioConfig {
    pub fn new(source: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            token: token.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_https_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.https_proxy = Some(proxy.into());
        self
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConstructionError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConstructionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        let timeout = match non_empty(ENV_TIMEOUT_SECS) {
            Some(val) => Some(Duration::from_secs(val.trim().parse::<u64>().map_err(
                |_| {
                    ConstructionError::InvalidConfig(format!(
                        "{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{val}'"
                    ))
                },
            )?)),
            None => None,
        };

        let config = Self {
            source: non_empty(ENV_SOURCE).unwrap_or_default(),
            token: non_empty(ENV_TOKEN).unwrap_or_default(),
            environment: non_empty(ENV_ENVIRONMENT),
            host: non_empty(ENV_HOST),
            base_url: non_empty(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout,
            https_proxy: non_empty(ENV_PROXY_HTTPS).or_else(|| non_empty("HTTPS_PROXY")),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConstructionError> {
        if self.source.trim().is_empty() {
            return Err(ConstructionError::MissingField("source"));
        }

        if self.token.trim().is_empty() {
            return Err(ConstructionError::MissingField("token"));
        }

        if self
            .environment
            .as_deref()
            .is_some_and(|env| env.trim().is_empty())
        {
            return Err(ConstructionError::MissingField("environment"));
        }

        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ConstructionError::InvalidConfig(format!(
                "Base URL '{}' must start with http:// or https://",
                self.base_url
            )));
        }

        if self.timeout == Some(Duration::ZERO) {
            return Err(ConstructionError::InvalidConfig(
                "Timeout must be greater than 0".to_string(),
            ));
        }

        if let Some(proxy) = &self.https_proxy {
            reqwest::Proxy::https(proxy).map_err(|e| {
                ConstructionError::InvalidConfig(format!("HTTPS proxy '{proxy}' is invalid: {e}"))
            })?;
        }

        Ok(())
    }

    /// Full ingest URL for the given endpoint path.
    pub fn ingest_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

impl fmt::Debug for HumioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HumioConfig")
            .field("source", &self.source)
            .field("token", &"<redacted>")
            .field("environment", &self.environment)
            .field("host", &self.host)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("https_proxy", &self.https_proxy)
            .finish()
    }
}
