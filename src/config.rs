//! Client settings: where the MiniURL API lives and how long to wait for it.
//!
//! Values come from [`ClientConfig::builder`] or the `MINIURL_*` environment
//! variables and are validated once, so the client can join paths without
//! re-checking them.

use crate::normalize::{has_http_scheme, has_valid_protocol};
use std::fmt;
use std::time::Duration;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Path prefix of the versioned API.
pub const DEFAULT_API_PREFIX: &str = "/api/v1.0";
/// Request timeout used when nothing else is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

pub const BASE_URL_ENV: &str = "MINIURL_BASE_URL";
pub const TIMEOUT_MS_ENV: &str = "MINIURL_TIMEOUT_MS";

/// Configuration errors, returned by [ClientConfigBuilder::build] and [ClientConfig::from_env].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidBaseUrl(String),
    InvalidApiPrefix(String),
    InvalidTimeout(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidBaseUrl(msg) => write!(f, "invalid base url: {}", msg),
            ValidationError::InvalidApiPrefix(msg) => write!(f, "invalid api prefix: {}", msg),
            ValidationError::InvalidTimeout(msg) => write!(f, "invalid timeout: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Where the MiniURL API lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server root, without trailing slash (e.g. `https://miniurl.example`)
    pub base_url: String,

    /// Versioned API prefix (e.g. `/api/v1.0`)
    pub api_prefix: String,

    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Read `MINIURL_BASE_URL` and `MINIURL_TIMEOUT_MS`; unset or empty variables use defaults.
    pub fn from_env() -> Result<Self, ValidationError> {
        let mut builder = Self::builder();
        if let Some(url) = std::env::var(BASE_URL_ENV).ok().filter(|v| !v.trim().is_empty()) {
            builder = builder.base_url(url);
        }
        if let Some(raw) = std::env::var(TIMEOUT_MS_ENV).ok().filter(|v| !v.trim().is_empty()) {
            builder = builder.timeout(parse_timeout_ms(&raw)?);
        }
        builder.build()
    }

    /// Absolute URL of an API route, e.g. `endpoint("minify")`.
    pub fn endpoint(&self, route: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            self.api_prefix,
            route.trim_start_matches('/')
        )
    }
}

/// Parse a millisecond count such as `"2500"`. Zero is rejected.
pub fn parse_timeout_ms(raw: &str) -> Result<Duration, ValidationError> {
    let ms: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidTimeout(format!("not a number of milliseconds: {:?}", raw)))?;
    if ms == 0 {
        return Err(ValidationError::InvalidTimeout("must be greater than zero".to_string()));
    }
    Ok(Duration::from_millis(ms))
}

/// Builder for [ClientConfig]. Omitted fields use the defaults.
#[derive(Debug, Default, Clone)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    api_prefix: Option<String>,
    timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn api_prefix(mut self, api_prefix: impl Into<String>) -> Self {
        self.api_prefix = Some(api_prefix.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate and build. The base URL must be an absolute http(s) URL that parses,
    /// without whitespace, query or fragment; trailing slashes are dropped. The prefix
    /// gets a leading slash and loses trailing ones.
    pub fn build(self) -> Result<ClientConfig, ValidationError> {
        let base_url = match self.base_url {
            Some(url) => {
                let url = url.trim().trim_end_matches('/').to_string();
                if !has_http_scheme(&url)
                    || !has_valid_protocol(&url)
                    || url.chars().any(char::is_whitespace)
                {
                    return Err(ValidationError::InvalidBaseUrl(url));
                }
                // Endpoints are appended as paths, so a query or fragment would swallow them.
                match reqwest::Url::parse(&url) {
                    Ok(parsed)
                        if parsed.host_str().is_some()
                            && parsed.query().is_none()
                            && parsed.fragment().is_none() => {}
                    _ => return Err(ValidationError::InvalidBaseUrl(url)),
                }
                url
            }
            None => DEFAULT_BASE_URL.to_string(),
        };

        let api_prefix = match self.api_prefix {
            Some(prefix) => {
                let trimmed = prefix.trim().trim_matches('/');
                if trimmed.chars().any(char::is_whitespace) {
                    return Err(ValidationError::InvalidApiPrefix(prefix));
                }
                if trimmed.is_empty() {
                    String::new()
                } else {
                    format!("/{}", trimmed)
                }
            }
            None => DEFAULT_API_PREFIX.to_string(),
        };

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(ValidationError::InvalidTimeout("must be greater than zero".to_string()));
        }

        Ok(ClientConfig {
            base_url,
            api_prefix,
            timeout,
        })
    }
}
