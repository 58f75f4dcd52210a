//! Async client for the MiniURL shortening API.

use crate::api::{
    MinifyRequest, MinifyResponse, NotFoundBody, RateLimitBody, ResolveResponse,
    ValidationErrorBody,
};
use crate::config::ClientConfig;
use crate::error::MinifyError;
use crate::normalize::normalize;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Instant;

const DEFAULT_VALIDATION_MESSAGE: &str = "Invalid URL format";
const DEFAULT_RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
const DEFAULT_NOT_FOUND_MESSAGE: &str = "Requested url not found";

/// API call a response belongs to. Only [Operation::Resolve] treats 404 as a missing alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Minify,
    Resolve,
}

/// A shortened link and how long the API took to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Minified {
    /// The URL that was submitted, after normalization
    pub url: String,
    /// Short URL returned by the API
    pub minified_url: String,
    /// Round trip in milliseconds, from dispatch to decoded body
    pub elapsed_ms: u128,
}

/// MiniURL API client. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct MiniUrlClient {
    config: ClientConfig,
    http: ClientWithMiddleware,
}

impl fmt::Debug for MiniUrlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniUrlClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MiniUrlClient {
    /// Build a client (JSON accept header, configured timeout).
    pub fn new(config: ClientConfig) -> Result<Self, MinifyError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("miniurl-client/", env!("CARGO_PKG_VERSION"))),
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| MinifyError::Network(e.to_string()))?;
        Ok(Self {
            config,
            http: ClientBuilder::new(client).build(),
        })
    }

    /// Client configured from `MINIURL_*` environment variables.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ClientConfig::from_env()?;
        Ok(Self::new(config)?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Normalize `input` and shorten it.
    pub async fn minify(&self, input: &str) -> Result<Minified, MinifyError> {
        self.minify_with(input, None, None).await
    }

    /// Normalize `input` and shorten it with an optional alias and description.
    /// Nothing is sent if normalization or field validation fails.
    pub async fn minify_with(
        &self,
        input: &str,
        preferred_alias: Option<String>,
        description: Option<String>,
    ) -> Result<Minified, MinifyError> {
        let url = normalize(input).ok_or_else(|| MinifyError::InvalidUrl(input.to_string()))?;
        let request = MinifyRequest {
            url,
            preferred_alias,
            description,
        };
        self.submit(&request).await
    }

    /// Send an already-built request. The URL is sent as given.
    pub async fn submit(&self, request: &MinifyRequest) -> Result<Minified, MinifyError> {
        request.validate()?;

        let endpoint = self.config.endpoint("minify");
        log::debug!("POST {} url={}", endpoint, request.url);

        let started = Instant::now();
        let resp = self
            .http
            .post(&endpoint)
            .json(request)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        let body: MinifyResponse = Self::read_success(Operation::Minify, resp).await?;
        let elapsed_ms = started.elapsed().as_millis();

        match body.minified_url {
            Some(minified_url) if !minified_url.is_empty() => {
                log::info!("minified {} -> {} in {} ms", request.url, minified_url, elapsed_ms);
                Ok(Minified {
                    url: request.url.clone(),
                    minified_url,
                    elapsed_ms,
                })
            }
            _ => Err(MinifyError::InvalidResponse(
                "response has no minified_url".to_string(),
            )),
        }
    }

    /// Look up the original URL behind an alias, without following the redirect.
    pub async fn resolve(&self, alias: &str) -> Result<String, MinifyError> {
        let alias = alias.trim().trim_matches('/');
        if alias.is_empty() {
            return Err(MinifyError::InvalidRequest("alias is empty".to_string()));
        }

        let endpoint = self.alias_url(alias)?;
        log::debug!("GET {}", endpoint);

        let resp = self
            .http
            .get(endpoint)
            .send()
            .await
            .map_err(Self::map_transport_error)?;
        let body: ResolveResponse = Self::read_success(Operation::Resolve, resp).await?;
        body.url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| MinifyError::InvalidResponse("response has no url".to_string()))
    }

    /// Resolve URL for `alias`, which becomes a single percent-encoded path segment.
    fn alias_url(&self, alias: &str) -> Result<reqwest::Url, MinifyError> {
        let mut url = reqwest::Url::parse(&self.config.endpoint(""))
            .map_err(|e| MinifyError::InvalidRequest(format!("bad resolve url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| MinifyError::InvalidRequest("base url cannot take a path".to_string()))?
            .pop_if_empty()
            .push(alias);
        Ok(url)
    }

    /// Decode a 2xx body as `T`, or turn the status into a [MinifyError].
    async fn read_success<T: DeserializeOwned>(
        operation: Operation,
        resp: reqwest::Response,
    ) -> Result<T, MinifyError> {
        let status = resp.status();
        let text = resp.text().await.map_err(Self::map_reqwest_error)?;
        if !status.is_success() {
            let err = Self::map_status(operation, status, &text);
            log::warn!("API answered {}: {}", status, err);
            return Err(err);
        }
        serde_json::from_str(&text).map_err(|e| MinifyError::InvalidResponse(e.to_string()))
    }

    /// Map a non-success status and its body to a [MinifyError].
    /// Unparseable bodies fall back to the fixed message for that status.
    pub fn map_status(operation: Operation, status: StatusCode, body: &str) -> MinifyError {
        let code = status.as_u16();
        match code {
            422 => {
                let msg = serde_json::from_str::<ValidationErrorBody>(body)
                    .ok()
                    .and_then(|b| b.first_message())
                    .unwrap_or_else(|| DEFAULT_VALIDATION_MESSAGE.to_string());
                MinifyError::Validation(msg)
            }
            429 => {
                let msg = serde_json::from_str::<RateLimitBody>(body)
                    .ok()
                    .and_then(|b| b.error)
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| DEFAULT_RATE_LIMIT_MESSAGE.to_string());
                MinifyError::RateLimited(msg)
            }
            404 if operation == Operation::Resolve => {
                let msg = serde_json::from_str::<NotFoundBody>(body)
                    .ok()
                    .and_then(|b| b.detail)
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| DEFAULT_NOT_FOUND_MESSAGE.to_string());
                MinifyError::NotFound(msg)
            }
            500.. => MinifyError::ServerError(code),
            _ => MinifyError::Unexpected(code, body.to_string()),
        }
    }

    /// Map a middleware-stack error into our MinifyError, based on timeout / connect.
    fn map_transport_error(err: reqwest_middleware::Error) -> MinifyError {
        match err {
            reqwest_middleware::Error::Reqwest(e) => Self::map_reqwest_error(e),
            reqwest_middleware::Error::Middleware(e) => MinifyError::Network(e.to_string()),
        }
    }

    fn map_reqwest_error(err: reqwest::Error) -> MinifyError {
        if err.is_timeout() {
            MinifyError::Timeout(err.to_string())
        } else if err.is_decode() {
            MinifyError::InvalidResponse(err.to_string())
        } else {
            MinifyError::Network(err.to_string())
        }
    }
}
