//! Request and response bodies of the MiniURL HTTP API (`/api/v1.0`).

use crate::error::MinifyError;
use serde::{Deserialize, Serialize};

/// Allowed length of a preferred alias, in characters.
pub const ALIAS_LEN: std::ops::RangeInclusive<usize> = 5..=20;
/// Maximum description length, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 255;

/// Body of `POST /minify`. Unset optional fields are left out of the JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinifyRequest {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl MinifyRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            preferred_alias: None,
            description: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.preferred_alias = Some(alias.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Check the optional fields against the limits the API enforces.
    pub fn validate(&self) -> Result<(), MinifyError> {
        if let Some(ref alias) = self.preferred_alias {
            let len = alias.chars().count();
            if !ALIAS_LEN.contains(&len) {
                return Err(MinifyError::InvalidRequest(format!(
                    "preferred alias must be {}-{} characters, got {}",
                    ALIAS_LEN.start(),
                    ALIAS_LEN.end(),
                    len
                )));
            }
        }
        if let Some(ref description) = self.description {
            let len = description.chars().count();
            if len > DESCRIPTION_MAX_LEN {
                return Err(MinifyError::InvalidRequest(format!(
                    "description must be at most {} characters, got {}",
                    DESCRIPTION_MAX_LEN, len
                )));
            }
        }
        Ok(())
    }
}

/// Success body of `POST /minify`. `minified_url` is optional so a malformed
/// success can be told apart from a transport failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MinifyResponse {
    #[serde(default)]
    pub minified_url: Option<String>,
}

/// Success body of `GET /{alias}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolveResponse {
    #[serde(default)]
    pub url: Option<String>,
}

/// One entry of a 422 `detail` array.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationDetail {
    #[serde(default)]
    pub msg: Option<String>,
}

/// 422 body. `detail` is normally a list, but plain strings are tolerated.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationErrorBody {
    pub detail: serde_json::Value,
}

impl ValidationErrorBody {
    /// First non-empty `detail[].msg`, if the body has one.
    pub fn first_message(&self) -> Option<String> {
        let first = self.detail.as_array()?.first()?;
        let detail: ValidationDetail = serde_json::from_value(first.clone()).ok()?;
        detail.msg.filter(|m| !m.is_empty())
    }
}

/// 429 body.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// 404 body (`{"detail": "Requested url not found"}`).
#[derive(Debug, Clone, Deserialize)]
pub struct NotFoundBody {
    #[serde(default)]
    pub detail: Option<String>,
}
