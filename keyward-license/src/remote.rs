//! Client for the license authority's REST API.
//!
//! Three endpoints live under `{server_url}/wp-json/wp-licensing/v1/`:
//!
//! | Endpoint     | Method | Request fields                        |
//! |--------------|--------|---------------------------------------|
//! | `validate`   | POST   | `license_key, site_url, product_id`   |
//! | `deactivate` | POST   | `license_key, site_url`               |
//! | `update`     | GET    | `license_key, version, product_id`    |
//!
//! None of the calls panic or retry. Transport failures come back as
//! [`TransportError`] (or `None` for update checks) so the caller can keep
//! the last known license state.

use crate::error::{LicenseError, TransportError};
use crate::site::SiteIdentifier;
use crate::transport::{HttpResponse, HttpTransport, REQUEST_TIMEOUT};
use keyward_types::{DeactivationResult, ServerConfig, ValidationResult};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Message used when the authority accepts a key without saying anything.
pub const VALID_FALLBACK_MESSAGE: &str = "License is valid.";
/// Message used when the authority rejects a key without saying why.
pub const INVALID_FALLBACK_MESSAGE: &str = "License validation failed.";
/// Message used when a deactivation succeeds without a server message.
pub const DEACTIVATED_MESSAGE: &str = "License deactivated.";
/// Message used when a deactivation fails without a server message.
pub const DEACTIVATION_FAILED_MESSAGE: &str = "License deactivation failed.";

/// Payload of the `update` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateResponse {
    /// The server's verdict on whether `version` is outdated.
    #[serde(default)]
    pub update: bool,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub changelog: Option<String>,
}

/// Outbound calls to the license authority.
#[derive(Clone)]
pub struct RemoteAuthority {
    config: ServerConfig,
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl RemoteAuthority {
    /// Creates a client for the authority described by `config`.
    pub fn new(config: ServerConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            transport,
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the server configuration this client was built with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Asks the authority whether `key` is valid for `site`.
    ///
    /// `valid` is true only for an HTTP 200 whose payload has `valid: true`.
    /// Anything else, including a body that is not JSON, is a rejection.
    pub async fn validate(
        &self,
        key: &str,
        site: &SiteIdentifier,
    ) -> Result<ValidationResult, TransportError> {
        let url = self.config.endpoint("validate");
        let form = [
            ("license_key", key.trim().to_string()),
            ("site_url", site.as_str().to_string()),
            ("product_id", self.config.product_id.to_string()),
        ];
        let response = self.transport.post_form(&url, &form, self.timeout).await?;
        Ok(interpret_validation(&response))
    }

    /// Releases `key`'s activation for `site`.
    pub async fn deactivate(
        &self,
        key: &str,
        site: &SiteIdentifier,
    ) -> Result<DeactivationResult, TransportError> {
        let url = self.config.endpoint("deactivate");
        let form = [
            ("license_key", key.trim().to_string()),
            ("site_url", site.as_str().to_string()),
        ];
        let response = self.transport.post_form(&url, &form, self.timeout).await?;
        Ok(interpret_deactivation(&response))
    }

    /// Asks the authority whether a newer package than `version` exists.
    ///
    /// Returns `None` on transport failure or an unparsable body.
    pub async fn check_update(&self, key: &str, version: &str) -> Option<UpdateResponse> {
        let url = self.config.endpoint("update");
        let query = [
            ("license_key", key.trim().to_string()),
            ("version", version.to_string()),
            ("product_id", self.config.product_id.to_string()),
        ];
        let response = match self.transport.get(&url, &query, self.timeout).await {
            Ok(response) => response,
            Err(e) => {
                warn!("update check failed: {e}");
                return None;
            }
        };
        match parse_update(&response) {
            Ok(update) => Some(update),
            Err(e) => {
                warn!("ignoring update check response: {e}");
                None
            }
        }
    }
}

fn decode(response: &HttpResponse) -> Value {
    serde_json::from_str(&response.body).unwrap_or_else(|e| {
        warn!("license authority returned non-JSON body (HTTP {}): {e}", response.status);
        Value::Null
    })
}

fn message_field(payload: &Value) -> Option<String> {
    payload
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn interpret_validation(response: &HttpResponse) -> ValidationResult {
    let payload = decode(response);
    let valid = response.status == 200 && payload.get("valid") == Some(&Value::Bool(true));
    if response.status == 200 && payload.get("valid").is_none() {
        debug!("validation payload has no `valid` field, treating as invalid");
    }
    let fallback = if valid {
        VALID_FALLBACK_MESSAGE
    } else {
        INVALID_FALLBACK_MESSAGE
    };
    let message = message_field(&payload).unwrap_or_else(|| fallback.to_string());
    let expires_at = payload
        .get("expires_at")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string);

    ValidationResult {
        valid,
        message,
        expires_at,
        raw: payload,
    }
}

fn interpret_deactivation(response: &HttpResponse) -> DeactivationResult {
    let payload = decode(response);
    let success = payload.get("success") == Some(&Value::Bool(true));
    let fallback = if success {
        DEACTIVATED_MESSAGE
    } else {
        DEACTIVATION_FAILED_MESSAGE
    };
    DeactivationResult {
        success,
        message: message_field(&payload).unwrap_or_else(|| fallback.to_string()),
    }
}

fn parse_update(response: &HttpResponse) -> Result<UpdateResponse, LicenseError> {
    serde_json::from_str(&response.body).map_err(|e| {
        LicenseError::Protocol(format!(
            "invalid update payload (HTTP {}): {e}",
            response.status
        ))
    })
}
