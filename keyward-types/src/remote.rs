//! Transient results produced by the remote license authority.

use serde::{Deserialize, Serialize};

/// Outcome of a `validate` call.
///
/// Consumed once by the lifecycle manager to update the license record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True only for an HTTP 200 response whose payload has `valid: true`.
    pub valid: bool,
    /// Server-supplied message, or a generic fallback.
    pub message: String,
    /// Expiry reported by the server, if any.
    pub expires_at: Option<String>,
    /// The decoded response payload, `Null` if the body was not JSON.
    #[serde(default)]
    pub raw: serde_json::Value,
}

/// Outcome of a `deactivate` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeactivationResult {
    pub success: bool,
    pub message: String,
}
