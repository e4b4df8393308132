//! Error types for the licensing module.

use keyward_store::StoreError;
use thiserror::Error;

/// A failure to reach the license authority (network, timeout, DNS).
///
/// The message is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Licensing-specific errors.
///
/// Remote failures never surface here from lifecycle operations: they are
/// folded into the license status and message. What remains are input
/// errors and faults in local collaborators.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// An empty key was submitted for activation.
    #[error("please enter a license key")]
    EmptyKey,

    /// The authority answered with something that is not the expected payload.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The site identifier is not usable.
    #[error("invalid site identifier: {0}")]
    InvalidSite(String),

    /// Configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The configuration store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
