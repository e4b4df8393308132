//! Core type definitions for Keyward.
//!
//! This crate defines the plain data shared by every other crate:
//! - The license status enum and the persisted license record
//! - Server and product configuration
//! - Transient results produced by the remote license authority
//! - Update offers and release details handed to the host's update UI
//!
//! Nothing here performs I/O. Persistence lives in `keyward-store` and the
//! lifecycle logic lives in `keyward-license`.

mod config;
mod options;
mod record;
mod remote;
mod status;
mod update;

pub use config::{ProductInfo, ServerConfig, DEFAULT_PRODUCT_ID};
pub use options::OptionName;
pub use record::{mask_key, LicenseRecord};
pub use remote::{DeactivationResult, ValidationResult};
pub use status::LicenseStatus;
pub use update::{PackageUpdate, ReleaseDetails, UpdateOffer, NO_CHANGELOG};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid license status: {0}")]
    InvalidStatus(String),

    #[error("invalid product id: {0}")]
    InvalidProductId(String),
}
