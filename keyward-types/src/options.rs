//! Names of the persisted configuration options.

use std::fmt;

/// A persisted option in the host's key-value configuration store.
///
/// The string names are a public contract: other tooling reads them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionName {
    LicenseKey,
    LicenseStatus,
    LicenseMessage,
    LicenseExpires,
    LicenseLastCheck,
    ServerUrl,
    ProductId,
}

impl OptionName {
    /// All options, in the order they are documented.
    pub const ALL: [OptionName; 7] = [
        Self::LicenseKey,
        Self::LicenseStatus,
        Self::LicenseMessage,
        Self::LicenseExpires,
        Self::LicenseLastCheck,
        Self::ServerUrl,
        Self::ProductId,
    ];

    /// Returns the store key for this option.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LicenseKey => "license_key",
            Self::LicenseStatus => "license_status",
            Self::LicenseMessage => "license_message",
            Self::LicenseExpires => "license_expires",
            Self::LicenseLastCheck => "license_last_check",
            Self::ServerUrl => "server_url",
            Self::ProductId => "product_id",
        }
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
