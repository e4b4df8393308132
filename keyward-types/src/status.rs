//! License status classification.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The cached classification of the last validation outcome.
///
/// Persisted as the lowercase strings `active`, `inactive` and `error`, which
/// other tooling reading the `license_status` option relies on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LicenseStatus {
    /// No key, a key the authority rejected, or a deactivated key.
    #[default]
    Inactive,
    /// The most recent remote validation returned `valid=true`.
    Active,
    /// The most recent validation attempt could not reach the authority.
    Error,
}

impl LicenseStatus {
    /// Returns the persisted string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::Error => "error",
        }
    }

    /// Returns true if the license grants feature and update access.
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for LicenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "error" => Ok(Self::Error),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }
}
