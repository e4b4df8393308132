//! Update offers handed to the host's update pipeline.

use crate::ProductInfo;
use serde::{Deserialize, Serialize};

/// Changelog text shown when the server does not provide one.
pub const NO_CHANGELOG: &str = "No changelog available.";

/// Whether a newer package should be offered, and where to get it.
///
/// Recomputed on every check. Caching is the host's concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOffer {
    pub available: bool,
    pub version: String,
    pub download_url: String,
    pub changelog: String,
}

impl UpdateOffer {
    /// The offer returned whenever no update may be claimed.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds the entry the host adds to its list of pending updates.
    ///
    /// Returns `None` when no update is available.
    #[must_use]
    pub fn package_update(&self, product: &ProductInfo) -> Option<PackageUpdate> {
        if !self.available {
            return None;
        }
        Some(PackageUpdate {
            slug: product.slug.clone(),
            new_version: self.version.clone(),
            package: self.download_url.clone(),
            url: String::new(),
        })
    }
}

/// One entry in the host's pending-updates list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageUpdate {
    pub slug: String,
    pub new_version: String,
    pub package: String,
    pub url: String,
}

/// Details for the host's "view version details" panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDetails {
    pub name: String,
    pub slug: String,
    pub version: String,
    pub download_link: String,
    pub changelog: String,
}
