//! Update gating: decides whether a newer package should be offered.
//!
//! Only an installation with an active license ever asks the authority
//! about updates. Version comparison is the server's job; this side trusts
//! its `update` flag and fails closed on anything short of a positive
//! answer.

use crate::manager::LicenseManager;
use crate::remote::UpdateResponse;
use keyward_types::{PackageUpdate, ProductInfo, ReleaseDetails, UpdateOffer, NO_CHANGELOG};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Produces update offers for the host's update pipeline.
///
/// No caching: the host is expected to throttle how often it asks.
pub struct UpdateChecker {
    manager: Arc<LicenseManager>,
    product: ProductInfo,
}

impl UpdateChecker {
    pub fn new(manager: Arc<LicenseManager>, product: ProductInfo) -> Self {
        Self { manager, product }
    }

    pub fn product(&self) -> &ProductInfo {
        &self.product
    }

    /// Decides whether a newer package than `current_version` is on offer.
    ///
    /// Makes no network call unless a key is stored and the license is
    /// active.
    pub async fn evaluate(&self, current_version: &str) -> UpdateOffer {
        match self.fetch(current_version).await {
            Some(update) => {
                info!(
                    "update available for {}: {} -> {}",
                    self.product.slug, current_version, update.version
                );
                UpdateOffer {
                    available: true,
                    version: update.version,
                    download_url: update.download_url,
                    changelog: update.changelog.unwrap_or_default(),
                }
            }
            None => UpdateOffer::none(),
        }
    }

    /// Evaluates the installed version and returns the host's pending-update
    /// entry, if any.
    pub async fn pending_update(&self) -> Option<PackageUpdate> {
        self.evaluate(&self.product.version)
            .await
            .package_update(&self.product)
    }

    /// Returns details of the offered release for the host's details panel.
    ///
    /// Gated exactly like [`evaluate`](Self::evaluate): a stored key alone is
    /// not enough, the license must also be active.
    pub async fn release_details(&self, current_version: &str) -> Option<ReleaseDetails> {
        let update = self.fetch(current_version).await?;
        Some(ReleaseDetails {
            name: self.product.name.clone(),
            slug: self.product.slug.clone(),
            version: update.version,
            download_link: update.download_url,
            changelog: update
                .changelog
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| NO_CHANGELOG.to_string()),
        })
    }

    /// Asks the authority, returning the response only when it offers an
    /// update.
    async fn fetch(&self, current_version: &str) -> Option<UpdateResponse> {
        let record = match self.manager.record() {
            Ok(record) => record,
            Err(e) => {
                warn!("cannot read license record for update check: {e}");
                return None;
            }
        };
        if !record.has_key() || !record.status.is_active() {
            debug!(
                "skipping update check: status {}, key stored: {}",
                record.status,
                record.has_key()
            );
            return None;
        }

        let update = self
            .manager
            .authority()
            .check_update(&record.key, current_version)
            .await?;
        update.update.then_some(update)
    }
}
