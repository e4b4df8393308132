//! Typed access to the persisted license options.

use crate::{ConfigStore, StoreError, StoreResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use keyward_types::{LicenseRecord, LicenseStatus, OptionName, ServerConfig, DEFAULT_PRODUCT_ID};
use std::sync::Arc;
use tracing::warn;

/// Reads and writes the license record and server configuration.
///
/// Every field lives in its own option so that external tooling can read
/// them individually. Missing options take their defaults on read; nothing
/// is written until the lifecycle manager records an outcome.
#[derive(Clone)]
pub struct LicenseStateStore {
    store: Arc<dyn ConfigStore>,
}

impl LicenseStateStore {
    /// Wraps a host configuration store.
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    // ── License record ───────────────────────────────────────────

    /// Loads the full record, defaulting any missing field.
    pub fn load(&self) -> StoreResult<LicenseRecord> {
        Ok(LicenseRecord {
            key: self.key()?,
            status: self.status()?,
            message: self.get(OptionName::LicenseMessage)?.unwrap_or_default(),
            expires_at: self
                .get(OptionName::LicenseExpires)?
                .filter(|v| !v.trim().is_empty()),
            last_checked: self.last_checked()?,
        })
    }

    /// Returns the stored key, empty if none.
    pub fn key(&self) -> StoreResult<String> {
        Ok(self.get(OptionName::LicenseKey)?.unwrap_or_default())
    }

    /// Returns the stored status.
    ///
    /// An unrecognised stored value is reported as `inactive`: validity is
    /// never assumed from a value this code did not write.
    pub fn status(&self) -> StoreResult<LicenseStatus> {
        match self.get(OptionName::LicenseStatus)? {
            None => Ok(LicenseStatus::default()),
            Some(raw) => Ok(raw.parse().unwrap_or_else(|_| {
                warn!("unrecognised stored license status {raw:?}, treating as inactive");
                LicenseStatus::Inactive
            })),
        }
    }

    /// Returns when the license was last checked, if ever.
    pub fn last_checked(&self) -> StoreResult<Option<DateTime<Utc>>> {
        let Some(raw) = self.get(OptionName::LicenseLastCheck)? else {
            return Ok(None);
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(dt.with_timezone(&Utc)));
        }
        match NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S") {
            Ok(naive) => Ok(Some(naive.and_utc())),
            Err(_) => {
                warn!("unparsable last license check {raw:?}, ignoring");
                Ok(None)
            }
        }
    }

    /// Stores the license key.
    pub fn set_key(&self, key: &str) -> StoreResult<()> {
        self.set(OptionName::LicenseKey, key)
    }

    /// Removes the license key.
    pub fn clear_key(&self) -> StoreResult<()> {
        self.store.delete(OptionName::LicenseKey.as_str())
    }

    /// Records a validation outcome: status, message and check time.
    pub fn record_check(
        &self,
        status: LicenseStatus,
        message: &str,
        checked_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        self.set(OptionName::LicenseStatus, status.as_str())?;
        self.set(OptionName::LicenseMessage, message)?;
        self.set(OptionName::LicenseLastCheck, &checked_at.to_rfc3339())
    }

    /// Stores the expiry reported by the authority.
    pub fn set_expires(&self, expires_at: &str) -> StoreResult<()> {
        self.set(OptionName::LicenseExpires, expires_at)
    }

    /// Removes the stored expiry.
    pub fn clear_expires(&self) -> StoreResult<()> {
        self.store.delete(OptionName::LicenseExpires.as_str())
    }

    /// Resets the record after a deactivation: no key, inactive, no expiry.
    pub fn reset(&self, message: &str) -> StoreResult<()> {
        self.clear_key()?;
        self.clear_expires()?;
        self.set(OptionName::LicenseStatus, LicenseStatus::Inactive.as_str())?;
        self.set(OptionName::LicenseMessage, message)
    }

    // ── Server configuration ─────────────────────────────────────

    /// Loads the server configuration.
    ///
    /// `default_server_url` is used when no server URL has been stored; the
    /// product id defaults to [`DEFAULT_PRODUCT_ID`].
    pub fn server_config(&self, default_server_url: &str) -> StoreResult<ServerConfig> {
        let server_url = self
            .get(OptionName::ServerUrl)?
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| default_server_url.to_string());
        let product_id = match self.get(OptionName::ProductId)? {
            None => DEFAULT_PRODUCT_ID,
            Some(raw) => ServerConfig::parse_product_id(&raw).map_err(|_| {
                StoreError::InvalidValue {
                    name: OptionName::ProductId.to_string(),
                    value: raw.clone(),
                }
            })?,
        };
        Ok(ServerConfig {
            server_url,
            product_id,
        })
    }

    /// Stores the server configuration.
    pub fn set_server_config(&self, config: &ServerConfig) -> StoreResult<()> {
        self.set(OptionName::ServerUrl, &config.server_url)?;
        self.set(OptionName::ProductId, &config.product_id.to_string())
    }

    fn get(&self, name: OptionName) -> StoreResult<Option<String>> {
        self.store.get(name.as_str())
    }

    fn set(&self, name: OptionName, value: &str) -> StoreResult<()> {
        self.store.set(name.as_str(), value)
    }
}
