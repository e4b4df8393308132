//! License lifecycle: activation, deactivation and periodic revalidation.
//!
//! States and transitions:
//!
//! | Event                              | To          | Persisted                               |
//! |------------------------------------|-------------|-----------------------------------------|
//! | activate, authority says valid     | `active`    | key, message, expiry, check time        |
//! | activate, authority says invalid   | `inactive`  | key, message, check time                |
//! | activate, authority unreachable    | `error`     | key, transport message, check time      |
//! | deactivate succeeds                | `inactive`  | key and expiry cleared, message         |
//! | deactivate fails                   | unchanged   | nothing                                 |
//! | revalidate                         | as activate | as activate, using the stored key       |
//!
//! The record is only ever cleared after the authority confirms a
//! deactivation. A transport failure keeps the key so the next successful
//! revalidation can restore `active` without the user entering it again.

use crate::error::{LicenseError, LicenseResult};
use crate::remote::{RemoteAuthority, DEACTIVATED_MESSAGE};
use crate::scheduler::{Job, Scheduler, REVALIDATION_JOB, REVALIDATION_PERIOD};
use crate::site::SiteIdentifier;
use crate::transport::HttpTransport;
use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use keyward_store::{ConfigStore, LicenseStateStore};
use keyward_types::{mask_key, DeactivationResult, LicenseRecord, LicenseStatus};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Message returned when there is no key to deactivate.
pub const NO_KEY_MESSAGE: &str = "No license key to deactivate.";

/// What an activation attempt concluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationOutcome {
    pub valid: bool,
    /// Message intended for direct display.
    pub message: String,
    /// Status the record was left in.
    pub status: LicenseStatus,
    pub expires_at: Option<String>,
}

/// Owns the license state machine.
///
/// The only writer of the license record. Everything else reads it through
/// [`status`](Self::status), [`is_valid`](Self::is_valid) and
/// [`record`](Self::record).
pub struct LicenseManager {
    state: LicenseStateStore,
    authority: RemoteAuthority,
    site: SiteIdentifier,
    clock: fn() -> DateTime<Utc>,
}

impl LicenseManager {
    pub fn new(state: LicenseStateStore, authority: RemoteAuthority, site: SiteIdentifier) -> Self {
        Self {
            state,
            authority,
            site,
            clock: Utc::now,
        }
    }

    /// Builds a manager from the host's collaborators.
    ///
    /// Reads the server configuration from the store once; a web site URL
    /// is the default server URL, matching a license server that runs on
    /// the licensed site itself.
    ///
    /// # Errors
    ///
    /// [`LicenseError::Config`] if the stored configuration is invalid, or
    /// if no server URL is stored and the site is not a web URL.
    pub fn from_store(
        store: Arc<dyn ConfigStore>,
        transport: Arc<dyn HttpTransport>,
        site: SiteIdentifier,
    ) -> LicenseResult<Self> {
        let state = LicenseStateStore::new(store);
        let default_server_url = if site.is_web() { site.as_str() } else { "" };
        let config = state
            .server_config(default_server_url)
            .map_err(|e| LicenseError::Config(e.to_string()))?;
        if config.server_url.trim().is_empty() {
            return Err(LicenseError::Config(format!(
                "no license server URL is stored and {site} cannot serve as one"
            )));
        }
        debug!(
            "license server {} (product {})",
            config.server_url, config.product_id
        );
        let authority = RemoteAuthority::new(config, transport);
        Ok(Self::new(state, authority, site))
    }

    /// Replaces the clock used to stamp `last_checked`.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn authority(&self) -> &RemoteAuthority {
        &self.authority
    }

    pub fn site(&self) -> &SiteIdentifier {
        &self.site
    }

    /// Validates `key` with the authority and records the outcome.
    ///
    /// The key is stored before the remote call, so it is kept whatever the
    /// outcome. Calling this again with an active key just re-validates.
    ///
    /// # Errors
    ///
    /// [`LicenseError::EmptyKey`] for blank input, without any network call.
    /// [`LicenseError::Store`] if the outcome could not be persisted.
    /// Remote failures are not errors: they set the `error` status.
    pub async fn activate(&self, key: &str) -> LicenseResult<ActivationOutcome> {
        let key = key.trim();
        if key.is_empty() {
            return Err(LicenseError::EmptyKey);
        }
        self.state.set_key(key)?;

        let now = (self.clock)();
        let outcome = match self.authority.validate(key, &self.site).await {
            Ok(result) if result.valid => {
                self.state
                    .record_check(LicenseStatus::Active, &result.message, now)?;
                if let Some(expires_at) = &result.expires_at {
                    self.state.set_expires(expires_at)?;
                }
                info!("license {} is active", mask_key(key));
                ActivationOutcome {
                    valid: true,
                    message: result.message,
                    status: LicenseStatus::Active,
                    expires_at: result.expires_at,
                }
            }
            Ok(result) => {
                self.state
                    .record_check(LicenseStatus::Inactive, &result.message, now)?;
                info!("license {} rejected: {}", mask_key(key), result.message);
                ActivationOutcome {
                    valid: false,
                    message: result.message,
                    status: LicenseStatus::Inactive,
                    expires_at: None,
                }
            }
            Err(e) => {
                let message = e.to_string();
                self.state.record_check(LicenseStatus::Error, &message, now)?;
                warn!("could not validate license {}: {message}", mask_key(key));
                ActivationOutcome {
                    valid: false,
                    message,
                    status: LicenseStatus::Error,
                    expires_at: None,
                }
            }
        };
        Ok(outcome)
    }

    /// Releases `key`'s activation with the authority.
    ///
    /// The local record is reset only after the authority confirms, and only
    /// if `key` is the stored key. On failure or transport error nothing is
    /// written.
    pub async fn deactivate(&self, key: &str) -> LicenseResult<DeactivationResult> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(DeactivationResult {
                success: false,
                message: NO_KEY_MESSAGE.to_string(),
            });
        }

        let result = match self.authority.deactivate(key, &self.site).await {
            Ok(result) => result,
            Err(e) => {
                warn!("could not deactivate license {}: {e}", mask_key(key));
                return Ok(DeactivationResult {
                    success: false,
                    message: e.to_string(),
                });
            }
        };

        if !result.success {
            info!("deactivation of {} refused: {}", mask_key(key), result.message);
            return Ok(result);
        }

        let stored = self.state.key()?;
        if stored.trim().is_empty() || stored.trim() == key {
            self.state.reset(DEACTIVATED_MESSAGE)?;
            info!("license {} deactivated", mask_key(key));
        } else {
            debug!(
                "deactivated {} but stored key is {}, leaving record untouched",
                mask_key(key),
                mask_key(&stored)
            );
        }
        Ok(result)
    }

    /// Re-validates the stored key. Does nothing if no key is stored.
    ///
    /// This is the scheduled job; the scheduler's next cycle is the only
    /// retry.
    pub async fn revalidate(&self) -> LicenseResult<Option<ActivationOutcome>> {
        let key = self.state.key()?;
        if key.trim().is_empty() {
            debug!("no license key stored, skipping revalidation");
            return Ok(None);
        }
        self.activate(&key).await.map(Some)
    }

    /// Host hook for when the licensed package is switched on.
    pub async fn on_install_activated(&self) -> LicenseResult<Option<ActivationOutcome>> {
        self.revalidate().await
    }

    /// Host hook for when the licensed package is switched off: frees the
    /// stored key's activation slot. Does nothing if no key is stored.
    pub async fn on_install_deactivated(&self) -> LicenseResult<Option<DeactivationResult>> {
        let key = self.state.key()?;
        if key.trim().is_empty() {
            return Ok(None);
        }
        self.deactivate(&key).await.map(Some)
    }

    /// Returns the stored status. Never touches the network.
    ///
    /// A store failure is logged and reported as `inactive`.
    pub fn status(&self) -> LicenseStatus {
        self.state.status().unwrap_or_else(|e| {
            warn!("failed to read license status: {e}");
            LicenseStatus::Inactive
        })
    }

    /// Returns true if the stored status is `active`.
    pub fn is_valid(&self) -> bool {
        self.status().is_active()
    }

    /// Returns true if the host should prompt for license activation.
    pub fn needs_attention(&self) -> bool {
        !self.is_valid()
    }

    /// Returns the full stored record.
    pub fn record(&self) -> LicenseResult<LicenseRecord> {
        Ok(self.state.load()?)
    }

    /// Registers the daily revalidation job with the host's scheduler.
    ///
    /// Returns false if the job was already registered.
    pub fn schedule_revalidation(self: &Arc<Self>, scheduler: &dyn Scheduler) -> bool {
        let manager = Arc::clone(self);
        let job: Job = Arc::new(move || -> BoxFuture<'static, ()> {
            let manager = Arc::clone(&manager);
            Box::pin(async move {
                if let Err(e) = manager.revalidate().await {
                    warn!("scheduled license revalidation failed: {e}");
                }
            })
        });
        scheduler.schedule(REVALIDATION_JOB, REVALIDATION_PERIOD, job)
    }
}
