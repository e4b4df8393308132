//! License lifecycle and update gating for Keyward.
//!
//! This crate handles:
//! - Talking to the remote license authority (validate, deactivate, update)
//! - The license state machine (activation, deactivation, revalidation)
//! - Deciding whether an update may be offered
//! - Scheduling the periodic revalidation
//!
//! # Design Principles
//!
//! - **Degrade, don't crash**: an unreachable authority sets the `error`
//!   status and keeps the stored key
//! - **Never assume validity**: ambiguous or malformed responses count as
//!   invalid, and no update is offered without a positive answer
//! - **No traffic from unlicensed installs**: update checks are skipped
//!   unless the license is active
//! - **Explicit composition**: the host wires the manager into its own
//!   scheduler and update pipeline; nothing registers itself implicitly
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use keyward_license::{LicenseManager, ReqwestTransport, SiteIdentifier};
//! use keyward_store::MemoryStore;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let site = SiteIdentifier::from_url("https://shop.example.com")?;
//! let manager = LicenseManager::from_store(
//!     Arc::new(MemoryStore::new()),
//!     Arc::new(ReqwestTransport::new()?),
//!     site,
//! )?;
//! let outcome = manager.activate("ABCD-1234").await?;
//! println!("{}", outcome.message);
//! # Ok(())
//! # }
//! ```

mod error;
mod manager;
mod remote;
mod scheduler;
mod site;
mod transport;
mod updates;

pub use error::{LicenseError, LicenseResult, TransportError};
pub use manager::{ActivationOutcome, LicenseManager, NO_KEY_MESSAGE};
pub use remote::{
    RemoteAuthority, UpdateResponse, DEACTIVATED_MESSAGE, DEACTIVATION_FAILED_MESSAGE,
    INVALID_FALLBACK_MESSAGE, VALID_FALLBACK_MESSAGE,
};
pub use scheduler::{IntervalScheduler, Job, Scheduler, REVALIDATION_JOB, REVALIDATION_PERIOD};
pub use site::SiteIdentifier;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, REQUEST_TIMEOUT};
pub use updates::UpdateChecker;
