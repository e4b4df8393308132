//! Persistent license state for Keyward.
//!
//! The host owns a key-value configuration store; this crate defines the
//! interface the license core needs from it ([`ConfigStore`]), two
//! implementations, and a typed accessor ([`LicenseStateStore`]) that knows
//! which options hold the license record and what their defaults are.
//!
//! Writes are last-write-wins per option. No transactional grouping is
//! offered: a convergent revalidation corrects any transient mix of fields.

mod error;
mod license_state;
mod memory;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use license_state::LicenseStateStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A host-provided key-value configuration store.
pub trait ConfigStore: Send + Sync {
    /// Reads an option, `None` if it was never set or has been deleted.
    fn get(&self, name: &str) -> StoreResult<Option<String>>;

    /// Writes an option, replacing any previous value.
    fn set(&self, name: &str, value: &str) -> StoreResult<()>;

    /// Removes an option. Removing a missing option is not an error.
    fn delete(&self, name: &str) -> StoreResult<()>;

    /// Reads an option, falling back to `default` when it is absent.
    fn get_or(&self, name: &str, default: &str) -> StoreResult<String> {
        Ok(self.get(name)?.unwrap_or_else(|| default.to_string()))
    }
}
