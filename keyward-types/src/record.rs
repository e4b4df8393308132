//! The persisted license record.

use crate::LicenseStatus;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// The single active license of an installation.
///
/// Created with defaults on first read, mutated only by the lifecycle manager
/// and never deleted: deactivation resets it instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// The license key. Empty when no key is stored.
    pub key: String,
    /// Status derived from the last validation outcome.
    pub status: LicenseStatus,
    /// Last user-facing message from the authority or the transport.
    pub message: String,
    /// Expiry date exactly as the authority reported it.
    pub expires_at: Option<String>,
    /// When the license was last checked against the authority.
    pub last_checked: Option<DateTime<Utc>>,
}

impl LicenseRecord {
    /// Returns true if a license key is stored.
    #[must_use]
    pub fn has_key(&self) -> bool {
        !self.key.trim().is_empty()
    }

    /// Returns the masked key for logs and status output.
    #[must_use]
    pub fn masked_key(&self) -> String {
        mask_key(&self.key)
    }

    /// Parses the reported expiry into a calendar date.
    ///
    /// Accepts `YYYY-MM-DD`, RFC 3339 and `YYYY-MM-DD HH:MM:SS`. Returns `None`
    /// when no expiry is stored or the value is not a recognisable date.
    #[must_use]
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        let raw = self.expires_at.as_deref()?.trim();
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Some(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|dt| dt.date())
    }
}

/// Masks a license key so that only its first four and last two characters remain.
#[must_use]
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.trim().chars().collect();
    if chars.len() <= 6 {
        return "…".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{head}…{tail}")
}
