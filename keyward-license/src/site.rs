//! Site identifiers for activation binding.
//!
//! The authority binds each activation to the installation that requested
//! it. Web installations identify themselves by their URL; hosts without
//! one derive a stable identifier from the machine they run on.

use crate::error::{LicenseError, LicenseResult};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use reqwest::Url;
use sha2::{Digest, Sha256};
use std::env;
use std::fmt;

/// Identifies the installation being licensed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteIdentifier(String);

impl SiteIdentifier {
    /// Parses a site URL. Only `http` and `https` URLs are accepted; a
    /// trailing slash is dropped so that `https://a.example/` and
    /// `https://a.example` bind to the same activation.
    pub fn from_url(raw: &str) -> LicenseResult<Self> {
        let raw = raw.trim();
        let url = Url::parse(raw).map_err(|e| LicenseError::InvalidSite(format!("{raw}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LicenseError::InvalidSite(format!(
                "{raw}: scheme must be http or https"
            )));
        }
        Ok(Self(url.as_str().trim_end_matches('/').to_string()))
    }

    /// Derives an identifier for the current machine.
    ///
    /// Combines OS, architecture, host name and the platform machine id, so
    /// it survives restarts but changes if the machine does.
    #[must_use]
    pub fn for_this_device() -> Self {
        let combined = collect_machine_ids().join("|");
        let hash = Sha256::digest(combined.as_bytes());
        Self(format!("device://{}", URL_SAFE_NO_PAD.encode(&hash[..16])))
    }

    /// Returns true if the identifier is an `http` or `https` URL.
    #[must_use]
    pub fn is_web(&self) -> bool {
        self.0.starts_with("https://") || self.0.starts_with("http://")
    }

    /// Returns the identifier as sent to the authority.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn collect_machine_ids() -> Vec<String> {
    let mut ids = vec![
        env::consts::OS.to_string(),
        env::consts::ARCH.to_string(),
        get_hostname(),
    ];
    if let Some(machine_id) = get_machine_id() {
        ids.push(machine_id);
    }
    ids
}

fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

fn get_machine_id() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/machine-id")
            .or_else(|_| std::fs::read_to_string("/var/lib/dbus/machine-id"))
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .and_then(|output| {
                output
                    .lines()
                    .find(|l| l.contains("IOPlatformUUID"))
                    .and_then(|l| l.split('"').nth(3))
                    .map(String::from)
            })
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        None
    }
}
