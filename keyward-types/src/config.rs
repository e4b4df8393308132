//! Server and product configuration.

use crate::Error;
use serde::{Deserialize, Serialize};

/// Product id used when none has been configured.
pub const DEFAULT_PRODUCT_ID: u64 = 1;

/// Where the license authority lives and which product it should check.
///
/// Read once when a component that issues remote calls is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the license authority.
    pub server_url: String,
    /// Product id configured on the authority. Always positive.
    pub product_id: u64,
}

impl ServerConfig {
    /// Creates a config, rejecting a zero product id.
    pub fn new(server_url: impl Into<String>, product_id: u64) -> crate::Result<Self> {
        if product_id == 0 {
            return Err(Error::InvalidProductId("product id must be positive".to_string()));
        }
        Ok(Self {
            server_url: server_url.into(),
            product_id,
        })
    }

    /// Parses a stored product id.
    pub fn parse_product_id(raw: &str) -> crate::Result<u64> {
        let id: u64 = raw
            .trim()
            .parse()
            .map_err(|_| Error::InvalidProductId(raw.to_string()))?;
        if id == 0 {
            return Err(Error::InvalidProductId(raw.to_string()));
        }
        Ok(id)
    }

    /// Returns the URL of one endpoint of the licensing REST API.
    #[must_use]
    pub fn endpoint(&self, name: &str) -> String {
        format!(
            "{}/wp-json/wp-licensing/v1/{}",
            self.server_url.trim_end_matches('/'),
            name
        )
    }
}

/// Identity of the installed, licensed package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    /// Display name.
    pub name: String,
    /// Slug the host's update system knows the package by.
    pub slug: String,
    /// Currently installed version.
    pub version: String,
}
