//! Shared test helpers for license tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use keyward_license::{
    HttpResponse, HttpTransport, LicenseManager, RemoteAuthority, SiteIdentifier, TransportError,
};
use keyward_store::{LicenseStateStore, MemoryStore};
use keyward_types::ServerConfig;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SERVER_URL: &str = "https://licenses.example.com";
pub const SITE_URL: &str = "https://shop.example.com";
pub const PRODUCT_ID: u64 = 7;

/// One request seen by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl RecordedCall {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

type Scripted = Result<HttpResponse, TransportError>;

/// Transport double that replays scripted responses and records every call.
///
/// Responses are consumed in order; once the queue is empty the `repeat`
/// response (if any) answers every further call.
#[derive(Default)]
pub struct ScriptedTransport {
    queue: Mutex<VecDeque<Scripted>>,
    repeat: Option<Scripted>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    /// Answers every call with the same response.
    pub fn always(response: Scripted) -> Arc<Self> {
        Arc::new(Self {
            repeat: Some(response),
            ..Default::default()
        })
    }

    /// Answers every call with a JSON body.
    pub fn json(status: u16, body: serde_json::Value) -> Arc<Self> {
        Self::always(Ok(HttpResponse::new(status, body.to_string())))
    }

    /// Fails every call at the transport level.
    pub fn unreachable(message: &str) -> Arc<Self> {
        Self::always(Err(TransportError(message.to_string())))
    }

    /// Answers calls with the given responses, in order.
    pub fn sequence(responses: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(responses.into()),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn respond(&self, method: &'static str, url: &str, params: &[(&str, String)]) -> Scripted {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            url: url.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
        if let Some(next) = self.queue.lock().unwrap().pop_front() {
            return next;
        }
        self.repeat
            .clone()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_string())))
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, String)],
        _timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        self.respond("POST", url, form)
    }

    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        _timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        self.respond("GET", url, query)
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

pub fn site() -> SiteIdentifier {
    SiteIdentifier::from_url(SITE_URL).unwrap()
}

pub fn server_config(server_url: &str) -> ServerConfig {
    ServerConfig::new(server_url, PRODUCT_ID).unwrap()
}

/// Builds a manager over a fresh memory store seeded with `options`.
pub fn manager_with(
    transport: Arc<dyn HttpTransport>,
    options: &[(&str, &str)],
) -> (Arc<MemoryStore>, LicenseManager) {
    let store = Arc::new(MemoryStore::with_options(options.iter().copied()));
    let state = LicenseStateStore::new(store.clone());
    let authority = RemoteAuthority::new(server_config(SERVER_URL), transport);
    let manager = LicenseManager::new(state, authority, site()).with_clock(fixed_now);
    (store, manager)
}
