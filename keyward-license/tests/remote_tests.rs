mod common;

use common::{server_config, site};
use keyward_license::{
    RemoteAuthority, ReqwestTransport, DEACTIVATED_MESSAGE, DEACTIVATION_FAILED_MESSAGE,
    INVALID_FALLBACK_MESSAGE,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn authority_for(server: &MockServer) -> RemoteAuthority {
    let transport = ReqwestTransport::new().unwrap();
    RemoteAuthority::new(server_config(&server.uri()), Arc::new(transport))
}

// ── validate ─────────────────────────────────────────────────────

#[tokio::test]
async fn validate_posts_form_and_reads_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp-licensing/v1/validate"))
        .and(body_string_contains("license_key=ABCD-1234"))
        .and(body_string_contains("site_url=https%3A%2F%2Fshop.example.com"))
        .and(body_string_contains("product_id=7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "message": "ok",
            "expires_at": "2026-01-01",
            "activations_left": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = authority_for(&server)
        .validate("ABCD-1234", &site())
        .await
        .unwrap();

    assert!(result.valid);
    assert_eq!(result.message, "ok");
    assert_eq!(result.expires_at.as_deref(), Some("2026-01-01"));
    // unknown fields stay available to callers
    assert_eq!(result.raw["activations_left"], 2);
}

#[tokio::test]
async fn validate_rejection_keeps_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp-licensing/v1/validate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"valid": false, "message": "License expired."})),
        )
        .mount(&server)
        .await;

    let result = authority_for(&server)
        .validate("ABCD-1234", &site())
        .await
        .unwrap();
    assert!(!result.valid);
    assert_eq!(result.message, "License expired.");
}

#[tokio::test]
async fn validate_404_is_invalid_not_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let result = authority_for(&server)
        .validate("ABCD-1234", &site())
        .await
        .unwrap();
    assert!(!result.valid);
    assert_eq!(result.message, INVALID_FALLBACK_MESSAGE);
    assert!(result.raw.is_null());
}

#[tokio::test]
async fn validate_truthy_non_boolean_is_not_valid() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": "yes"})))
        .mount(&server)
        .await;

    let result = authority_for(&server)
        .validate("ABCD-1234", &site())
        .await
        .unwrap();
    assert!(!result.valid);
}

#[tokio::test]
async fn validate_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"valid": true}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let authority = authority_for(&server).with_timeout(Duration::from_millis(100));
    let err = authority.validate("ABCD-1234", &site()).await.unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn validate_unreachable_server_is_transport_error() {
    let transport = ReqwestTransport::new().unwrap();
    // nothing listens on port 9 locally
    let authority = RemoteAuthority::new(server_config("http://127.0.0.1:9"), Arc::new(transport))
        .with_timeout(Duration::from_secs(2));
    assert!(authority.validate("ABCD-1234", &site()).await.is_err());
}

// ── deactivate ───────────────────────────────────────────────────

#[tokio::test]
async fn deactivate_posts_key_and_site() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp-licensing/v1/deactivate"))
        .and(body_string_contains("license_key=ABCD-1234"))
        .and(body_string_contains("site_url="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let result = authority_for(&server)
        .deactivate("ABCD-1234", &site())
        .await
        .unwrap();
    assert!(result.success);
    assert_eq!(result.message, DEACTIVATED_MESSAGE);
}

#[tokio::test]
async fn deactivate_failure_fallback_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let result = authority_for(&server)
        .deactivate("ABCD-1234", &site())
        .await
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.message, DEACTIVATION_FAILED_MESSAGE);
}

// ── check_update ─────────────────────────────────────────────────

#[tokio::test]
async fn check_update_sends_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp-licensing/v1/update"))
        .and(query_param("license_key", "ABCD-1234"))
        .and(query_param("version", "1.0.0"))
        .and(query_param("product_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "update": true,
            "version": "1.1.0",
            "download_url": "https://x/y.zip",
            "changelog": "Fixes"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = authority_for(&server)
        .check_update("ABCD-1234", "1.0.0")
        .await
        .unwrap();
    assert!(update.update);
    assert_eq!(update.version, "1.1.0");
    assert_eq!(update.download_url, "https://x/y.zip");
    assert_eq!(update.changelog.as_deref(), Some("Fixes"));
}

#[tokio::test]
async fn check_update_missing_fields_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let update = authority_for(&server)
        .check_update("ABCD-1234", "1.0.0")
        .await
        .unwrap();
    assert!(!update.update);
    assert!(update.changelog.is_none());
}

#[tokio::test]
async fn check_update_garbage_body_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<!doctype html>"))
        .mount(&server)
        .await;

    assert!(
        authority_for(&server)
            .check_update("ABCD-1234", "1.0.0")
            .await
            .is_none()
    );
}

#[tokio::test]
async fn check_update_transport_failure_is_none() {
    let transport = ReqwestTransport::new().unwrap();
    let authority = RemoteAuthority::new(server_config("http://127.0.0.1:9"), Arc::new(transport))
        .with_timeout(Duration::from_secs(2));
    assert!(authority.check_update("ABCD-1234", "1.0.0").await.is_none());
}
