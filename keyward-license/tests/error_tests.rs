use keyward_license::{LicenseError, TransportError};
use keyward_store::StoreError;

#[test]
fn empty_key_message_asks_for_a_key() {
    let msg = LicenseError::EmptyKey.to_string();
    assert!(msg.contains("enter a license key"));
}

#[test]
fn transport_error_shows_raw_message() {
    let err = TransportError("operation timed out".into());
    assert_eq!(err.to_string(), "operation timed out");
}

#[test]
fn store_error_is_transparent() {
    let err: LicenseError = StoreError::Backend("disk full".into()).into();
    assert_eq!(err.to_string(), "storage error: disk full");
}

#[test]
fn protocol_and_config_display() {
    assert!(LicenseError::Protocol("bad json".into()).to_string().contains("protocol error"));
    assert!(LicenseError::Config("no url".into()).to_string().contains("invalid configuration"));
}
