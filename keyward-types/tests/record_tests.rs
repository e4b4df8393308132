use chrono::NaiveDate;
use keyward_types::{mask_key, LicenseRecord, LicenseStatus};
use pretty_assertions::assert_eq;

#[test]
fn default_record_is_empty_and_inactive() {
    let record = LicenseRecord::default();
    assert_eq!(record.status, LicenseStatus::Inactive);
    assert!(!record.has_key());
    assert!(record.message.is_empty());
    assert!(record.expires_at.is_none());
    assert!(record.last_checked.is_none());
}

#[test]
fn whitespace_key_is_not_a_key() {
    let record = LicenseRecord {
        key: "   ".into(),
        ..Default::default()
    };
    assert!(!record.has_key());
}

#[test]
fn mask_keeps_head_and_tail() {
    assert_eq!(mask_key("ABCD-1234"), "ABCD…34");
    assert_eq!(mask_key("XXXX-XXXX-XXXX-WXYZ"), "XXXX…YZ");
}

#[test]
fn mask_hides_short_keys_entirely() {
    assert_eq!(mask_key("ABC"), "…");
    assert_eq!(mask_key(""), "…");
}

#[test]
fn expiry_date_formats() {
    let expected = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    for raw in ["2026-01-01", "2026-01-01T10:00:00Z", "2026-01-01 23:59:59"] {
        let record = LicenseRecord {
            expires_at: Some(raw.into()),
            ..Default::default()
        };
        assert_eq!(record.expiry_date(), Some(expected), "format {raw}");
    }
}

#[test]
fn expiry_date_unparsable_or_missing() {
    let record = LicenseRecord {
        expires_at: Some("never".into()),
        ..Default::default()
    };
    assert_eq!(record.expiry_date(), None);
    assert_eq!(LicenseRecord::default().expiry_date(), None);
}
