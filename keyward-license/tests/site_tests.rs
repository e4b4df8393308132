use keyward_license::{LicenseError, SiteIdentifier};

#[test]
fn url_trailing_slash_is_dropped() {
    let a = SiteIdentifier::from_url("https://shop.example.com/").unwrap();
    let b = SiteIdentifier::from_url("  https://shop.example.com ").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "https://shop.example.com");
}

#[test]
fn url_path_is_kept() {
    let site = SiteIdentifier::from_url("https://example.com/shop/").unwrap();
    assert_eq!(site.to_string(), "https://example.com/shop");
}

#[test]
fn non_http_schemes_rejected() {
    let err = SiteIdentifier::from_url("ftp://example.com").unwrap_err();
    assert!(matches!(err, LicenseError::InvalidSite(_)));
}

#[test]
fn garbage_rejected() {
    assert!(SiteIdentifier::from_url("not a url").is_err());
    assert!(SiteIdentifier::from_url("").is_err());
}

#[test]
fn device_identifier_is_stable() {
    let a = SiteIdentifier::for_this_device();
    let b = SiteIdentifier::for_this_device();
    assert_eq!(a, b);
    assert!(a.as_str().starts_with("device://"));
    assert!(a.as_str().len() > "device://".len());
}

#[test]
fn only_urls_are_web_sites() {
    assert!(SiteIdentifier::from_url("https://shop.example.com").unwrap().is_web());
    assert!(SiteIdentifier::from_url("http://localhost:8080").unwrap().is_web());
    assert!(!SiteIdentifier::for_this_device().is_web());
}
