use keyward_types::{PackageUpdate, ProductInfo, UpdateOffer};

fn product() -> ProductInfo {
    ProductInfo {
        name: "Licensed Product".into(),
        slug: "licensed-product".into(),
        version: "1.0.0".into(),
    }
}

#[test]
fn none_offers_nothing() {
    let offer = UpdateOffer::none();
    assert!(!offer.available);
    assert!(offer.package_update(&product()).is_none());
}

#[test]
fn available_offer_becomes_package_update() {
    let offer = UpdateOffer {
        available: true,
        version: "1.1.0".into(),
        download_url: "https://x/y.zip".into(),
        changelog: String::new(),
    };
    assert_eq!(
        offer.package_update(&product()),
        Some(PackageUpdate {
            slug: "licensed-product".into(),
            new_version: "1.1.0".into(),
            package: "https://x/y.zip".into(),
            url: String::new(),
        })
    );
}
