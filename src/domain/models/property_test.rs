use anyhow::Result;
use serde_json::json;
use test_utils::property_fixture;

use super::format_price;
use super::PanoramicImage;
use super::PropertyCardData;

#[test]
fn it_builds_cards_from_backend_payloads() -> Result<()> {
    let property: serde_json::Value = serde_json::from_str(property_fixture())?;
    let card = PropertyCardData::from_property(&property)?;

    assert_eq!(card.property_id, "prop-42");
    assert_eq!(card.bedrooms, Some(2.0));
    assert_eq!(card.floor_area, Some(64.5));
    assert_eq!(
        card.image.unwrap().url,
        "https://cdn.example.com/prop-42/front.jpg"
    );

    return Ok(());
}

#[test]
fn it_rejects_negative_prices() {
    let property = json!({
        "propertyId": "prop-1",
        "name": "Lot",
        "price": -1,
        "address": "Somewhere",
        "propertyType": "Lot"
    });

    let err = PropertyCardData::from_property(&property).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"Property prop-1 has an invalid price -1");
}

#[test]
fn it_formats_summary_lines() -> Result<()> {
    let property: serde_json::Value = serde_json::from_str(property_fixture())?;
    let card = PropertyCardData::from_property(&property)?;

    insta::assert_snapshot!(card.summary_line(), @"₱8,500,000 · Condominium · 2 bd · 1 ba · 64.5 sqm");
    return Ok(());
}

#[test]
fn it_formats_prices() {
    assert_eq!(format_price(0.0), "₱0");
    assert_eq!(format_price(999.0), "₱999");
    assert_eq!(format_price(1000.0), "₱1,000");
    assert_eq!(format_price(1234567.5), "₱1,234,567.50");
}

#[test]
fn it_extracts_panoramic_images_from_properties() -> Result<()> {
    let property: serde_json::Value = serde_json::from_str(property_fixture())?;
    let images = PanoramicImage::from_property(&property);

    assert_eq!(images.len(), 2);
    assert_eq!(images[0].title, "living-room.jpg");
    assert_eq!(images[1].title, "Panoramic View");
    assert_eq!(
        images[1].url,
        "https://cdn.example.com/prop-42/bedroom-360.jpg"
    );

    return Ok(());
}

#[test]
fn it_falls_back_to_legacy_panoramic_images() {
    let property = json!({
        "images": [{ "url": "https://cdn.example.com/a.jpg", "imageType": "regular" }],
        "panoramicImages": [
            { "url": "https://cdn.example.com/legacy.jpg", "title": "Kitchen" }
        ]
    });

    let images = PanoramicImage::from_property(&property);
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].title, "Kitchen");
}

#[test]
fn it_extracts_panoramic_images_from_staging_sessions() {
    let nested = json!({
        "session": { "panoramic_images": ["https://cdn.example.com/staged-1.jpg"] }
    });
    let top_level = json!({
        "session": {},
        "panoramic_images": [{ "url": "https://cdn.example.com/staged-2.jpg" }]
    });

    assert_eq!(
        PanoramicImage::from_staging_session(&nested)[0].url,
        "https://cdn.example.com/staged-1.jpg"
    );
    assert_eq!(
        PanoramicImage::from_staging_session(&top_level)[0].url,
        "https://cdn.example.com/staged-2.jpg"
    );
    assert!(PanoramicImage::from_staging_session(&json!({})).is_empty());
}
