use std::env;

pub fn insta_snapshot<F: FnOnce()>(f: F) {
    let mut settings = insta::Settings::clone_current();
    let snapshot_path = env::current_dir().unwrap().join("./test/snapshots");
    settings.set_snapshot_path(snapshot_path);
    settings.bind(f);
}

/// Property payload as returned by the marketplace backend.
pub fn property_fixture() -> &'static str {
    return r#"
{
  "propertyId": "prop-42",
  "name": "Azure Residences 2BR",
  "address": "Seaside Blvd, Pasay City",
  "price": 8500000,
  "listingType": "sale",
  "propertyType": "Condominium",
  "bedrooms": 2,
  "bathrooms": 1,
  "floorArea": 64.5,
  "yearBuilt": 2015,
  "image": {
    "id": "img-1",
    "filename": "front.jpg",
    "url": "https://cdn.example.com/prop-42/front.jpg",
    "thumbnailUrl": null,
    "imageType": "regular"
  },
  "images": [
    {
      "id": "img-1",
      "filename": "front.jpg",
      "url": "https://cdn.example.com/prop-42/front.jpg",
      "thumbnailUrl": null,
      "imageType": "regular"
    },
    {
      "id": "img-2",
      "filename": "living-room.jpg",
      "url": "https://cdn.example.com/prop-42/living-room-360.jpg",
      "thumbnailUrl": null,
      "imageType": "panoramic"
    },
    {
      "id": "img-3",
      "filename": "",
      "url": "https://cdn.example.com/prop-42/bedroom-360.jpg",
      "thumbnailUrl": null,
      "imageType": "panoramic"
    }
  ]
}
"#
    .trim();
}

/// Chat log persisted by an older build, with JavaScript style ISO timestamps.
pub fn chat_history_fixture() -> &'static str {
    return r#"
[
  {
    "id": "1",
    "text": "Hi! I'm Mark AI. How can I help you find your perfect property today?",
    "sender": "bot",
    "timestamp": "2024-05-01T09:00:00.000Z"
  },
  {
    "id": "1714554060000",
    "text": "Show me condos near the bay",
    "sender": "user",
    "timestamp": "2024-05-01T09:01:00.000Z"
  },
  {
    "id": "1714554065000",
    "text": "Here are two listings that match.",
    "sender": "bot",
    "timestamp": "2024-05-01T09:01:05.000Z",
    "properties": [
      {
        "propertyId": "prop-42",
        "name": "Azure Residences 2BR",
        "price": 8500000,
        "address": "Seaside Blvd, Pasay City",
        "bedrooms": 2,
        "bathrooms": 1,
        "floorArea": 64.5,
        "propertyType": "Condominium",
        "image": { "url": "https://cdn.example.com/prop-42/front.jpg" }
      }
    ]
  },
  {
    "id": "1714554070000_ctx",
    "text": "[SYSTEM INJECTION] User clicked/viewed property card. PROPERTY DATA: {\"propertyId\":\"prop-42\"}",
    "sender": "user",
    "timestamp": "2024-05-01T09:01:10.000Z",
    "isHidden": true
  }
]
"#
    .trim();
}
