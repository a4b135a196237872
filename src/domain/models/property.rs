#[cfg(test)]
#[path = "property_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertyImageRef {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCardData {
    pub property_id: String,
    pub name: String,
    pub price: f64,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_area: Option<f64>,
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PropertyImageRef>,
}

impl PropertyCardData {
    pub fn from_property(property: &Value) -> Result<PropertyCardData> {
        let card: PropertyCardData = serde_json::from_value(property.clone())?;
        if card.property_id.is_empty() {
            bail!("Property payload is missing a propertyId");
        }
        if card.price < 0.0 || !card.price.is_finite() {
            bail!(format!(
                "Property {} has an invalid price {}",
                card.property_id, card.price
            ));
        }

        return Ok(card);
    }

    pub fn summary_line(&self) -> String {
        let mut parts = vec![self.property_type.to_string()];
        if let Some(bedrooms) = self.bedrooms {
            parts.push(format!("{bedrooms} bd"));
        }
        if let Some(bathrooms) = self.bathrooms {
            parts.push(format!("{bathrooms} ba"));
        }
        if let Some(floor_area) = self.floor_area {
            parts.push(format!("{floor_area} sqm"));
        }

        return format!("{} · {}", format_price(self.price), parts.join(" · "));
    }
}

pub fn format_price(price: f64) -> String {
    let whole = price.trunc() as u64;
    let digits = whole.to_string();
    let mut grouped = String::new();
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let fraction = price - price.trunc();
    if fraction.abs() > f64::EPSILON {
        return format!("₱{grouped}{}", &format!("{fraction:.2}")[1..]);
    }

    return format!("₱{grouped}");
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanoramicImage {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl PanoramicImage {
    /// Panoramic views of a property. Images tagged `panoramic` in the
    /// `images` array win over the legacy `panoramicImages` list.
    pub fn from_property(property: &Value) -> Vec<PanoramicImage> {
        let extracted = property
            .get("images")
            .and_then(|images| return images.as_array())
            .map(|images| {
                return images
                    .iter()
                    .filter(|image| {
                        return image.get("imageType").and_then(|t| return t.as_str())
                            == Some("panoramic");
                    })
                    .filter_map(|image| {
                        let url = image.get("url")?.as_str()?;
                        let mut title = image
                            .get("filename")
                            .and_then(|f| return f.as_str())
                            .unwrap_or_default()
                            .to_string();
                        if title.is_empty() {
                            title = "Panoramic View".to_string();
                        }

                        return Some(PanoramicImage {
                            url: url.to_string(),
                            title,
                            description: "".to_string(),
                        });
                    })
                    .collect::<Vec<PanoramicImage>>();
            })
            .unwrap_or_default();

        if !extracted.is_empty() {
            return extracted;
        }

        return PanoramicImage::from_list(property.get("panoramicImages"));
    }

    pub fn from_staging_session(response: &Value) -> Vec<PanoramicImage> {
        let from_session =
            PanoramicImage::from_list(response.get("session").and_then(|s| {
                return s.get("panoramic_images");
            }));
        if !from_session.is_empty() {
            return from_session;
        }

        return PanoramicImage::from_list(response.get("panoramic_images"));
    }

    fn from_list(list: Option<&Value>) -> Vec<PanoramicImage> {
        let items = match list.and_then(|l| return l.as_array()) {
            Some(items) => items,
            None => return vec![],
        };

        return items
            .iter()
            .filter_map(|item| {
                if let Some(url) = item.as_str() {
                    return Some(PanoramicImage {
                        url: url.to_string(),
                        title: "Panoramic View".to_string(),
                        description: "".to_string(),
                    });
                }

                let mut image: PanoramicImage = serde_json::from_value(item.clone()).ok()?;
                if image.title.is_empty() {
                    image.title = "Panoramic View".to_string();
                }
                return Some(image);
            })
            .collect();
    }
}
