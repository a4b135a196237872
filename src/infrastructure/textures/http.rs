#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Texture;
use crate::domain::models::TextureLoader;

pub struct HttpTextureLoader {
    timeout: String,
}

impl Default for HttpTextureLoader {
    fn default() -> HttpTextureLoader {
        return HttpTextureLoader {
            timeout: Config::get(ConfigKey::RequestTimeout),
        };
    }
}

pub fn decode(bytes: &[u8]) -> Result<Texture> {
    let img = image::load_from_memory(bytes)?.to_rgb8();
    let (width, height) = img.dimensions();

    return Texture::from_rgb8(width, height, img.into_raw());
}

#[async_trait]
impl TextureLoader for HttpTextureLoader {
    #[allow(clippy::implicit_return)]
    async fn load(&self, image_url: &str) -> Result<Texture> {
        let res = reqwest::Client::new()
            .get(image_url)
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                url = image_url,
                "Panorama image request failed"
            );
            bail!(format!(
                "Panorama image request failed with status {}",
                res.status().as_u16()
            ));
        }

        let bytes = res.bytes().await?;
        let texture = decode(&bytes)?;
        tracing::debug!(
            width = texture.width,
            height = texture.height,
            "Panorama image decoded"
        );

        return Ok(texture);
    }
}
