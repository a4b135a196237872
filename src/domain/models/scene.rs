#[cfg(test)]
#[path = "scene_test.rs"]
mod tests;

use std::fmt;
use std::sync::Arc;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

pub const PANORAMA_RADIUS: f64 = 500.0;
pub const PANORAMA_WIDTH_SEGMENTS: u32 = 60;
pub const PANORAMA_HEIGHT_SEGMENTS: u32 = 40;
pub const PLACEHOLDER_SIZE: f64 = 100.0;
pub const PLACEHOLDER_COLOR: u32 = 0x333333;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorSpace {
    Srgb,
    Linear,
}

#[derive(Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pixels: Vec<u8>,
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return f
            .debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("color_space", &self.color_space)
            .finish();
    }
}

impl Texture {
    pub fn from_rgb8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Texture> {
        if width == 0 || height == 0 {
            bail!("Texture has no pixels");
        }
        if pixels.len() != (width as usize) * (height as usize) * 3 {
            bail!(format!(
                "Texture buffer of {} bytes does not match {width}x{height}",
                pixels.len()
            ));
        }

        return Ok(Texture {
            width,
            height,
            color_space: ColorSpace::Srgb,
            pixels,
        });
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * 3;

        return [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]];
    }

    /// Nearest-neighbour sample with `u` wrapping horizontally and `v`
    /// measured from the top row.
    pub fn sample(&self, u: f64, v: f64) -> [u8; 3] {
        let u = u.rem_euclid(1.0);
        let v = v.clamp(0.0, 1.0);
        let x = (u * self.width as f64).floor() as u32;
        let y = (v * self.height as f64).floor() as u32;

        return self.pixel(x, y);
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Geometry {
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
    Cube {
        size: f64,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub map: Option<Arc<Texture>>,
    pub color: u32,
    pub side: Side,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
}

impl Mesh {
    pub fn panorama(texture: Arc<Texture>) -> Mesh {
        return Mesh {
            geometry: Geometry::Sphere {
                radius: PANORAMA_RADIUS,
                width_segments: PANORAMA_WIDTH_SEGMENTS,
                height_segments: PANORAMA_HEIGHT_SEGMENTS,
            },
            material: Material {
                map: Some(texture),
                color: 0xffffff,
                side: Side::Back,
            },
        };
    }

    pub fn placeholder() -> Mesh {
        return Mesh {
            geometry: Geometry::Cube {
                size: PLACEHOLDER_SIZE,
            },
            material: Material {
                map: None,
                color: PLACEHOLDER_COLOR,
                side: Side::Front,
            },
        };
    }
}

pub fn color_to_rgb(color: u32) -> [u8; 3] {
    return [
        ((color >> 16) & 0xff) as u8,
        ((color >> 8) & 0xff) as u8,
        (color & 0xff) as u8,
    ];
}

/// Fetches and decodes remote images into textures.
#[async_trait]
pub trait TextureLoader {
    async fn load(&self, image_url: &str) -> Result<Texture>;
}

pub type TextureLoaderBox = Arc<dyn TextureLoader + Send + Sync>;
