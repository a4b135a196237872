#[cfg(test)]
#[path = "rasterizer_test.rs"]
mod tests;

use std::f64::consts::PI;

use glam::DVec3;
use ratatui::prelude::Buffer;
use ratatui::prelude::Color;
use ratatui::prelude::Rect;
use ratatui::widgets::Widget;

use crate::domain::models::color_to_rgb;
use crate::domain::models::Camera;
use crate::domain::models::Geometry;
use crate::domain::models::Mesh;
use crate::domain::models::Texture;

const HALF_BLOCK: &str = "▀";
const EMPTY: [u8; 3] = [0, 0, 0];
const DIVIDER: [u8; 3] = [255, 255, 255];

/// Texture coordinates of a point on a sphere centered at the origin, laid
/// out the way an equirectangular image wraps a UV sphere. `v` is measured
/// from the top.
pub fn sphere_uv(point: DVec3, radius: f64) -> (f64, f64) {
    let u = (point.z.atan2(-point.x) / (2.0 * PI)).rem_euclid(1.0);
    let v = (point.y / radius).clamp(-1.0, 1.0).acos() / PI;

    return (u, v);
}

pub fn sample_ray(origin: DVec3, direction: DVec3, mesh: Option<&Mesh>) -> [u8; 3] {
    let mesh = match mesh {
        Some(mesh) => mesh,
        None => return EMPTY,
    };

    match mesh.geometry {
        Geometry::Sphere { radius, .. } => {
            let texture = match &mesh.material.map {
                Some(texture) => texture,
                None => return color_to_rgb(mesh.material.color),
            };

            let direction = direction.normalize_or_zero();
            let b = origin.dot(direction);
            let c = origin.length_squared() - radius * radius;
            let discriminant = b * b - c;
            if discriminant < 0.0 {
                return EMPTY;
            }

            let t = -b + discriminant.sqrt();
            let hit = origin + direction * t;
            let (u, v) = sphere_uv(hit, radius);

            return texture.sample(u, v);
        }
        Geometry::Cube { .. } => {
            return color_to_rgb(mesh.material.color);
        }
    }
}

fn rgb(color: [u8; 3]) -> Color {
    return Color::Rgb(color[0], color[1], color[2]);
}

// Each cell shows its top pixel as foreground and bottom pixel as background.
fn draw_half_blocks<F>(area: Rect, buf: &mut Buffer, pixel: F)
where
    F: Fn(u16, u16, u16, u16) -> [u8; 3],
{
    if area.width == 0 || area.height == 0 {
        return;
    }

    let pixel_height = area.height * 2;
    for row in 0..area.height {
        for col in 0..area.width {
            let top = pixel(col, row * 2, area.width, pixel_height);
            let bottom = pixel(col, row * 2 + 1, area.width, pixel_height);

            buf.get_mut(area.x + col, area.y + row)
                .set_symbol(HALF_BLOCK)
                .set_fg(rgb(top))
                .set_bg(rgb(bottom));
        }
    }
}

pub struct PanoramaWidget<'a> {
    pub camera: &'a Camera,
    pub mesh: Option<&'a Mesh>,
}

impl<'a> PanoramaWidget<'a> {
    pub fn pixel(&self, x: u16, y: u16, width: u16, pixel_height: u16) -> [u8; 3] {
        let aspect = width as f64 / pixel_height as f64;
        let ndc_x = ((x as f64 + 0.5) / width as f64) * 2.0 - 1.0;
        let ndc_y = 1.0 - ((y as f64 + 0.5) / pixel_height as f64) * 2.0;
        let direction = self.camera.ray_direction(ndc_x, ndc_y, aspect);

        return sample_ray(self.camera.position, direction, self.mesh);
    }
}

impl<'a> Widget for PanoramaWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        draw_half_blocks(area, buf, |x, y, width, pixel_height| {
            return self.pixel(x, y, width, pixel_height);
        });
    }
}

/// Before/after comparison. The before image covers the left `position`
/// percent, drawn at full width so it lines up with the after image.
pub struct CompareWidget<'a> {
    pub before: &'a Texture,
    pub after: &'a Texture,
    pub position: f64,
}

impl<'a> CompareWidget<'a> {
    pub fn split_column(&self, width: u16) -> u16 {
        let split = (self.position.clamp(0.0, 100.0) / 100.0 * width as f64).round() as u16;
        return split.min(width.saturating_sub(1));
    }

    pub fn pixel(&self, x: u16, y: u16, width: u16, pixel_height: u16) -> [u8; 3] {
        if x == self.split_column(width) {
            return DIVIDER;
        }

        let u = (x as f64 + 0.5) / width as f64;
        let v = (y as f64 + 0.5) / pixel_height as f64;
        if u * 100.0 < self.position {
            return self.before.sample(u, v);
        }

        return self.after.sample(u, v);
    }
}

impl<'a> Widget for CompareWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        draw_half_blocks(area, buf, |x, y, width, pixel_height| {
            return self.pixel(x, y, width, pixel_height);
        });
    }
}
