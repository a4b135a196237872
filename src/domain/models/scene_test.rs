use std::sync::Arc;

use anyhow::Result;

use super::color_to_rgb;
use super::ColorSpace;
use super::Geometry;
use super::Mesh;
use super::Side;
use super::Texture;

fn checker() -> Result<Texture> {
    // 2x2: red, green / blue, white
    return Texture::from_rgb8(
        2,
        2,
        vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255],
    );
}

#[test]
fn it_rejects_mismatched_buffers() {
    assert!(Texture::from_rgb8(2, 2, vec![0; 11]).is_err());
    assert!(Texture::from_rgb8(0, 2, vec![]).is_err());
}

#[test]
fn it_samples_with_horizontal_wrapping() -> Result<()> {
    let texture = checker()?;

    assert_eq!(texture.color_space, ColorSpace::Srgb);
    assert_eq!(texture.sample(0.1, 0.1), [255, 0, 0]);
    assert_eq!(texture.sample(0.9, 0.1), [0, 255, 0]);
    assert_eq!(texture.sample(0.1, 0.9), [0, 0, 255]);
    assert_eq!(texture.sample(1.1, 0.9), [0, 0, 255]);
    assert_eq!(texture.sample(-0.1, 1.0), [255, 255, 255]);

    return Ok(());
}

#[test]
fn it_builds_the_panorama_sphere() -> Result<()> {
    let mesh = Mesh::panorama(Arc::new(checker()?));

    assert_eq!(
        mesh.geometry,
        Geometry::Sphere {
            radius: 500.0,
            width_segments: 60,
            height_segments: 40,
        }
    );
    assert_eq!(mesh.material.side, Side::Back);
    assert!(mesh.material.map.is_some());

    return Ok(());
}

#[test]
fn it_builds_the_gray_placeholder() {
    let mesh = Mesh::placeholder();

    assert_eq!(mesh.geometry, Geometry::Cube { size: 100.0 });
    assert!(mesh.material.map.is_none());
    assert_eq!(color_to_rgb(mesh.material.color), [0x33, 0x33, 0x33]);
}
