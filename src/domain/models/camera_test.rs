use std::f64::consts::FRAC_PI_2;

use glam::DQuat;
use glam::DVec3;
use glam::EulerRot;

use super::Camera;

fn assert_vec_eq(a: DVec3, b: DVec3) {
    assert!(a.abs_diff_eq(b, 1e-9), "expected {b:?}, received {a:?}");
}

#[test]
fn it_starts_slightly_off_center_facing_the_origin() {
    let camera = Camera::default();

    assert_eq!(camera.position, DVec3::new(0.0, 0.0, 0.1));
    assert_eq!(camera.fov_deg, 75.0);
    assert_vec_eq(camera.forward(), DVec3::NEG_Z);
    assert!(camera.orientation.abs_diff_eq(DQuat::IDENTITY, 1e-12));
}

#[test]
fn it_looks_at_targets() {
    let mut camera = Camera::default();
    camera.position = DVec3::new(0.1, 0.0, 0.0);
    camera.look_at(DVec3::ZERO);

    assert_vec_eq(camera.forward(), DVec3::NEG_X);
}

#[test]
fn it_looks_straight_down_without_nans() {
    let mut camera = Camera::default();
    camera.position = DVec3::new(0.0, 0.1, 0.0);
    camera.look_at(DVec3::ZERO);

    let forward = camera.forward();
    assert!(forward.is_finite());
    assert!(forward.y < -0.99);
}

#[test]
fn it_applies_yaw_before_pitch() {
    // Yaw 90° then pitch 90°: the view still points straight up.
    let q = DQuat::from_euler(EulerRot::YXZ, FRAC_PI_2, FRAC_PI_2, 0.0);
    assert_vec_eq(q * DVec3::NEG_Z, DVec3::Y);
    // And the camera's right axis follows the yaw.
    assert_vec_eq(q * DVec3::X, DVec3::NEG_Z);
}

#[test]
fn it_casts_center_rays_along_forward() {
    let camera = Camera::default();
    assert_vec_eq(camera.ray_direction(0.0, 0.0, 1.5), camera.forward());

    let right = camera.ray_direction(1.0, 0.0, 1.0);
    assert!(right.x > 0.0);
    assert!(right.z < 0.0);
}
