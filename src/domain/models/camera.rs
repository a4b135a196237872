#[cfg(test)]
#[path = "camera_test.rs"]
mod tests;

use glam::DMat3;
use glam::DQuat;
use glam::DVec3;

/// Perspective camera looking down its local -Z axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: DVec3,
    pub orientation: DQuat,
    pub fov_deg: f64,
}

impl Default for Camera {
    fn default() -> Camera {
        let mut camera = Camera {
            position: DVec3::new(0.0, 0.0, 0.1),
            orientation: DQuat::IDENTITY,
            fov_deg: 75.0,
        };
        camera.look_at(DVec3::ZERO);

        return camera;
    }
}

impl Camera {
    pub fn look_at(&mut self, target: DVec3) {
        let mut z = (self.position - target).normalize_or_zero();
        if z == DVec3::ZERO {
            z = DVec3::Z;
        }

        let mut x = DVec3::Y.cross(z);
        if x.length_squared() < 1e-20 {
            // Straight up or down has no right axis.
            z = (z + DVec3::new(0.0, 0.0, 1e-4)).normalize();
            x = DVec3::Y.cross(z);
        }
        let x = x.normalize();
        let y = z.cross(x);

        self.orientation = DQuat::from_mat3(&DMat3::from_cols(x, y, z)).normalize();
    }

    pub fn forward(&self) -> DVec3 {
        return self.orientation * DVec3::NEG_Z;
    }

    /// World space ray through normalized device coordinates in `[-1, 1]`.
    pub fn ray_direction(&self, ndc_x: f64, ndc_y: f64, aspect: f64) -> DVec3 {
        let half_height = (self.fov_deg.to_radians() * 0.5).tan();
        let local = DVec3::new(ndc_x * half_height * aspect, ndc_y * half_height, -1.0).normalize();

        return self.orientation * local;
    }
}
