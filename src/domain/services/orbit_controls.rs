#[cfg(test)]
#[path = "orbit_controls_test.rs"]
mod tests;

use std::f64::consts::PI;

use glam::DVec3;

use crate::domain::models::Camera;
use crate::domain::models::PANORAMA_RADIUS;

const EPS: f64 = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OrbitSettings {
    pub enable_zoom: bool,
    pub enable_damping: bool,
    pub damping_factor: f64,
    pub rotate_speed: f64,
    pub zoom_speed: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl Default for OrbitSettings {
    fn default() -> OrbitSettings {
        return OrbitSettings {
            enable_zoom: true,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 0.4,
            zoom_speed: 1.0,
            min_distance: 0.01,
            max_distance: PANORAMA_RADIUS * 0.9,
        };
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OrbitInput {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    Wheel { delta_y: f64 },
}

/// Camera position around the target as radius, polar angle from +Y and
/// azimuth around +Y measured from +Z.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Spherical {
    pub radius: f64,
    pub phi: f64,
    pub theta: f64,
}

impl Spherical {
    pub fn from_offset(offset: DVec3) -> Spherical {
        let radius = offset.length();
        if radius == 0.0 {
            return Spherical {
                radius,
                phi: 0.0,
                theta: 0.0,
            };
        }

        return Spherical {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        };
    }

    pub fn to_offset(self) -> DVec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        return DVec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        );
    }
}

pub struct OrbitControls {
    pub settings: OrbitSettings,
    target: DVec3,
    delta_theta: f64,
    delta_phi: f64,
    scale: f64,
    pointer: Option<(f64, f64)>,
}

impl Default for OrbitControls {
    fn default() -> OrbitControls {
        return OrbitControls::new(OrbitSettings::default());
    }
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings) -> OrbitControls {
        return OrbitControls {
            settings,
            target: DVec3::ZERO,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pointer: None,
        };
    }

    pub fn is_dragging(&self) -> bool {
        return self.pointer.is_some();
    }

    /// Drags rotate by a full turn per viewport height, scaled by the rotate
    /// speed.
    pub fn handle(&mut self, input: OrbitInput, viewport_height: f64) {
        match input {
            OrbitInput::PointerDown { x, y } => {
                self.pointer = Some((x, y));
            }
            OrbitInput::PointerMove { x, y } => {
                let (start_x, start_y) = match self.pointer {
                    Some(start) => start,
                    None => return,
                };
                self.pointer = Some((x, y));
                if viewport_height <= 0.0 {
                    return;
                }

                let dx = (x - start_x) * self.settings.rotate_speed;
                let dy = (y - start_y) * self.settings.rotate_speed;
                self.delta_theta -= 2.0 * PI * dx / viewport_height;
                self.delta_phi -= 2.0 * PI * dy / viewport_height;
            }
            OrbitInput::PointerUp => {
                self.pointer = None;
            }
            OrbitInput::Wheel { delta_y } => {
                if !self.settings.enable_zoom || delta_y == 0.0 {
                    return;
                }

                let zoom_scale = 0.95_f64.powf(self.settings.zoom_speed);
                if delta_y < 0.0 {
                    self.scale *= zoom_scale;
                } else {
                    self.scale /= zoom_scale;
                }
            }
        }
    }

    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let before = camera.position;
        let mut spherical = Spherical::from_offset(camera.position - self.target);

        if self.settings.enable_damping {
            spherical.theta += self.delta_theta * self.settings.damping_factor;
            spherical.phi += self.delta_phi * self.settings.damping_factor;
        } else {
            spherical.theta += self.delta_theta;
            spherical.phi += self.delta_phi;
        }

        spherical.phi = spherical.phi.clamp(EPS, PI - EPS);
        spherical.radius = (spherical.radius * self.scale)
            .clamp(self.settings.min_distance, self.settings.max_distance);

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.settings.enable_damping {
            self.delta_theta *= 1.0 - self.settings.damping_factor;
            self.delta_phi *= 1.0 - self.settings.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;

        return before.distance(camera.position) > EPS;
    }

    pub fn reset(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pointer = None;
    }
}
