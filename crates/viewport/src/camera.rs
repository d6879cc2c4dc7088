//! Orbit camera controller
//!
//! Controls:
//! - Primary drag: orbit around the target
//! - Shift + primary drag: pan the target in screen-aligned directions
//! - Wheel: dolly toward / away from the target
//!
//! The pose is stored as spherical coordinates (distance, theta, phi) around
//! a target point; the Cartesian position is derived on demand, so every
//! mutation "repositions" the camera by construction.

use atelier_config::CameraSettings;
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Ray;

/// Spherical camera parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// Point the camera orbits around and looks at
    pub target: DVec3,
    /// Distance from target, never below the configured floor
    pub distance: f64,
    /// Azimuth around the Y axis, measured from +X toward +Z
    pub theta: f64,
    /// Polar angle from +Y, kept strictly between the poles
    pub phi: f64,
}

/// Where the camera is and what it looks at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: DVec3,
    pub look_at: DVec3,
}

/// World-space camera axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub right: DVec3,
    pub up: DVec3,
    pub forward: DVec3,
}

/// Camera orbit controller
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    state: CameraState,
    settings: CameraSettings,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}

impl OrbitCamera {
    /// Out-of-range settings fall back to their defaults
    pub fn new(settings: CameraSettings) -> Self {
        let settings = settings.clamped();
        let state = Self::initial_state(&settings);
        let mut camera = Self { state, settings };
        camera.sanitize();
        camera
    }

    fn initial_state(settings: &CameraSettings) -> CameraState {
        CameraState {
            target: DVec3::ZERO,
            distance: settings.distance,
            theta: settings.theta,
            phi: settings.phi,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Replace the pose; values are clamped exactly as after any other mutation
    pub fn set_state(&mut self, state: CameraState) {
        self.state = state;
        self.sanitize();
    }

    fn min_phi(&self) -> f64 {
        self.settings.phi_margin
    }

    fn max_phi(&self) -> f64 {
        std::f64::consts::PI - self.settings.phi_margin
    }

    /// Enforce the pose invariants. Non-finite values fall back to the starting pose.
    pub fn sanitize(&mut self) {
        let defaults = Self::initial_state(&self.settings);
        if !self.state.target.is_finite() {
            self.state.target = defaults.target;
        }
        if !self.state.distance.is_finite() {
            self.state.distance = defaults.distance;
        }
        if !self.state.theta.is_finite() {
            self.state.theta = defaults.theta;
        }
        if !self.state.phi.is_finite() {
            self.state.phi = defaults.phi;
        }
        self.state.phi = self.state.phi.clamp(self.min_phi(), self.max_phi());
        self.state.distance = self.state.distance.max(self.settings.min_distance);
    }

    /// Camera position from the spherical parameters
    pub fn position(&self) -> DVec3 {
        let CameraState {
            target,
            distance,
            theta,
            phi,
        } = self.state;
        target
            + distance
                * DVec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
    }

    pub fn current_pose(&self) -> CameraPose {
        CameraPose {
            position: self.position(),
            look_at: self.state.target,
        }
    }

    /// Right/up/forward axes of a camera at `position()` looking at the target with +Y up
    pub fn basis(&self) -> CameraBasis {
        let forward = (self.state.target - self.position()).normalize();
        // phi never reaches a pole, so forward is never parallel to +Y
        let right = forward.cross(DVec3::Y).normalize();
        let up = right.cross(forward);
        CameraBasis { right, up, forward }
    }

    /// Orbit by a pointer delta in pixels
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        self.state.theta += dx * self.settings.rotate_speed;
        self.state.phi -= dy * self.settings.rotate_speed;
        self.sanitize();
    }

    /// Move the target along the camera's screen-aligned axes
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let basis = self.basis();
        let speed = self.settings.pan_speed;
        let offset = basis.right * (dx * speed) + basis.up * (-dy * speed);
        self.state.target += offset;
        self.sanitize();
    }

    /// Dolly by one wheel notch.
    ///
    /// Positive delta (wheel down) moves closer, negative moves away; zero is a no-op.
    pub fn zoom(&mut self, delta_sign: f64) {
        let factor = self.settings.zoom_factor;
        if delta_sign > 0.0 {
            self.state.distance *= factor;
        } else if delta_sign < 0.0 {
            self.state.distance /= factor;
        } else {
            return;
        }
        self.sanitize();
        debug!("Camera zoom: distance {:.2}", self.state.distance);
    }

    /// Return to the configured starting pose
    pub fn reset(&mut self) {
        self.state = Self::initial_state(&self.settings);
        self.sanitize();
    }

    /// Perspective ray from the camera through a point in normalized device coordinates
    pub fn ray_through(&self, ndc: DVec2, aspect: f64) -> Ray {
        let basis = self.basis();
        let half_height = (self.settings.fov_degrees.to_radians() * 0.5).tan();
        let half_width = half_height * aspect;
        let direction = basis.forward
            + basis.right * (ndc.x * half_width)
            + basis.up * (ndc.y * half_height);
        Ray::new(self.position(), direction)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_4, PI};

    use super::*;

    const EPS: f64 = 1e-9;

    /// Small deterministic generator so sequences are reproducible
    struct Lcg(u64);

    impl Lcg {
        fn next_f64(&mut self) -> f64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (self.0 >> 11) as f64 / (1u64 << 53) as f64
        }

        /// Uniform in [-range, range)
        fn signed(&mut self, range: f64) -> f64 {
            (self.next_f64() * 2.0 - 1.0) * range
        }
    }

    #[test]
    fn test_default_pose() {
        let camera = OrbitCamera::default();
        let state = camera.state();
        assert_eq!(state.distance, 8.66);
        assert_eq!(state.theta, FRAC_PI_4);
        assert_eq!(state.phi, FRAC_PI_4);
        assert_eq!(camera.current_pose().look_at, DVec3::ZERO);
    }

    #[test]
    fn test_rotate_scenario() {
        let mut camera = OrbitCamera::default();
        camera.rotate(100.0, 0.0);
        assert!((camera.state().theta - (FRAC_PI_4 + 0.5)).abs() < EPS);
        assert_eq!(camera.state().phi, FRAC_PI_4);

        let theta = FRAC_PI_4 + 0.5;
        let phi = FRAC_PI_4;
        let expected = 8.66 * DVec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
        assert!((camera.position() - expected).length() < EPS);
    }

    #[test]
    fn test_phi_is_clamped() {
        let mut camera = OrbitCamera::default();
        camera.rotate(0.0, -10_000.0);
        assert!((camera.state().phi - (PI - 0.1)).abs() < EPS);
        camera.rotate(0.0, 10_000.0);
        assert!((camera.state().phi - 0.1).abs() < EPS);
    }

    #[test]
    fn test_zoom_in_floors_and_zoom_out_is_unbounded() {
        let mut camera = OrbitCamera::default();
        camera.zoom(1.0);
        assert!((camera.state().distance - 8.66 * 0.95).abs() < EPS);

        for _ in 0..500 {
            camera.zoom(1.0);
        }
        assert_eq!(camera.state().distance, 0.1);

        let mut camera = OrbitCamera::default();
        for _ in 0..200 {
            camera.zoom(-1.0);
        }
        assert!(camera.state().distance > 8.66 * 1000.0);
    }

    #[test]
    fn test_out_of_range_settings_keep_invariants() {
        let mut camera = OrbitCamera::new(CameraSettings {
            phi_margin: 2.0,
            min_distance: -1.0,
            zoom_factor: 1.5,
            ..CameraSettings::default()
        });
        camera.rotate(0.0, 10_000.0);
        assert!((camera.state().phi - 0.1).abs() < EPS);
        camera.rotate(0.0, -10_000.0);
        assert!((camera.state().phi - (PI - 0.1)).abs() < EPS);

        for _ in 0..200 {
            camera.zoom(1.0);
        }
        assert!(camera.state().distance >= 0.1);
        assert_eq!(camera.state().distance, 0.1);

        let camera = OrbitCamera::new(CameraSettings {
            zoom_factor: 0.0,
            ..CameraSettings::default()
        });
        assert_eq!(camera.settings().zoom_factor, 0.95);
    }

    #[test]
    fn test_zoom_zero_is_noop() {
        let mut camera = OrbitCamera::default();
        camera.zoom(0.0);
        assert_eq!(camera.state().distance, 8.66);
    }

    #[test]
    fn test_pan_moves_along_screen_axes() {
        let mut camera = OrbitCamera::default();
        let basis = camera.basis();
        camera.pan(100.0, 0.0);
        assert!((camera.state().target - basis.right).length() < EPS);

        let mut camera = OrbitCamera::default();
        camera.pan(0.0, -100.0);
        assert!((camera.state().target - basis.up).length() < EPS);
        // Panning never changes the orbit itself
        assert_eq!(camera.state().distance, 8.66);
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let mut camera = OrbitCamera::default();
        camera.rotate(321.0, 77.0);
        let b = camera.basis();
        assert!((b.right.length() - 1.0).abs() < EPS);
        assert!((b.up.length() - 1.0).abs() < EPS);
        assert!(b.right.dot(b.up).abs() < EPS);
        assert!(b.right.dot(b.forward).abs() < EPS);
        assert!(b.up.y > 0.0);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = OrbitCamera::default();
        let ray = camera.ray_through(DVec2::ZERO, 16.0 / 9.0);
        assert!((ray.direction - camera.basis().forward).length() < EPS);
        assert!((ray.origin - camera.position()).length() < EPS);
    }

    #[test]
    fn test_random_sequences_keep_invariants() {
        let mut rng = Lcg(0x5eed);
        for _ in 0..50 {
            let mut camera = OrbitCamera::default();
            for _ in 0..200 {
                match (rng.next_f64() * 3.0) as u32 {
                    0 => camera.rotate(rng.signed(2000.0), rng.signed(2000.0)),
                    1 => camera.pan(rng.signed(500.0), rng.signed(500.0)),
                    _ => camera.zoom(rng.signed(1.0)),
                }
                let state = camera.state();
                assert!(state.phi >= 0.1 && state.phi <= PI - 0.1);
                assert!(state.distance >= 0.1);
                assert!(camera.position().is_finite());
            }
        }
    }

    #[test]
    fn test_non_finite_input_is_repaired() {
        let mut camera = OrbitCamera::default();
        camera.rotate(f64::NAN, f64::INFINITY);
        assert!(camera.state().theta.is_finite());
        assert!(camera.state().phi >= 0.1);
        camera.set_state(CameraState {
            target: DVec3::new(f64::NAN, 0.0, 0.0),
            distance: -3.0,
            theta: 0.0,
            phi: 0.0,
        });
        assert_eq!(camera.state().target, DVec3::ZERO);
        assert_eq!(camera.state().distance, 0.1);
        assert_eq!(camera.state().phi, 0.1);
    }

    #[test]
    fn test_reset() {
        let mut camera = OrbitCamera::default();
        camera.rotate(50.0, 50.0);
        camera.pan(10.0, 10.0);
        camera.zoom(1.0);
        camera.reset();
        assert_eq!(*camera.state(), *OrbitCamera::default().state());
    }
}
