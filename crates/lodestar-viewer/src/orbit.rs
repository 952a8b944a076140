//! Orbit camera controller.
//!
//! Left-drag rotates around the origin, the wheel zooms. Disabled while the
//! gizmo owns the pointer so a handle drag never also spins the camera.

use glam::Vec3;
use lodestar_engine::camera::Camera;
use lodestar_engine::input::{InputFrame, InputState, MouseButton};

/// Radians of rotation per logical pixel of drag.
const ROTATE_SPEED: f32 = 0.005;

/// Zoom multiplier per wheel line (scroll up moves closer).
const ZOOM_STEP: f32 = 0.9;

const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 500.0;

/// Maximum pitch magnitude, just shy of the poles to keep the up vector sane.
const MAX_PITCH: f32 = 1.55;

/// Spherical-coordinate orbit around the world origin.
pub struct OrbitController {
    yaw: f32,
    pitch: f32,
    distance: f32,
    /// Cleared by the app while the gizmo is dragging.
    pub enabled: bool,
}

impl OrbitController {
    pub fn new(yaw: f32, pitch: f32, distance: f32) -> Self {
        Self {
            yaw,
            pitch,
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            enabled: true,
        }
    }

    /// Consumes this frame's pointer/wheel deltas.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame) {
        if !self.enabled {
            return;
        }

        if input.button_down(MouseButton::Left) {
            let (dx, dy) = frame.pointer_delta;
            self.yaw -= dx * ROTATE_SPEED;
            self.pitch = (self.pitch + dy * ROTATE_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
        }

        if frame.wheel_lines != 0.0 {
            self.distance =
                (self.distance * ZOOM_STEP.powf(frame.wheel_lines)).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }

    /// Writes the orbit position into the camera, looking at the origin.
    pub fn apply_to(&self, camera: &mut Camera) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();

        camera.position = Vec3::new(
            self.distance * cos_pitch * sin_yaw,
            self.distance * sin_pitch,
            self.distance * cos_pitch * cos_yaw,
        );
        camera.target = Vec3::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::perspective(Vec3::new(0.0, 0.0, 30.0), 45.0, 16.0 / 9.0, 1.0, 10_000.0)
    }

    #[test]
    fn rest_position_is_on_positive_z() {
        let orbit = OrbitController::new(0.0, 0.0, 30.0);
        let mut cam = camera();
        orbit.apply_to(&mut cam);
        assert_relative_eq!(cam.position.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(cam.position.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(cam.position.z, 30.0, epsilon = 1e-5);
    }

    #[test]
    fn quarter_yaw_moves_to_positive_x() {
        let orbit = OrbitController::new(std::f32::consts::FRAC_PI_2, 0.0, 10.0);
        let mut cam = camera();
        orbit.apply_to(&mut cam);
        assert_relative_eq!(cam.position.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(cam.position.z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn pitch_clamps_short_of_the_pole() {
        let mut orbit = OrbitController::new(0.0, 0.0, 10.0);
        let mut input = InputState::default();
        input.buttons_down.insert(MouseButton::Left);

        let mut frame = InputFrame::default();
        frame.pointer_delta = (0.0, 1e6);
        orbit.update(&input, &frame);

        assert!(orbit.pitch <= MAX_PITCH);
    }

    #[test]
    fn zoom_clamps_at_min_distance() {
        let mut orbit = OrbitController::new(0.0, 0.0, 3.0);
        let input = InputState::default();

        let mut frame = InputFrame::default();
        frame.wheel_lines = 50.0;
        orbit.update(&input, &frame);

        assert_relative_eq!(orbit.distance, MIN_DISTANCE, epsilon = 1e-6);
    }

    #[test]
    fn disabled_controller_ignores_input() {
        let mut orbit = OrbitController::new(0.0, 0.0, 10.0);
        orbit.enabled = false;

        let mut input = InputState::default();
        input.buttons_down.insert(MouseButton::Left);
        let mut frame = InputFrame::default();
        frame.pointer_delta = (100.0, 100.0);
        frame.wheel_lines = 5.0;

        orbit.update(&input, &frame);
        assert_eq!(orbit.yaw, 0.0);
        assert_eq!(orbit.distance, 10.0);
    }
}
