//! Translate gizmo.
//!
//! Three axis handles anchored at the target position. Picking works in
//! screen space (pointer distance to the projected handle segment); dragging
//! translates along the picked axis by closest approach between the pointer
//! ray and the axis line. Drag-start/drag-end is surfaced so the app can
//! pause the orbit controller while a handle owns the pointer.

use glam::{Vec2, Vec3};
use lodestar_engine::camera::{Camera, Ray};
use lodestar_engine::input::{InputFrame, InputState, MouseButton};
use lodestar_engine::paint::Color;
use lodestar_engine::scene::Segment;

/// Handle length in world units.
const HANDLE_LENGTH: f32 = 2.0;

/// Pick radius around a projected handle, in logical pixels.
const PICK_RADIUS: f32 = 8.0;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    const ALL: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    fn dir(self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::X,
            GizmoAxis::Y => Vec3::Y,
            GizmoAxis::Z => Vec3::Z,
        }
    }

    fn color(self, emphasized: bool) -> Color {
        let (r, g, b) = match self {
            GizmoAxis::X => (230, 60, 60),
            GizmoAxis::Y => (60, 200, 60),
            GizmoAxis::Z => (70, 110, 240),
        };
        if emphasized {
            Color::from_srgb_u8(255, 220, 80, 255)
        } else {
            Color::from_srgb_u8(r, g, b, 255)
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct DragState {
    axis: GizmoAxis,
    /// Gizmo position when the drag started; the axis line is anchored here.
    grab_position: Vec3,
    /// Axis-line parameter under the pointer at grab time.
    grab_t: f32,
}

/// Draggable translate controller owning the target position.
pub struct TransformGizmo {
    pub position: Vec3,
    hovered: Option<GizmoAxis>,
    drag: Option<DragState>,
}

impl TransformGizmo {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            hovered: None,
            drag: None,
        }
    }

    #[inline]
    pub fn hovered(&self) -> bool {
        self.hovered.is_some()
    }

    #[inline]
    pub fn dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Processes this frame's pointer input. `size` is the logical window
    /// size (the space pointer positions live in). Returns whether a drag is
    /// active after the update.
    pub fn update(
        &mut self,
        camera: &Camera,
        size: Vec2,
        input: &InputState,
        frame: &InputFrame,
    ) -> bool {
        let pointer = input.pointer_pos.map(|(x, y)| Vec2::new(x, y));

        // End the drag on release (or if the pointer left the window).
        if self.drag.is_some()
            && (frame.buttons_released.contains(&MouseButton::Left)
                || !input.button_down(MouseButton::Left))
        {
            self.drag = None;
        }

        if let Some(drag) = self.drag {
            if let Some(p) = pointer {
                let ray = camera.pointer_ray(p, size);
                if let Some(t) = closest_axis_param(drag.grab_position, drag.axis.dir(), &ray) {
                    self.position = drag.grab_position + drag.axis.dir() * (t - drag.grab_t);
                }
            }
            return true;
        }

        self.hovered = pointer.and_then(|p| self.pick(camera, size, p));

        if frame.buttons_pressed.contains(&MouseButton::Left) {
            if let (Some(axis), Some(p)) = (self.hovered, pointer) {
                let ray = camera.pointer_ray(p, size);
                if let Some(t) = closest_axis_param(self.position, axis.dir(), &ray) {
                    self.drag = Some(DragState {
                        axis,
                        grab_position: self.position,
                        grab_t: t,
                    });
                    return true;
                }
            }
        }

        false
    }

    /// Handle segments for the line renderer, with hover/active emphasis.
    pub fn segments(&self) -> [Segment; 3] {
        let active = self.drag.map(|d| d.axis).or(self.hovered);
        GizmoAxis::ALL.map(|axis| {
            Segment::new(
                self.position,
                self.position + axis.dir() * HANDLE_LENGTH,
                axis.color(active == Some(axis)),
            )
        })
    }

    /// Screen-space pick: nearest handle whose projected segment lies within
    /// the pick radius of the pointer.
    fn pick(&self, camera: &Camera, size: Vec2, pointer: Vec2) -> Option<GizmoAxis> {
        let mut best: Option<(GizmoAxis, f32)> = None;

        for axis in GizmoAxis::ALL {
            let a = camera.screen_of(self.position, size);
            let b = camera.screen_of(self.position + axis.dir() * HANDLE_LENGTH, size);
            let (Some(a), Some(b)) = (a, b) else { continue };

            let dist = point_segment_distance(pointer, a, b);
            if dist <= PICK_RADIUS && best.map_or(true, |(_, d)| dist < d) {
                best = Some((axis, dist));
            }
        }

        best.map(|(axis, _)| axis)
    }
}

/// Parameter along the axis line `origin + dir·t` closest to `ray`.
///
/// `None` when the ray runs parallel to the axis, where the closest-approach
/// system degenerates.
fn closest_axis_param(origin: Vec3, dir: Vec3, ray: &Ray) -> Option<f32> {
    let w = origin - ray.origin;
    let a = dir.dot(dir);
    let b = dir.dot(ray.dir);
    let c = ray.dir.dot(ray.dir);
    let d = dir.dot(w);
    let e = ray.dir.dot(w);

    let denom = a * c - b * b;
    if denom.abs() < 1e-6 {
        return None;
    }

    Some((b * e - c * d) / denom)
}

/// Distance from `p` to the 2D segment `ab`.
fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    fn camera() -> Camera {
        Camera::perspective(Vec3::new(0.0, 0.0, 30.0), 45.0, 1.0, 1.0, 10_000.0)
    }

    fn size() -> Vec2 {
        Vec2::new(800.0, 800.0)
    }

    fn pressed_state(pointer: Vec2) -> (InputState, InputFrame) {
        let mut input = InputState::default();
        input.pointer_pos = Some((pointer.x, pointer.y));
        input.buttons_down = HashSet::from([MouseButton::Left]);

        let mut frame = InputFrame::default();
        frame.buttons_pressed.insert(MouseButton::Left);
        (input, frame)
    }

    // ── math helpers ──────────────────────────────────────────────────────

    #[test]
    fn closest_param_on_x_axis() {
        let ray = Ray {
            origin: Vec3::new(2.0, 0.0, 10.0),
            dir: Vec3::new(0.0, 0.0, -1.0),
        };
        let t = closest_axis_param(Vec3::ZERO, Vec3::X, &ray).unwrap();
        assert_relative_eq!(t, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn parallel_ray_has_no_closest_param() {
        let ray = Ray {
            origin: Vec3::new(0.0, 1.0, 0.0),
            dir: Vec3::X,
        };
        assert!(closest_axis_param(Vec3::ZERO, Vec3::X, &ray).is_none());
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_relative_eq!(point_segment_distance(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_relative_eq!(point_segment_distance(Vec2::new(-4.0, 0.0), a, b), 4.0);
        assert_relative_eq!(point_segment_distance(Vec2::new(13.0, 4.0), a, b), 5.0);
    }

    // ── picking & dragging ────────────────────────────────────────────────

    #[test]
    fn pointer_over_x_handle_hovers_x() {
        let mut gizmo = TransformGizmo::new(Vec3::ZERO);
        let cam = camera();

        let handle_mid = cam
            .screen_of(Vec3::new(HANDLE_LENGTH * 0.5, 0.0, 0.0), size())
            .unwrap();

        let mut input = InputState::default();
        input.pointer_pos = Some((handle_mid.x, handle_mid.y));
        let frame = InputFrame::default();

        assert!(!gizmo.update(&cam, size(), &input, &frame));
        assert_eq!(gizmo.hovered, Some(GizmoAxis::X));
    }

    #[test]
    fn pointer_far_away_hovers_nothing() {
        let mut gizmo = TransformGizmo::new(Vec3::ZERO);
        let cam = camera();

        let mut input = InputState::default();
        input.pointer_pos = Some((10.0, 10.0));
        let frame = InputFrame::default();

        gizmo.update(&cam, size(), &input, &frame);
        assert_eq!(gizmo.hovered, None);
    }

    #[test]
    fn drag_along_x_translates_the_target() {
        let mut gizmo = TransformGizmo::new(Vec3::ZERO);
        let cam = camera();

        let grab = cam
            .screen_of(Vec3::new(HANDLE_LENGTH * 0.5, 0.0, 0.0), size())
            .unwrap();

        let (input, frame) = pressed_state(grab);
        assert!(gizmo.update(&cam, size(), &input, &frame));

        // Move the pointer to where world (3, 0, 0) projects; the target
        // should follow by the same world-space offset.
        let dest = cam
            .screen_of(Vec3::new(3.0 + HANDLE_LENGTH * 0.5, 0.0, 0.0), size())
            .unwrap();

        let mut input = InputState::default();
        input.pointer_pos = Some((dest.x, dest.y));
        input.buttons_down = HashSet::from([MouseButton::Left]);
        let frame = InputFrame::default();

        assert!(gizmo.update(&cam, size(), &input, &frame));
        assert_relative_eq!(gizmo.position.x, 3.0, epsilon = 1e-3);
        assert_relative_eq!(gizmo.position.y, 0.0, epsilon = 1e-3);
        assert_relative_eq!(gizmo.position.z, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn release_ends_the_drag() {
        let mut gizmo = TransformGizmo::new(Vec3::ZERO);
        let cam = camera();

        let grab = cam
            .screen_of(Vec3::new(HANDLE_LENGTH * 0.5, 0.0, 0.0), size())
            .unwrap();
        let (input, frame) = pressed_state(grab);
        gizmo.update(&cam, size(), &input, &frame);
        assert!(gizmo.dragging());

        let mut input = InputState::default();
        input.pointer_pos = Some((grab.x, grab.y));
        let mut frame = InputFrame::default();
        frame.buttons_released.insert(MouseButton::Left);

        assert!(!gizmo.update(&cam, size(), &input, &frame));
        assert!(!gizmo.dragging());
    }

    #[test]
    fn active_handle_is_emphasized() {
        let mut gizmo = TransformGizmo::new(Vec3::ZERO);
        let cam = camera();

        let grab = cam
            .screen_of(Vec3::new(HANDLE_LENGTH * 0.5, 0.0, 0.0), size())
            .unwrap();
        let (input, frame) = pressed_state(grab);
        gizmo.update(&cam, size(), &input, &frame);

        let segments = gizmo.segments();
        assert_eq!(segments[0].color, GizmoAxis::X.color(true));
        assert_eq!(segments[1].color, GizmoAxis::Y.color(false));
    }
}
