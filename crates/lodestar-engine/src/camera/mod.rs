//! 3D perspective camera.
//!
//! Right-handed, +Y up world space. Projection targets wgpu's NDC convention
//! (x/y in [-1, 1], z in [0, 1]). Matrices are computed on demand; the camera
//! is small enough that caching would buy nothing here.

use glam::{Mat4, Vec2, Vec3, Vec4};

/// A world-space ray, used for pointer picking.
#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Perspective camera described by position, look-at target, and frustum
/// parameters.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector, typically +Y.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport aspect ratio (width / height), refreshed every frame.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Creates a perspective camera looking at the origin.
    pub fn perspective(position: Vec3, fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect.max(1e-6), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Projects a world-space point to NDC. `None` when the point is at or
    /// behind the camera plane (w ≤ 0), where the divide is meaningless.
    pub fn ndc_of(&self, point: Vec3) -> Option<Vec3> {
        let clip = self.view_projection() * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    /// Projects a world-space point to window coordinates (top-left origin),
    /// in the same units as `size` — pass the logical window size to compare
    /// against pointer positions.
    pub fn screen_of(&self, point: Vec3, size: Vec2) -> Option<Vec2> {
        let ndc = self.ndc_of(point)?;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * size.x,
            (1.0 - ndc.y) * 0.5 * size.y,
        ))
    }

    /// Ray from the camera through a window position (top-left origin, same
    /// units as `size`).
    pub fn pointer_ray(&self, pointer: Vec2, size: Vec2) -> Ray {
        let ndc = Vec2::new(
            pointer.x / size.x.max(1.0) * 2.0 - 1.0,
            1.0 - pointer.y / size.y.max(1.0) * 2.0,
        );

        let inv = self.view_projection().inverse();
        // wgpu NDC: near plane at z = 0, far plane at z = 1.
        let near = inv * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        Ray {
            origin: near,
            dir: (far - near).normalize_or_zero(),
        }
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
    fn look_at_point_projects_to_center() {
        let ndc = camera().ndc_of(Vec3::ZERO).unwrap();
        assert_relative_eq!(ndc.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(ndc.y, 0.0, epsilon = 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn point_behind_camera_does_not_project() {
        assert!(camera().ndc_of(Vec3::new(0.0, 0.0, 40.0)).is_none());
    }

    #[test]
    fn wider_aspect_shrinks_horizontal_ndc() {
        let mut narrow = camera();
        narrow.aspect = 1.0;
        let mut wide = camera();
        wide.aspect = 2.0;

        let p = Vec3::new(5.0, 0.0, 0.0);
        let x_narrow = narrow.ndc_of(p).unwrap().x;
        let x_wide = wide.ndc_of(p).unwrap().x;
        assert!(x_wide < x_narrow);
    }

    #[test]
    fn screen_center_round_trips_through_ray() {
        let cam = camera();
        let size = Vec2::new(1280.0, 720.0);

        let center = cam.screen_of(Vec3::ZERO, size).unwrap();
        assert_relative_eq!(center.x, 640.0, epsilon = 1e-2);
        assert_relative_eq!(center.y, 360.0, epsilon = 1e-2);

        let ray = cam.pointer_ray(center, size);
        // The ray through the screen center runs straight down the view axis.
        let expected = (cam.target - cam.position).normalize();
        assert_relative_eq!(ray.dir.x, expected.x, epsilon = 1e-4);
        assert_relative_eq!(ray.dir.y, expected.y, epsilon = 1e-4);
        assert_relative_eq!(ray.dir.z, expected.z, epsilon = 1e-4);
    }
}
