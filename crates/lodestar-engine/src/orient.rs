//! Screen-space sprite orientation math.
//!
//! CPU reference for the math in `render/primitives/shaders/sprite.wgsl`.
//! The authoritative computation runs on the GPU (per vertex / per fragment,
//! so many sprites scale without touching the per-frame CPU path); this
//! module exists so the rotation and masking rules are documented and unit
//! tested in one place, with the shader kept line-for-line in sync.
//!
//! Pipeline recap:
//! - vertex stage: project anchor and target with the view-projection
//!   matrix, divide by w, take the 2D NDC difference, and derive the
//!   aspect-corrected bearing angle
//! - fragment stage: rotate the sprite-local coordinate by that angle,
//!   discard outside the unit square, sample the glyph texture

use glam::{Vec2, Vec4};

/// Screen-space direction between two clip-space positions.
///
/// Inputs are clip-space (pre-division) positions; the perspective divide
/// happens here so callers can pass the raw `view_projection * position`
/// products.
#[inline]
pub fn screen_direction(anchor_clip: Vec4, target_clip: Vec4) -> Vec2 {
    let a = anchor_clip.truncate().truncate() / anchor_clip.w;
    let b = target_clip.truncate().truncate() / target_clip.w;
    b - a
}

/// Aspect-corrected bearing angle of a screen-space direction.
///
/// NDC spans the same [-1, 1] range on both axes regardless of window shape,
/// so the vertical component is divided by the aspect ratio before `atan2`;
/// without this the angle skews on non-square viewports.
#[inline]
pub fn bearing(dir: Vec2, aspect: f32) -> f32 {
    (dir.y / aspect).atan2(dir.x)
}

/// Rotates a sprite-centered coordinate by `theta`.
///
/// Matches the fragment shader exactly:
/// `xn = x·cosθ − y·sinθ`, `yn = x·sinθ + y·cosθ`.
#[inline]
pub fn rotate_centered(p: Vec2, theta: f32) -> Vec2 {
    let (sin, cos) = theta.sin_cos();
    Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
}

/// Maps a point coordinate (sprite-local, [0,1]², top-left origin) to the
/// rotated sampling coordinate, or `None` where the fragment is discarded.
///
/// Bounds are inclusive at exactly 0 and 1: only `< 0` or `> 1` discards,
/// with no epsilon.
#[inline]
pub fn sample_uv(point_coord: Vec2, theta: f32) -> Option<Vec2> {
    let centered = point_coord - Vec2::splat(0.5);
    let uv = rotate_centered(centered, theta) + Vec2::splat(0.5);

    if uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0 {
        None
    } else {
        Some(uv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const TOL: f32 = 1e-5;

    fn clip(x: f32, y: f32) -> Vec4 {
        Vec4::new(x, y, 0.0, 1.0)
    }

    // ── bearing ───────────────────────────────────────────────────────────

    #[test]
    fn bearing_target_right_is_zero() {
        let dir = screen_direction(clip(0.0, 0.0), clip(0.5, 0.0));
        assert_relative_eq!(bearing(dir, 1.0), 0.0, epsilon = TOL);
    }

    #[test]
    fn bearing_target_up_is_half_pi() {
        // Vertical offset pre-scaled by the aspect ratio; the correction
        // divides it back out, so the bearing is exactly π/2.
        let aspect = 1.6;
        let dir = screen_direction(clip(0.0, 0.0), clip(0.0, 0.5 * aspect));
        assert_relative_eq!(bearing(dir, aspect), FRAC_PI_2, epsilon = TOL);
    }

    #[test]
    fn bearing_target_left_is_pi() {
        let dir = screen_direction(clip(0.2, 0.0), clip(-0.5, 0.0));
        assert_relative_eq!(bearing(dir, 1.0), PI, epsilon = TOL);
    }

    #[test]
    fn bearing_target_down_is_negative_half_pi() {
        let dir = screen_direction(clip(0.0, 0.3), clip(0.0, -0.5));
        assert_relative_eq!(bearing(dir, 1.0), -FRAC_PI_2, epsilon = TOL);
    }

    #[test]
    fn bearing_matches_atan2_after_perspective_divide() {
        // Differing w components — the divide must happen before subtraction.
        let a = Vec4::new(1.0, 1.0, 0.0, 2.0);
        let b = Vec4::new(-3.0, 0.0, 0.0, 4.0);
        let dir = screen_direction(a, b);
        let expected = ((0.0 / 4.0 - 1.0 / 2.0) / 1.0_f32).atan2(-3.0 / 4.0 - 1.0 / 2.0);
        assert_relative_eq!(bearing(dir, 1.0), expected, epsilon = TOL);
    }

    // ── rotation round-trip ───────────────────────────────────────────────

    #[test]
    fn rotation_round_trips() {
        let p = Vec2::new(0.31, -0.27);
        for theta in [0.0, FRAC_PI_4, FRAC_PI_2, PI, 3.0 * FRAC_PI_2] {
            let back = rotate_centered(rotate_centered(p, theta), -theta);
            assert_relative_eq!(back.x, p.x, epsilon = TOL);
            assert_relative_eq!(back.y, p.y, epsilon = TOL);
        }
    }

    // ── masking ───────────────────────────────────────────────────────────

    #[test]
    fn corner_is_kept_at_zero_rotation() {
        // (0,0) → centered (−0.5,−0.5) → recentered (0,0): on the boundary,
        // and the bounds are inclusive.
        let uv = sample_uv(Vec2::new(0.0, 0.0), 0.0).expect("corner must not be discarded");
        assert_relative_eq!(uv.x, 0.0, epsilon = TOL);
        assert_relative_eq!(uv.y, 0.0, epsilon = TOL);
    }

    #[test]
    fn unit_corner_is_kept_at_zero_rotation() {
        assert!(sample_uv(Vec2::new(1.0, 1.0), 0.0).is_some());
    }

    #[test]
    fn outside_unit_square_is_discarded() {
        // A coordinate that lands at (−0.01, 0.5) after rotation.
        let centered = Vec2::new(-0.51, 0.0);
        assert!(sample_uv(centered + Vec2::splat(0.5), 0.0).is_none());
    }

    #[test]
    fn quarter_turn_discards_what_rotates_out() {
        // Under θ = π/4 the square's corners rotate outside the unit square.
        assert!(sample_uv(Vec2::new(0.0, 0.0), FRAC_PI_4).is_none());
        // The center never moves.
        assert!(sample_uv(Vec2::new(0.5, 0.5), FRAC_PI_4).is_some());
    }
}
