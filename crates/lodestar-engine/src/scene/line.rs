use glam::Vec3;

use crate::paint::Color;

use super::{Attribute3, Bounds};

/// A straight line from a fixed anchor to a movable target.
///
/// Vertex 0 is the anchor, vertex 1 tracks the target with the same
/// shadow-copy change detection as the sprite. Mutating a vertex invalidates
/// the cached bounds so culling never works from stale extents.
#[derive(Debug)]
pub struct TrackingLine {
    positions: Attribute3,
    shadow: Vec3,
    bounds: Option<Bounds>,
    pub color: Color,
}

impl TrackingLine {
    pub fn new(anchor: Vec3, target: Vec3, color: Color) -> Self {
        Self {
            positions: Attribute3::new(vec![anchor, target]),
            shadow: target,
            bounds: None,
            color,
        }
    }

    #[inline]
    pub fn positions(&self) -> &Attribute3 {
        &self.positions
    }

    #[inline]
    pub fn anchor(&self) -> Vec3 {
        self.positions.get(0)
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.positions.get(1)
    }

    /// Per-frame synchronizer mirroring the sprite's: on target mismatch,
    /// rewrites vertex 1, marks the position attribute dirty, and drops the
    /// cached bounds. Returns whether anything changed.
    pub fn sync_target(&mut self, target: Vec3) -> bool {
        if self.shadow == target {
            return false;
        }
        self.shadow = target;
        self.positions.set(1, target);
        self.bounds = None;
        true
    }

    /// Bounds over both vertices, recomputed lazily after invalidation.
    pub fn bounds(&mut self) -> Bounds {
        *self
            .bounds
            .get_or_insert_with(|| {
                Bounds::from_points(self.positions.values())
                    .unwrap_or(Bounds { min: Vec3::ZERO, max: Vec3::ZERO })
            })
    }

    #[inline]
    pub fn needs_upload(&self) -> bool {
        self.positions.needs_upload()
    }

    pub fn mark_uploaded(&mut self) {
        self.positions.mark_uploaded();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> TrackingLine {
        TrackingLine::new(Vec3::ZERO, Vec3::new(5.0, 5.0, 0.0), Color::from_srgb_u8(255, 0, 0, 255))
    }

    #[test]
    fn unchanged_target_writes_nothing() {
        let mut l = line();
        assert!(!l.sync_target(Vec3::new(5.0, 5.0, 0.0)));
        assert_eq!(l.positions().writes(), 0);
        assert!(!l.needs_upload());
    }

    #[test]
    fn single_pass_moves_second_vertex() {
        let mut l = line();
        let moved = Vec3::new(0.0, -1.0, 2.0);

        assert!(l.sync_target(moved));
        assert_eq!(l.target(), moved);
        assert_eq!(l.anchor(), Vec3::ZERO);
        assert!(l.needs_upload());
        assert!(!l.sync_target(moved));
    }

    #[test]
    fn bounds_refresh_after_target_moves() {
        let mut l = line();
        let before = l.bounds();
        assert_eq!(before.max, Vec3::new(5.0, 5.0, 0.0));

        l.sync_target(Vec3::new(-2.0, 0.0, 0.0));
        let after = l.bounds();
        assert_eq!(after.min, Vec3::new(-2.0, 0.0, 0.0));
        assert_eq!(after.max, Vec3::ZERO);
    }
}
