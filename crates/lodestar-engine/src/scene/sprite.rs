use glam::Vec3;

use crate::paint::Color;

use super::Attribute3;

/// Visual parameters for an oriented sprite.
#[derive(Debug, Clone)]
pub struct SpriteStyle {
    /// Footprint edge length in logical pixels; multiplied by the window
    /// scale factor at draw time.
    pub size: f32,
    /// Glyph tint.
    pub color: Color,
    /// Overall opacity, multiplied by the sampled texture coverage.
    pub opacity: f32,
}

impl Default for SpriteStyle {
    fn default() -> Self {
        Self {
            size: 24.0,
            color: Color::from_srgb_u8(255, 0, 0, 255),
            opacity: 1.0,
        }
    }
}

/// A camera-facing point sprite whose glyph rotates in screen space to point
/// at a target position.
///
/// The sprite owns a shadow copy of the last-seen target and a single-slot
/// direction attribute backing the GPU instance data. [`sync_target`] is the
/// per-frame synchronizer: a pure compare-and-copy with no failure modes,
/// called once per frame before drawing.
///
/// [`sync_target`]: Self::sync_target
#[derive(Debug)]
pub struct OrientedSprite {
    position: Vec3,
    position_dirty: bool,
    direction: Attribute3,
    shadow: Vec3,
    pub style: SpriteStyle,
}

impl OrientedSprite {
    /// Creates a sprite pinned at `position`, initially pointing at `target`.
    pub fn new(position: Vec3, target: Vec3, style: SpriteStyle) -> Self {
        Self {
            position,
            // Initial instance data has never been uploaded.
            position_dirty: true,
            direction: Attribute3::new(vec![target]),
            shadow: target,
            style,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the sprite's anchor. No-op (and no re-upload) when unchanged.
    pub fn set_position(&mut self, position: Vec3) {
        if self.position != position {
            self.position = position;
            self.position_dirty = true;
        }
    }

    /// The target position as of the last refresh.
    #[inline]
    pub fn target(&self) -> Vec3 {
        self.direction.get(0)
    }

    #[inline]
    pub fn direction(&self) -> &Attribute3 {
        &self.direction
    }

    /// Per-frame synchronizer: compares the shadow copy against the live
    /// target by exact component-wise equality and, on mismatch, copies the
    /// value into the shadow and the direction attribute, scheduling a GPU
    /// re-upload. Returns whether anything changed.
    ///
    /// Stationary targets therefore cost one vector compare per frame and
    /// no buffer traffic.
    pub fn sync_target(&mut self, target: Vec3) -> bool {
        if self.shadow == target {
            return false;
        }
        self.shadow = target;
        self.direction.set(0, target);
        true
    }

    /// Whether the GPU instance data is stale (anchor or direction changed).
    #[inline]
    pub fn needs_upload(&self) -> bool {
        self.position_dirty || self.direction.needs_upload()
    }

    /// Clears both dirty markers; called by the renderer after re-upload.
    pub fn mark_uploaded(&mut self) {
        self.position_dirty = false;
        self.direction.mark_uploaded();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite() -> OrientedSprite {
        let mut s = OrientedSprite::new(Vec3::ZERO, Vec3::new(5.0, 5.0, 0.0), SpriteStyle::default());
        s.mark_uploaded(); // simulate the initial upload
        s
    }

    // ── idempotence ───────────────────────────────────────────────────────

    #[test]
    fn unchanged_target_writes_nothing() {
        let mut s = sprite();
        let target = Vec3::new(5.0, 5.0, 0.0);

        assert!(!s.sync_target(target));
        assert!(!s.sync_target(target));
        assert_eq!(s.direction().writes(), 0);
        assert!(!s.needs_upload());
    }

    #[test]
    fn second_frame_after_change_is_a_no_op() {
        let mut s = sprite();
        let moved = Vec3::new(1.0, -2.0, 3.0);

        assert!(s.sync_target(moved));
        s.mark_uploaded();

        assert!(!s.sync_target(moved));
        assert_eq!(s.direction().writes(), 1);
        assert!(!s.needs_upload());
    }

    // ── convergence ───────────────────────────────────────────────────────

    #[test]
    fn single_pass_converges() {
        let mut s = sprite();
        let moved = Vec3::new(-3.0, 0.25, 9.0);

        assert!(s.sync_target(moved));
        assert_eq!(s.target(), moved);
        assert!(s.needs_upload());
        // A second mutation-free pass confirms the shadow copy caught up.
        assert!(!s.sync_target(moved));
    }

    // ── anchor moves ──────────────────────────────────────────────────────

    #[test]
    fn moving_the_anchor_schedules_an_upload() {
        let mut s = sprite();
        s.set_position(Vec3::new(0.0, 1.0, 0.0));
        assert!(s.needs_upload());

        s.mark_uploaded();
        s.set_position(Vec3::new(0.0, 1.0, 0.0));
        assert!(!s.needs_upload());
    }
}
