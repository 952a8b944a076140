use glam::Vec3;

use crate::paint::Color;

/// A colored world-space line segment, consumed by the line renderer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Segment {
    pub a: Vec3,
    pub b: Vec3,
    pub color: Color,
}

impl Segment {
    #[inline]
    pub const fn new(a: Vec3, b: Vec3, color: Color) -> Self {
        Self { a, b, color }
    }
}

/// Coordinate-axes helper: three segments from the origin along +X/+Y/+Z,
/// tinted red/green/blue.
#[derive(Debug, Copy, Clone)]
pub struct Axes {
    pub length: f32,
}

impl Axes {
    pub const fn new(length: f32) -> Self {
        Self { length }
    }

    pub fn segments(&self) -> [Segment; 3] {
        [
            Segment::new(Vec3::ZERO, Vec3::X * self.length, Color::from_srgb_u8(255, 64, 64, 255)),
            Segment::new(Vec3::ZERO, Vec3::Y * self.length, Color::from_srgb_u8(64, 255, 64, 255)),
            Segment::new(Vec3::ZERO, Vec3::Z * self.length, Color::from_srgb_u8(64, 64, 255, 255)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_span_each_positive_axis() {
        let segs = Axes::new(5.0).segments();
        assert_eq!(segs[0].b, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(segs[1].b, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(segs[2].b, Vec3::new(0.0, 0.0, 5.0));
        for s in segs {
            assert_eq!(s.a, Vec3::ZERO);
        }
    }
}
