use glam::Vec3;

/// Axis-aligned bounding box over a set of points.
///
/// Cached by geometry that mutates vertex positions; the cache is dropped on
/// mutation and recomputed on demand so culling never sees stale extents.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Computes bounds over `points`. Returns `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut min = *first;
        let mut max = *first;
        for p in rest {
            min = min.min(*p);
            max = max.max(*p);
        }
        Some(Self { min, max })
    }

    #[inline]
    pub fn center(self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Radius of the bounding sphere around [`center`](Self::center).
    #[inline]
    pub fn radius(self) -> f32 {
        (self.max - self.center()).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_no_bounds() {
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn covers_all_points() {
        let b = Bounds::from_points(&[
            Vec3::new(-1.0, 2.0, 0.0),
            Vec3::new(3.0, -4.0, 5.0),
        ])
        .unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, -4.0, 0.0));
        assert_eq!(b.max, Vec3::new(3.0, 2.0, 5.0));
    }

    #[test]
    fn sphere_encloses_box_corners() {
        let b = Bounds::from_points(&[Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0)]).unwrap();
        assert_eq!(b.center(), Vec3::splat(1.0));
        assert!((b.radius() - Vec3::splat(1.0).length()).abs() < 1e-6);
    }
}
