use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

/// Process-unique attribute identities, used by renderers as buffer cache keys.
static NEXT_ATTRIBUTE_ID: AtomicU64 = AtomicU64::new(1);

/// A 3-component per-vertex attribute with a dirty flag.
///
/// Mirrors the GPU-resident vertex buffer it backs: writing a slot marks the
/// attribute dirty, and the owning renderer clears the flag when it re-uploads.
/// A monotonically increasing write counter makes "no redundant writes"
/// observable in tests.
#[derive(Debug)]
pub struct Attribute3 {
    id: u64,
    values: Vec<Vec3>,
    dirty: bool,
    writes: u64,
}

impl Attribute3 {
    /// Creates an attribute from initial slot values, starting clean.
    pub fn new(values: Vec<Vec3>) -> Self {
        Self {
            id: NEXT_ATTRIBUTE_ID.fetch_add(1, Ordering::Relaxed),
            values,
            dirty: false,
            writes: 0,
        }
    }

    /// Stable identity for GPU-buffer caching.
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Vec3 {
        self.values[index]
    }

    #[inline]
    pub fn values(&self) -> &[Vec3] {
        &self.values
    }

    /// Writes a slot and marks the attribute dirty.
    ///
    /// Callers are expected to have change-detected already; every call counts
    /// as a write even if the value is identical.
    pub fn set(&mut self, index: usize, value: Vec3) {
        self.values[index] = value;
        self.dirty = true;
        self.writes += 1;
    }

    /// Whether the GPU copy is stale.
    #[inline]
    pub fn needs_upload(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag; called by the renderer after re-upload.
    #[inline]
    pub fn mark_uploaded(&mut self) {
        self.dirty = false;
    }

    /// Total number of slot writes since creation.
    #[inline]
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clean() {
        let attr = Attribute3::new(vec![Vec3::ZERO]);
        assert!(!attr.needs_upload());
        assert_eq!(attr.writes(), 0);
    }

    #[test]
    fn set_marks_dirty_and_counts() {
        let mut attr = Attribute3::new(vec![Vec3::ZERO]);
        attr.set(0, Vec3::new(1.0, 2.0, 3.0));
        assert!(attr.needs_upload());
        assert_eq!(attr.writes(), 1);
        assert_eq!(attr.get(0), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn mark_uploaded_clears_dirty_only() {
        let mut attr = Attribute3::new(vec![Vec3::ZERO]);
        attr.set(0, Vec3::X);
        attr.mark_uploaded();
        assert!(!attr.needs_upload());
        assert_eq!(attr.writes(), 1);
    }
}
