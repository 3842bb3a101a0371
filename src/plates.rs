//! The pair of parallel plates.
//!
//! The plates are symmetric about `y = 0` in every configuration the demo
//! reaches, but the pair stores both offsets independently so an in-flight
//! transition can move each plate with its own tween.

use glam::Vec3;

/// Plate dimensions (x, y, z).
pub const PLATE_SIZE: Vec3 = Vec3::new(6.0, 0.1, 3.0);

/// Plate color (`#3498db`).
pub const PLATE_COLOR: Vec3 = Vec3::new(0.204, 0.596, 0.859);

/// Half-separation the scene starts with.
pub const INITIAL_OFFSET: f32 = 2.0;

/// Half-separation restored by a reset.
pub const RESET_OFFSET: f32 = 5.0;

/// Separation at which inside particles are always visible.
pub const MAX_SEPARATION: f32 = 2.0 * RESET_OFFSET;

/// Vertical positions of the two plates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatePair {
    /// Y position of the bottom plate.
    pub lower: f32,
    /// Y position of the top plate.
    pub upper: f32,
}

impl PlatePair {
    /// Plates placed at `-offset` and `+offset`.
    pub fn symmetric(offset: f32) -> Self {
        Self {
            lower: -offset,
            upper: offset,
        }
    }

    /// The starting configuration.
    pub fn initial() -> Self {
        Self::symmetric(INITIAL_OFFSET)
    }

    /// Distance between the plates.
    #[inline]
    pub fn separation(&self) -> f32 {
        self.upper - self.lower
    }

    /// Y coordinate halfway between the plates.
    #[inline]
    pub fn midpoint(&self) -> f32 {
        (self.upper + self.lower) * 0.5
    }

    /// Move both plates to `-offset` / `+offset`.
    pub fn set_symmetric(&mut self, offset: f32) {
        self.lower = -offset;
        self.upper = offset;
    }

    /// Whether `y` lies strictly between the plates.
    #[inline]
    pub fn contains_strict(&self, y: f32) -> bool {
        y > self.lower && y < self.upper
    }

    /// Centres of the two plates, bottom first.
    pub fn centers(&self) -> [Vec3; 2] {
        [
            Vec3::new(0.0, self.lower, 0.0),
            Vec3::new(0.0, self.upper, 0.0),
        ]
    }
}

impl Default for PlatePair {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_separation() {
        let plates = PlatePair::initial();
        assert_eq!(plates.lower, -2.0);
        assert_eq!(plates.upper, 2.0);
        assert_eq!(plates.separation(), 4.0);
        assert_eq!(plates.midpoint(), 0.0);
    }

    #[test]
    fn test_reset_offset_reaches_max_separation() {
        let plates = PlatePair::symmetric(RESET_OFFSET);
        assert_eq!(plates.separation(), MAX_SEPARATION);
    }

    #[test]
    fn test_contains_strict_excludes_plates() {
        let plates = PlatePair::symmetric(1.0);
        assert!(plates.contains_strict(0.0));
        assert!(!plates.contains_strict(1.0));
        assert!(!plates.contains_strict(-1.0));
        assert!(!plates.contains_strict(1.5));
    }

    #[test]
    fn test_set_symmetric_to_contact() {
        let mut plates = PlatePair::initial();
        plates.set_symmetric(0.0);
        assert_eq!(plates.separation(), 0.0);
    }
}
