//! Field-pressure arrows.
//!
//! Four columns of arrows, each column holding one arrow per [`ArrowRole`].
//! Outer arrows push the plates together from outside; inner arrows push
//! them apart from the gap and shrink as the gap closes. Every position is
//! a pure function of the plate pair, so the set can be recomputed at any
//! time and always lands in the same place for the same plates.

use glam::{Mat4, Vec3};
use std::f32::consts::PI;

use crate::mesh::{SolidBatch, SolidMesh};
use crate::plates::PlatePair;

/// X positions of the arrow columns.
pub const ARROW_COLUMNS: [f32; 4] = [-2.25, -0.75, 0.75, 2.25];

/// Vertical distance from a plate to the arrow origin.
pub const ARROW_GAP: f32 = 1.25;

const ARROW_SEGMENTS: u32 = 12;

/// The four arrow groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowRole {
    /// Above the top plate, pointing down at it.
    TopOuter,
    /// Below the bottom plate, pointing up at it.
    BottomOuter,
    /// Just under the top plate, pointing up at it.
    TopInner,
    /// Just above the bottom plate, pointing down at it.
    BottomInner,
}

impl ArrowRole {
    pub const ALL: [ArrowRole; 4] = [
        ArrowRole::TopOuter,
        ArrowRole::BottomOuter,
        ArrowRole::TopInner,
        ArrowRole::BottomInner,
    ];

    /// Y coordinate of the arrow origin for the given plates.
    pub fn y(&self, plates: &PlatePair) -> f32 {
        match self {
            ArrowRole::TopOuter => plates.upper + ARROW_GAP,
            ArrowRole::BottomOuter => plates.lower - ARROW_GAP,
            ArrowRole::TopInner => plates.upper - ARROW_GAP,
            ArrowRole::BottomInner => plates.lower + ARROW_GAP,
        }
    }

    /// Whether the arrow is flipped to point along -y.
    pub fn points_down(&self) -> bool {
        matches!(self, ArrowRole::TopOuter | ArrowRole::BottomInner)
    }

    pub fn is_inner(&self) -> bool {
        matches!(self, ArrowRole::TopInner | ArrowRole::BottomInner)
    }

    /// Size the geometry is built at, before any animated scale.
    pub fn base_scale(&self) -> f32 {
        if self.is_inner() {
            1.2
        } else {
            1.0
        }
    }

    pub fn color(&self) -> Vec3 {
        if self.is_inner() {
            Vec3::new(1.0, 0.0, 0.0)
        } else {
            Vec3::new(0.0, 1.0, 0.0)
        }
    }
}

/// One arrow instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub role: ArrowRole,
    pub position: Vec3,
    /// Uniform object scale on top of the role's base scale.
    pub scale: f32,
}

impl Arrow {
    /// Object-to-world transform.
    pub fn transform(&self) -> Mat4 {
        let rotation = if self.role.points_down() {
            Mat4::from_rotation_x(PI)
        } else {
            Mat4::IDENTITY
        };
        Mat4::from_translation(self.position) * rotation * Mat4::from_scale(Vec3::splat(self.scale))
    }

    /// World-space geometry: a shaft from the origin to `0.7` and a cone
    /// head from `0.7` to `1.0`, in units of the base scale.
    pub fn mesh(&self) -> SolidMesh {
        let s = self.role.base_scale();
        let mut local = SolidMesh::cylinder(0.05 * s, 0.7 * s, ARROW_SEGMENTS);
        local.extend(SolidMesh::cone(0.1 * s, 0.3 * s, ARROW_SEGMENTS).offset_y(0.7 * s));
        local.transformed(&self.transform())
    }

    /// World-space point the arrow points at.
    pub fn tip(&self) -> Vec3 {
        self.transform()
            .transform_point3(Vec3::Y * self.role.base_scale())
    }
}

/// All sixteen arrows.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowSet {
    arrows: Vec<Arrow>,
    inner_scale: f32,
}

impl ArrowSet {
    pub fn new(plates: &PlatePair) -> Self {
        let arrows = ARROW_COLUMNS
            .iter()
            .flat_map(|&x| {
                ArrowRole::ALL.iter().map(move |&role| Arrow {
                    role,
                    position: Vec3::new(x, role.y(plates), 0.0),
                    scale: 1.0,
                })
            })
            .collect();

        Self {
            arrows,
            inner_scale: 1.0,
        }
    }

    /// Re-derive every arrow's y from the plates.
    pub fn update_positions(&mut self, plates: &PlatePair) {
        for arrow in &mut self.arrows {
            arrow.position.y = arrow.role.y(plates);
        }
    }

    /// Scale applied to both inner groups.
    pub fn set_inner_scale(&mut self, scale: f32) {
        self.inner_scale = scale;
        for arrow in self.arrows.iter_mut().filter(|a| a.role.is_inner()) {
            arrow.scale = scale;
        }
    }

    #[inline]
    pub fn inner_scale(&self) -> f32 {
        self.inner_scale
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arrow> {
        self.arrows.iter()
    }

    pub fn with_role(&self, role: ArrowRole) -> impl Iterator<Item = &Arrow> {
        self.arrows.iter().filter(move |a| a.role == role)
    }

    pub fn len(&self) -> usize {
        self.arrows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrows.is_empty()
    }

    /// One solid batch per arrow, colored by role.
    pub fn solid_batches(&self) -> impl Iterator<Item = SolidBatch> + '_ {
        self.arrows
            .iter()
            .map(|a| SolidBatch::new(a.mesh(), a.role.color()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_arrows_per_role() {
        let set = ArrowSet::new(&PlatePair::initial());
        assert_eq!(set.len(), 16);
        for role in ArrowRole::ALL {
            let xs: Vec<f32> = set.with_role(role).map(|a| a.position.x).collect();
            assert_eq!(xs, ARROW_COLUMNS.to_vec());
        }
    }

    #[test]
    fn test_positions_follow_plates() {
        let plates = PlatePair::symmetric(5.0);
        let set = ArrowSet::new(&plates);

        let y = |role| set.with_role(role).next().unwrap().position.y;
        assert_eq!(y(ArrowRole::TopOuter), 6.25);
        assert_eq!(y(ArrowRole::BottomOuter), -6.25);
        assert_eq!(y(ArrowRole::TopInner), 3.75);
        assert_eq!(y(ArrowRole::BottomInner), -3.75);
    }

    #[test]
    fn test_update_matches_fresh_set() {
        let mut set = ArrowSet::new(&PlatePair::initial());
        let plates = PlatePair {
            lower: -1.3,
            upper: 0.9,
        };
        set.update_positions(&plates);
        assert_eq!(set, ArrowSet::new(&plates));
    }

    #[test]
    fn test_arrows_point_at_plates() {
        let plates = PlatePair::symmetric(5.0);
        let set = ArrowSet::new(&plates);

        for arrow in set.iter() {
            let tip = arrow.tip();
            match arrow.role {
                ArrowRole::TopOuter => assert!(tip.y < arrow.position.y && tip.y > plates.upper),
                ArrowRole::BottomOuter => assert!(tip.y > arrow.position.y && tip.y < plates.lower),
                ArrowRole::TopInner => assert!(tip.y > arrow.position.y),
                ArrowRole::BottomInner => assert!(tip.y < arrow.position.y),
            }
        }
    }

    #[test]
    fn test_inner_scale_only_touches_inner_arrows() {
        let mut set = ArrowSet::new(&PlatePair::initial());
        set.set_inner_scale(0.7);

        assert_eq!(set.inner_scale(), 0.7);
        for arrow in set.iter() {
            let expected = if arrow.role.is_inner() { 0.7 } else { 1.0 };
            assert_eq!(arrow.scale, expected);
        }
    }

    #[test]
    fn test_scaled_mesh_shrinks() {
        let mut set = ArrowSet::new(&PlatePair::initial());
        let full = set.with_role(ArrowRole::TopInner).next().unwrap().mesh();
        set.set_inner_scale(0.1);
        let small = set.with_role(ArrowRole::TopInner).next().unwrap().mesh();

        let height = |m: &SolidMesh| {
            let (lo, hi) = m.bounds().unwrap();
            hi.y - lo.y
        };
        assert!((height(&full) - 1.2).abs() < 1e-4);
        assert!((height(&small) - 0.12).abs() < 1e-4);
    }

    #[test]
    fn test_solid_batches_colored_by_role() {
        let set = ArrowSet::new(&PlatePair::initial());
        let batches: Vec<SolidBatch> = set.solid_batches().collect();
        assert_eq!(batches.len(), 16);

        for (arrow, batch) in set.iter().zip(&batches) {
            assert_eq!(batch.color, arrow.role.color());
            let (lo, hi) = batch.mesh.bounds().unwrap();
            assert!(lo.y <= arrow.tip().y + 1e-4 && hi.y >= arrow.tip().y - 1e-4);
        }
    }
}
