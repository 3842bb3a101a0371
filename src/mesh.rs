//! Scene geometry for the plates, arrows and ruler.
//!
//! Plates and arrows are filled triangle meshes ([`SolidMesh`]) shaded with
//! the scene light. The ruler is a set of thick line segments
//! ([`LineMesh`]). Solid shapes are built in a local frame and placed with
//! [`SolidMesh::transformed`].
//!
//! ```ignore
//! let shaft = SolidMesh::cylinder(0.05, 0.7, 12);
//! let placed = shaft.transformed(&Mat4::from_translation(Vec3::new(1.0, 2.0, 0.0)));
//! ```

use glam::{Mat3, Mat4, Vec3};
use std::f32::consts::TAU;

/// A set of line segments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineMesh {
    /// Line segments as pairs of endpoints (start, end).
    pub lines: Vec<(Vec3, Vec3)>,
}

impl LineMesh {
    /// A single segment.
    pub fn segment(a: Vec3, b: Vec3) -> Self {
        Self { lines: vec![(a, b)] }
    }

    /// Append all segments of `other`.
    pub fn extend(&mut self, other: LineMesh) {
        self.lines.extend(other.lines);
    }

    /// Get the total number of line segments.
    pub fn line_count(&self) -> u32 {
        self.lines.len() as u32
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.lines.iter().flat_map(|(a, b)| [*a, *b]);
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }
}

/// A mesh with the style it is drawn in.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBatch {
    pub mesh: LineMesh,
    pub color: Vec3,
    /// Half-width of each segment in world units.
    pub thickness: f32,
}

impl LineBatch {
    pub fn new(mesh: LineMesh, color: Vec3, thickness: f32) -> Self {
        Self {
            mesh,
            color,
            thickness,
        }
    }
}

/// A mesh corner with its shading normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl SolidVertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Counter-clockwise triangles (seen from outside), three vertices each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolidMesh {
    pub vertices: Vec<SolidVertex>,
}

impl SolidMesh {
    /// Axis-aligned box centred on the origin, one flat normal per face.
    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        let mut mesh = Self::default();

        // (normal, in-plane u, in-plane v) with u x v = normal
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        for (normal, u, v) in faces {
            let center = normal * h;
            let du = u * h;
            let dv = v * h;
            mesh.push_quad(
                [
                    center - du - dv,
                    center + du - dv,
                    center + du + dv,
                    center - du + dv,
                ],
                [normal; 4],
            );
        }
        mesh
    }

    /// Closed cylinder along +y from `y = 0` to `y = height`, smooth sides.
    pub fn cylinder(radius: f32, height: f32, segments: u32) -> Self {
        let ring = ring_directions(segments);
        let top = Vec3::Y * height;
        let mut mesh = Self::default();

        for (i, &dir) in ring.iter().enumerate() {
            let next = ring[(i + 1) % ring.len()];
            let (a, b) = (dir * radius, next * radius);
            mesh.push_quad([a, a + top, b + top, b], [dir, dir, next, next]);
            mesh.push_triangle([top, b + top, a + top], Vec3::Y);
            mesh.push_triangle([Vec3::ZERO, a, b], Vec3::NEG_Y);
        }
        mesh
    }

    /// Cone along +y: capped base at `y = 0`, apex at `y = height`.
    pub fn cone(radius: f32, height: f32, segments: u32) -> Self {
        let ring = ring_directions(segments);
        let apex = Vec3::Y * height;
        // Side normals lean up by the slope of the surface
        let side_normal = |dir: Vec3| (dir * height + Vec3::Y * radius).normalize_or_zero();
        let mut mesh = Self::default();

        for (i, &dir) in ring.iter().enumerate() {
            let next = ring[(i + 1) % ring.len()];
            let (a, b) = (dir * radius, next * radius);
            let mid = side_normal((dir + next).normalize_or_zero());
            mesh.vertices.extend([
                SolidVertex::new(a, side_normal(dir)),
                SolidVertex::new(apex, mid),
                SolidVertex::new(b, side_normal(next)),
            ]);
            mesh.push_triangle([Vec3::ZERO, a, b], Vec3::NEG_Y);
        }
        mesh
    }

    /// Translate every vertex along y.
    pub fn offset_y(mut self, dy: f32) -> Self {
        for vertex in &mut self.vertices {
            vertex.position.y += dy;
        }
        self
    }

    /// Apply an affine transform. Normals go through the inverse transpose
    /// and are renormalized.
    pub fn transformed(&self, transform: &Mat4) -> Self {
        let normal_matrix = Mat3::from_mat4(*transform).inverse().transpose();
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|v| SolidVertex {
                    position: transform.transform_point3(v.position),
                    normal: (normal_matrix * v.normal).normalize_or_zero(),
                })
                .collect(),
        }
    }

    pub fn extend(&mut self, other: SolidMesh) {
        self.vertices.extend(other.vertices);
    }

    pub fn triangle_count(&self) -> u32 {
        (self.vertices.len() / 3) as u32
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.vertices.iter().map(|v| v.position);
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    fn push_triangle(&mut self, corners: [Vec3; 3], normal: Vec3) {
        self.vertices
            .extend(corners.map(|p| SolidVertex::new(p, normal)));
    }

    /// Two triangles over `corners` given counter-clockwise.
    fn push_quad(&mut self, corners: [Vec3; 4], normals: [Vec3; 4]) {
        for i in [0, 1, 2, 0, 2, 3] {
            self.vertices.push(SolidVertex::new(corners[i], normals[i]));
        }
    }
}

/// A filled mesh and its base color.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidBatch {
    pub mesh: SolidMesh,
    pub color: Vec3,
}

impl SolidBatch {
    pub fn new(mesh: SolidMesh, color: Vec3) -> Self {
        Self { mesh, color }
    }
}

/// Unit vectors around the y axis, turning from +x toward +z.
fn ring_directions(segments: u32) -> Vec<Vec3> {
    let segments = segments.max(3);
    (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * TAU;
            Vec3::new(angle.cos(), 0.0, angle.sin())
        })
        .collect()
}
