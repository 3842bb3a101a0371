//! Ruler beside the plates.
//!
//! One scene unit is labelled as 2 nm, so the label at height `i` reads
//! `|i| * 2`. The ruler never moves.

use glam::Vec3;

use crate::mesh::{LineBatch, LineMesh};

/// World position of the ruler's origin.
pub const RULER_ORIGIN: Vec3 = Vec3::new(3.5, 0.0, 0.0);

/// Ticks run over `-RULER_EXTENT..=RULER_EXTENT`.
pub const RULER_EXTENT: i32 = 10;

const LABEL_EVERY: i32 = 5;
const LABEL_OFFSET_X: f32 = 0.8;
const MAJOR_TICK: f32 = 0.3;
const MINOR_TICK: f32 = 0.2;
const RULER_THICKNESS: f32 = 0.006;

/// A tick mark at integer height `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub y: i32,
    pub length: f32,
}

/// A text label anchored in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct RulerLabel {
    pub text: String,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ruler {
    origin: Vec3,
    ticks: Vec<Tick>,
    labels: Vec<RulerLabel>,
}

impl Ruler {
    pub fn new() -> Self {
        Self::at(RULER_ORIGIN)
    }

    pub fn at(origin: Vec3) -> Self {
        let ticks = (-RULER_EXTENT..=RULER_EXTENT)
            .map(|y| Tick {
                y,
                length: if y % LABEL_EVERY == 0 {
                    MAJOR_TICK
                } else {
                    MINOR_TICK
                },
            })
            .collect();

        let labels = (-RULER_EXTENT..=RULER_EXTENT)
            .filter(|y| y % LABEL_EVERY == 0)
            .map(|y| RulerLabel {
                text: (y.abs() * 2).to_string(),
                position: origin + Vec3::new(LABEL_OFFSET_X, y as f32, 0.0),
            })
            .collect();

        Self {
            origin,
            ticks,
            labels,
        }
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn labels(&self) -> &[RulerLabel] {
        &self.labels
    }

    /// World-space geometry: the spine plus one segment per tick.
    pub fn mesh(&self) -> LineMesh {
        let extent = RULER_EXTENT as f32;
        let mut mesh = LineMesh::segment(
            self.origin + Vec3::new(0.0, -extent, 0.0),
            self.origin + Vec3::new(0.0, extent, 0.0),
        );
        for tick in &self.ticks {
            let start = self.origin + Vec3::new(0.0, tick.y as f32, 0.0);
            mesh.extend(LineMesh::segment(start, start + Vec3::X * tick.length));
        }
        mesh
    }

    pub fn line_batch(&self) -> LineBatch {
        LineBatch::new(self.mesh(), Vec3::ZERO, RULER_THICKNESS)
    }
}

impl Default for Ruler {
    fn default() -> Self {
        Self::new()
    }
}
