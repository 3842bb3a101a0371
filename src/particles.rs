//! Vacuum-fluctuation particles.
//!
//! Particles come in two classes. Inside particles live in the gap between
//! the plates and fade out as the gap closes; outside particles live in a
//! band of fixed thickness above and below the plates and are always shown.
//!
//! Every frame each particle drifts on a small circle in the xz-plane while
//! moving vertically at a constant speed. A particle that leaves its region
//! is not destroyed: its whole state is re-rolled inside the region instead.
//!
//! All randomness is drawn from a caller-supplied [`Rng`], so a seeded
//! generator reproduces a run exactly.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

use crate::plates::{PlatePair, MAX_SEPARATION};

/// Default number of particles.
pub const DEFAULT_PARTICLE_COUNT: u32 = 2000;

/// Half-width of the particle box along x.
pub const HALF_WIDTH: f32 = 3.0;

/// Half-depth of the particle box along z.
pub const HALF_DEPTH: f32 = 1.5;

/// Thickness of the outside band beyond each plate.
pub const OUTSIDE_MARGIN: f32 = 5.0;

/// Below this separation inside particles are never shown.
pub const VISIBILITY_THRESHOLD: f32 = 0.1;

/// Horizontal drift per frame, per unit of particle radius.
pub const DRIFT_STEP: f32 = 0.01;

/// Rendered sphere radius.
pub const PARTICLE_RADIUS: f32 = 0.02;

/// Which region a particle belongs to. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleClass {
    /// Between the plates, drawn red.
    Inside,
    /// Above or below the plates, drawn green.
    Outside,
}

impl ParticleClass {
    /// Render color of the class.
    pub fn color(&self) -> Vec3 {
        match self {
            ParticleClass::Inside => Vec3::new(1.0, 0.0, 0.0),
            ParticleClass::Outside => Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Probability that an inside particle is shown at the given separation.
///
/// Zero at or below [`VISIBILITY_THRESHOLD`], otherwise the square of the
/// separation relative to [`MAX_SEPARATION`].
pub fn visibility_probability(separation: f32) -> f32 {
    if separation <= VISIBILITY_THRESHOLD {
        0.0
    } else {
        (separation / MAX_SEPARATION).powi(2)
    }
}

/// Whether `position` satisfies the inside region's bounds.
///
/// Bounds are inclusive: a particle exactly on a plate has not left.
pub fn in_inside_region(position: Vec3, plates: &PlatePair) -> bool {
    in_box(position) && position.y <= plates.upper && position.y >= plates.lower
}

fn in_box(position: Vec3) -> bool {
    position.x <= HALF_WIDTH
        && position.x >= -HALF_WIDTH
        && position.z <= HALF_DEPTH
        && position.z >= -HALF_DEPTH
}

/// A single fluctuation particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// World-space position.
    pub position: Vec3,
    /// Phase of the horizontal drift, in radians.
    pub angle: f32,
    /// Scales the horizontal drift.
    pub radius: f32,
    /// Vertical displacement per frame.
    pub vertical_speed: f32,
    /// Phase advance per frame.
    pub rotation_speed: f32,
    /// Whether the particle is drawn this frame.
    pub visible: bool,
    class: ParticleClass,
}

impl Particle {
    /// Create a particle with fully randomized state inside its region.
    pub fn spawn<R: Rng + ?Sized>(class: ParticleClass, plates: &PlatePair, rng: &mut R) -> Self {
        let mut particle = Self {
            position: Vec3::ZERO,
            angle: 0.0,
            radius: 0.0,
            vertical_speed: 0.0,
            rotation_speed: 0.0,
            visible: true,
            class,
        };
        particle.respawn(plates, rng);
        particle
    }

    #[inline]
    pub fn class(&self) -> ParticleClass {
        self.class
    }

    /// Re-roll position and motion parameters within the class's region.
    pub fn respawn<R: Rng + ?Sized>(&mut self, plates: &PlatePair, rng: &mut R) {
        let x = (rng.gen::<f32>() - 0.5) * 2.0 * HALF_WIDTH;
        let y = match self.class {
            ParticleClass::Inside => plates.lower + rng.gen::<f32>() * plates.separation(),
            ParticleClass::Outside => {
                if rng.gen::<f32>() < 0.5 {
                    plates.upper + rng.gen::<f32>() * OUTSIDE_MARGIN
                } else {
                    plates.lower - rng.gen::<f32>() * OUTSIDE_MARGIN
                }
            }
        };
        let z = (rng.gen::<f32>() - 0.5) * 2.0 * HALF_DEPTH;
        self.position = Vec3::new(x, y, z);

        self.angle = rng.gen::<f32>() * TAU;
        self.radius = rng.gen::<f32>() * 1.5 + 0.5;
        self.vertical_speed = (rng.gen::<f32>() - 0.5) * 0.02;
        self.rotation_speed = (rng.gen::<f32>() - 0.5) * 0.02;
    }

    /// Advance the drift by one frame without any bounds handling.
    pub fn drift(&mut self) {
        self.angle += self.rotation_speed;
        self.position.x += self.angle.cos() * DRIFT_STEP * self.radius;
        self.position.z += self.angle.sin() * DRIFT_STEP * self.radius;
        self.position.y += self.vertical_speed;
    }

    /// Whether the particle has left the region of its class.
    ///
    /// Outside particles are also out of bounds when they sit strictly
    /// between the plates, even though the margin test alone would accept
    /// some of those positions.
    pub fn is_out_of_bounds(&self, plates: &PlatePair) -> bool {
        let p = self.position;
        match self.class {
            ParticleClass::Inside => !in_inside_region(p, plates),
            ParticleClass::Outside => {
                !in_box(p)
                    || p.y > plates.upper + OUTSIDE_MARGIN
                    || p.y < plates.lower - OUTSIDE_MARGIN
                    || plates.contains_strict(p.y)
            }
        }
    }
}

/// The full particle collection.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Spawn `count` particles. The first half (rounded up) are inside
    /// particles, the rest outside particles.
    pub fn spawn<R: Rng + ?Sized>(count: u32, plates: &PlatePair, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|i| {
                let class = if i * 2 < count {
                    ParticleClass::Inside
                } else {
                    ParticleClass::Outside
                };
                Particle::spawn(class, plates, rng)
            })
            .collect();
        Self { particles }
    }

    /// Run one frame of the update rule over every particle.
    pub fn step<R: Rng + ?Sized>(&mut self, plates: &PlatePair, rng: &mut R) {
        let separation = plates.separation();
        let probability = visibility_probability(separation);

        for particle in &mut self.particles {
            particle.drift();
            if particle.is_out_of_bounds(plates) {
                particle.respawn(plates, rng);
            }
            particle.visible = match particle.class {
                ParticleClass::Inside => {
                    separation > VISIBILITY_THRESHOLD && rng.gen::<f32>() < probability
                }
                ParticleClass::Outside => true,
            };
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn visible(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.visible)
    }

    pub fn of_class(&self, class: ParticleClass) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(move |p| p.class == class)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }
}
