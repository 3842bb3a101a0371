//! Scene state: everything the frame loop updates and draws.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;

use crate::arrows::ArrowSet;
use crate::demo::DemoConfig;
use crate::mesh::{LineBatch, SolidBatch, SolidMesh};
use crate::particles::ParticleField;
use crate::plates::{PlatePair, PLATE_COLOR, PLATE_SIZE};
use crate::ruler::Ruler;
use crate::transition::{clamp_speed, Animator, Stage};

/// A request raised by the control panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiAction {
    Demonstrate(Stage),
    Reset,
    SetSpeed(f32),
}

/// Owns the plates, particles, arrows, ruler and animation state.
pub struct Scene {
    plates: PlatePair,
    particles: ParticleField,
    arrows: ArrowSet,
    ruler: Ruler,
    animator: Animator,
    speed: f32,
    plate_mesh: SolidMesh,
    rng: SmallRng,
}

impl Scene {
    pub fn new(config: &DemoConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let plates = PlatePair::initial();
        let particles = ParticleField::spawn(config.particle_count, &plates, &mut rng);
        let arrows = ArrowSet::new(&plates);

        log::info!(
            "Scene ready: {} particles, plate separation {:.2}",
            particles.len(),
            plates.separation()
        );

        Self {
            plates,
            particles,
            arrows,
            ruler: Ruler::new(),
            animator: Animator::new(),
            speed: clamp_speed(config.speed),
            plate_mesh: SolidMesh::cuboid(PLATE_SIZE),
            rng,
        }
    }

    /// Per-frame update: advance animations, then move particles.
    pub fn update(&mut self, dt: Duration) {
        self.animator
            .advance(dt, &mut self.plates, &mut self.arrows);
        self.particles.step(&self.plates, &mut self.rng);
    }

    pub fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Demonstrate(stage) => {
                self.demonstrate(stage);
            }
            UiAction::Reset => {
                self.reset();
            }
            UiAction::SetSpeed(speed) => self.set_speed(speed),
        }
    }

    /// Start a transition. No-op while busy.
    pub fn demonstrate(&mut self, stage: Stage) -> bool {
        self.animator
            .demonstrate(stage, self.speed, &self.plates, &self.arrows)
    }

    /// Snap back to the widest separation. No-op while busy.
    pub fn reset(&mut self) -> bool {
        self.animator.reset(&mut self.plates, &mut self.arrows)
    }

    /// Set the speed factor used by the next transition.
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = clamp_speed(speed);
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.animator.is_busy()
    }

    #[inline]
    pub fn plates(&self) -> &PlatePair {
        &self.plates
    }

    #[inline]
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    #[inline]
    pub fn arrows(&self) -> &ArrowSet {
        &self.arrows
    }

    #[inline]
    pub fn ruler(&self) -> &Ruler {
        &self.ruler
    }

    #[inline]
    pub fn separation(&self) -> f32 {
        self.plates.separation()
    }

    /// Separation readout with two decimals.
    pub fn separation_label(&self) -> String {
        format!("{:.2}", self.separation())
    }

    /// Everything drawn filled and lit: both plates, then every arrow.
    pub fn solid_batches(&self) -> Vec<SolidBatch> {
        let mut batches: Vec<SolidBatch> = self
            .plates
            .centers()
            .iter()
            .map(|center| {
                let transform = glam::Mat4::from_translation(*center);
                SolidBatch::new(self.plate_mesh.transformed(&transform), PLATE_COLOR)
            })
            .collect();
        batches.extend(self.arrows.solid_batches());
        batches
    }

    /// Everything drawn as lines.
    pub fn line_batches(&self) -> Vec<LineBatch> {
        vec![self.ruler.line_batch()]
    }
}
