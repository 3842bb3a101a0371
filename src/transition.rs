//! Animated plate transitions and the busy flag guarding them.
//!
//! A transition eases both plates toward the stage's target separation while
//! the inner arrows shrink toward the stage's scale. Arrow positions are
//! re-derived from the live plate positions on every step. While a
//! transition runs the [`Animator`] is busy: further transition or reset
//! requests are ignored, not queued.

use std::time::Duration;

use crate::arrows::ArrowSet;
use crate::plates::{PlatePair, RESET_OFFSET};
use crate::tween::Tween;

/// Transition length at speed 1.0.
pub const BASE_DURATION: Duration = Duration::from_millis(2000);

pub const MIN_SPEED: f32 = 0.25;
pub const MAX_SPEED: f32 = 4.0;
pub const DEFAULT_SPEED: f32 = 1.0;

/// A demonstration target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Plates at ±2.5, a 10 nm gap.
    Narrow,
    /// Plates touching.
    Contact,
}

impl Stage {
    /// Half-separation the plates end at.
    pub fn target_offset(&self) -> f32 {
        match self {
            Stage::Narrow => 2.5,
            Stage::Contact => 0.0,
        }
    }

    /// Scale the inner arrows end at.
    pub fn inner_arrow_scale(&self) -> f32 {
        match self {
            Stage::Narrow => 0.7,
            Stage::Contact => 0.1,
        }
    }

    /// 1-based stage number as shown on the buttons.
    pub fn number(&self) -> u8 {
        match self {
            Stage::Narrow => 1,
            Stage::Contact => 2,
        }
    }
}

/// Clamp a speed factor into `[MIN_SPEED, MAX_SPEED]`. Non-finite input
/// falls back to [`DEFAULT_SPEED`].
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_finite() {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    } else {
        DEFAULT_SPEED
    }
}

/// How long a transition takes at the given speed factor.
pub fn transition_duration(speed: f32) -> Duration {
    BASE_DURATION.div_f32(clamp_speed(speed))
}

/// One in-flight transition.
#[derive(Debug, Clone)]
pub struct Transition {
    stage: Stage,
    lower: Tween,
    upper: Tween,
    inner_scale: Tween,
}

impl Transition {
    pub fn new(stage: Stage, plates: &PlatePair, inner_scale: f32, speed: f32) -> Self {
        let duration = transition_duration(speed);
        let target = stage.target_offset();

        Self {
            stage,
            lower: Tween::new(plates.lower, -target, duration),
            upper: Tween::new(plates.upper, target, duration),
            inner_scale: Tween::new(inner_scale, stage.inner_arrow_scale(), duration),
        }
    }

    /// Step every tween and write the results into the scene.
    pub fn advance(&mut self, dt: Duration, plates: &mut PlatePair, arrows: &mut ArrowSet) {
        plates.lower = self.lower.advance(dt);
        plates.upper = self.upper.advance(dt);
        arrows.update_positions(plates);
        arrows.set_inner_scale(self.inner_scale.advance(dt));
    }

    pub fn is_finished(&self) -> bool {
        self.lower.is_finished() && self.upper.is_finished() && self.inner_scale.is_finished()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn duration(&self) -> Duration {
        self.upper.duration()
    }

    pub fn progress(&self) -> f32 {
        self.upper.progress()
    }
}

/// Owns the current transition, if any.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    active: Option<Transition>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The busy flag.
    #[inline]
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Transition> {
        self.active.as_ref()
    }

    /// Start a transition toward `stage`. Returns `false` and changes
    /// nothing if one is already running.
    pub fn demonstrate(
        &mut self,
        stage: Stage,
        speed: f32,
        plates: &PlatePair,
        arrows: &ArrowSet,
    ) -> bool {
        if self.is_busy() {
            log::debug!("Ignoring stage {} request: transition in progress", stage.number());
            return false;
        }

        let transition = Transition::new(stage, plates, arrows.inner_scale(), speed);
        log::info!(
            "Stage {} transition: separation {:.2} -> {:.2} over {:?}",
            stage.number(),
            plates.separation(),
            stage.target_offset() * 2.0,
            transition.duration()
        );
        self.active = Some(transition);
        true
    }

    /// Jump straight to the widest separation with full-size inner arrows.
    /// Returns `false` and changes nothing while busy.
    pub fn reset(&self, plates: &mut PlatePair, arrows: &mut ArrowSet) -> bool {
        if self.is_busy() {
            log::debug!("Ignoring reset: transition in progress");
            return false;
        }

        plates.set_symmetric(RESET_OFFSET);
        arrows.update_positions(plates);
        arrows.set_inner_scale(1.0);
        log::info!("Reset plates to separation {:.2}", plates.separation());
        true
    }

    /// Advance the running transition, clearing the busy flag once its
    /// duration has elapsed.
    pub fn advance(&mut self, dt: Duration, plates: &mut PlatePair, arrows: &mut ArrowSet) {
        let Some(transition) = self.active.as_mut() else {
            return;
        };

        transition.advance(dt, plates, arrows);
        if transition.is_finished() {
            log::info!(
                "Stage {} transition finished at separation {:.2}",
                transition.stage().number(),
                plates.separation()
            );
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrows::ArrowRole;

    fn scene() -> (PlatePair, ArrowSet) {
        let plates = PlatePair::initial();
        let arrows = ArrowSet::new(&plates);
        (plates, arrows)
    }

    #[test]
    fn test_duration_scales_inversely_with_speed() {
        assert_eq!(transition_duration(1.0), Duration::from_millis(2000));
        assert_eq!(transition_duration(2.0), Duration::from_millis(1000));
        assert_eq!(transition_duration(0.5), Duration::from_millis(4000));
    }

    #[test]
    fn test_speed_is_clamped() {
        assert_eq!(clamp_speed(0.0), MIN_SPEED);
        assert_eq!(clamp_speed(-3.0), MIN_SPEED);
        assert_eq!(clamp_speed(100.0), MAX_SPEED);
        assert_eq!(clamp_speed(f32::NAN), DEFAULT_SPEED);
        assert_eq!(clamp_speed(f32::INFINITY), DEFAULT_SPEED);
    }

    #[test]
    fn test_stage_one_converges() {
        let (mut plates, mut arrows) = scene();
        let mut animator = Animator::new();

        assert!(animator.demonstrate(Stage::Narrow, 1.0, &plates, &arrows));
        assert!(animator.is_busy());

        for _ in 0..200 {
            animator.advance(Duration::from_millis(16), &mut plates, &mut arrows);
        }

        assert!(!animator.is_busy());
        assert_eq!(plates.lower, -2.5);
        assert_eq!(plates.upper, 2.5);
        assert_eq!(arrows.inner_scale(), 0.7);
        assert_eq!(arrows, {
            let mut expected = ArrowSet::new(&plates);
            expected.set_inner_scale(0.7);
            expected
        });
    }

    #[test]
    fn test_stage_two_closes_gap() {
        let (mut plates, mut arrows) = scene();
        let mut animator = Animator::new();

        animator.demonstrate(Stage::Contact, 2.0, &plates, &arrows);
        animator.advance(Duration::from_millis(1000), &mut plates, &mut arrows);

        assert!(!animator.is_busy());
        assert_eq!(plates.separation(), 0.0);
        assert_eq!(arrows.inner_scale(), 0.1);
    }

    #[test]
    fn test_busy_flag_blocks_new_transitions() {
        let (mut plates, mut arrows) = scene();
        let mut animator = Animator::new();

        animator.demonstrate(Stage::Narrow, 1.0, &plates, &arrows);
        animator.advance(Duration::from_millis(500), &mut plates, &mut arrows);

        let plates_before = plates;
        let arrows_before = arrows.clone();
        assert!(!animator.demonstrate(Stage::Contact, 1.0, &plates, &arrows));
        assert!(!animator.reset(&mut plates, &mut arrows));

        assert!(animator.is_busy());
        assert_eq!(animator.active().map(|t| t.stage()), Some(Stage::Narrow));
        assert_eq!(plates, plates_before);
        assert_eq!(arrows, arrows_before);
    }

    #[test]
    fn test_busy_until_duration_elapses() {
        let (mut plates, mut arrows) = scene();
        let mut animator = Animator::new();

        animator.demonstrate(Stage::Narrow, 1.0, &plates, &arrows);
        animator.advance(Duration::from_millis(1999), &mut plates, &mut arrows);
        assert!(animator.is_busy());
        animator.advance(Duration::from_millis(1), &mut plates, &mut arrows);
        assert!(!animator.is_busy());
    }

    #[test]
    fn test_arrows_track_plates_mid_transition() {
        let (mut plates, mut arrows) = scene();
        let mut animator = Animator::new();

        animator.demonstrate(Stage::Contact, 1.0, &plates, &arrows);
        animator.advance(Duration::from_millis(700), &mut plates, &mut arrows);

        assert!(plates.upper < 2.0 && plates.upper > 0.0);
        for arrow in arrows.iter() {
            assert_eq!(arrow.position.y, arrow.role.y(&plates));
        }
        let scale = arrows.inner_scale();
        assert!(scale < 1.0 && scale > 0.1);
        assert!(arrows
            .with_role(ArrowRole::TopInner)
            .all(|a| a.scale == scale));
    }

    #[test]
    fn test_reset_when_idle() {
        let (mut plates, mut arrows) = scene();
        let mut animator = Animator::new();

        animator.demonstrate(Stage::Contact, 4.0, &plates, &arrows);
        animator.advance(Duration::from_secs(1), &mut plates, &mut arrows);

        assert!(animator.reset(&mut plates, &mut arrows));
        assert_eq!(plates.lower, -5.0);
        assert_eq!(plates.upper, 5.0);
        assert_eq!(arrows.inner_scale(), 1.0);
        assert_eq!(arrows, ArrowSet::new(&plates));
    }

    #[test]
    fn test_transition_starts_from_current_inner_scale() {
        let (mut plates, mut arrows) = scene();
        let mut animator = Animator::new();

        animator.demonstrate(Stage::Narrow, 1.0, &plates, &arrows);
        animator.advance(Duration::from_secs(2), &mut plates, &mut arrows);
        animator.demonstrate(Stage::Contact, 1.0, &plates, &arrows);
        animator.advance(Duration::from_millis(1), &mut plates, &mut arrows);

        let scale = arrows.inner_scale();
        assert!(scale < 0.7 && scale > 0.6, "scale jumped to {}", scale);
    }
}
