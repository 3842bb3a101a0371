//! Integration tests for the headless scene.
//!
//! These drive [`Scene`] through the same calls the window loop makes and
//! check the particle, plate and arrow state after each frame.

use std::time::Duration;

use casimir::arrows::{ArrowRole, ArrowSet, ARROW_GAP};
use casimir::particles::{
    visibility_probability, ParticleClass, HALF_DEPTH, HALF_WIDTH, OUTSIDE_MARGIN,
};
use casimir::plates::{PlatePair, MAX_SEPARATION};
use casimir::prelude::*;

const FRAME: Duration = Duration::from_millis(16);
const EPS: f32 = 1e-5;

fn seeded_scene(seed: u64) -> Scene {
    Scene::new(&DemoConfig {
        particle_count: 400,
        seed: Some(seed),
        ..DemoConfig::default()
    })
}

/// Step until the running transition (if any) has finished.
fn finish_transition(scene: &mut Scene) -> u32 {
    let mut frames = 0;
    while scene.is_busy() {
        scene.update(FRAME);
        frames += 1;
        assert!(frames < 10_000, "transition never finished");
    }
    frames
}

fn assert_particles_in_regions(scene: &Scene) {
    let plates = *scene.plates();
    for p in scene.particles().iter() {
        let pos = p.position;
        assert!(pos.x.abs() <= HALF_WIDTH + EPS, "x out of box: {:?}", pos);
        assert!(pos.z.abs() <= HALF_DEPTH + EPS, "z out of box: {:?}", pos);

        match p.class() {
            ParticleClass::Inside => {
                assert!(
                    pos.y >= plates.lower - EPS && pos.y <= plates.upper + EPS,
                    "inside particle left the gap: {:?} plates {:?}",
                    pos,
                    plates
                );
            }
            ParticleClass::Outside => {
                assert!(
                    !plates.contains_strict(pos.y),
                    "outside particle between plates: {:?} plates {:?}",
                    pos,
                    plates
                );
                assert!(pos.y <= plates.upper + OUTSIDE_MARGIN + EPS);
                assert!(pos.y >= plates.lower - OUTSIDE_MARGIN - EPS);
            }
        }
    }
}

fn assert_arrows_follow_plates(arrows: &ArrowSet, plates: &PlatePair) {
    for arrow in arrows.iter() {
        assert!(
            (arrow.position.y - arrow.role.y(plates)).abs() < EPS,
            "{:?} at {} for plates {:?}",
            arrow.role,
            arrow.position.y,
            plates
        );
    }
}

// ============================================================================
// Particles
// ============================================================================

#[test]
fn test_particles_stay_in_regions_while_idle() {
    let mut scene = seeded_scene(1);
    for _ in 0..300 {
        scene.update(FRAME);
        assert_particles_in_regions(&scene);
    }
}

#[test]
fn test_particles_stay_in_regions_through_transitions() {
    let mut scene = seeded_scene(2);
    scene.set_speed(4.0);

    scene.demonstrate(Stage::Narrow);
    while scene.is_busy() {
        scene.update(FRAME);
        assert_particles_in_regions(&scene);
    }

    scene.demonstrate(Stage::Contact);
    while scene.is_busy() {
        scene.update(FRAME);
        assert_particles_in_regions(&scene);
    }

    assert!(scene.reset());
    scene.update(FRAME);
    assert_particles_in_regions(&scene);
}

#[test]
fn test_class_split_is_fixed() {
    let mut scene = seeded_scene(3);
    let count = |scene: &Scene, class| scene.particles().of_class(class).count();

    assert_eq!(count(&scene, ParticleClass::Inside), 200);
    assert_eq!(count(&scene, ParticleClass::Outside), 200);

    scene.demonstrate(Stage::Contact);
    finish_transition(&mut scene);

    assert_eq!(count(&scene, ParticleClass::Inside), 200);
    assert_eq!(count(&scene, ParticleClass::Outside), 200);
}

#[test]
fn test_inside_particles_hidden_at_contact() {
    let mut scene = seeded_scene(4);
    scene.set_speed(4.0);
    scene.demonstrate(Stage::Contact);
    finish_transition(&mut scene);
    scene.update(FRAME);

    assert_eq!(scene.separation_label(), "0.00");
    assert!(scene
        .particles()
        .of_class(ParticleClass::Inside)
        .all(|p| !p.visible));
    assert!(scene
        .particles()
        .of_class(ParticleClass::Outside)
        .all(|p| p.visible));
}

#[test]
fn test_visibility_probability_curve() {
    assert_eq!(visibility_probability(0.0), 0.0);
    assert_eq!(visibility_probability(0.1), 0.0);
    assert!((visibility_probability(5.0) - 0.25).abs() < EPS);
    assert!((visibility_probability(MAX_SEPARATION) - 1.0).abs() < EPS);

    let mut last = 0.0;
    for i in 1..=100 {
        let p = visibility_probability(i as f32 * MAX_SEPARATION / 100.0);
        assert!(p >= last);
        last = p;
    }
}

// ============================================================================
// Transitions
// ============================================================================

#[test]
fn test_stage_one_converges() {
    let mut scene = seeded_scene(5);
    assert!(scene.demonstrate(Stage::Narrow));
    finish_transition(&mut scene);

    assert!((scene.plates().lower + 2.5).abs() < EPS);
    assert!((scene.plates().upper - 2.5).abs() < EPS);
    assert!((scene.arrows().inner_scale() - 0.7).abs() < EPS);
}

#[test]
fn test_transition_duration_scales_with_speed() {
    let mut slow = seeded_scene(6);
    slow.set_speed(1.0);
    slow.demonstrate(Stage::Narrow);
    let slow_frames = finish_transition(&mut slow);

    let mut fast = seeded_scene(6);
    fast.set_speed(2.0);
    fast.demonstrate(Stage::Narrow);
    let fast_frames = finish_transition(&mut fast);

    // 2000 ms and 1000 ms at 16 ms per frame
    assert_eq!(slow_frames, 125);
    assert_eq!(fast_frames, 63);
}

#[test]
fn test_requests_while_busy_are_ignored() {
    let mut scene = seeded_scene(7);
    assert!(scene.demonstrate(Stage::Narrow));
    scene.update(FRAME);

    let plates = *scene.plates();
    let arrows = scene.arrows().clone();

    assert!(!scene.demonstrate(Stage::Contact));
    assert!(!scene.reset());
    assert!(scene.is_busy());
    assert_eq!(*scene.plates(), plates);
    assert_eq!(*scene.arrows(), arrows);

    // The first request is the one that completes
    finish_transition(&mut scene);
    assert_eq!(scene.separation_label(), "5.00");
}

#[test]
fn test_speed_change_during_transition_applies_to_next() {
    let mut scene = seeded_scene(8);
    scene.demonstrate(Stage::Narrow);
    scene.update(FRAME);
    scene.apply(UiAction::SetSpeed(4.0));

    // Still on the 2000 ms schedule
    let frames = finish_transition(&mut scene) + 1;
    assert_eq!(frames, 125);
    assert_eq!(scene.speed(), 4.0);
}

#[test]
fn test_reset_is_unconditional_when_idle() {
    let mut scene = seeded_scene(9);
    scene.set_speed(4.0);
    scene.demonstrate(Stage::Contact);
    finish_transition(&mut scene);
    assert!((scene.arrows().inner_scale() - 0.1).abs() < EPS);

    assert!(scene.reset());
    assert_eq!(scene.plates().lower, -5.0);
    assert_eq!(scene.plates().upper, 5.0);
    assert_eq!(scene.arrows().inner_scale(), 1.0);
    assert!(!scene.is_busy());
}

// ============================================================================
// Arrows
// ============================================================================

#[test]
fn test_arrows_track_plates_every_frame() {
    let mut scene = seeded_scene(10);
    scene.demonstrate(Stage::Contact);
    while scene.is_busy() {
        scene.update(FRAME);
        assert_arrows_follow_plates(scene.arrows(), scene.plates());
    }
    scene.reset();
    assert_arrows_follow_plates(scene.arrows(), scene.plates());
}

#[test]
fn test_arrow_positions_independent_of_path() {
    // Reached by reset
    let mut a = seeded_scene(11);
    a.reset();

    // Reached by a transition, then reset
    let mut b = seeded_scene(12);
    b.set_speed(4.0);
    b.demonstrate(Stage::Narrow);
    finish_transition(&mut b);
    b.reset();

    assert_eq!(a.arrows(), b.arrows());
}

#[test]
fn test_outer_arrows_point_at_plates() {
    let scene = seeded_scene(13);
    let plates = scene.plates();

    for arrow in scene.arrows().with_role(ArrowRole::TopOuter) {
        assert!((arrow.position.y - (plates.upper + ARROW_GAP)).abs() < EPS);
        assert!(arrow.tip().y < arrow.position.y);
        assert!(arrow.tip().y > plates.upper);
    }
    for arrow in scene.arrows().with_role(ArrowRole::BottomOuter) {
        assert!(arrow.tip().y > arrow.position.y);
        assert!(arrow.tip().y < plates.lower);
    }
}
