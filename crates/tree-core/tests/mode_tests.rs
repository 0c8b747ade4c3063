// Host-side tests for the interaction mode state machine.

mod common;

use common::blank_photo;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tree_core::*;

fn photo_ids(n: usize) -> Vec<ParticleId> {
    let mut registry = ParticleRegistry::new();
    let mut rng = StdRng::seed_from_u64(1);
    let layout = TreeLayout::default();
    (0..n)
        .map(|i| {
            registry
                .admit_photo(blank_photo(&format!("p{i}")), &layout, MAX_PHOTOS, &mut rng)
                .expect("under cap")
        })
        .collect()
}

#[test]
fn starts_gathered_without_focus() {
    let machine = ModeMachine::new();
    assert_eq!(machine.mode(), InteractionMode::Tree);
    assert_eq!(machine.focus(), None);
}

#[test]
fn open_and_fist_switch_modes() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut machine = ModeMachine::new();
    assert!(machine.apply(Pose::Open, &[], &mut rng));
    assert_eq!(machine.mode(), InteractionMode::Scatter);
    assert!(!machine.apply(Pose::Open, &[], &mut rng));
    assert!(machine.apply(Pose::Fist, &[], &mut rng));
    assert_eq!(machine.mode(), InteractionMode::Tree);
}

#[test]
fn pinch_latches_through_dead_zone() {
    let ids = photo_ids(5);
    let mut rng = StdRng::seed_from_u64(7);
    let mut machine = ModeMachine::new();

    machine.apply(Pose::Pinch, &ids, &mut rng);
    assert_eq!(machine.mode(), InteractionMode::Focus);
    let focus = machine.focus().expect("a photo is focused");
    assert!(ids.contains(&focus));

    for _ in 0..2 {
        assert!(!machine.apply(Pose::Unchanged, &ids, &mut rng));
        assert_eq!(machine.mode(), InteractionMode::Focus);
        assert_eq!(machine.focus(), Some(focus));
    }
}

#[test]
fn repeated_pinch_keeps_the_same_photo() {
    let ids = photo_ids(10);
    let mut rng = StdRng::seed_from_u64(11);
    let mut machine = ModeMachine::new();
    machine.apply(Pose::Pinch, &ids, &mut rng);
    let focus = machine.focus();
    for _ in 0..50 {
        assert!(!machine.apply(Pose::Pinch, &ids, &mut rng));
        assert_eq!(machine.focus(), focus);
    }
}

#[test]
fn pinch_without_photos_is_ignored() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut machine = ModeMachine::new();
    machine.apply(Pose::Open, &[], &mut rng);
    assert!(!machine.apply(Pose::Pinch, &[], &mut rng));
    assert_eq!(machine.mode(), InteractionMode::Scatter);
    assert_eq!(machine.focus(), None);
}

#[test]
fn leaving_focus_clears_the_selection() {
    let ids = photo_ids(3);
    let mut rng = StdRng::seed_from_u64(9);
    for exit in [Pose::Fist, Pose::Open] {
        let mut machine = ModeMachine::new();
        machine.apply(Pose::Pinch, &ids, &mut rng);
        machine.apply(exit, &ids, &mut rng);
        assert_ne!(machine.mode(), InteractionMode::Focus);
        assert_eq!(machine.focus(), None);
    }
}

#[test]
fn stale_focus_is_replaced_on_pinch() {
    let ids = photo_ids(2);
    let mut rng = StdRng::seed_from_u64(13);
    let mut machine = ModeMachine::new();
    machine.apply(Pose::Pinch, &ids[..1], &mut rng);
    assert_eq!(machine.focus(), Some(ids[0]));

    // The focused photo is no longer live; only ids[1] is.
    assert_eq!(machine.live_focus(&ids[1..]), None);
    assert!(machine.apply(Pose::Pinch, &ids[1..], &mut rng));
    assert_eq!(machine.focus(), Some(ids[1]));
}

#[test]
fn particles_scatter_while_the_focus_is_stale() {
    let ids = photo_ids(2);
    let mut rng = StdRng::seed_from_u64(19);
    let mut machine = ModeMachine::new();
    machine.apply(Pose::Pinch, &ids[..1], &mut rng);
    assert_eq!(
        machine.particle_mode(&ids),
        (InteractionMode::Focus, Some(ids[0]))
    );

    // The machine still reports FOCUS; only the particles fall back.
    assert_eq!(
        machine.particle_mode(&ids[1..]),
        (InteractionMode::Scatter, None)
    );
    assert_eq!(machine.mode(), InteractionMode::Focus);

    machine.apply(Pose::Open, &ids, &mut rng);
    assert_eq!(machine.particle_mode(&ids), (InteractionMode::Scatter, None));
    machine.apply(Pose::Fist, &ids, &mut rng);
    assert_eq!(machine.particle_mode(&[]), (InteractionMode::Tree, None));
}

#[test]
fn focus_is_set_exactly_in_focus_mode() {
    let ids = photo_ids(4);
    let mut rng = StdRng::seed_from_u64(17);
    let mut machine = ModeMachine::new();
    let poses = [Pose::Pinch, Pose::Fist, Pose::Open, Pose::Unchanged];
    for step in 0..500 {
        let pose = poses[rng.gen_range(0..poses.len())];
        // Every so often there is nothing to focus on.
        let photos: &[ParticleId] = if step % 7 == 0 { &[] } else { &ids };
        machine.apply(pose, photos, &mut rng);
        assert_eq!(
            machine.focus().is_some(),
            machine.mode() == InteractionMode::Focus,
            "step {step}: {:?} with focus {:?}",
            machine.mode(),
            machine.focus()
        );
    }
}
