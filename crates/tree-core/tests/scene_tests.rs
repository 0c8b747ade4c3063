// Host-side tests for the frame orchestrator: the full tick loop, photo
// admission, commands and teardown.

mod common;

use common::{blank_photo, png_bytes, FakeAudio, HandScript};
use glam::Vec2;
use std::thread;
use std::time::Duration;
use tree_core::*;

const DT: f32 = 0.016;

struct Harness {
    scene: SceneController,
    hand: HandScript,
    audio: FakeAudio,
    now: Duration,
}

impl Harness {
    fn new(config: SceneConfig) -> Self {
        let hand = HandScript::default();
        let audio = FakeAudio::new();
        let scene = SceneController::new(
            config,
            SceneParams::default(),
            Ok(hand.tracker()),
            Box::new(audio.clone()),
        );
        Self {
            scene,
            hand,
            audio,
            now: Duration::ZERO,
        }
    }

    fn small() -> Self {
        Self::new(SceneConfig {
            decor_count: 30,
            snow_count: 10,
            ..SceneConfig::default()
        })
    }

    /// Advance `frames` frames of 16ms each.
    fn run(&mut self, frames: usize) -> Option<FrameReport> {
        let mut last = None;
        for _ in 0..frames {
            self.now += Duration::from_millis(16);
            last = self.scene.tick(DT, self.now);
        }
        last
    }
}

fn pose_hand(pose: Pose) -> HandLandmarks {
    let anchor = Vec2::new(0.5, 0.5);
    match pose {
        Pose::Pinch => HandLandmarks::synthesize(anchor, 0.5, 0.01),
        Pose::Fist => HandLandmarks::synthesize(anchor, 0.2, 0.2),
        Pose::Open => HandLandmarks::synthesize(anchor, 0.5, 0.2),
        Pose::Unchanged => HandLandmarks::synthesize(anchor, 0.33, 0.2),
    }
}

#[test]
fn populates_from_config() {
    let h = Harness::small();
    let particles = h.scene.particles();
    let config = h.scene.config();
    assert_eq!(particles.len(), config.decor_count + config.snow_count);
    assert_eq!(particles.len(), 40);
    assert_eq!(particles.iter().filter(|p| p.is_snow()).count(), config.snow_count);
    assert_eq!(particles.photo_count(), 0);
    assert_eq!(h.scene.mode(), InteractionMode::Tree);
}

#[test]
fn same_seed_same_layout() {
    let a = Harness::small();
    let b = Harness::small();
    let homes = |h: &Harness| {
        h.scene
            .particles()
            .iter()
            .map(|p| p.tree_home())
            .collect::<Vec<_>>()
    };
    assert_eq!(homes(&a), homes(&b));
}

#[test]
fn idle_scene_spins_without_a_hand() {
    let mut h = Harness::small();
    let report = h.run(60).expect("live");
    assert!(!report.hand_detected);
    assert!(report.cursor.is_none());
    assert_eq!(report.mode, InteractionMode::Tree);
    let yaw = h.scene.motion().current_rotation.y;
    assert!((yaw - 60.0 * DT * TREE_AUTO_SPIN).abs() < 1e-4);
}

#[test]
fn hand_poses_drive_modes() {
    let mut h = Harness::small();
    h.hand.show(pose_hand(Pose::Open));
    let report = h.run(10).expect("live");
    assert_eq!(report.mode, InteractionMode::Scatter);
    assert!(report.hand_detected);
    assert!(report.cursor.is_some());

    h.hand.show(pose_hand(Pose::Unchanged));
    assert_eq!(h.run(10).expect("live").mode, InteractionMode::Scatter);

    // Pinch with no photos keeps the current mode.
    h.hand.show(pose_hand(Pose::Pinch));
    assert_eq!(h.run(10).expect("live").mode, InteractionMode::Scatter);

    h.hand.show(pose_hand(Pose::Fist));
    assert_eq!(h.run(10).expect("live").mode, InteractionMode::Tree);

    // Losing the hand keeps the latched mode.
    h.hand.hide();
    let report = h.run(10).expect("live");
    assert_eq!(report.mode, InteractionMode::Tree);
    assert!(!report.hand_detected);
}

#[test]
fn tracker_is_polled_at_most_once_per_interval() {
    let mut h = Harness::small();
    h.run(50);
    // 50 frames of 16ms span 800ms: one poll per 80ms.
    assert_eq!(*h.hand.polls.borrow(), 10);
}

#[test]
fn pinch_focuses_a_photo_which_reaches_the_anchor() {
    let mut h = Harness::small();
    let ids: Vec<_> = (0..3)
        .map(|i| {
            h.scene
                .admit_photo(blank_photo(&format!("p{i}")))
                .expect("under cap")
        })
        .collect();

    h.hand.show(pose_hand(Pose::Pinch));
    let report = h.run(10).expect("live");
    assert_eq!(report.mode, InteractionMode::Focus);
    let focus = report.focus.expect("focused");
    assert!(ids.contains(&focus));

    h.hand.show(pose_hand(Pose::Unchanged));
    h.run(2000);
    assert_eq!(h.scene.focus(), Some(focus));
    let p = h.scene.particles().get(focus).expect("live");
    assert!((p.transform.position - focus_anchor()).length() < 1e-3);
    assert!(h.scene.motion().current_rotation.length() < 1e-3);
    for other in h.scene.particles().iter().filter(|p| !p.is_snow() && p.id() != focus) {
        assert!(other.transform.scale <= 0.02);
    }
}

#[test]
fn photo_cap_rejects_the_next_photo() {
    let mut h = Harness::new(SceneConfig::empty());
    for i in 0..MAX_PHOTOS {
        h.scene
            .admit_photo(blank_photo(&format!("p{i}")))
            .expect("under cap");
    }
    let before = h.scene.particles().len();

    let err = h.scene.admit_photo(blank_photo("one too many")).unwrap_err();
    assert!(matches!(err, SceneError::PhotoCapacity { max } if max == MAX_PHOTOS));
    assert_eq!(h.scene.particles().photo_count(), MAX_PHOTOS);
    assert_eq!(h.scene.particles().len(), before);

    let batch = vec![PhotoSource::new("late.png", png_bytes(2, 2, [0, 0, 0, 255]))];
    assert!(matches!(
        h.scene.add_photos(batch),
        Err(SceneError::PhotoCapacity { .. })
    ));
    assert_eq!(h.scene.pending_photos(), 0);
}

#[test]
fn uploaded_photos_arrive_on_later_ticks() {
    let mut h = Harness::new(SceneConfig::empty());
    let batch = vec![
        PhotoSource::new("a.png", png_bytes(8, 8, [10, 20, 30, 255])),
        PhotoSource::new("bad.png", b"nope".to_vec()),
        PhotoSource::new("b.png", png_bytes(16, 4, [40, 50, 60, 255])),
    ];
    assert_eq!(h.scene.add_photos(batch).expect("queued"), 3);

    let mut admitted = Vec::new();
    for _ in 0..500 {
        if let Some(report) = h.run(1) {
            admitted.extend(report.admitted);
        }
        if admitted.len() == 2 && h.scene.pending_photos() == 0 {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(admitted.len(), 2);
    assert_eq!(h.scene.particles().photo_count(), 2);
    assert_eq!(h.scene.pending_photos(), 0);
    for id in admitted {
        assert!(h.scene.particles().is_photo(id));
        let photo = h.scene.particles().photo(id).expect("decoded image");
        assert!(photo.name == "a.png" || photo.name == "b.png");
    }
}

#[test]
fn audio_commands_and_coupling() {
    let mut h = Harness::small();
    assert!(h.scene.toggle_audio());
    h.scene.set_music_volume(0.25);
    assert_eq!(h.audio.snapshot().volume, 0.25);
    assert_eq!(h.scene.params().music_volume, 0.25);

    h.hand.show(pose_hand(Pose::Open));
    h.run(500);
    // Open hand at center: pointer x is 0.
    assert!((h.audio.snapshot().rate - 1.1).abs() < 1e-3);

    h.audio.break_source("gone.mp3");
    assert!(matches!(
        h.scene.play_audio(Some("gone.mp3")),
        Err(SceneError::Audio(AudioError::Load { .. }))
    ));
    assert!(h.audio.snapshot().playing);
}

#[test]
fn settings_are_clamped() {
    let mut h = Harness::small();
    h.scene.set_rotation_speed(-2.0);
    assert_eq!(h.scene.params().rotation_speed, 0.0);
    h.scene.set_particle_size(2.0);
    assert_eq!(h.scene.params().particle_size, 2.0);
    h.scene.set_bloom_strength(-1.0);
    assert_eq!(h.scene.params().bloom_strength, 0.0);

    h.scene.set_snow_density(0.0);
    assert!(h.scene.particles().iter().filter(|p| p.is_snow()).all(|p| !p.visible));
    assert!(h.scene.instances().all(|i| i.kind != ParticleKind::Snow));
}

#[test]
fn instances_apply_the_field_transform() {
    let mut h = Harness::small();
    h.run(100);
    let field = h.scene.motion().transform();
    let id = h
        .scene
        .particles()
        .iter()
        .find(|p| p.kind().is_decor())
        .expect("decor")
        .id();
    let local = h.scene.particles().get(id).expect("live").transform.position;
    let world = h
        .scene
        .instances()
        .find(|i| i.id == id)
        .expect("visible")
        .position;
    assert!((world - field.apply(local)).length() < 1e-4);
}

#[test]
fn unavailable_tracker_still_runs() {
    let mut scene = SceneController::new(
        SceneConfig::empty(),
        SceneParams::default(),
        Err(TrackerError::Unavailable("no camera".into())),
        Box::new(SilentBackend::new()),
    );
    assert!(!scene.gesture().has_tracker());
    let mut now = Duration::ZERO;
    for _ in 0..20 {
        now += Duration::from_millis(16);
        let report = scene.tick(DT, now).expect("live");
        assert!(!report.hand_detected);
        assert_eq!(report.mode, InteractionMode::Tree);
    }
}

#[test]
fn teardown_stops_everything() {
    let mut h = Harness::small();
    h.scene.toggle_audio();
    h.run(5);
    h.scene.destroy();

    assert!(!h.scene.is_live());
    assert!(*h.hand.closed.borrow());
    let log = h.audio.snapshot();
    assert!(log.closed && !log.playing);

    let polls = *h.hand.polls.borrow();
    assert!(h.run(20).is_none());
    assert_eq!(*h.hand.polls.borrow(), polls);

    assert!(matches!(h.scene.add_photos(Vec::new()), Err(SceneError::TornDown)));
    assert!(matches!(
        h.scene.admit_photo(blank_photo("late")),
        Err(SceneError::TornDown)
    ));
    assert!(!h.scene.toggle_audio());

    // Idempotent.
    h.scene.destroy();
    assert!(!h.scene.is_live());
}

#[test]
fn cursor_floats_in_front_of_the_camera() {
    let camera = Camera::default();
    for (x, y) in [(0.0, 0.0), (0.8, -0.5), (-1.0, 1.0)] {
        let cursor = camera.cursor_position(Pointer::new(x, y));
        assert!(((cursor - camera.eye).length() - CURSOR_DISTANCE).abs() < 1e-3);
        assert!(cursor.z < camera.eye.z);
    }
    let right = camera.cursor_position(Pointer::new(0.5, 0.0));
    let left = camera.cursor_position(Pointer::new(-0.5, 0.0));
    assert!(right.x > 0.0 && left.x < 0.0);
}
