//! The per-frame driver.
//!
//! One [`SceneController`] owns every piece of scene state. The host calls
//! [`SceneController::tick`] once per rendered frame; each tick runs, in
//! order: photo admission, throttled gesture polling and mode transition,
//! whole-field motion, audio coupling, and the update of every particle.

use crate::audio::{AudioBackend, AudioDeck};
use crate::config::{SceneConfig, SceneParams};
use crate::constants::star_position;
use crate::error::{SceneError, TrackerError};
use crate::gesture::{GestureInput, HandTracker};
use crate::mode::ModeMachine;
use crate::motion::{FieldTransform, SceneMotion};
use crate::particle::{ParticleFrame, ParticleId, ParticleKind, TreeLayout};
use crate::photo::{Photo, PhotoDecoder, PhotoSource};
use crate::registry::ParticleRegistry;
use crate::state::{Camera, InteractionMode, Pointer};
use glam::Vec3;
use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use smallvec::SmallVec;
use std::time::Duration;

/// Wall-clock source for `dt` and elapsed time.
pub struct FrameClock {
    start: Instant,
    last: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    /// Seconds since the previous call, and time since the clock started.
    pub fn tick(&mut self) -> (f32, Duration) {
        let now = Instant::now();
        let dt = now - self.last;
        self.last = now;
        (dt.as_secs_f32(), now - self.start)
    }
}

/// What the host needs to present one frame.
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub mode: InteractionMode,
    /// Focused photo, if the mode is focus and the photo still exists.
    pub focus: Option<ParticleId>,
    pub hand_detected: bool,
    pub pointer: Pointer,
    pub field: FieldTransform,
    /// World-space hand cursor; `None` while no hand is visible.
    pub cursor: Option<Vec3>,
    /// Photos that joined the scene this frame.
    pub admitted: SmallVec<[ParticleId; 4]>,
}

/// One body ready to draw, in world space.
#[derive(Clone, Copy, Debug)]
pub struct Instance {
    pub id: ParticleId,
    pub kind: ParticleKind,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

pub struct SceneController {
    config: SceneConfig,
    params: SceneParams,
    layout: TreeLayout,
    rng: StdRng,
    registry: ParticleRegistry,
    gesture: GestureInput,
    modes: ModeMachine,
    motion: SceneMotion,
    audio: AudioDeck,
    decoder: Option<PhotoDecoder>,
    camera: Camera,
    elapsed: f32,
}

impl SceneController {
    /// Build and populate a scene.
    ///
    /// `tracker` may be an initialisation error; the scene then runs in
    /// idle mode without hand control.
    pub fn new(
        config: SceneConfig,
        params: SceneParams,
        tracker: Result<Box<dyn HandTracker>, TrackerError>,
        audio: Box<dyn AudioBackend>,
    ) -> Self {
        let layout = TreeLayout {
            height: config.tree_height,
            radius: config.tree_radius,
        };
        // Layout and runtime randomness come from separate streams so the
        // arrangement does not depend on what happens at runtime.
        let mut layout_rng = StdRng::seed_from_u64(config.seed);
        let rng = StdRng::seed_from_u64(config.seed ^ 0x9E37_79B9_7F4A_7C15);

        let mut registry = ParticleRegistry::new();
        for _ in 0..config.decor_count {
            registry.spawn_decor(&layout, &mut layout_rng);
        }
        for _ in 0..config.snow_count {
            registry.spawn_snow(&mut layout_rng);
        }
        log::info!(
            "[scene] {} decor, {} snow, photo cap {}",
            config.decor_count,
            config.snow_count,
            config.max_photos
        );

        let gesture = GestureInput::new(tracker, config.detect_interval);
        let audio = AudioDeck::new(audio, params.music_volume);
        let mut scene = Self {
            config,
            params,
            layout,
            rng,
            registry,
            gesture,
            modes: ModeMachine::new(),
            motion: SceneMotion::new(),
            audio,
            decoder: Some(PhotoDecoder::new()),
            camera: Camera::default(),
            elapsed: 0.0,
        };
        let density = scene.params.snow_density;
        scene.set_snow_density(density);
        scene
    }

    pub fn is_live(&self) -> bool {
        self.decoder.is_some()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn params(&self) -> &SceneParams {
        &self.params
    }

    pub fn mode(&self) -> InteractionMode {
        self.modes.mode()
    }

    pub fn focus(&self) -> Option<ParticleId> {
        self.modes.live_focus(self.registry.photo_ids())
    }

    pub fn motion(&self) -> &SceneMotion {
        &self.motion
    }

    pub fn particles(&self) -> &ParticleRegistry {
        &self.registry
    }

    pub fn gesture(&self) -> &GestureInput {
        &self.gesture
    }

    pub fn audio(&self) -> &AudioDeck {
        &self.audio
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn star_position(&self) -> Vec3 {
        self.motion.transform().apply(star_position(self.config.tree_height))
    }

    /// Photos still being decoded.
    pub fn pending_photos(&self) -> usize {
        self.decoder.as_ref().map(|d| d.in_flight()).unwrap_or(0)
    }

    /// Advance the scene by `dt` seconds. `now` is time since start and
    /// drives the gesture-poll throttle.
    ///
    /// Returns `None` once the scene has been torn down.
    pub fn tick(&mut self, dt: f32, now: Duration) -> Option<FrameReport> {
        let decoded = self.decoder.as_ref()?.drain();
        let mut admitted = SmallVec::new();
        for photo in decoded {
            let name = photo.name.clone();
            match self.admit_photo(photo) {
                Ok(id) => admitted.push(id),
                Err(e) => log::warn!("[photos] dropping `{name}`: {e}"),
            }
        }

        if let Some(sample) = self.gesture.poll(now) {
            self.modes
                .apply(sample.pose, self.registry.photo_ids(), &mut self.rng);
        }
        let classifier = self.gesture.classifier();
        let detected = classifier.detected();
        let pointer = classifier.pointer();
        let mode = self.modes.mode();

        self.motion
            .step(mode, detected, pointer, self.params.rotation_speed, dt);
        self.audio.couple(mode, pointer.x, dt);

        let (particle_mode, focus) = self.modes.particle_mode(self.registry.photo_ids());
        self.elapsed += dt;
        let frame = ParticleFrame {
            dt,
            elapsed: self.elapsed,
            mode: particle_mode,
            focus,
            particle_size: self.params.particle_size,
        };
        self.registry.update_all(&frame, &mut self.rng);

        Some(FrameReport {
            mode,
            focus,
            hand_detected: detected,
            pointer,
            field: self.motion.transform(),
            cursor: detected.then(|| self.camera.cursor_position(pointer)),
            admitted,
        })
    }

    /// Queue photos for background decoding.
    ///
    /// Fails fast, without touching the scene, when the photo cap is
    /// already reached. Returns the number of photos queued.
    pub fn add_photos(&mut self, batch: Vec<PhotoSource>) -> Result<usize, SceneError> {
        let decoder = self.decoder.as_ref().ok_or(SceneError::TornDown)?;
        if self.registry.photo_count() >= self.config.max_photos {
            log::warn!(
                "[photos] limit of {} reached, ignoring {} new photo(s)",
                self.config.max_photos,
                batch.len()
            );
            return Err(SceneError::PhotoCapacity {
                max: self.config.max_photos,
            });
        }
        let count = batch.len();
        decoder.submit(batch);
        Ok(count)
    }

    /// Add an already-decoded photo right away.
    pub fn admit_photo(&mut self, photo: Photo) -> Result<ParticleId, SceneError> {
        if !self.is_live() {
            return Err(SceneError::TornDown);
        }
        let id = self.registry.admit_photo(
            photo,
            &self.layout,
            self.config.max_photos,
            &mut self.rng,
        )?;
        log::debug!("[photos] admitted {:?}", id);
        Ok(id)
    }

    pub fn play_audio(&mut self, source: Option<&str>) -> Result<(), SceneError> {
        if !self.is_live() {
            return Err(SceneError::TornDown);
        }
        self.audio.play_audio(source).map_err(SceneError::from)
    }

    pub fn toggle_audio(&mut self) -> bool {
        self.is_live() && self.audio.toggle_audio()
    }

    pub fn set_music_volume(&mut self, volume: f32) {
        self.audio.set_music_volume(volume);
        self.params.music_volume = self.audio.volume();
    }

    pub fn set_rotation_speed(&mut self, speed: f32) {
        self.params.rotation_speed = speed.max(0.0);
    }

    pub fn set_particle_size(&mut self, size: f32) {
        self.params.particle_size = size.max(0.0);
    }

    pub fn set_bloom_strength(&mut self, strength: f32) {
        self.params.bloom_strength = strength.max(0.0);
    }

    pub fn set_snow_density(&mut self, density: f32) {
        self.params.snow_density = density.clamp(0.0, 1.0);
        self.registry
            .set_snow_density(self.params.snow_density, &mut self.rng);
    }

    /// World-space view of every visible particle.
    pub fn instances(&self) -> impl Iterator<Item = Instance> + '_ {
        let field = self.motion.transform().matrix();
        self.registry
            .iter()
            .filter(|p| p.visible)
            .map(move |p| {
                let t = p.transform;
                let position = if p.is_snow() {
                    t.position
                } else {
                    field.transform_point3(t.position)
                };
                Instance {
                    id: p.id(),
                    kind: p.kind(),
                    position,
                    rotation: t.rotation,
                    scale: t.scale,
                }
            })
    }

    /// Tear the scene down: release the tracker and the audio device and
    /// stop accepting ticks. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.decoder.take().is_none() {
            return;
        }
        self.gesture.close();
        self.audio.close();
        log::info!("[scene] torn down");
    }
}

impl Drop for SceneController {
    fn drop(&mut self) {
        self.destroy();
    }
}
