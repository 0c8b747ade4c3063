use crate::constants::*;
use std::time::Duration;

/// Construction-time configuration for a scene.
///
/// - `decor_count`: decorative bodies that gather into the tree
/// - `snow_count`: falling snow sprites (outside the whole-field transform)
/// - `tree_height`, `tree_radius`: cone dimensions in world units
/// - `detect_interval`: minimum time between two pose-estimation polls
/// - `max_photos`: cap on live photo particles
/// - `seed`: base seed for layout, focus picks and snow recycling
#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub decor_count: usize,
    pub snow_count: usize,
    pub tree_height: f32,
    pub tree_radius: f32,
    pub detect_interval: Duration,
    pub max_photos: usize,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            decor_count: DECOR_COUNT,
            snow_count: SNOW_COUNT,
            tree_height: TREE_HEIGHT,
            tree_radius: TREE_RADIUS,
            detect_interval: Duration::from_millis(DETECT_INTERVAL_MS),
            max_photos: MAX_PHOTOS,
            seed: 42,
        }
    }
}

impl SceneConfig {
    /// An empty scene: no decor, no snow. Photos can still be added.
    pub fn empty() -> Self {
        Self {
            decor_count: 0,
            snow_count: 0,
            ..Self::default()
        }
    }
}

/// Live tunables a settings panel may change between frames.
#[derive(Clone, Debug)]
pub struct SceneParams {
    /// Glow strength; only renderers read it.
    pub bloom_strength: f32,
    /// Multiplier on the idle auto-spin rates.
    pub rotation_speed: f32,
    /// Multiplier on every particle's resting scale.
    pub particle_size: f32,
    /// Fraction of snow sprites that stay visible, 0..1.
    pub snow_density: f32,
    pub music_volume: f32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            bloom_strength: 1.5,
            rotation_speed: 1.0,
            particle_size: 1.0,
            snow_density: 1.0,
            music_volume: DEFAULT_MUSIC_VOLUME,
        }
    }
}
