use glam::Vec3;

// Shared tuning constants for the scene controller and its front-ends.

// Gesture classification (normalized landmark space)
pub const PINCH_DISTANCE_MAX: f32 = 0.05; // thumb tip to index tip
pub const FIST_OPENNESS_MAX: f32 = 0.30; // mean wrist-to-fingertip distance
pub const OPEN_OPENNESS_MIN: f32 = 0.35;
pub const POINTER_SMOOTHING: f32 = 0.5; // blend toward each new pointer sample

// Default throttle for pose estimation (milliseconds)
pub const DETECT_INTERVAL_MS: u64 = 80;

// Whole-field motion
pub const SCATTER_PITCH_RANGE: f32 = std::f32::consts::FRAC_PI_8; // pointer.y -> rotation.x
pub const SCATTER_YAW_RANGE: f32 = std::f32::consts::FRAC_PI_2; // pointer.x -> rotation.y
pub const SCATTER_TRANSLATION_RANGE: f32 = 6.0;
pub const TREE_AUTO_SPIN: f32 = 0.3; // rad/s, scaled by rotation speed
pub const SCATTER_AUTO_SPIN: f32 = 0.1;
pub const ROTATION_EASE_RATE: f32 = 3.0;
pub const TRANSLATION_EASE_RATE: f32 = 2.0;

// Per-particle motion
pub const POSITION_EASE_RATE: f32 = 2.0;
pub const FOCUS_POSITION_EASE_RATE: f32 = 3.0;
pub const TILT_EASE_RATE: f32 = 2.0; // pitch/roll back to level
pub const SCALE_EASE_RATE: f32 = 4.0;
pub const TREE_YAW_SPIN: f32 = 0.5;
pub const FOCUS_YAW_SPIN: f32 = 0.2;
pub const SCATTER_PHOTO_SCALE: f32 = 2.5;
pub const FOCUS_SCALE: f32 = 3.5;
pub const HIDDEN_SCALE: f32 = 0.01; // non-focused bodies shrink to this

// Snow
pub const SNOW_FALL_MULTIPLIER: f32 = 5.0;
pub const SNOW_SWAY_AMPLITUDE: f32 = 0.05;
pub const SNOW_FLOOR_Y: f32 = -20.0;
pub const SNOW_RESPAWN_Y: f32 = 25.0;
pub const SNOW_HALF_WIDTH: f32 = 20.0; // x/z in [-20, 20]
pub const SNOW_HALF_HEIGHT: f32 = 25.0; // initial y in [-25, 25]
pub const SNOW_VISIBLE_MIN_DENSITY: f32 = 0.05;

// Layout
pub const TREE_HEIGHT: f32 = 24.0;
pub const TREE_RADIUS: f32 = 8.0;
pub const TREE_MIN_RADIUS: f32 = 0.5;
pub const TREE_SPIRAL_TURNS: f32 = 50.0; // multiples of pi over the full height
pub const SCATTER_RADIUS_MIN: f32 = 8.0;
pub const SCATTER_RADIUS_SPAN: f32 = 12.0;
pub const STAR_LIFT: f32 = 1.2; // star sits this far above the tree top

// Population
pub const DECOR_COUNT: usize = 1200;
pub const SNOW_COUNT: usize = 800;
pub const MAX_PHOTOS: usize = 50;

// Camera
pub const CAMERA_EYE: [f32; 3] = [0.0, 2.0, 50.0];
pub const CAMERA_FOV_DEGREES: f32 = 42.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;
pub const FOCUS_ANCHOR_DISTANCE: f32 = 10.0; // in front of the eye
pub const CURSOR_DISTANCE: f32 = 25.0;
pub const CURSOR_LIFT_NDC: f32 = 0.2;

// Audio
pub const SCATTER_PLAYBACK_RATE: f32 = 1.1;
pub const SCATTER_PLAYBACK_SPAN: f32 = 0.2; // scaled by |pointer.x|
pub const FOCUS_PLAYBACK_RATE: f32 = 0.8;
pub const PLAYBACK_EASE_RATE: f32 = 2.0;
pub const DEFAULT_MUSIC_VOLUME: f32 = 0.5;
pub const DEFAULT_AUDIO_SOURCE: &str = "builtin:pad";

#[inline]
pub fn camera_eye() -> Vec3 {
    Vec3::from(CAMERA_EYE)
}

/// Point the focused photo settles on: straight ahead of the eye.
#[inline]
pub fn focus_anchor() -> Vec3 {
    camera_eye() - Vec3::Z * FOCUS_ANCHOR_DISTANCE
}

#[inline]
pub fn star_position(tree_height: f32) -> Vec3 {
    Vec3::new(0.0, tree_height / 2.0 + STAR_LIFT, 0.0)
}
