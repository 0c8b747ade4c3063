//! Exponential easing with fraction-per-second semantics.
//!
//! Each step moves `current` toward `target` by `min(1, rate * dt)` of the
//! remaining gap, so a step can land on the target but never past it.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

#[inline]
pub fn ease_factor(rate: f32, dt: f32) -> f32 {
    (rate * dt).clamp(0.0, 1.0)
}

#[inline]
pub fn ease(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * ease_factor(rate, dt)
}

#[inline]
pub fn ease_vec3(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    current.lerp(target, ease_factor(rate, dt))
}

/// Fold an angle into `[-PI, PI)` so long-running spins keep `f32` precision.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}
