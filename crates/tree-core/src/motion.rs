//! Whole-field rotation and translation.
//!
//! `x` of a rotation is pitch, `y` is yaw. Current values ease toward
//! targets once per frame, with one exception: while gathered into the tree
//! the yaw is driven directly by the auto-spin and never eased.

use crate::constants::*;
use crate::ease::ease;
use crate::state::{InteractionMode, Pointer};
use glam::{Mat4, Vec2, Vec3};
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldTransform {
    pub rotation: Vec2,
    pub translation: Vec2,
}

impl FieldTransform {
    /// Translation, then pitch, then yaw, applied to field-local points.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.translation.x, self.translation.y, 0.0))
            * Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
    }

    pub fn apply(&self, local: Vec3) -> Vec3 {
        self.matrix().transform_point3(local)
    }
}

#[derive(Clone, Debug, Default)]
pub struct SceneMotion {
    pub target_rotation: Vec2,
    pub current_rotation: Vec2,
    pub target_position: Vec2,
    pub current_position: Vec2,
}

impl SceneMotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame.
    ///
    /// `pointer` may be stale when the tracker was not polled this frame;
    /// `rotation_speed` scales the idle auto-spin.
    pub fn step(
        &mut self,
        mode: InteractionMode,
        detected: bool,
        pointer: Pointer,
        rotation_speed: f32,
        dt: f32,
    ) {
        self.update_targets(mode, detected, pointer, rotation_speed, dt);

        self.current_rotation.x = ease(
            self.current_rotation.x,
            self.target_rotation.x,
            ROTATION_EASE_RATE,
            dt,
        );
        if mode != InteractionMode::Tree {
            self.current_rotation.y = ease(
                self.current_rotation.y,
                self.target_rotation.y,
                ROTATION_EASE_RATE,
                dt,
            );
        }
        self.current_position.x = ease(
            self.current_position.x,
            self.target_position.x,
            TRANSLATION_EASE_RATE,
            dt,
        );
        self.current_position.y = ease(
            self.current_position.y,
            self.target_position.y,
            TRANSLATION_EASE_RATE,
            dt,
        );
    }

    fn update_targets(
        &mut self,
        mode: InteractionMode,
        detected: bool,
        pointer: Pointer,
        rotation_speed: f32,
        dt: f32,
    ) {
        match (mode, detected) {
            (InteractionMode::Focus, _) => {
                self.target_rotation = Vec2::ZERO;
                self.target_position = Vec2::ZERO;
            }
            (InteractionMode::Scatter, true) => {
                self.target_rotation.x = pointer.y * SCATTER_PITCH_RANGE;
                self.target_rotation.y = pointer.x * SCATTER_YAW_RANGE;
                self.target_position = pointer.as_vec2() * SCATTER_TRANSLATION_RANGE;
            }
            (InteractionMode::Tree, true) => {
                self.target_position = Vec2::ZERO;
            }
            (InteractionMode::Tree, false) => {
                self.target_position = Vec2::ZERO;
                self.target_rotation.x = 0.0;
                let spin = TREE_AUTO_SPIN * rotation_speed * dt;
                self.target_rotation.y += spin;
                self.current_rotation.y += spin;
                self.rewind_yaw(self.current_rotation.y);
            }
            (InteractionMode::Scatter, false) => {
                self.target_position = Vec2::ZERO;
                self.target_rotation.y += SCATTER_AUTO_SPIN * rotation_speed * dt;
                self.rewind_yaw(self.target_rotation.y);
            }
        }
    }

    /// Drop whole turns from both yaws once `reference` leaves `[0, TAU)`.
    /// The gap between current and target is unchanged, so easing is too.
    fn rewind_yaw(&mut self, reference: f32) {
        let turns = (reference / TAU).floor();
        if turns != 0.0 {
            let shift = turns * TAU;
            self.current_rotation.y -= shift;
            self.target_rotation.y -= shift;
        }
    }

    pub fn transform(&self) -> FieldTransform {
        FieldTransform {
            rotation: self.current_rotation,
            translation: self.current_position,
        }
    }
}
