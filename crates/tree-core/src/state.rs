//! Shared state types: interaction mode, pointer and camera.
//!
//! These types avoid platform APIs so both the controller and any front-end
//! can use them. Front-ends build their view/projection from [`Camera`].

use crate::constants::*;
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Global arrangement of the particle field. Exactly one is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InteractionMode {
    /// Particles gather into the cone.
    #[default]
    Tree,
    /// Particles disperse to their scatter shell.
    Scatter,
    /// One photo is magnified in front of the camera.
    Focus,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Scatter => "scatter",
            Self::Focus => "focus",
        }
    }
}

/// Smoothed, mirrored hand pointer in roughly [-1, 1] on both axes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        let eye = camera_eye();
        Self {
            eye,
            target: eye - Vec3::Z,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
            fovy_radians: CAMERA_FOV_DEGREES.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Map a normalized-device-coordinate point back to world space.
    ///
    /// `ndc.z` follows wgpu's 0..1 depth range.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        let inv = self.view_proj().inverse();
        let p = inv * Vec4::new(ndc.x, ndc.y, ndc.z, 1.0);
        p.truncate() / p.w
    }

    /// World-space position of the on-screen hand cursor.
    ///
    /// The cursor floats [`CURSOR_DISTANCE`] units from the eye along the
    /// ray through the pointer, nudged slightly upward.
    pub fn cursor_position(&self, pointer: Pointer) -> Vec3 {
        let through = self.unproject(Vec3::new(pointer.x, pointer.y + CURSOR_LIFT_NDC, 0.5));
        let dir = (through - self.eye).normalize_or_zero();
        self.eye + dir * CURSOR_DISTANCE
    }
}
