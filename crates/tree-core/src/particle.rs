//! Particles: one visual body each, with fixed home positions and a
//! per-frame update rule.
//!
//! Home positions (`tree` and `scatter`) are computed once at construction
//! and never change; only the [`Transform`] moves. Renderers read the
//! transform; nothing else writes it.

use crate::constants::*;
use crate::ease::{ease, ease_vec3, wrap_angle};
use crate::state::InteractionMode;
use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;

/// Stable handle into the particle registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u32);

impl ParticleId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Dark cube, the bulk of the tree.
    TreeFillerA,
    /// Metallic cube.
    TreeFillerB,
    SphereAccent,
    RareAccent,
    /// Small curved ornament.
    DecorCurve,
    Photo,
    Snow,
}

impl ParticleKind {
    pub const DECOR: [ParticleKind; 5] = [
        ParticleKind::TreeFillerA,
        ParticleKind::TreeFillerB,
        ParticleKind::SphereAccent,
        ParticleKind::RareAccent,
        ParticleKind::DecorCurve,
    ];

    /// Cumulative odds for drawing a decorative kind.
    const DECOR_ODDS: [(f32, ParticleKind); 4] = [
        (0.40, ParticleKind::TreeFillerA),
        (0.70, ParticleKind::TreeFillerB),
        (0.92, ParticleKind::SphereAccent),
        (0.97, ParticleKind::RareAccent),
    ];

    pub fn sample_decor<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f32 = rng.gen();
        Self::DECOR_ODDS
            .iter()
            .find(|(limit, _)| roll < *limit)
            .map(|(_, kind)| *kind)
            .unwrap_or(ParticleKind::DecorCurve)
    }

    pub fn is_decor(self) -> bool {
        !matches!(self, ParticleKind::Photo | ParticleKind::Snow)
    }
}

/// Current placement of a body, in its group's local space.
///
/// `rotation` holds Euler angles (pitch, yaw, roll) in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
}

/// Cone and shell dimensions used to place home positions.
#[derive(Clone, Copy, Debug)]
pub struct TreeLayout {
    pub height: f32,
    pub radius: f32,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            height: TREE_HEIGHT,
            radius: TREE_RADIUS,
        }
    }
}

impl TreeLayout {
    /// A point on the spiral cone; denser toward the base.
    pub fn tree_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let t = rng.gen::<f32>().powf(0.8);
        let y = t * self.height - self.height / 2.0;
        let r_max = (self.radius * (1.0 - t)).max(TREE_MIN_RADIUS);
        let angle = t * TREE_SPIRAL_TURNS * PI + rng.gen::<f32>() * PI;
        let r = r_max * (0.8 + rng.gen::<f32>() * 0.4);
        Vec3::new(angle.cos() * r, y, angle.sin() * r)
    }

    /// A point in a thick spherical shell around the origin.
    pub fn scatter_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let r = SCATTER_RADIUS_MIN + rng.gen::<f32>() * SCATTER_RADIUS_SPAN;
        let theta = rng.gen::<f32>() * PI * 2.0;
        let phi = (2.0 * rng.gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
        Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Behavior {
    Homed {
        tree: Vec3,
        scatter: Vec3,
        spin: Vec3,
    },
    Snow {
        fall_speed: f32,
        sway_speed: f32,
        sway_phase: f32,
    },
}

/// Everything a particle needs to know about the current frame.
#[derive(Clone, Copy, Debug)]
pub struct ParticleFrame {
    pub dt: f32,
    pub elapsed: f32,
    pub mode: InteractionMode,
    pub focus: Option<ParticleId>,
    pub particle_size: f32,
}

#[derive(Clone, Debug)]
pub struct Particle {
    id: ParticleId,
    kind: ParticleKind,
    base_scale: f32,
    behavior: Behavior,
    pub transform: Transform,
    pub visible: bool,
}

impl Particle {
    /// A decorative body starting at the origin with a random tilt.
    pub fn decor<R: Rng + ?Sized>(
        id: ParticleId,
        kind: ParticleKind,
        layout: &TreeLayout,
        rng: &mut R,
    ) -> Self {
        let base_scale = 0.4 + rng.gen::<f32>() * 0.5;
        let rotation = Vec3::new(
            rng.gen::<f32>() * 6.0,
            rng.gen::<f32>() * 6.0,
            rng.gen::<f32>() * 6.0,
        );
        let behavior = Self::homed(layout, 1.5, rng);
        Self {
            id,
            kind,
            base_scale,
            behavior,
            transform: Transform {
                position: Vec3::ZERO,
                rotation,
                scale: base_scale,
            },
            visible: true,
        }
    }

    /// A photo frame; slow spin and a small random size jitter.
    pub fn photo<R: Rng + ?Sized>(id: ParticleId, layout: &TreeLayout, rng: &mut R) -> Self {
        let base_scale = 0.8 + rng.gen::<f32>() * 0.5;
        let behavior = Self::homed(layout, 0.3, rng);
        Self {
            id,
            kind: ParticleKind::Photo,
            base_scale,
            behavior,
            transform: Transform {
                position: Vec3::ZERO,
                rotation: Vec3::ZERO,
                scale: base_scale,
            },
            visible: true,
        }
    }

    /// A snow sprite somewhere in the fall volume.
    pub fn snow<R: Rng + ?Sized>(id: ParticleId, rng: &mut R) -> Self {
        let position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * 2.0 * SNOW_HALF_WIDTH,
            (rng.gen::<f32>() - 0.5) * 2.0 * SNOW_HALF_HEIGHT,
            (rng.gen::<f32>() - 0.5) * 2.0 * SNOW_HALF_WIDTH,
        );
        let base_scale = 0.2 + rng.gen::<f32>() * 0.3;
        Self {
            id,
            kind: ParticleKind::Snow,
            base_scale,
            behavior: Behavior::Snow {
                fall_speed: 0.5 + rng.gen::<f32>() * 1.5,
                sway_speed: rng.gen::<f32>() * 2.0,
                sway_phase: rng.gen::<f32>() * PI,
            },
            transform: Transform {
                position,
                rotation: Vec3::ZERO,
                scale: base_scale,
            },
            visible: true,
        }
    }

    fn homed<R: Rng + ?Sized>(layout: &TreeLayout, spin_range: f32, rng: &mut R) -> Behavior {
        let spin = Vec3::new(
            (rng.gen::<f32>() - 0.5) * spin_range,
            (rng.gen::<f32>() - 0.5) * spin_range,
            (rng.gen::<f32>() - 0.5) * spin_range,
        );
        Behavior::Homed {
            tree: layout.tree_position(rng),
            scatter: layout.scatter_position(rng),
            spin,
        }
    }

    pub fn id(&self) -> ParticleId {
        self.id
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    pub fn is_snow(&self) -> bool {
        self.kind == ParticleKind::Snow
    }

    /// Home position in the gathered tree; `None` for snow.
    pub fn tree_home(&self) -> Option<Vec3> {
        match self.behavior {
            Behavior::Homed { tree, .. } => Some(tree),
            Behavior::Snow { .. } => None,
        }
    }

    /// Home position when dispersed; `None` for snow.
    pub fn scatter_home(&self) -> Option<Vec3> {
        match self.behavior {
            Behavior::Homed { scatter, .. } => Some(scatter),
            Behavior::Snow { .. } => None,
        }
    }

    /// Constant angular velocity; `None` for snow.
    pub fn spin(&self) -> Option<Vec3> {
        match self.behavior {
            Behavior::Homed { spin, .. } => Some(spin),
            Behavior::Snow { .. } => None,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, frame: &ParticleFrame, rng: &mut R) {
        match self.behavior {
            Behavior::Snow {
                fall_speed,
                sway_speed,
                sway_phase,
            } => self.fall(frame, fall_speed, sway_speed, sway_phase, rng),
            Behavior::Homed {
                tree,
                scatter,
                spin,
            } => self.home(frame, tree, scatter, spin),
        }
    }

    fn fall<R: Rng + ?Sized>(
        &mut self,
        frame: &ParticleFrame,
        fall_speed: f32,
        sway_speed: f32,
        sway_phase: f32,
        rng: &mut R,
    ) {
        if !self.visible {
            return;
        }
        let p = &mut self.transform.position;
        p.y -= fall_speed * frame.dt * SNOW_FALL_MULTIPLIER;
        p.x += (frame.elapsed * sway_speed + sway_phase).sin() * SNOW_SWAY_AMPLITUDE;
        if p.y < SNOW_FLOOR_Y {
            p.y = SNOW_RESPAWN_Y;
            p.x = (rng.gen::<f32>() - 0.5) * 2.0 * SNOW_HALF_WIDTH;
            p.z = (rng.gen::<f32>() - 0.5) * 2.0 * SNOW_HALF_WIDTH;
        }
    }

    fn home(&mut self, frame: &ParticleFrame, tree: Vec3, scatter: Vec3, spin: Vec3) {
        let dt = frame.dt;
        let focused = frame.mode == InteractionMode::Focus && frame.focus == Some(self.id);

        let (target, rate) = match frame.mode {
            InteractionMode::Tree => (tree, POSITION_EASE_RATE),
            InteractionMode::Scatter => (scatter, POSITION_EASE_RATE),
            InteractionMode::Focus if focused => (focus_anchor(), FOCUS_POSITION_EASE_RATE),
            InteractionMode::Focus => (scatter, POSITION_EASE_RATE),
        };
        self.transform.position = ease_vec3(self.transform.position, target, rate, dt);

        let r = &mut self.transform.rotation;
        match frame.mode {
            InteractionMode::Scatter => {
                let next = *r + spin * dt;
                *r = Vec3::new(wrap_angle(next.x), wrap_angle(next.y), wrap_angle(next.z));
            }
            InteractionMode::Tree => {
                r.x = ease(r.x, 0.0, TILT_EASE_RATE, dt);
                r.z = ease(r.z, 0.0, TILT_EASE_RATE, dt);
                r.y = wrap_angle(r.y + TREE_YAW_SPIN * dt);
            }
            InteractionMode::Focus if focused => {
                r.x = ease(r.x, 0.0, TILT_EASE_RATE, dt);
                r.z = ease(r.z, 0.0, TILT_EASE_RATE, dt);
                r.y = wrap_angle(r.y + FOCUS_YAW_SPIN * dt);
            }
            InteractionMode::Focus => {}
        }

        let target_scale = match frame.mode {
            InteractionMode::Focus if focused => FOCUS_SCALE,
            InteractionMode::Focus => HIDDEN_SCALE,
            InteractionMode::Scatter if self.kind == ParticleKind::Photo => {
                self.base_scale * SCATTER_PHOTO_SCALE * frame.particle_size
            }
            _ => self.base_scale * frame.particle_size,
        };
        self.transform.scale = ease(self.transform.scale, target_scale, SCALE_EASE_RATE, dt);
    }
}
