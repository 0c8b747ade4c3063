//! Interaction mode state machine.
//!
//! Transitions are edge-triggered by classifier poses only; a pose in the
//! dead zone, or no hand at all, never changes the latched mode.

use crate::gesture::Pose;
use crate::particle::ParticleId;
use crate::state::InteractionMode;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Clone, Debug, Default)]
pub struct ModeMachine {
    mode: InteractionMode,
    focus: Option<ParticleId>,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// The selected photo, without checking that it still exists.
    pub fn focus(&self) -> Option<ParticleId> {
        self.focus
    }

    /// The selected photo if it is still among `photos`.
    pub fn live_focus(&self, photos: &[ParticleId]) -> Option<ParticleId> {
        self.focus.filter(|id| photos.contains(id))
    }

    /// Mode and focus the particles should follow this frame. A focus whose
    /// photo is no longer among `photos` behaves like scatter.
    pub fn particle_mode(&self, photos: &[ParticleId]) -> (InteractionMode, Option<ParticleId>) {
        let focus = self.live_focus(photos);
        match (self.mode, focus) {
            (InteractionMode::Focus, None) => (InteractionMode::Scatter, None),
            (mode, focus) => (mode, focus),
        }
    }

    /// Apply one classifier pose. `photos` lists the live photo particles a
    /// pinch may focus on. Returns true when the mode or focus changed.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        pose: Pose,
        photos: &[ParticleId],
        rng: &mut R,
    ) -> bool {
        let before = (self.mode, self.focus);
        match pose {
            Pose::Pinch => {
                if self.mode == InteractionMode::Focus && self.live_focus(photos).is_some() {
                    return false;
                }
                match photos.choose(rng) {
                    Some(&id) => {
                        self.mode = InteractionMode::Focus;
                        self.focus = Some(id);
                    }
                    None => log::debug!("[mode] pinch ignored: no photos to focus"),
                }
            }
            Pose::Fist => self.enter(InteractionMode::Tree),
            Pose::Open => self.enter(InteractionMode::Scatter),
            Pose::Unchanged => {}
        }
        let changed = before != (self.mode, self.focus);
        if changed {
            log::info!(
                "[mode] {} -> {} (focus {:?})",
                before.0.as_str(),
                self.mode.as_str(),
                self.focus
            );
        }
        changed
    }

    fn enter(&mut self, mode: InteractionMode) {
        self.mode = mode;
        self.focus = None;
    }
}
