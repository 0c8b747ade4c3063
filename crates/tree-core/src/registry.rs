//! Stable registry of live particles.
//!
//! Particles are only ever appended; a [`ParticleId`] stays valid for the
//! life of the scene. Photos are capped at a configured maximum.

use crate::constants::SNOW_VISIBLE_MIN_DENSITY;
use crate::error::SceneError;
use crate::particle::{Particle, ParticleFrame, ParticleId, ParticleKind, TreeLayout};
use crate::photo::Photo;
use rand::Rng;

#[derive(Default)]
pub struct ParticleRegistry {
    particles: Vec<Particle>,
    photo_ids: Vec<ParticleId>,
    photos: Vec<Photo>,
}

impl ParticleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> ParticleId {
        ParticleId::from_index(self.particles.len())
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn photo_ids(&self) -> &[ParticleId] {
        &self.photo_ids
    }

    pub fn photo_count(&self) -> usize {
        self.photo_ids.len()
    }

    /// Decoded image behind a photo particle.
    pub fn photo(&self, id: ParticleId) -> Option<&Photo> {
        let slot = self.photo_ids.iter().position(|p| *p == id)?;
        self.photos.get(slot)
    }

    /// True when `id` names a live photo particle.
    pub fn is_photo(&self, id: ParticleId) -> bool {
        self.get(id)
            .map(|p| p.kind() == ParticleKind::Photo)
            .unwrap_or(false)
    }

    pub fn spawn_decor<R: Rng + ?Sized>(&mut self, layout: &TreeLayout, rng: &mut R) -> ParticleId {
        let id = self.next_id();
        let kind = ParticleKind::sample_decor(rng);
        self.particles.push(Particle::decor(id, kind, layout, rng));
        id
    }

    pub fn spawn_snow<R: Rng + ?Sized>(&mut self, rng: &mut R) -> ParticleId {
        let id = self.next_id();
        self.particles.push(Particle::snow(id, rng));
        id
    }

    /// Admit a decoded photo, unless `max_photos` are already live.
    ///
    /// A rejected photo leaves every existing particle untouched.
    pub fn admit_photo<R: Rng + ?Sized>(
        &mut self,
        photo: Photo,
        layout: &TreeLayout,
        max_photos: usize,
        rng: &mut R,
    ) -> Result<ParticleId, SceneError> {
        if self.photo_ids.len() >= max_photos {
            return Err(SceneError::PhotoCapacity { max: max_photos });
        }
        let id = self.next_id();
        self.particles.push(Particle::photo(id, layout, rng));
        self.photo_ids.push(id);
        self.photos.push(photo);
        Ok(id)
    }

    /// Keep roughly `density` of the snow visible; hide it all below a
    /// small threshold.
    pub fn set_snow_density<R: Rng + ?Sized>(&mut self, density: f32, rng: &mut R) {
        let show_any = density > SNOW_VISIBLE_MIN_DENSITY;
        for p in self.particles.iter_mut().filter(|p| p.is_snow()) {
            p.visible = show_any && rng.gen::<f32>() < density;
        }
    }

    pub fn update_all<R: Rng + ?Sized>(&mut self, frame: &ParticleFrame, rng: &mut R) {
        for p in &mut self.particles {
            p.update(frame, rng);
        }
    }
}
