//! Gesture-driven particle scene controller.
//!
//! A hand-pose stream switches a field of particles between a gathered
//! tree, a dispersed scatter shell and a single magnified photo, blended
//! with idle auto-rotation when no hand is visible. Rendering, the sound
//! device and the pose estimator are collaborators behind small traits.

pub mod audio;
pub mod config;
pub mod constants;
pub mod ease;
pub mod error;
pub mod gesture;
pub mod mode;
pub mod motion;
pub mod particle;
pub mod photo;
pub mod registry;
pub mod scene;
pub mod state;

pub use audio::*;
pub use config::*;
pub use constants::*;
pub use ease::*;
pub use error::*;
pub use gesture::*;
pub use mode::*;
pub use motion::*;
pub use particle::*;
pub use photo::*;
pub use registry::*;
pub use scene::*;
pub use state::*;
