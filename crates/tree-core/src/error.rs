//! Error types for the scene controller.
//!
//! None of these are fatal to the frame loop: the controller logs them and
//! keeps running. They are returned from commands so a host can show a
//! notice to the user.

use thiserror::Error;

/// Failure of the external hand-pose estimator.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Camera permission denied, model failed to load, no device.
    #[error("hand tracker unavailable: {0}")]
    Unavailable(String),
    /// A single detection call failed.
    #[error("hand detection failed: {0}")]
    Detection(String),
}

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("could not decode photo `{name}`")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("photo `{name}` has no pixels")]
    Empty { name: String },
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("could not load audio from `{source_url}`: {reason}")]
    Load { source_url: String, reason: String },
    #[error("audio backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("photo limit of {max} reached")]
    PhotoCapacity { max: usize },
    #[error("scene has been torn down")]
    TornDown,
    #[error(transparent)]
    Photo(#[from] PhotoError),
    #[error(transparent)]
    Audio(#[from] AudioError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}
