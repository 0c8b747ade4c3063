// Simulated hand tracker, driven from the window's mouse and keyboard.
//
// The window sends `SimInput` events down a channel; the tracker folds them
// into a current hand each time the scene polls it and synthesizes
// landmarks for that hand.

use glam::Vec2;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::Duration;
use tree_core::{HandLandmarks, HandTracker, TrackerError};

/// Hand shapes the keyboard can select.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandShape {
    Open,    // 2
    Fist,    // 1
    Pinch,   // 3
    Relaxed, // 4, between fist and open
}

impl HandShape {
    /// `(openness, pinch distance)` for this shape.
    fn measurements(self) -> (f32, f32) {
        match self {
            HandShape::Open => (0.45, 0.2),
            HandShape::Fist => (0.2, 0.2),
            HandShape::Pinch => (0.45, 0.02),
            HandShape::Relaxed => (0.32, 0.2),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HandShape::Open => "open",
            HandShape::Fist => "fist",
            HandShape::Pinch => "pinch",
            HandShape::Relaxed => "relaxed",
        }
    }
}

/// Raw input event from the window.
#[derive(Clone, Copy, Debug)]
pub enum SimInput {
    /// Mouse position as a fraction of the window, origin top-left.
    Moved { x: f32, y: f32 },
    Shape(HandShape),
    /// Show or hide the hand, as if it entered or left the camera frame.
    Visible(bool),
}

pub struct SimHandTracker {
    rx: Receiver<SimInput>,
    anchor: Vec2,
    shape: HandShape,
    visible: bool,
}

/// A tracker plus the sender the window uses to drive it.
pub fn sim_hand() -> (Sender<SimInput>, SimHandTracker) {
    let (tx, rx) = mpsc::channel();
    let tracker = SimHandTracker {
        rx,
        anchor: Vec2::splat(0.5),
        shape: HandShape::Relaxed,
        visible: false,
    };
    (tx, tracker)
}

impl SimHandTracker {
    fn apply(&mut self, input: SimInput) {
        match input {
            // A webcam image is mirrored; mirror the mouse so the pointer
            // follows it on screen.
            SimInput::Moved { x, y } => self.anchor = Vec2::new(1.0 - x, y),
            SimInput::Shape(shape) => {
                log::debug!("[gesture] simulated hand: {}", shape.as_str());
                self.shape = shape;
            }
            SimInput::Visible(visible) => self.visible = visible,
        }
    }
}

impl HandTracker for SimHandTracker {
    fn detect(&mut self, _now: Duration) -> Result<Option<HandLandmarks>, TrackerError> {
        loop {
            match self.rx.try_recv() {
                Ok(input) => self.apply(input),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Err(TrackerError::Detection("input window closed".into()))
                }
            }
        }
        if !self.visible {
            return Ok(None);
        }
        let (openness, pinch) = self.shape.measurements();
        Ok(Some(HandLandmarks::synthesize(self.anchor, openness, pinch)))
    }
}
