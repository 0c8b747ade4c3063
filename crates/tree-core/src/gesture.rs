//! Hand-pose classification and throttled polling of the pose estimator.
//!
//! The estimator itself is a black box behind [`HandTracker`]: each poll
//! yields either 21 normalized landmarks or "no hand". [`GestureClassifier`]
//! turns that into a smoothed pointer and a discrete [`Pose`];
//! [`GestureInput`] makes sure the estimator is called at most once per
//! configured interval.

use crate::constants::*;
use crate::error::TrackerError;
use crate::state::Pointer;
use glam::{Vec2, Vec3};
use std::time::Duration;

pub const LANDMARK_COUNT: usize = 21;

// Landmark indices used by the classifier
pub const WRIST: usize = 0;
pub const THUMB_TIP: usize = 4;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_TIP: usize = 16;
pub const PINKY_TIP: usize = 20;

const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// One detected hand: 21 points in normalized image space (x right, y down).
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Vec3; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Vec3; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from a slice; `None` unless it holds at least 21 points.
    pub fn from_slice(points: &[Vec3]) -> Option<Self> {
        let points: [Vec3; LANDMARK_COUNT] = points.get(..LANDMARK_COUNT)?.try_into().ok()?;
        Some(Self { points })
    }

    /// A plausible hand whose middle knuckle sits at `anchor` (image space),
    /// with the given wrist-to-fingertip openness and thumb/index gap.
    ///
    /// Used by simulated trackers and tests.
    pub fn synthesize(anchor: Vec2, openness: f32, pinch_distance: f32) -> Self {
        let wrist = Vec3::new(anchor.x, anchor.y + 0.1, 0.0);
        let mut points = [wrist; LANDMARK_COUNT];
        points[MIDDLE_MCP] = anchor.extend(0.0);
        // Fan the four fingertips upward, each exactly `openness` from the wrist.
        let fan = [-0.3_f32, -0.1, 0.1, 0.3];
        for (tip, angle) in FINGERTIPS.iter().zip(fan) {
            let dir = Vec3::new(angle.sin(), -angle.cos(), 0.0);
            points[*tip] = wrist + dir * openness;
        }
        points[THUMB_TIP] = points[INDEX_TIP] + Vec3::new(pinch_distance, 0.0, 0.0);
        Self { points }
    }

    /// Landmark `index`, or `None` past the last one.
    #[inline]
    pub fn point(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn points(&self) -> &[Vec3; LANDMARK_COUNT] {
        &self.points
    }

    /// Planar distance between thumb tip and index tip.
    pub fn pinch_distance(&self) -> f32 {
        planar_distance(self.points[THUMB_TIP], self.points[INDEX_TIP])
    }

    /// Mean planar distance from the wrist to the four non-thumb fingertips.
    pub fn openness(&self) -> f32 {
        let wrist = self.points[WRIST];
        let sum: f32 = FINGERTIPS
            .iter()
            .map(|&i| planar_distance(self.points[i], wrist))
            .sum();
        sum / FINGERTIPS.len() as f32
    }

    /// Mirrored pointer position derived from the middle knuckle.
    pub fn raw_pointer(&self) -> Pointer {
        let p = self.points[MIDDLE_MCP];
        Pointer::new((0.5 - p.x) * 2.0, (0.5 - p.y) * 2.0)
    }
}

#[inline]
fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    a.truncate().distance(b.truncate())
}

/// Discrete interpretation of one hand sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pose {
    Pinch,
    Fist,
    Open,
    /// Dead zone between fist and open, or no hand at all.
    Unchanged,
}

/// Pose decision in priority order: pinch dominates hand openness.
pub fn classify_pose(pinch_distance: f32, openness: f32) -> Pose {
    if pinch_distance < PINCH_DISTANCE_MAX {
        Pose::Pinch
    } else if openness < FIST_OPENNESS_MAX {
        Pose::Fist
    } else if openness > OPEN_OPENNESS_MIN {
        Pose::Open
    } else {
        Pose::Unchanged
    }
}

/// Result of classifying one poll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandSample {
    pub detected: bool,
    pub pointer: Pointer,
    pub pose: Pose,
}

/// Turns raw landmark sets into a smoothed pointer and a pose.
#[derive(Clone, Debug, Default)]
pub struct GestureClassifier {
    pointer: Pointer,
    detected: bool,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    pub fn detected(&self) -> bool {
        self.detected
    }

    /// Classify one poll. With no hand the pointer is left untouched.
    pub fn observe(&mut self, hand: Option<&HandLandmarks>) -> HandSample {
        let Some(hand) = hand else {
            self.detected = false;
            return HandSample {
                detected: false,
                pointer: self.pointer,
                pose: Pose::Unchanged,
            };
        };
        self.detected = true;
        let raw = hand.raw_pointer();
        self.pointer.x += (raw.x - self.pointer.x) * POINTER_SMOOTHING;
        self.pointer.y += (raw.y - self.pointer.y) * POINTER_SMOOTHING;
        HandSample {
            detected: true,
            pointer: self.pointer,
            pose: classify_pose(hand.pinch_distance(), hand.openness()),
        }
    }
}

/// External hand-pose estimator.
pub trait HandTracker {
    /// Estimate the hand in the most recent camera frame.
    ///
    /// `Ok(None)` means no hand is visible.
    fn detect(&mut self, now: Duration) -> Result<Option<HandLandmarks>, TrackerError>;

    /// Release the camera and model. Called once on teardown.
    fn close(&mut self) {}
}

/// Throttled access to the tracker plus the classifier state it feeds.
pub struct GestureInput {
    tracker: Option<Box<dyn HandTracker>>,
    classifier: GestureClassifier,
    interval: Duration,
    last_poll: Option<Duration>,
    reported_failure: bool,
}

impl GestureInput {
    /// A tracker that failed to initialise degrades to "never detected".
    pub fn new(
        tracker: Result<Box<dyn HandTracker>, TrackerError>,
        interval: Duration,
    ) -> Self {
        let tracker = match tracker {
            Ok(t) => Some(t),
            Err(e) => {
                log::warn!("[gesture] {e}; running without hand control");
                None
            }
        };
        Self {
            tracker,
            classifier: GestureClassifier::new(),
            interval,
            last_poll: None,
            reported_failure: false,
        }
    }

    pub fn has_tracker(&self) -> bool {
        self.tracker.is_some()
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// True once `interval` has passed since the previous poll.
    pub fn is_due(&self, now: Duration) -> bool {
        match self.last_poll {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval,
        }
    }

    /// Poll the tracker if the interval has elapsed.
    ///
    /// Returns `None` when the poll is skipped; the caller keeps using the
    /// previous mode and pointer in that case.
    pub fn poll(&mut self, now: Duration) -> Option<HandSample> {
        if !self.is_due(now) {
            return None;
        }
        self.last_poll = Some(now);
        let hand = match self.tracker.as_mut().map(|t| t.detect(now)) {
            Some(Ok(hand)) => hand,
            Some(Err(e)) => {
                if !self.reported_failure {
                    log::warn!("[gesture] {e}");
                    self.reported_failure = true;
                }
                None
            }
            None => None,
        };
        Some(self.classifier.observe(hand.as_ref()))
    }

    pub fn close(&mut self) {
        if let Some(mut t) = self.tracker.take() {
            t.close();
        }
    }
}
