// Shared fakes for the host-side tests.

#![allow(dead_code)]

use image::{ImageFormat, Rgba, RgbaImage};
use std::cell::RefCell;
use std::collections::HashSet;
use std::io::Cursor;
use std::rc::Rc;
use std::time::Duration;
use tree_core::*;

/// A 1x1 already-decoded photo.
pub fn blank_photo(name: &str) -> Photo {
    Photo {
        name: name.to_string(),
        source_width: 1,
        source_height: 1,
        crop: CenterCrop::for_size(1, 1),
        image: RgbaImage::new(1, 1),
        mean_color: [0.0; 3],
    }
}

/// A solid-color PNG, encoded in memory.
pub fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("encode test png");
    out.into_inner()
}

/// Hand the test can move between frames.
#[derive(Clone, Default)]
pub struct HandScript {
    pub hand: Rc<RefCell<Option<HandLandmarks>>>,
    pub polls: Rc<RefCell<usize>>,
    pub closed: Rc<RefCell<bool>>,
}

impl HandScript {
    pub fn show(&self, hand: HandLandmarks) {
        *self.hand.borrow_mut() = Some(hand);
    }

    pub fn hide(&self) {
        *self.hand.borrow_mut() = None;
    }

    pub fn tracker(&self) -> Box<dyn HandTracker> {
        Box::new(ScriptedTracker {
            script: self.clone(),
        })
    }
}

struct ScriptedTracker {
    script: HandScript,
}

impl HandTracker for ScriptedTracker {
    fn detect(&mut self, _now: Duration) -> Result<Option<HandLandmarks>, TrackerError> {
        *self.script.polls.borrow_mut() += 1;
        Ok(self.script.hand.borrow().clone())
    }

    fn close(&mut self) {
        *self.script.closed.borrow_mut() = true;
    }
}

#[derive(Clone, Debug, Default)]
pub struct AudioLog {
    pub source: Option<String>,
    pub playing: bool,
    pub looping: bool,
    pub volume: f32,
    pub rate: f32,
    pub loads: usize,
    pub closed: bool,
}

/// Audio backend recording every call; sources listed in `broken` fail to
/// load.
#[derive(Clone)]
pub struct FakeAudio {
    pub log: Rc<RefCell<AudioLog>>,
    pub broken: Rc<RefCell<HashSet<String>>>,
}

impl FakeAudio {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(AudioLog {
                volume: 1.0,
                rate: 1.0,
                ..AudioLog::default()
            })),
            broken: Rc::new(RefCell::new(HashSet::new())),
        }
    }

    pub fn break_source(&self, source: &str) {
        self.broken.borrow_mut().insert(source.to_string());
    }

    pub fn snapshot(&self) -> AudioLog {
        self.log.borrow().clone()
    }
}

impl AudioBackend for FakeAudio {
    fn load(&mut self, source: &str) -> Result<(), AudioError> {
        if self.broken.borrow().contains(source) {
            return Err(AudioError::Load {
                source_url: source.to_string(),
                reason: "404".into(),
            });
        }
        let mut log = self.log.borrow_mut();
        log.source = Some(source.to_string());
        log.loads += 1;
        Ok(())
    }
    fn play(&mut self) {
        let mut log = self.log.borrow_mut();
        log.playing = log.source.is_some();
    }
    fn pause(&mut self) {
        self.log.borrow_mut().playing = false;
    }
    fn stop(&mut self) {
        self.log.borrow_mut().playing = false;
    }
    fn is_playing(&self) -> bool {
        self.log.borrow().playing
    }
    fn has_buffer(&self) -> bool {
        self.log.borrow().source.is_some()
    }
    fn set_looping(&mut self, looping: bool) {
        self.log.borrow_mut().looping = looping;
    }
    fn set_volume(&mut self, volume: f32) {
        self.log.borrow_mut().volume = volume;
    }
    fn volume(&self) -> f32 {
        self.log.borrow().volume
    }
    fn playback_rate(&self) -> f32 {
        self.log.borrow().rate
    }
    fn set_playback_rate(&mut self, rate: f32) {
        self.log.borrow_mut().rate = rate;
    }
    fn close(&mut self) {
        self.log.borrow_mut().closed = true;
    }
}
