//! Photo decoding off the frame loop.
//!
//! Each photo is decoded with the `image` crate and center-cropped to a
//! square. [`PhotoDecoder`] runs batches on a worker thread and hands
//! finished photos back over a channel; the frame loop drains it without
//! blocking and admits whatever has arrived.

use crate::error::PhotoError;
use glam::Vec2;
use image::RgbaImage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;

/// Raw, still-encoded photo as handed over by an upload or a preload list.
#[derive(Clone, Debug)]
pub struct PhotoSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl PhotoSource {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Largest centered square inside a `width` x `height` image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CenterCrop {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

impl CenterCrop {
    pub fn for_size(width: u32, height: u32) -> Self {
        let side = width.min(height);
        Self {
            x: (width - side) / 2,
            y: (height - side) / 2,
            side,
        }
    }

    /// Texture-space `(repeat, offset)` that shows only the crop when the
    /// whole image is bound as a texture.
    pub fn uv_repeat_offset(width: u32, height: u32) -> (Vec2, Vec2) {
        let aspect = width as f32 / height.max(1) as f32;
        if aspect > 1.0 {
            let repeat = 1.0 / aspect;
            (Vec2::new(repeat, 1.0), Vec2::new((1.0 - repeat) / 2.0, 0.0))
        } else {
            let repeat = aspect;
            (Vec2::new(1.0, repeat), Vec2::new(0.0, (1.0 - repeat) / 2.0))
        }
    }
}

/// A decoded, square photo ready to become a particle.
#[derive(Clone, Debug)]
pub struct Photo {
    pub name: String,
    pub source_width: u32,
    pub source_height: u32,
    pub crop: CenterCrop,
    pub image: RgbaImage,
    /// Average color in 0..1, for renderers that draw photos untextured.
    pub mean_color: [f32; 3],
}

pub fn decode_photo(name: &str, bytes: &[u8]) -> Result<Photo, PhotoError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|source| PhotoError::Decode {
            name: name.to_string(),
            source,
        })?
        .to_rgba8();
    let (w, h) = decoded.dimensions();
    if w == 0 || h == 0 {
        return Err(PhotoError::Empty {
            name: name.to_string(),
        });
    }
    let crop = CenterCrop::for_size(w, h);
    let square = image::imageops::crop_imm(&decoded, crop.x, crop.y, crop.side, crop.side).to_image();
    let mean_color = mean_color(&square);
    Ok(Photo {
        name: name.to_string(),
        source_width: w,
        source_height: h,
        crop,
        image: square,
        mean_color,
    })
}

fn mean_color(img: &RgbaImage) -> [f32; 3] {
    let mut sum = [0.0f64; 3];
    for px in img.pixels() {
        for (s, c) in sum.iter_mut().zip(px.0) {
            *s += c as f64;
        }
    }
    let n = (img.width() as f64 * img.height() as f64).max(1.0) * 255.0;
    [(sum[0] / n) as f32, (sum[1] / n) as f32, (sum[2] / n) as f32]
}

/// Background decoder delivering photos over a channel.
pub struct PhotoDecoder {
    tx: Sender<Photo>,
    rx: Receiver<Photo>,
    in_flight: Arc<AtomicUsize>,
}

impl Default for PhotoDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PhotoDecoder {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Photos submitted but not yet drained (or dropped as undecodable).
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Decode a batch on a worker thread. Bad photos are skipped.
    pub fn submit(&self, batch: Vec<PhotoSource>) {
        if batch.is_empty() {
            return;
        }
        let count = batch.len();
        self.in_flight.fetch_add(count, Ordering::SeqCst);
        let tx = self.tx.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let spawned = thread::Builder::new()
            .name("photo-decoder".into())
            .spawn(move || decode_batch(batch, &tx, &in_flight));
        if let Err(e) = spawned {
            log::error!("[photos] could not start decoder thread: {e}");
            self.in_flight.fetch_sub(count, Ordering::SeqCst);
        }
    }

    /// Everything decoded since the last drain. Never blocks.
    pub fn drain(&self) -> Vec<Photo> {
        let mut out = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(photo) => {
                    self.in_flight.fetch_sub(1, Ordering::SeqCst);
                    out.push(photo);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

fn decode_batch(batch: Vec<PhotoSource>, tx: &Sender<Photo>, in_flight: &AtomicUsize) {
    let total = batch.len();
    for (i, src) in batch.into_iter().enumerate() {
        match decode_photo(&src.name, &src.bytes) {
            Ok(photo) => {
                if tx.send(photo).is_err() {
                    // Receiver gone: the scene was torn down.
                    in_flight.fetch_sub(total - i, Ordering::SeqCst);
                    return;
                }
            }
            Err(e) => {
                log::warn!("[photos] skipping: {e}");
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        }
    }
}
