// Host-side tests for photo decoding, cropping and the background decoder.

mod common;

use common::png_bytes;
use std::thread;
use std::time::{Duration, Instant};
use tree_core::*;

#[test]
fn crop_is_centered_square() {
    assert_eq!(CenterCrop::for_size(40, 20), CenterCrop { x: 10, y: 0, side: 20 });
    assert_eq!(CenterCrop::for_size(20, 50), CenterCrop { x: 0, y: 15, side: 20 });
    assert_eq!(CenterCrop::for_size(8, 8), CenterCrop { x: 0, y: 0, side: 8 });
}

#[test]
fn uv_window_matches_crop() {
    let (repeat, offset) = CenterCrop::uv_repeat_offset(40, 20);
    assert!((repeat.x - 0.5).abs() < 1e-6 && repeat.y == 1.0);
    assert!((offset.x - 0.25).abs() < 1e-6 && offset.y == 0.0);

    let (repeat, offset) = CenterCrop::uv_repeat_offset(20, 40);
    assert!(repeat.x == 1.0 && (repeat.y - 0.5).abs() < 1e-6);
    assert!(offset.x == 0.0 && (offset.y - 0.25).abs() < 1e-6);
}

#[test]
fn decodes_and_crops_png() {
    let bytes = png_bytes(40, 20, [204, 102, 51, 255]);
    let photo = decode_photo("wide.png", &bytes).expect("valid png");
    assert_eq!((photo.source_width, photo.source_height), (40, 20));
    assert_eq!(photo.image.dimensions(), (20, 20));
    assert_eq!(photo.crop.side, 20);
    assert!((photo.mean_color[0] - 0.8).abs() < 1e-3);
    assert!((photo.mean_color[1] - 0.4).abs() < 1e-3);
    assert!((photo.mean_color[2] - 0.2).abs() < 1e-3);
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = decode_photo("notes.txt", b"definitely not an image").unwrap_err();
    assert!(matches!(err, PhotoError::Decode { ref name, .. } if name == "notes.txt"));
}

fn drain_until(decoder: &PhotoDecoder, want: usize) -> Vec<Photo> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut got = Vec::new();
    while got.len() < want && Instant::now() < deadline {
        got.extend(decoder.drain());
        thread::sleep(Duration::from_millis(5));
    }
    got
}

#[test]
fn decoder_skips_bad_photos() {
    let decoder = PhotoDecoder::new();
    decoder.submit(vec![
        PhotoSource::new("a.png", png_bytes(4, 4, [255, 0, 0, 255])),
        PhotoSource::new("broken.jpg", vec![0xFF, 0xD8, 0x00]),
        PhotoSource::new("b.png", png_bytes(6, 3, [0, 255, 0, 255])),
    ]);
    let photos = drain_until(&decoder, 2);
    let names: Vec<_> = photos.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["a.png", "b.png"]);

    let deadline = Instant::now() + Duration::from_secs(5);
    while decoder.in_flight() > 0 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(decoder.in_flight(), 0);
}

#[test]
fn empty_batch_is_a_no_op() {
    let decoder = PhotoDecoder::new();
    decoder.submit(Vec::new());
    assert_eq!(decoder.in_flight(), 0);
    assert!(decoder.drain().is_empty());
}
