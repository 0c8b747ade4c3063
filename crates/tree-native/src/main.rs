mod audio;
mod hand;
mod render;

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use anyhow::Context;
use clap::Parser;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use hand::{HandShape, SimInput};
use tree_core::{
    AudioBackend, FrameClock, HandTracker, PhotoSource, SceneConfig, SceneController, SceneParams,
    SilentBackend, DEFAULT_MUSIC_VOLUME,
};

#[derive(Parser, Debug)]
#[command(name = "tree-native", about = "Gesture-driven particle tree")]
struct Args {
    /// Seed for the layout and runtime randomness
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 1.0)]
    rotation_speed: f32,
    #[arg(long, default_value_t = 1.0)]
    particle_size: f32,
    /// Fraction of snow kept visible, 0..1
    #[arg(long, default_value_t = 1.0)]
    snow_density: f32,
    #[arg(long, default_value_t = DEFAULT_MUSIC_VOLUME)]
    volume: f32,
    #[arg(long, default_value_t = 1.5)]
    bloom: f32,
    /// Image files or directories to preload as photos
    #[arg(long, num_args = 1..)]
    photos: Vec<PathBuf>,
    /// Run without a sound device
    #[arg(long)]
    no_audio: bool,
    /// Start the default track right away
    #[arg(long)]
    autoplay: bool,
}

fn open_audio(disabled: bool) -> Box<dyn AudioBackend> {
    if disabled {
        return Box::new(SilentBackend::new());
    }
    match audio::CpalBackend::open() {
        Ok(backend) => Box::new(backend),
        Err(e) => {
            log::warn!("[audio] {e}; continuing silently");
            Box::new(SilentBackend::new())
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg"))
        .unwrap_or(false)
}

/// Read every image named on the command line, expanding directories.
fn read_photos(paths: &[PathBuf]) -> Vec<PhotoSource> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            match std::fs::read_dir(path) {
                Ok(entries) => {
                    let mut found: Vec<PathBuf> = entries
                        .filter_map(|e| e.ok().map(|e| e.path()))
                        .filter(|p| is_image(p))
                        .collect();
                    found.sort();
                    files.extend(found);
                }
                Err(e) => log::warn!("[photos] cannot list {}: {e}", path.display()),
            }
        } else {
            files.push(path.clone());
        }
    }
    files
        .into_iter()
        .filter_map(|path| match std::fs::read(&path) {
            Ok(bytes) => Some(PhotoSource::new(path.display().to_string(), bytes)),
            Err(e) => {
                log::warn!("[photos] cannot read {}: {e}", path.display());
                None
            }
        })
        .collect()
}

fn send(hand: &Sender<SimInput>, input: SimInput) {
    if hand.send(input).is_err() {
        log::debug!("[gesture] simulated tracker is gone");
    }
}

fn handle_key(
    key: &Key,
    scene: &mut SceneController,
    hand: &Sender<SimInput>,
    hand_visible: &mut bool,
) {
    match key {
        Key::Named(NamedKey::Space) => {
            let playing = scene.toggle_audio();
            log::info!("[audio] {}", if playing { "playing" } else { "paused" });
        }
        Key::Named(NamedKey::ArrowUp) => {
            let v = scene.params().music_volume + 0.1;
            scene.set_music_volume(v);
        }
        Key::Named(NamedKey::ArrowDown) => {
            let v = scene.params().music_volume - 0.1;
            scene.set_music_volume(v);
        }
        Key::Character(c) => match c.as_str() {
            "h" | "H" => {
                *hand_visible = !*hand_visible;
                send(hand, SimInput::Visible(*hand_visible));
            }
            "1" => send(hand, SimInput::Shape(HandShape::Fist)),
            "2" => send(hand, SimInput::Shape(HandShape::Open)),
            "3" => send(hand, SimInput::Shape(HandShape::Pinch)),
            "4" => send(hand, SimInput::Shape(HandShape::Relaxed)),
            "m" | "M" => {
                if let Err(e) = scene.play_audio(Some(audio::CHIME_SOURCE)) {
                    log::warn!("[audio] {e}");
                }
            }
            "[" => {
                let s = scene.params().rotation_speed - 0.25;
                scene.set_rotation_speed(s);
            }
            "]" => {
                let s = scene.params().rotation_speed + 0.25;
                scene.set_rotation_speed(s);
            }
            "-" => {
                let d = scene.params().snow_density - 0.1;
                scene.set_snow_density(d);
            }
            "=" => {
                let d = scene.params().snow_density + 0.1;
                scene.set_snow_density(d);
            }
            _ => {}
        },
        _ => {}
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = SceneConfig {
        seed: args.seed,
        ..SceneConfig::default()
    };
    let params = SceneParams {
        bloom_strength: args.bloom,
        rotation_speed: args.rotation_speed,
        particle_size: args.particle_size,
        snow_density: args.snow_density,
        music_volume: args.volume.clamp(0.0, 1.0),
    };

    let (hand_tx, tracker) = hand::sim_hand();
    let tracker: Box<dyn HandTracker> = Box::new(tracker);
    let mut scene = SceneController::new(config, params, Ok(tracker), open_audio(args.no_audio));

    let photos = read_photos(&args.photos);
    if !photos.is_empty() {
        match scene.add_photos(photos) {
            Ok(n) => log::info!("[photos] decoding {n} photo(s)"),
            Err(e) => log::warn!("[photos] {e}"),
        }
    }
    if args.autoplay {
        if let Err(e) = scene.play_audio(None) {
            log::warn!("[audio] {e}");
        }
    }
    log::info!(
        "[scene] H: show hand, 1-4: fist/open/pinch/relaxed, Space: music, M: chime, Up/Down: volume"
    );

    let event_loop = EventLoop::new().context("event loop")?;
    let window = WindowBuilder::new()
        .with_title("Gesture Tree")
        .build(&event_loop)
        .context("window")?;

    let mut gpu = pollster::block_on(render::GpuState::new(&window))?;
    scene.camera_mut().aspect = gpu.aspect();
    let mut clock = FrameClock::new();
    let mut last_report = None;
    let mut hand_visible = false;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => {
            gpu.resize(size);
            scene.camera_mut().aspect = gpu.aspect();
        }
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => {
            scene.destroy();
            elwt.exit();
        }
        Event::WindowEvent {
            event: WindowEvent::CursorMoved { position, .. },
            ..
        } => {
            let size = gpu.window.inner_size();
            let x = position.x as f32 / size.width.max(1) as f32;
            let y = position.y as f32 / size.height.max(1) as f32;
            send(&hand_tx, SimInput::Moved { x, y });
        }
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                },
            ..
        } => {
            if logical_key == Key::Named(NamedKey::Escape) {
                scene.destroy();
                elwt.exit();
            } else {
                handle_key(&logical_key, &mut scene, &hand_tx, &mut hand_visible);
            }
        }
        Event::AboutToWait => {
            let (dt, now) = clock.tick();
            match scene.tick(dt, now) {
                Some(report) => last_report = Some(report),
                None => {
                    elwt.exit();
                    return;
                }
            }
            match gpu.render(&scene, last_report.as_ref()) {
                Ok(_) => gpu.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => gpu.resize(gpu.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("[scene] GPU out of memory");
                    scene.destroy();
                    elwt.exit();
                }
                Err(_) => {}
            }
        }
        _ => {}
    })?;
    Ok(())
}
