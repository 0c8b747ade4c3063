// ---------------- Native audio (cpal) ----------------
//
// Only procedural tracks are available: there is no file decoder in this
// build, so `load` accepts the `builtin:` sources below and rejects the rest.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use std::f32::consts::{PI, TAU};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tree_core::{AudioBackend, AudioError, DEFAULT_AUDIO_SOURCE};

pub const CHIME_SOURCE: &str = "builtin:chime";

const MASTER_GAIN: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Track {
    /// Two slow chords, A minor then F major.
    Pad,
    /// Decaying pentatonic notes, two per second.
    Chime,
}

impl Track {
    fn from_source(source: &str) -> Option<Self> {
        match source {
            DEFAULT_AUDIO_SOURCE => Some(Track::Pad),
            CHIME_SOURCE => Some(Track::Chime),
            _ => None,
        }
    }

    /// Loop length in seconds.
    fn length(self) -> f32 {
        match self {
            Track::Pad => 8.0,
            Track::Chime => 4.0,
        }
    }

    fn sample(self, t: f32) -> f32 {
        match self {
            Track::Pad => {
                const CHORDS: [[f32; 3]; 2] = [[220.0, 261.63, 329.63], [174.61, 220.0, 261.63]];
                let half = self.length() / 2.0;
                let chord = &CHORDS[usize::from(t >= half)];
                let local = t % half;
                let env = (PI * local / half).sin();
                let sum: f32 = chord.iter().map(|f| (TAU * f * t).sin()).sum();
                sum / chord.len() as f32 * env
            }
            Track::Chime => {
                const NOTES: [f32; 8] = [
                    523.25, 587.33, 659.25, 783.99, 880.0, 783.99, 659.25, 587.33,
                ];
                let step = 0.5;
                let index = (t / step) as usize % NOTES.len();
                let local = t % step;
                (TAU * NOTES[index] * local).sin() * (-local * 6.0).exp()
            }
        }
    }
}

struct Playback {
    sample_rate: f32,
    track: Option<Track>,
    playing: bool,
    looping: bool,
    volume: f32,
    rate: f32,
    /// Seconds into the current track.
    position: f32,
}

impl Playback {
    fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            track: None,
            playing: false,
            looping: false,
            volume: 1.0,
            rate: 1.0,
            position: 0.0,
        }
    }

    fn next_sample(&mut self) -> f32 {
        let Some(track) = self.track.filter(|_| self.playing) else {
            return 0.0;
        };
        let value = track.sample(self.position) * self.volume * MASTER_GAIN;
        // Advancing faster raises the pitch as well as the tempo.
        self.position += self.rate / self.sample_rate;
        if self.position >= track.length() {
            if self.looping {
                self.position -= track.length();
            } else {
                self.position = 0.0;
                self.playing = false;
            }
        }
        value
    }
}

/// Looping output on the default device.
pub struct CpalBackend {
    state: Arc<Mutex<Playback>>,
    stream: Option<cpal::Stream>,
}

impl CpalBackend {
    pub fn open() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| AudioError::Backend("no output device".into()))?;
        let config = device
            .default_output_config()
            .map_err(|e| AudioError::Backend(e.to_string()))?;
        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        let state = Arc::new(Mutex::new(Playback::new(sample_rate)));

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &config.into(), channels, Arc::clone(&state))
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &config.into(), channels, Arc::clone(&state))
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &config.into(), channels, Arc::clone(&state))
            }
            other => {
                return Err(AudioError::Backend(format!(
                    "unsupported sample format {other:?}"
                )))
            }
        }
        .map_err(|e| AudioError::Backend(e.to_string()))?;
        stream
            .play()
            .map_err(|e| AudioError::Backend(e.to_string()))?;
        log::info!("[audio] output at {sample_rate} Hz, {channels} channel(s)");

        Ok(Self {
            state,
            stream: Some(stream),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Playback> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AudioBackend for CpalBackend {
    fn load(&mut self, source: &str) -> Result<(), AudioError> {
        let track = Track::from_source(source).ok_or_else(|| AudioError::Load {
            source_url: source.to_string(),
            reason: format!("only {DEFAULT_AUDIO_SOURCE} and {CHIME_SOURCE} are available"),
        })?;
        let mut p = self.lock();
        p.track = Some(track);
        p.position = 0.0;
        Ok(())
    }
    fn play(&mut self) {
        let mut p = self.lock();
        p.playing = p.track.is_some();
    }
    fn pause(&mut self) {
        self.lock().playing = false;
    }
    fn stop(&mut self) {
        let mut p = self.lock();
        p.playing = false;
        p.position = 0.0;
    }
    fn is_playing(&self) -> bool {
        self.lock().playing
    }
    fn has_buffer(&self) -> bool {
        self.lock().track.is_some()
    }
    fn set_looping(&mut self, looping: bool) {
        self.lock().looping = looping;
    }
    fn set_volume(&mut self, volume: f32) {
        self.lock().volume = volume;
    }
    fn volume(&self) -> f32 {
        self.lock().volume
    }
    fn playback_rate(&self) -> f32 {
        self.lock().rate
    }
    fn set_playback_rate(&mut self, rate: f32) {
        self.lock().rate = rate;
    }
    fn close(&mut self) {
        self.stream.take();
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    state: Arc<Mutex<Playback>>,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: SizedSample + FromSample<f32>,
{
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let mut playback = state.lock().unwrap_or_else(PoisonError::into_inner);
            for frame in data.chunks_mut(channels.max(1)) {
                let value = T::from_sample(playback.next_sample());
                for out in frame.iter_mut() {
                    *out = value;
                }
            }
        },
        |err| log::error!("[audio] stream error: {err}"),
        None,
    )
}
