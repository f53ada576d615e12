//! Synthesized sound cues. Each cue is a short fundsp graph rendered to a
//! sample buffer and appended to a detached rodio sink, so playback never
//! blocks the frame loop. A machine without an audio device simply plays
//! nothing.

use fundsp::prelude64::*;
use log::warn;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

const SAMPLE_RATE: f64 = 44100.0;

pub struct Audio {
    handle: OutputStreamHandle,
    // Playback stops when the stream drops; hold it for the session.
    _stream: OutputStream,
}

impl Audio {
    /// Open the default output device. `None` (with a logged warning)
    /// when no device is available; the game runs silently in that case.
    pub fn open() -> Option<Self> {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Some(Self { handle, _stream: stream }),
            Err(err) => {
                warn!("audio unavailable ({err}); continuing without sound");
                None
            }
        }
    }

    fn play(&self, samples: Vec<f32>) {
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE as u32, samples));
                sink.detach();
            }
            Err(err) => warn!("sound playback failed ({err})"),
        }
    }

    /// Short upward chirp on a jump.
    pub fn flap(&self) {
        self.play(flap_samples());
    }

    /// Two-note ding when a pipe is passed.
    pub fn score(&self) {
        self.play(score_samples());
    }

    /// Falling sawtooth sweep on a crash.
    pub fn death(&self) {
        self.play(death_samples());
    }
}

// fundsp uses 44.1kHz by default
fn render(mut unit: impl AudioUnit, seconds: f64) -> Vec<f32> {
    let frames = (SAMPLE_RATE * seconds) as usize;
    (0..frames).map(|_| unit.get_mono()).collect()
}

fn flap_samples() -> Vec<f32> {
    let freq = lfo(|t: f64| lerp11(320.0, 640.0, (t / 0.08).min(1.0)));
    let gain = lfo(|t: f64| lerp11(0.1, 0.0, (t / 0.12).min(1.0)));
    render((freq >> sine()) * gain, 0.12)
}

fn score_samples() -> Vec<f32> {
    let freq = lfo(|t: f64| if t < 0.07 { 660.0 } else { 880.0 });
    let gain = lfo(|t: f64| lerp11(0.12, 0.0, (t / 0.18).min(1.0)));
    render((freq >> sine()) * gain, 0.18)
}

fn death_samples() -> Vec<f32> {
    let freq = lfo(|t: f64| lerp11(380.0, 70.0, (t / 0.4).min(1.0)));
    let gain = lfo(|t: f64| lerp11(0.15, 0.0, (t / 0.5).min(1.0)));
    render((freq >> saw()) * gain, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Rendering needs no output device, so the cue shapes are testable
    // even on headless machines.
    #[test]
    fn cues_render_bounded_finite_samples() {
        for (samples, seconds) in [
            (flap_samples(), 0.12),
            (score_samples(), 0.18),
            (death_samples(), 0.5),
        ] {
            assert_eq!(samples.len(), (SAMPLE_RATE * seconds) as usize);
            assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
            assert!(samples.iter().any(|s| s.abs() > 0.0));
        }
    }
}
