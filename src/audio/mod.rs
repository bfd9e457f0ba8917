//! Audio capture
//!
//! One-shot, fixed-duration recording from an input device. Recording length
//! is constant; there is no voice-activity detection.

mod capture;

pub use capture::{CpalRecorder, input_device_names};

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16_000;

/// Channel count for audio capture
pub const CHANNELS: u16 = 1;

/// Parameters for one fixed-duration recording
#[derive(Debug, Clone)]
pub struct CaptureSpec {
    /// Input device index; `None` selects the platform default
    pub device: Option<usize>,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Channel count
    pub channels: u16,

    /// Recording length
    pub duration: Duration,
}

impl CaptureSpec {
    /// Number of frames a recording of this spec must contain
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn frames(&self) -> usize {
        (self.duration.as_secs_f64() * f64::from(self.sample_rate)).round() as usize
    }
}

/// Records a fixed-duration clip of 16-bit signed samples
#[async_trait(?Send)]
pub trait Recorder {
    /// Record for exactly `spec.duration`, returning `spec.frames()` samples
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be opened or the stream fails
    async fn record(&self, spec: &CaptureSpec) -> Result<Vec<i16>>;
}

/// Trim or zero-pad samples to an exact frame count
#[must_use]
pub fn fit_frames(mut samples: Vec<f32>, frames: usize) -> Vec<f32> {
    samples.resize(frames, 0.0);
    samples
}

/// Convert f32 samples in [-1.0, 1.0] to 16-bit signed
#[must_use]
pub fn to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&sample| {
            #[allow(clippy::cast_possible_truncation)]
            let converted = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            converted
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_for_duration() {
        let spec = CaptureSpec {
            device: None,
            sample_rate: 16_000,
            channels: 1,
            duration: Duration::from_secs(10),
        };
        assert_eq!(spec.frames(), 160_000);
    }

    #[test]
    fn test_fit_frames_pads_short_buffer() {
        let fitted = fit_frames(vec![0.5; 10], 16);
        assert_eq!(fitted.len(), 16);
        assert_eq!(fitted[9], 0.5);
        assert_eq!(fitted[10], 0.0);
    }

    #[test]
    fn test_fit_frames_trims_long_buffer() {
        let fitted = fit_frames(vec![0.5; 32], 16);
        assert_eq!(fitted.len(), 16);
    }

    #[test]
    fn test_to_i16_clamps_and_scales() {
        let samples = to_i16(&[0.0, 1.0, -1.0, 2.0]);
        assert_eq!(samples[0], 0);
        assert_eq!(samples[1], 32767);
        assert_eq!(samples[3], 32767);
        assert!(samples[2] <= -32766);
    }
}
