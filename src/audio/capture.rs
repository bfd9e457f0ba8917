//! Microphone capture via cpal

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate};

use super::{CaptureSpec, Recorder, fit_frames, to_i16};
use crate::{Error, Result};

/// Records from an input device for a fixed duration
#[derive(Default)]
pub struct CpalRecorder;

impl CpalRecorder {
    /// Create a new recorder
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl Recorder for CpalRecorder {
    async fn record(&self, spec: &CaptureSpec) -> Result<Vec<i16>> {
        let device = input_device(spec.device)?;

        let supported_config = device
            .supported_input_configs()
            .map_err(|e| Error::Capture(e.to_string()))?
            .find(|c| {
                c.channels() == spec.channels
                    && c.min_sample_rate() <= SampleRate(spec.sample_rate)
                    && c.max_sample_rate() >= SampleRate(spec.sample_rate)
            })
            .ok_or_else(|| Error::Capture("no suitable audio config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(spec.sample_rate))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = spec.sample_rate,
            channels = config.channels,
            duration = ?spec.duration,
            "recording"
        );

        let buffer = Arc::new(Mutex::new(Vec::<f32>::new()));
        let stream_buffer = Arc::clone(&buffer);

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = stream_buffer.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::Capture(e.to_string()))?;

        stream.play().map_err(|e| Error::Capture(e.to_string()))?;

        // Recording length is constant: block for the full duration.
        tokio::time::sleep(spec.duration).await;
        drop(stream);

        let samples = buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default();

        tracing::debug!(captured = samples.len(), expected = spec.frames(), "capture complete");

        Ok(to_i16(&fit_frames(samples, spec.frames())))
    }
}

/// Open an input device by index, or the platform default
fn input_device(index: Option<usize>) -> Result<Device> {
    let host = cpal::default_host();

    match index {
        None => host
            .default_input_device()
            .ok_or_else(|| Error::Capture("no input device available".to_string())),
        Some(i) => host
            .input_devices()
            .map_err(|e| Error::Capture(e.to_string()))?
            .nth(i)
            .ok_or_else(|| Error::Capture(format!("no input device at index {i}"))),
    }
}

/// Names of all available input devices, in index order
///
/// # Errors
///
/// Returns error if devices cannot be enumerated
pub fn input_device_names() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| Error::Capture(e.to_string()))?;

    Ok(devices
        .map(|d| d.name().unwrap_or_else(|_| "<unknown>".to_string()))
        .collect())
}
