//! Speech-to-text via a local Whisper model

mod model;

pub use model::resolve_model;

use std::path::Path;

use async_trait::async_trait;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::{Error, Result};

/// Transcribes a finished audio artifact to text
#[async_trait(?Send)]
pub trait Transcriber {
    /// Transcribe a WAV file
    ///
    /// An empty string means the audio contained no intelligible speech.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or inference fails
    async fn transcribe(&self, audio: &Path) -> Result<String>;
}

/// Whisper transcription backed by whisper.cpp
///
/// The model context is loaded once at startup and reused for every turn.
pub struct WhisperTranscriber {
    ctx: WhisperContext,
}

impl WhisperTranscriber {
    /// Load the model from a ggml file
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing or not a valid model
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            return Err(Error::Transcription(format!(
                "whisper model not found at {}",
                model_path.display()
            )));
        }

        let path = model_path
            .to_str()
            .ok_or_else(|| Error::Transcription("invalid model path".to_string()))?;

        tracing::info!(path, "loading whisper model");

        let ctx = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| Error::Transcription(format!("failed to load whisper model: {e}")))?;

        Ok(Self { ctx })
    }
}

#[async_trait(?Send)]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<String> {
        let samples = wav_to_mono_f32(audio)?;
        tracing::debug!(samples = samples.len(), "starting transcription");

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some("en"));
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        params.set_n_threads(num_threads() as i32);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| Error::Transcription(format!("failed to create whisper state: {e}")))?;

        state
            .full(params, &samples)
            .map_err(|e| Error::Transcription(format!("whisper inference failed: {e}")))?;

        let mut text = String::new();
        let num_segments = state.full_n_segments();
        for i in 0..num_segments {
            if let Some(segment) = state.get_segment(i) {
                let piece = segment
                    .to_str()
                    .map_err(|e| Error::Transcription(format!("invalid segment text: {e}")))?;
                text.push_str(piece);
            }
        }

        let text = text.trim().to_string();
        tracing::info!(transcript = %text, "transcription complete");
        Ok(text)
    }
}

/// Read a 16-bit WAV file as mono f32 samples in [-1.0, 1.0]
///
/// Multi-channel audio is downmixed by averaging channels.
fn wav_to_mono_f32(path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| Error::Transcription(format!("cannot read {}: {e}", path.display())))?;

    let spec = reader.spec();
    if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        return Err(Error::Transcription(format!(
            "expected 16-bit signed PCM, got {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| Error::Transcription(format!("corrupt audio in {}: {e}", path.display())))?;

    let channels = usize::from(spec.channels.max(1));
    let mono: Vec<f32> = samples
        .chunks(channels)
        .map(|frame| {
            let sum: f32 = frame.iter().map(|&s| f32::from(s) / 32768.0).sum();
            #[allow(clippy::cast_precision_loss)]
            let avg = sum / frame.len() as f32;
            avg
        })
        .collect();

    Ok(mono)
}

fn num_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nonexistent_model_fails() {
        let result = WhisperTranscriber::load(Path::new("/nonexistent/model.bin"));
        assert!(result.is_err());
        let err = result.err().unwrap().to_string();
        assert!(err.contains("not found"), "unexpected error: {err}");
    }

    #[test]
    fn test_wav_to_mono_reads_mono_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("mono.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for s in [0i16, 16384, -16384, 32767] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let samples = wav_to_mono_f32(&path).unwrap();
        assert_eq!(samples.len(), 4);
        assert!((samples[1] - 0.5).abs() < 0.001);
        assert!((samples[2] + 0.5).abs() < 0.001);
    }

    #[test]
    fn test_wav_to_mono_downmixes_stereo() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("stereo.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        // Two frames: (L=16384, R=-16384), (L=16384, R=16384)
        for s in [16384i16, -16384, 16384, 16384] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let samples = wav_to_mono_f32(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert!(samples[0].abs() < 0.001);
        assert!((samples[1] - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_wav_to_mono_rejects_missing_file() {
        assert!(wav_to_mono_f32(Path::new("/nonexistent/audio.wav")).is_err());
    }
}
