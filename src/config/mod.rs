//! Configuration management for Vesper

pub mod file;

use std::path::PathBuf;

use crate::{Error, Result};

/// Default wake word
const DEFAULT_WAKE_WORD: &str = "vesper";

/// Default fixed recording length in seconds
const DEFAULT_RECORD_SECS: u64 = 10;

/// Default ggml model file name
const DEFAULT_WHISPER_MODEL: &str = "ggml-base.en.bin";

/// Default model download location
const DEFAULT_WHISPER_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-base.en.bin";

/// Default Gemini model
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Default speech synthesis command
const DEFAULT_SPEECH_COMMAND: &str = "espeak-ng";

/// Vesper configuration
///
/// Precedence for every field is env > config file > default. The inference
/// credential is read exactly once, here, so a missing key fails at startup
/// rather than at the first turn.
#[derive(Debug, Clone)]
pub struct Config {
    /// Wake word the operator types to start a turn
    pub wake_word: String,

    /// Input device index; `None` selects the platform default
    pub device: Option<usize>,

    /// Capture sample rate in Hz
    pub sample_rate: u32,

    /// Fixed recording length in seconds
    pub record_secs: u64,

    /// ggml model file name
    pub whisper_model: String,

    /// URL the model is downloaded from on a cache miss
    pub whisper_model_url: String,

    /// Model cache directory
    pub model_cache_dir: PathBuf,

    /// Gemini model identifier
    pub gemini_model: String,

    /// Gemini API key (may be empty when loaded leniently)
    pub gemini_api_key: String,

    /// Speech synthesis command
    pub speech_command: String,

    /// Fixed arguments passed to the synthesis command before the text
    pub speech_args: Vec<String>,
}

impl Config {
    /// Load configuration for the assistant loop
    ///
    /// # Errors
    ///
    /// Returns error if the inference API key is not configured
    pub fn load(device: Option<usize>) -> Result<Self> {
        let config = Self::load_lenient(device);

        if config.gemini_api_key.is_empty() {
            return Err(Error::Config(
                "GEMINI_API_KEY is not set; export it (or GOOGLE_API_KEY) before starting"
                    .to_string(),
            ));
        }

        Ok(config)
    }

    /// Load configuration without requiring the inference credential
    ///
    /// Used by diagnostic subcommands that never reach the inference API.
    #[must_use]
    pub fn load_lenient(device: Option<usize>) -> Self {
        let fc = file::load_config_file();

        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .ok()
            .or(fc.llm.api_key)
            .unwrap_or_default();

        let model_cache_dir = std::env::var("VESPER_MODEL_DIR")
            .ok()
            .map(PathBuf::from)
            .or(fc.stt.cache_dir)
            .unwrap_or_else(default_model_cache_dir);

        Self {
            wake_word: std::env::var("VESPER_WAKE_WORD")
                .ok()
                .or(fc.wake_word)
                .unwrap_or_else(|| DEFAULT_WAKE_WORD.to_string()),
            device: device.or(fc.audio.device),
            sample_rate: fc.audio.sample_rate.unwrap_or(crate::audio::SAMPLE_RATE),
            record_secs: std::env::var("VESPER_RECORD_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .or(fc.audio.record_secs)
                .unwrap_or(DEFAULT_RECORD_SECS),
            whisper_model: std::env::var("VESPER_WHISPER_MODEL")
                .ok()
                .or(fc.stt.model)
                .unwrap_or_else(|| DEFAULT_WHISPER_MODEL.to_string()),
            whisper_model_url: fc
                .stt
                .model_url
                .unwrap_or_else(|| DEFAULT_WHISPER_MODEL_URL.to_string()),
            model_cache_dir,
            gemini_model: std::env::var("VESPER_GEMINI_MODEL")
                .ok()
                .or(fc.llm.model)
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_key,
            speech_command: std::env::var("VESPER_SPEECH_COMMAND")
                .ok()
                .or(fc.speech.command)
                .unwrap_or_else(|| DEFAULT_SPEECH_COMMAND.to_string()),
            speech_args: fc.speech.args.unwrap_or_default(),
        }
    }
}

/// Default model cache directory: `~/.cache/vesper/models/`
fn default_model_cache_dir() -> PathBuf {
    directories::BaseDirs::new().map_or_else(
        || PathBuf::from(".cache/vesper/models"),
        |d| d.cache_dir().join("vesper").join("models"),
    )
}
