//! TOML configuration file loading
//!
//! Supports `~/.config/vesper/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct VesperConfigFile {
    /// Wake word the operator types to start a turn
    #[serde(default)]
    pub wake_word: Option<String>,

    /// Audio capture configuration
    #[serde(default)]
    pub audio: AudioFileConfig,

    /// Transcription configuration
    #[serde(default)]
    pub stt: SttFileConfig,

    /// Inference configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Speech synthesis configuration
    #[serde(default)]
    pub speech: SpeechFileConfig,
}

/// Audio capture configuration
#[derive(Debug, Default, Deserialize)]
pub struct AudioFileConfig {
    /// Input device index
    pub device: Option<usize>,

    /// Sample rate in Hz (e.g. 16000)
    pub sample_rate: Option<u32>,

    /// Fixed recording length in seconds
    pub record_secs: Option<u64>,
}

/// Transcription configuration
#[derive(Debug, Default, Deserialize)]
pub struct SttFileConfig {
    /// ggml model file name (e.g. "ggml-base.en.bin")
    pub model: Option<String>,

    /// URL the model is downloaded from on a cache miss
    pub model_url: Option<String>,

    /// Model cache directory override
    pub cache_dir: Option<PathBuf>,
}

/// Inference configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Model identifier (e.g. "gemini-1.5-flash")
    pub model: Option<String>,

    /// API key (env var takes precedence)
    pub api_key: Option<String>,
}

/// Speech synthesis configuration
#[derive(Debug, Default, Deserialize)]
pub struct SpeechFileConfig {
    /// Synthesis command (e.g. "espeak-ng")
    pub command: Option<String>,

    /// Fixed arguments passed before the text
    pub args: Option<Vec<String>>,
}

/// Load the TOML config file from the standard path
///
/// Returns `VesperConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
pub fn load_config_file() -> VesperConfigFile {
    let Some(path) = config_file_path() else {
        return VesperConfigFile::default();
    };

    if !path.exists() {
        return VesperConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                VesperConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            VesperConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/vesper/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("vesper").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: VesperConfigFile = toml::from_str(
            r#"
            wake_word = "jarvis"

            [audio]
            device = 2
            sample_rate = 16000
            record_secs = 8

            [stt]
            model = "ggml-tiny.en.bin"

            [llm]
            model = "gemini-1.5-pro"

            [speech]
            command = "espeak"
            args = ["-s", "160"]
            "#,
        )
        .unwrap();

        assert_eq!(config.wake_word.as_deref(), Some("jarvis"));
        assert_eq!(config.audio.device, Some(2));
        assert_eq!(config.audio.record_secs, Some(8));
        assert_eq!(config.stt.model.as_deref(), Some("ggml-tiny.en.bin"));
        assert_eq!(config.llm.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(config.speech.command.as_deref(), Some("espeak"));
        assert_eq!(config.speech.args.as_deref(), Some(&["-s".to_string(), "160".to_string()][..]));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: VesperConfigFile = toml::from_str("").unwrap();
        assert!(config.wake_word.is_none());
        assert!(config.audio.device.is_none());
        assert!(config.speech.command.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: VesperConfigFile = toml::from_str(
            r#"
            [audio]
            record_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.audio.record_secs, Some(5));
        assert!(config.audio.sample_rate.is_none());
    }
}
