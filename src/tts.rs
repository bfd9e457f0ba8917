//! Speech synthesis through a local engine
//!
//! The reply is rendered by an external synthesis command (`espeak-ng` by
//! default) that plays directly to the output device and exits when playback
//! finishes, which gives the blocking semantics the turn loop relies on.

use async_trait::async_trait;
use tokio::process::Command;

use crate::{Error, Result};

/// Renders text to audible speech, blocking until playback completes
#[async_trait(?Send)]
pub trait Speaker {
    /// Speak the text aloud
    ///
    /// # Errors
    ///
    /// Returns error if the output engine is unavailable or fails
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Speaks through a local synthesis command
pub struct LocalSpeaker {
    command: String,
    args: Vec<String>,
}

impl LocalSpeaker {
    /// Create a speaker for the given command and fixed arguments
    ///
    /// The text to speak is appended as the final argument of each
    /// invocation.
    #[must_use]
    pub fn new(command: String, args: Vec<String>) -> Self {
        Self { command, args }
    }
}

#[async_trait(?Send)]
impl Speaker for LocalSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        tracing::debug!(engine = %self.command, chars = text.len(), "speaking");

        let status = Command::new(&self.command)
            .args(&self.args)
            .arg(text)
            .status()
            .await
            .map_err(|e| Error::Playback(format!("failed to launch {}: {e}", self.command)))?;

        if !status.success() {
            return Err(Error::Playback(format!(
                "{} exited with {status}",
                self.command
            )));
        }

        tracing::debug!("playback complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_speak_succeeds_with_working_command() {
        let speaker = LocalSpeaker::new("true".to_string(), Vec::new());
        speaker.speak("hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_speak_fails_on_nonzero_exit() {
        let speaker = LocalSpeaker::new("false".to_string(), Vec::new());
        let err = speaker.speak("hello").await.err().unwrap();
        assert!(matches!(err, Error::Playback(_)));
    }

    #[tokio::test]
    async fn test_speak_fails_when_engine_missing() {
        let speaker = LocalSpeaker::new("vesper-no-such-engine".to_string(), Vec::new());
        let err = speaker.speak("hello").await.err().unwrap();
        assert!(matches!(err, Error::Playback(_)));
    }
}
