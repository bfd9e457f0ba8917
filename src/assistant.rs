//! The turn controller
//!
//! Runs an unbounded sequence of turns, each fully sequential and blocking:
//! wait for the wake trigger, record a fixed-duration clip into a temporary
//! artifact, transcribe it, ask the language model for a reply, speak the
//! reply, and delete the artifact. A failed stage abandons the turn; nothing
//! short of an interrupt during the wake wait stops the loop.

use crate::artifact::{ArtifactStore, AudioArtifact};
use crate::audio::{CaptureSpec, Recorder};
use crate::llm::LanguageModel;
use crate::stt::Transcriber;
use crate::tts::Speaker;
use crate::wake::{WakeEvent, WakeTrigger};
use crate::Result;

/// The assistant's turn-taking loop
///
/// Holds the long-lived session handles (collaborators) constructed at
/// startup; nothing here is mutated across turns except the wake trigger's
/// input state.
pub struct Assistant {
    store: ArtifactStore,
    trigger: Box<dyn WakeTrigger>,
    recorder: Box<dyn Recorder>,
    transcriber: Box<dyn Transcriber>,
    model: Box<dyn LanguageModel>,
    speaker: Box<dyn Speaker>,
    capture: CaptureSpec,
}

impl Assistant {
    /// Assemble the assistant from its collaborators
    #[must_use]
    pub fn new(
        store: ArtifactStore,
        trigger: Box<dyn WakeTrigger>,
        recorder: Box<dyn Recorder>,
        transcriber: Box<dyn Transcriber>,
        model: Box<dyn LanguageModel>,
        speaker: Box<dyn Speaker>,
        capture: CaptureSpec,
    ) -> Self {
        Self {
            store,
            trigger,
            recorder,
            transcriber,
            model,
            speaker,
            capture,
        }
    }

    /// Run turns until the wake wait is interrupted
    ///
    /// Stage failures are logged and abandoned; only a shutdown event (or a
    /// broken trigger source) ends the loop.
    ///
    /// # Errors
    ///
    /// Returns error if the wake trigger source itself fails
    pub async fn run(&mut self) -> Result<()> {
        loop {
            match self.trigger.wait().await? {
                WakeEvent::Shutdown => {
                    tracing::info!("shutdown requested");
                    return Ok(());
                }
                WakeEvent::Triggered => {}
            }

            if let Err(e) = self.run_turn().await {
                tracing::error!(error = %e, "turn aborted");
            }
        }
    }

    /// Run one wake-to-cleanup turn
    async fn run_turn(&mut self) -> Result<()> {
        // Artifact allocation failure aborts before capture even starts.
        let mut artifact = self
            .store
            .create(self.capture.channels, self.capture.sample_rate)?;

        let outcome = self.run_stages(&mut artifact).await;

        // Cleanup runs on every exit path out of the staged block above.
        if let Err(e) = artifact.release() {
            tracing::warn!(error = %e, "artifact release failed");
        }

        outcome
    }

    /// The capture → transcribe → infer → speak sequence
    async fn run_stages(&self, artifact: &mut AudioArtifact) -> Result<()> {
        tracing::info!(duration = ?self.capture.duration, "listening");
        let samples = self.recorder.record(&self.capture).await?;
        artifact.write(&samples)?;
        artifact.finalize()?;

        let transcript = self.transcriber.transcribe(artifact.path()).await?;
        if transcript.trim().is_empty() {
            tracing::info!("nothing intelligible in the recording");
            return Ok(());
        }
        println!("You said: {transcript}");

        let reply = self.model.reply(&transcript).await?;
        println!("[vesper]: {reply}");

        self.speaker.speak(&reply).await?;
        Ok(())
    }
}
