//! Vesper - Hands-free voice assistant for the terminal
//!
//! This library provides the building blocks of the assistant:
//! - Turn controller (wake → capture → transcribe → infer → speak → cleanup)
//! - Recording artifact lifecycle
//! - Collaborator boundaries for capture, transcription, inference, playback
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                   Turn Controller                     │
//! │   wake │ capture │ transcribe │ infer │ speak │ clean │
//! └──────┬─────┬──────────┬───────────┬─────────┬────────┘
//!        │     │          │           │         │
//!      stdin  cpal    whisper.cpp   Gemini   espeak-ng
//! ```
//!
//! Each turn is strictly sequential; the next stage's entire input is the
//! previous stage's output, and the temporary recording never outlives its
//! turn.

pub mod artifact;
pub mod assistant;
pub mod audio;
pub mod config;
pub mod error;
pub mod llm;
pub mod stt;
pub mod tts;
pub mod wake;

pub use assistant::Assistant;
pub use config::Config;
pub use error::{Error, Result};
