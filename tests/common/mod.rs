//! Scripted collaborator doubles for pipeline tests
//!
//! Each fake implements one collaborator boundary and records how it was
//! driven, so tests can inject failures at any stage and assert what the
//! turn controller did afterwards.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use async_trait::async_trait;

use vesper::audio::{CaptureSpec, Recorder};
use vesper::llm::LanguageModel;
use vesper::stt::Transcriber;
use vesper::tts::Speaker;
use vesper::wake::{WakeEvent, WakeTrigger};
use vesper::{Error, Result};

/// Yields a scripted sequence of wake events, then shuts down
pub struct ScriptedTrigger {
    events: VecDeque<WakeEvent>,
}

impl ScriptedTrigger {
    pub fn new(events: impl IntoIterator<Item = WakeEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

#[async_trait(?Send)]
impl WakeTrigger for ScriptedTrigger {
    async fn wait(&mut self) -> Result<WakeEvent> {
        Ok(self.events.pop_front().unwrap_or(WakeEvent::Shutdown))
    }
}

/// Returns a full buffer of fixed samples, or fails on demand
pub struct StubRecorder {
    pub fail: bool,
    pub calls: Rc<Cell<usize>>,
}

impl StubRecorder {
    pub fn ok() -> Self {
        Self {
            fail: false,
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Rc::new(Cell::new(0)),
        }
    }
}

#[async_trait(?Send)]
impl Recorder for StubRecorder {
    async fn record(&self, spec: &CaptureSpec) -> Result<Vec<i16>> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(Error::Capture("injected capture failure".to_string()));
        }
        Ok(vec![7i16; spec.frames()])
    }
}

/// Returns a fixed transcript (`None` fails), recording each call
pub struct StubTranscriber {
    pub text: Option<String>,
    pub calls: Rc<Cell<usize>>,
    /// Whether the artifact file existed when transcription ran
    pub saw_artifact: Rc<Cell<bool>>,
    /// Frames counted from the artifact, when it was readable
    pub frames_seen: Rc<Cell<usize>>,
}

impl StubTranscriber {
    pub fn returning(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: Rc::new(Cell::new(0)),
            saw_artifact: Rc::new(Cell::new(false)),
            frames_seen: Rc::new(Cell::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            calls: Rc::new(Cell::new(0)),
            saw_artifact: Rc::new(Cell::new(false)),
            frames_seen: Rc::new(Cell::new(0)),
        }
    }
}

#[async_trait(?Send)]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        self.saw_artifact.set(audio.exists());

        if let Ok(reader) = hound::WavReader::open(audio) {
            self.frames_seen.set(reader.len() as usize);
        }

        self.text
            .clone()
            .ok_or_else(|| Error::Transcription("injected transcription failure".to_string()))
    }
}

/// Returns a fixed reply (`None` fails), recording each call
pub struct StubModel {
    pub text: Option<String>,
    pub calls: Rc<Cell<usize>>,
    pub prompts: Rc<RefCell<Vec<String>>>,
}

impl StubModel {
    pub fn returning(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            calls: Rc::new(Cell::new(0)),
            prompts: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            text: None,
            calls: Rc::new(Cell::new(0)),
            prompts: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

#[async_trait(?Send)]
impl LanguageModel for StubModel {
    async fn reply(&self, prompt: &str) -> Result<String> {
        self.calls.set(self.calls.get() + 1);
        self.prompts.borrow_mut().push(prompt.to_string());

        self.text
            .clone()
            .ok_or_else(|| Error::Inference("injected inference failure".to_string()))
    }
}

/// Records spoken text, or fails on demand
pub struct StubSpeaker {
    pub fail: bool,
    pub spoken: Rc<RefCell<Vec<String>>>,
}

impl StubSpeaker {
    pub fn ok() -> Self {
        Self {
            fail: false,
            spoken: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            spoken: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

#[async_trait(?Send)]
impl Speaker for StubSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        if self.fail {
            return Err(Error::Playback("injected playback failure".to_string()));
        }
        self.spoken.borrow_mut().push(text.to_string());
        Ok(())
    }
}
