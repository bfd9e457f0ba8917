//! Recording artifact lifecycle
//!
//! Each turn records into exactly one temporary WAV file. The file is created
//! when capture starts, handed to transcription, and deleted unconditionally
//! when the turn ends, whatever happened in between.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::{Error, Result};

/// Allocates and tracks the per-turn recording artifact.
///
/// Backing files live in a process-scoped temporary directory that is removed
/// when the store is dropped. At most one artifact may be live at a time;
/// creating a second before the first is released is an error.
pub struct ArtifactStore {
    dir: tempfile::TempDir,
    live: Arc<AtomicBool>,
    counter: AtomicU64,
}

impl ArtifactStore {
    /// Create a new store backed by a fresh temporary directory
    ///
    /// # Errors
    ///
    /// Returns error if the temporary directory cannot be created
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("vesper-")
            .tempdir()
            .map_err(|e| Error::Artifact(format!("cannot create artifact directory: {e}")))?;

        tracing::debug!(path = %dir.path().display(), "artifact store initialized");

        Ok(Self {
            dir,
            live: Arc::new(AtomicBool::new(false)),
            counter: AtomicU64::new(0),
        })
    }

    /// Directory holding artifact backing files
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Allocate the artifact for one turn and write its WAV header
    ///
    /// # Errors
    ///
    /// Returns error if an artifact is already live or the backing file
    /// cannot be created
    pub fn create(&self, channels: u16, sample_rate: u32) -> Result<AudioArtifact> {
        if self.live.swap(true, Ordering::SeqCst) {
            return Err(Error::Artifact(
                "previous turn's artifact has not been released".to_string(),
            ));
        }

        let turn = self.counter.fetch_add(1, Ordering::SeqCst);
        let path = self.dir.path().join(format!("turn-{turn}.wav"));

        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let writer = WavWriter::create(&path, spec).map_err(|e| {
            self.live.store(false, Ordering::SeqCst);
            Error::Artifact(format!("cannot create {}: {e}", path.display()))
        })?;

        tracing::debug!(path = %path.display(), channels, sample_rate, "artifact created");

        Ok(AudioArtifact {
            path,
            writer: Some(writer),
            live: Arc::clone(&self.live),
            released: false,
        })
    }
}

/// One turn's temporary audio recording
///
/// Owned exclusively by the turn controller for the duration of a turn.
/// `release` is idempotent and also runs on drop, so the backing file never
/// outlives the turn even on a non-local exit.
pub struct AudioArtifact {
    path: PathBuf,
    writer: Option<WavWriter<BufWriter<fs::File>>>,
    live: Arc<AtomicBool>,
    released: bool,
}

impl AudioArtifact {
    /// Path to the backing WAV file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append raw 16-bit samples
    ///
    /// # Errors
    ///
    /// Returns error if the artifact was already finalized or the write fails
    pub fn write(&mut self, samples: &[i16]) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| Error::Artifact("artifact is already finalized".to_string()))?;

        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| Error::Artifact(format!("write failed: {e}")))?;
        }
        Ok(())
    }

    /// Complete the container header so readers see a valid file
    ///
    /// # Errors
    ///
    /// Returns error if the header cannot be written
    pub fn finalize(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer
                .finalize()
                .map_err(|e| Error::Artifact(format!("finalize failed: {e}")))?;
        }
        Ok(())
    }

    /// Delete the backing file
    ///
    /// Idempotent: releasing twice, or releasing after the file has already
    /// disappeared, succeeds.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be removed
    pub fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }

        // An unfinalized writer still holds the file open; hound completes
        // the header on drop.
        drop(self.writer.take());

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(Error::Artifact(format!(
                    "cannot delete {}: {e}",
                    self.path.display()
                )));
            }
        }

        self.released = true;
        self.live.store(false, Ordering::SeqCst);
        tracing::debug!(path = %self.path.display(), "artifact released");
        Ok(())
    }
}

impl Drop for AudioArtifact {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.release() {
            tracing::warn!(error = %e, "artifact cleanup on drop failed");
        }
    }
}
