//! Whisper model resolution
//!
//! The ggml model binary is the only state Vesper keeps on disk. It is
//! resolved from the cache directory and downloaded on first run.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Resolve a model file by name, downloading it into the cache on a miss
///
/// The download goes to a `.part` file first and is renamed into place only
/// when complete, so an interrupted download never leaves a truncated model
/// in the cache.
///
/// # Errors
///
/// Returns error if the cache directory cannot be created or the download
/// fails
pub async fn resolve_model(name: &str, url: &str, cache_dir: &Path) -> Result<PathBuf> {
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        tracing::debug!(path = %cached_path.display(), "model found in cache");
        return Ok(cached_path);
    }

    fs::create_dir_all(cache_dir)
        .map_err(|e| Error::Transcription(format!("cannot create model cache: {e}")))?;

    tracing::info!(model = name, url, "downloading transcription model (first run)");

    let temp_path = cached_path.with_extension("part");
    let result = download(url, &cached_path, &temp_path).await;

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result?;

    Ok(cached_path)
}

async fn download(url: &str, dest: &Path, temp_path: &Path) -> Result<()> {
    let mut response = reqwest::get(url)
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| Error::Transcription(format!("model download failed for {url}: {e}")))?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let mut file = fs::File::create(temp_path)
        .map_err(|e| Error::Transcription(format!("cannot write {}: {e}", temp_path.display())))?;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::Transcription(format!("model download failed for {url}: {e}")))?
    {
        file.write_all(&chunk)
            .map_err(|e| Error::Transcription(format!("cannot write {}: {e}", temp_path.display())))?;
        downloaded += chunk.len() as u64;
    }

    file.flush()
        .map_err(|e| Error::Transcription(format!("cannot write {}: {e}", temp_path.display())))?;
    drop(file);

    fs::rename(temp_path, dest)
        .map_err(|e| Error::Transcription(format!("cannot write {}: {e}", dest.display())))?;

    tracing::info!(
        path = %dest.display(),
        bytes = downloaded,
        total,
        "model download complete"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_resolve_finds_cached_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("test-model.bin");
        fs::write(&path, b"fake model data").unwrap();

        let resolved = resolve_model("test-model.bin", "http://unused.invalid/", tmp.path())
            .await
            .unwrap();
        assert_eq!(resolved, path);
    }

    #[tokio::test]
    async fn test_download_failure_leaves_no_partial_file() {
        let tmp = TempDir::new().unwrap();

        let result = resolve_model(
            "missing-model.bin",
            "http://invalid.nonexistent.example.com/model.bin",
            tmp.path(),
        )
        .await;

        assert!(result.is_err());
        assert!(!tmp.path().join("missing-model.bin").exists());
        assert!(!tmp.path().join("missing-model.part").exists());
    }
}
