//! Destinations for exported files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{ColmapError, Result};

use super::exporter::ExportArtifact;

/// Receives exported files.
pub trait DownloadSink: Send + Sync {
    /// Deliver an artifact to the user.
    fn deliver(&self, artifact: &ExportArtifact) -> Result<()>;

    /// Get the name of this sink (for logging).
    fn name(&self) -> &str;
}

/// Writes artifacts into a directory, creating it if needed.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Create a sink for the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an artifact with this name is written to.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| ColmapError::Io {
                path: self.dir.clone(),
                source: e,
            })?;
        }

        let path = self.path_for(&artifact.file_name);
        fs::write(&path, artifact.contents.as_bytes())
            .map_err(|e| ColmapError::Io { path, source: e })
    }

    fn name(&self) -> &str {
        "directory"
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<Vec<ExportArtifact>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Artifacts delivered so far.
    pub fn artifacts(&self) -> Vec<ExportArtifact> {
        self.artifacts
            .lock()
            .map(|a| a.clone())
            .unwrap_or_default()
    }

    /// Most recent artifact.
    pub fn last(&self) -> Option<ExportArtifact> {
        self.artifacts.lock().ok().and_then(|a| a.last().cloned())
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<()> {
        self.artifacts
            .lock()
            .map_err(|_| ColmapError::Config("memory sink lock poisoned".to_string()))?
            .push(artifact.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
