//! Where transcripts come from. Storage is owned by the caller; the engine
//! only ever sees [`TranscriptInput`] values.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{InsightError, Result};
use crate::TranscriptInput;

pub trait TranscriptSource {
    fn fetch(&self, id: &str) -> Result<TranscriptInput>;

    /// Fetch several transcripts, keeping the requested order.
    fn fetch_all(&self, ids: &[String]) -> Result<Vec<TranscriptInput>> {
        ids.iter().map(|id| self.fetch(id)).collect()
    }
}

/// Reads transcripts from plain-text files. The id is the path relative
/// to `root`.
#[derive(Debug, Clone)]
pub struct FsTranscriptSource {
    root: PathBuf,
}

impl FsTranscriptSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TranscriptSource for FsTranscriptSource {
    fn fetch(&self, id: &str) -> Result<TranscriptInput> {
        let text = match std::fs::read_to_string(self.root.join(id)) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(InsightError::TranscriptNotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        debug!(id, bytes = text.len(), "loaded transcript");
        Ok(TranscriptInput::new(id, text))
    }
}
