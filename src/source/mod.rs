//! Where payloads come from
//!
//! The scorer itself (embedding model, PageRank over window similarities)
//! lives elsewhere. This crate only ever receives its output, either over
//! HTTP from a `/glance` endpoint or from JSON files it wrote earlier.

#[cfg(feature = "native")]
mod http;

#[cfg(feature = "native")]
pub use http::HttpSource;

use crate::payload::RenderPayload;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("malformed payload: {0}")]
    Decode(String),

    #[error("no scores for {0}")]
    NotFound(String),

    #[error("invalid file identifier: {0}")]
    InvalidIdentifier(String),

    #[error("io error: {0}")]
    Io(String),
}

/// Anything that can produce scored windows for a file.
pub trait LineScoreSource {
    fn fetch_line_scores(&self, file: &str) -> Result<RenderPayload, SourceError>;
}

impl<S: LineScoreSource + ?Sized> LineScoreSource for Box<S> {
    fn fetch_line_scores(&self, file: &str) -> Result<RenderPayload, SourceError> {
        (**self).fetch_line_scores(file)
    }
}

/// Parse a payload body.
pub fn decode_payload(body: &str) -> Result<RenderPayload, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Decode(e.to_string()))
}

/// Read one payload JSON file.
pub fn load_payload<P: AsRef<Path>>(path: P) -> Result<RenderPayload, SourceError> {
    let path = path.as_ref();
    let body = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SourceError::NotFound(path.display().to_string()),
        _ => SourceError::Io(format!("{}: {}", path.display(), e)),
    })?;
    decode_payload(&body)
}

/// Payloads saved as `<root>/<file>.json`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Path the payload for `file` is read from. Only plain relative paths
    /// are accepted.
    pub fn payload_path(&self, file: &str) -> Result<PathBuf, SourceError> {
        let relative = Path::new(file);
        let plain = !file.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(SourceError::InvalidIdentifier(file.to_string()));
        }
        Ok(self.root.join(format!("{}.json", file)))
    }
}

impl LineScoreSource for DirectorySource {
    fn fetch_line_scores(&self, file: &str) -> Result<RenderPayload, SourceError> {
        let path = self.payload_path(file)?;
        debug!(path = %path.display(), "reading payload");
        load_payload(&path).map_err(|e| match e {
            SourceError::NotFound(_) => SourceError::NotFound(file.to_string()),
            other => other,
        })
    }
}

/// Remembers every payload fetched through it, keyed by file identifier.
///
/// Failed fetches are not remembered.
pub struct CachedSource<S> {
    inner: S,
    cache: Mutex<HashMap<String, RenderPayload>>,
}

impl<S: LineScoreSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: LineScoreSource> LineScoreSource for CachedSource<S> {
    fn fetch_line_scores(&self, file: &str) -> Result<RenderPayload, SourceError> {
        if let Ok(cache) = self.cache.lock() {
            if let Some(payload) = cache.get(file) {
                debug!(file, "payload cache hit");
                return Ok(payload.clone());
            }
        }

        let payload = self.inner.fetch_line_scores(file)?;
        info!(file, windows = payload.line_windows.len(), "fetched line scores");

        let mut cache = self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.insert(file.to_string(), payload.clone());
        Ok(payload)
    }
}
