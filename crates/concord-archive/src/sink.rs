//! Storage sinks for canonical bundles
//!
//! A sink stores bytes and hands back a content identifier. Sinks are
//! content-addressed: storing the same bytes twice yields the same id.

use crate::{content_hash, ArchiveError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Identifier returned by a sink
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for storing canonical bundles
///
/// Implemented by in-memory and filesystem sinks here; other backends
/// (object stores, IPFS gateways) implement it outside Concord.
pub trait EvidenceSink {
    /// Error type for sink operations
    type Error: fmt::Display;

    /// Store bytes, returning their content id
    fn store(&mut self, bytes: &[u8]) -> Result<ContentId, Self::Error>;

    /// Load previously stored bytes
    fn load(&self, id: &ContentId) -> Result<Option<Vec<u8>>, Self::Error>;
}

/// Sink that keeps bundles in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: BTreeMap<ContentId, Vec<u8>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored bundles
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EvidenceSink for MemorySink {
    type Error = Infallible;

    fn store(&mut self, bytes: &[u8]) -> Result<ContentId, Self::Error> {
        let id = ContentId::new(format!("memory:{}", content_hash(bytes)));
        self.entries.insert(id.clone(), bytes.to_vec());
        Ok(id)
    }

    fn load(&self, id: &ContentId) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.entries.get(id).cloned())
    }
}

/// Sink that writes each bundle to `<dir>/<sha256>.json`
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Use `root`, creating it if needed
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ArchiveError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory bundles are written to
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &ContentId) -> Option<PathBuf> {
        let name = id.as_str();
        let valid = name.len() == 64 && name.bytes().all(|b| b.is_ascii_hexdigit());
        valid.then(|| self.root.join(format!("{}.json", name)))
    }
}

impl EvidenceSink for DirectorySink {
    type Error = ArchiveError;

    fn store(&mut self, bytes: &[u8]) -> Result<ContentId, Self::Error> {
        let id = ContentId::new(content_hash(bytes));
        let path = self
            .path_for(&id)
            .ok_or_else(|| ArchiveError::Sink(format!("invalid content id {}", id)))?;
        if !path.exists() {
            fs::write(&path, bytes)?;
        }
        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored bundle");
        Ok(id)
    }

    fn load(&self, id: &ContentId) -> Result<Option<Vec<u8>>, Self::Error> {
        let Some(path) = self.path_for(id) else {
            return Ok(None);
        };
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
