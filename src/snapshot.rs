//! Thread snapshot persistence through an injected blob store.
//!
//! The client never owns persistence mechanics. It serializes its threads
//! into a versioned snapshot and hands the bytes to whatever [`BlobStore`]
//! was injected: a directory on disk in the CLI, an in-memory map in tests.

use crate::threads::ThreadMessage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Blob key under which the thread snapshot is stored.
pub const SNAPSHOT_KEY: &str = "threads";

/// Snapshot persistence errors.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot encoding failed: {0}")]
    Encode(String),

    #[error("Snapshot decoding failed: {0}")]
    Decode(String),

    #[error("Unsupported snapshot version {0}")]
    UnsupportedVersion(u32),

    #[error("Blob store error: {0}")]
    Store(#[from] io::Error),
}

/// Versioned snapshot of the thread registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub threads: HashMap<String, Vec<ThreadMessage>>,
}

impl Snapshot {
    pub fn new(threads: HashMap<String, Vec<ThreadMessage>>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            threads,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        serde_json::to_vec(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Snapshot =
            serde_json::from_slice(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }
}

/// Injected blob storage capability.
pub trait BlobStore: Send + Sync {
    /// Read a blob; `None` when the key has never been written.
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Write a blob, replacing any previous value.
    fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Load the persisted thread map, if one exists.
pub fn load_threads(
    store: &dyn BlobStore,
) -> Result<Option<HashMap<String, Vec<ThreadMessage>>>, SnapshotError> {
    match store.get(SNAPSHOT_KEY)? {
        Some(bytes) => {
            let snapshot = Snapshot::from_bytes(&bytes)?;
            Ok(Some(snapshot.threads))
        }
        None => Ok(None),
    }
}

/// Persist the thread map as the current snapshot.
pub fn save_threads(
    store: &dyn BlobStore,
    threads: HashMap<String, Vec<ThreadMessage>>,
) -> Result<(), SnapshotError> {
    let bytes = Snapshot::new(threads).to_bytes()?;
    store.put(SNAPSHOT_KEY, &bytes)?;
    Ok(())
}

/// Blob store backed by one JSON file per key inside a directory.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl BlobStore for FsBlobStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.blob_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.blob_path(key), bytes)
    }
}

/// In-memory blob store for tests. Clones share the same storage.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.blobs.lock().unwrap().get(key).cloned())
    }

    fn put(&self, key: &str, bytes: &[u8]) -> io::Result<()> {
        self.blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
