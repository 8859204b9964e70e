//! Previously saved structures
//!
//! Saved structures live as one JSON array under the slot
//! [`GALLERY_SLOT`] of a [`KeyValueStore`]. Writes replace the whole slot;
//! there is no locking, so the last writer wins.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, span, Level};

use crate::core::Structure;

/// Slot holding the saved structures
pub const GALLERY_SLOT: &str = "previous-structures";

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Failed to access gallery store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Gallery slot '{slot}' is corrupt: {source}")]
    Corrupt {
        slot: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode gallery: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String values under string keys
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, GalleryError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), GalleryError>;
}

/// Keeps values in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, GalleryError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GalleryError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, GalleryError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(GalleryError::Io { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GalleryError> {
        fs::create_dir_all(&self.dir).map_err(|source| GalleryError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path_for(key);
        fs::write(&path, value).map_err(|source| GalleryError::Io { path, source })
    }
}

/// The saved-structure list
#[derive(Debug, Clone)]
pub struct Gallery<S> {
    store: S,
}

impl<S: KeyValueStore> Gallery<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All saved structures, oldest first. A missing slot is an empty list.
    pub fn load(&self) -> Result<Vec<Structure>, GalleryError> {
        let load_span = span!(Level::DEBUG, "gallery_load", slot = GALLERY_SLOT);
        let _enter = load_span.enter();

        let Some(raw) = self.store.get(GALLERY_SLOT)? else {
            debug!("Gallery slot missing, treating as empty");
            return Ok(Vec::new());
        };
        let structures: Vec<Structure> =
            serde_json::from_str(&raw).map_err(|source| GalleryError::Corrupt {
                slot: GALLERY_SLOT.to_string(),
                source,
            })?;
        debug!(count = structures.len(), "Loaded gallery");
        Ok(structures)
    }

    /// Append `structure` unless an equal one is already saved. Returns
    /// whether it was added.
    pub fn add(&mut self, structure: &Structure) -> Result<bool, GalleryError> {
        let add_span = span!(Level::INFO, "gallery_add", slot = GALLERY_SLOT);
        let _enter = add_span.enter();

        let mut structures = self.load()?;
        if structures.iter().any(|saved| saved == structure) {
            debug!("Structure already in gallery");
            return Ok(false);
        }
        structures.push(structure.clone());
        let raw = serde_json::to_string(&structures)?;
        self.store.set(GALLERY_SLOT, &raw)?;
        info!(count = structures.len(), "Added structure to gallery");
        Ok(true)
    }
}
