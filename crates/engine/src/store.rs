//! Blob stores holding the [`Document`].
//!
//! A store only knows how to read the whole document and overwrite it; it
//! does no locking of its own. The [`Engine`](crate::Engine) serializes access.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use crate::{Document, StoreError};

/// Read-all / write-all access to the persisted document.
pub trait Store: fmt::Debug + Send + Sync {
    /// Loads the document. An absent blob is an empty document.
    fn load(&self) -> Result<Document, StoreError>;

    /// Overwrites the blob with `document`.
    fn save(&self, document: &Document) -> Result<(), StoreError>;
}

impl<S: Store + ?Sized> Store for Arc<S> {
    fn load(&self) -> Result<Document, StoreError> {
        (**self).load()
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        (**self).save(document)
    }
}

/// Document kept in a JSON file on disk.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<Document, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Document::default()),
            Err(err) => return Err(err.into()),
        };
        decode(&raw)
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        let json = encode(document)?;
        write_file(&self.path, &json)?;
        Ok(())
    }
}

/// Document kept in memory as its serialized form, so that tests go through
/// the same encode/decode path as the file store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    /// A store whose blob is `raw`, used to simulate hand-edited or broken
    /// files.
    pub fn with_blob(raw: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(raw.into())),
        }
    }

    /// The current serialized blob, if anything was ever written.
    pub fn blob(&self) -> Option<String> {
        let guard = self.blob.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Document, StoreError> {
        match self.blob() {
            Some(raw) => decode(&raw),
            None => Ok(Document::default()),
        }
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        let json = encode(document)?;
        let mut guard = self.blob.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(json);
        Ok(())
    }
}

fn decode(raw: &str) -> Result<Document, StoreError> {
    serde_json::from_str(raw).map_err(StoreError::Corrupt)
}

fn encode(document: &Document) -> Result<String, StoreError> {
    serde_json::to_string_pretty(document).map_err(StoreError::Encode)
}

fn write_file(path: &Path, json: &str) -> Result<(), io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(&tmp, path)?;
            let _ = fs::remove_file(&tmp);
            Ok(())
        }
    }
}
