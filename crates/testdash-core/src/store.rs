use crate::error::{DashError, Result};
use crate::io::atomic_write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Durable home of the registry document.
///
/// The document is opaque text here: callers serialize through
/// [`crate::registry::Registry`], and `read` hands back exactly what was stored.
pub trait RegistryStore: Send + Sync {
    fn exists(&self) -> bool;
    fn read(&self) -> Result<String>;
    fn write(&self, document: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// FileStore
// ---------------------------------------------------------------------------

/// Registry persisted as a single JSON file, replaced atomically on write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistryStore for FileStore {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn read(&self) -> Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Ok(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DashError::FileNotFound(
                self.path.display().to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, document: &str) -> Result<()> {
        atomic_write(&self.path, document.as_bytes())
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process store for tests and embedding. Counts writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(document.into())),
            writes: AtomicUsize::new(0),
        }
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl RegistryStore for MemoryStore {
    fn exists(&self) -> bool {
        self.document
            .lock()
            .map(|doc| doc.is_some())
            .unwrap_or(false)
    }

    fn read(&self) -> Result<String> {
        let doc = self
            .document
            .lock()
            .map_err(|_| std::io::Error::other("registry lock poisoned"))?;
        doc.clone()
            .ok_or_else(|| DashError::FileNotFound("in-memory registry".into()))
    }

    fn write(&self, document: &str) -> Result<()> {
        let mut doc = self
            .document
            .lock()
            .map_err(|_| std::io::Error::other("registry lock poisoned"))?;
        *doc = Some(document.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trips_document_verbatim() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("test-registry.json"));
        assert!(!store.exists());

        let doc = "{\n  \"custom\": [],\n  \"extra\": {\"kept\": true}\n}";
        store.write(doc).unwrap();

        assert!(store.exists());
        assert_eq!(store.read().unwrap(), doc);
    }

    #[test]
    fn file_store_read_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        assert!(matches!(store.read(), Err(DashError::FileNotFound(_))));
    }

    #[test]
    fn file_store_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("test-registry.json"));
        store.write("{\"old\": []}").unwrap();
        store.write("{}").unwrap();
        assert_eq!(store.read().unwrap(), "{}");
    }

    #[test]
    fn memory_store_counts_writes() {
        let store = MemoryStore::new();
        assert!(!store.exists());
        store.write("{}").unwrap();
        store.write("{\"a\": []}").unwrap();
        assert!(store.exists());
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.read().unwrap(), "{\"a\": []}");
    }

    #[test]
    fn memory_store_with_document_starts_populated() {
        let store = MemoryStore::with_document("{}");
        assert!(store.exists());
        assert_eq!(store.write_count(), 0);
    }
}
