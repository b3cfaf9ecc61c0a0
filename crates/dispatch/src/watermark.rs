//! Persistence of the newest processed mention id.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::DispatchError;

/// Stores the watermark between runs.
pub trait WatermarkStore: Send + Sync {
    /// The saved id, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, DispatchError>;
    fn save(&self, id: &str) -> Result<(), DispatchError>;
}

/// Watermark kept in a plain text file.
#[derive(Debug, Clone)]
pub struct FileWatermarkStore {
    path: PathBuf,
}

impl FileWatermarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WatermarkStore for FileWatermarkStore {
    fn load(&self) -> Result<Option<String>, DispatchError> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => {
                let id = s.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, id: &str) -> Result<(), DispatchError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, id)?;
        Ok(())
    }
}

/// In-memory watermark.
#[derive(Debug, Default)]
pub struct MemoryWatermarkStore {
    id: Mutex<Option<String>>,
}

impl MemoryWatermarkStore {
    pub fn new(initial: Option<String>) -> Self {
        Self {
            id: Mutex::new(initial),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.id.lock().ok().and_then(|id| id.clone())
    }
}

impl WatermarkStore for MemoryWatermarkStore {
    fn load(&self) -> Result<Option<String>, DispatchError> {
        Ok(self.get())
    }

    fn save(&self, id: &str) -> Result<(), DispatchError> {
        if let Ok(mut guard) = self.id.lock() {
            *guard = Some(id.to_string());
        }
        Ok(())
    }
}

/// Orders decimal ids numerically. Ids are compared by length first, so
/// no width limit applies; leading zeros are not expected.
pub(crate) fn compare_ids(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// The numerically greatest of `ids`.
pub fn newest_id<'a>(ids: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    ids.into_iter().max_by(|a, b| compare_ids(a, b))
}
