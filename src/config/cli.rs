use crate::core::{Catalog, CatalogStore};
use crate::utils::error::{ClinicError, Result};
use async_trait::async_trait;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Catalog persisted as one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

#[async_trait]
impl CatalogStore for JsonFileStore {
    async fn load(&self) -> Result<Catalog> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No catalog at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let catalog: Catalog = serde_json::from_slice(&data)?;
        Ok(catalog)
    }

    async fn save(&self, catalog: &Catalog) -> Result<()> {
        let parent = self.parent_dir();
        fs::create_dir_all(parent)?;

        let data = serde_json::to_vec_pretty(catalog)?;

        // 寫入同目錄的暫存檔後再換名，避免留下寫到一半的檔案
        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| ClinicError::StorageError {
            message: format!("failed to replace {}: {}", self.path.display(), e.error),
        })?;

        tracing::debug!("Saved {} doctors to {}", catalog.len(), self.path.display());
        Ok(())
    }
}
