use crate::domain::model::Catalog;
use crate::domain::ports::CatalogStore;
use crate::utils::error::{ClinicError, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// In-memory store for development/testing
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    catalog: Arc<Mutex<Catalog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
        }
    }

    fn poisoned() -> ClinicError {
        ClinicError::StorageError {
            message: "in-memory catalog lock poisoned".to_string(),
        }
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn load(&self) -> Result<Catalog> {
        let catalog = self.catalog.lock().map_err(|_| Self::poisoned())?;
        Ok(catalog.clone())
    }

    async fn save(&self, catalog: &Catalog) -> Result<()> {
        let mut stored = self.catalog.lock().map_err(|_| Self::poisoned())?;
        *stored = catalog.clone();
        debug!("Stored {} doctors in memory", stored.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::sample_catalog;

    #[test]
    fn test_empty_by_default() {
        let store = MemoryStore::new();
        let catalog = tokio_test::block_on(store.load()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let catalog = sample_catalog(4);

        tokio_test::block_on(store.save(&catalog)).unwrap();

        assert_eq!(tokio_test::block_on(store.load()).unwrap(), catalog);
    }
}
