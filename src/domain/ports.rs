use crate::domain::model::Catalog;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Whole-collection persistence. `load` on a store with nothing persisted yet
/// returns an empty catalog; `save` replaces everything.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn load(&self) -> Result<Catalog>;
    async fn save(&self, catalog: &Catalog) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn storage_path(&self) -> &str;
    fn host(&self) -> &str;
    fn port(&self) -> u16;
    fn cors_origins(&self) -> &[String];
}
