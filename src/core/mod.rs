pub mod catalog;
pub mod memory;
pub mod registry;

pub use crate::domain::model::{Catalog, Doctor, DoctorKey, DoctorUpdate, Patient};
pub use crate::domain::ports::{CatalogStore, ConfigProvider};
pub use crate::utils::error::Result;
