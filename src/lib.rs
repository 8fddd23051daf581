pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::{cli::JsonFileStore, toml_config::RegistryConfig};
pub use core::{memory::MemoryStore, registry::Registry};
pub use utils::error::{ClinicError, Result};
