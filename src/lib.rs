pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::MigrationConfig;
pub use core::{api_client::HttpApi, engine::MigrationEngine};
pub use utils::error::{MigrateError, Result};
