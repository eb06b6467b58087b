pub mod cli;
pub mod migration_config;

pub use migration_config::{DatasetConfig, MigrationConfig};

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "quiz-migrate")]
#[command(about = "Upload local user and question JSON files to the quiz backend API")]
pub struct CliConfig {
    /// Path to the migration TOML configuration file
    #[arg(short, long, default_value = "migration.toml")]
    pub config: String,

    /// Directory that source JSON files are resolved against
    #[arg(long, default_value = ".")]
    pub data_dir: String,

    /// Migrate only the named dataset (default: all enabled datasets in order)
    #[arg(long)]
    pub only: Option<String>,

    /// Show what would be migrated without sending any requests
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log system resource usage during the run
    #[arg(long)]
    pub monitor: bool,
}
