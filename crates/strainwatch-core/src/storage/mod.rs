mod config;
pub mod database;
mod store;
pub mod writer;

pub use config::{Config, PersistenceConfig};
pub use database::Database;
pub use store::{FatigueSnapshot, FatigueStore, UsageRecord};
pub use writer::{PersistenceWriter, WriteOp};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/strainwatch[-dev]/` based on STRAINWATCH_ENV.
///
/// Set STRAINWATCH_ENV=dev to use development data directory.
/// STRAINWATCH_DATA_DIR overrides both.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("STRAINWATCH_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("STRAINWATCH_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("strainwatch-dev")
            } else {
                base_dir.join("strainwatch")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
