mod loader;
mod types;
pub mod validation;

pub use loader::{load_config, load_config_from_file, load_config_from_str, load_config_from_file_with_profile, CONFIG_FILE_NAME};
pub use types::*;

use crate::foundation::LedgerError;
use std::path::Path;

/// Loads and validates the client configuration at `path`.
pub fn load_client_config(path: &Path) -> Result<ClientConfig, LedgerError> {
    let config = load_config_from_file(path)?;
    config.validate().map_err(|errors| LedgerError::ConfigError(format!("validation failed: {:?}", errors)))?;
    Ok(config)
}
