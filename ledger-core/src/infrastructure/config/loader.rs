//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Profile overrides from `[profiles.<name>]`
//! 4. Environment variables (LEDGER_* prefix)

use crate::foundation::LedgerError;
use crate::infrastructure::config::types::ClientConfig;
use crate::infrastructure::rpc::logged::redact_address;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::value::Dict;
use figment::{Figment, Profile};
use log::{debug, info};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "ledger-config.toml";

/// Environment variable prefix for config overrides.
///
/// Example: `LEDGER_EXECUTION__MAX_ATTEMPTS` -> `execution.max_attempts`
const ENV_PREFIX: &str = "LEDGER_";

/// Load configuration from the default file in `data_dir` (`ledger-config.toml`).
pub fn load_config(data_dir: &Path) -> Result<ClientConfig, LedgerError> {
    load_config_from_file(&data_dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from a specific file path.
pub fn load_config_from_file(path: &Path) -> Result<ClientConfig, LedgerError> {
    info!("loading configuration path={}", path.display());
    let figment = figment_base(path).merge(Env::prefixed(ENV_PREFIX).split("__"));
    let config: ClientConfig = figment.extract().map_err(|e| LedgerError::ConfigError(format!("config extraction failed: {e}")))?;
    log_loaded(&config, None);
    Ok(config)
}

/// Load configuration from a specific file path with profile overrides.
pub fn load_config_from_file_with_profile(path: &Path, profile: &str) -> Result<ClientConfig, LedgerError> {
    info!("loading configuration with profile path={} profile={}", path.display(), profile);

    // Extract once to access `profiles.<name>` overrides from the file.
    let base: ClientConfig =
        figment_base(path).extract().map_err(|e| LedgerError::ConfigError(format!("config extraction failed: {e}")))?;
    let overrides = profile_overrides(&base, profile)?;

    let figment = figment_base(path).merge(Serialized::from(overrides, Profile::Default)).merge(Env::prefixed(ENV_PREFIX).split("__"));
    let config: ClientConfig = figment
        .extract()
        .map_err(|e| LedgerError::ConfigError(format!("config extraction failed for profile '{profile}': {e}")))?;
    log_loaded(&config, Some(profile));
    Ok(config)
}

/// Parse a TOML document held in memory. No environment overrides are applied.
pub fn load_config_from_str(contents: &str) -> Result<ClientConfig, LedgerError> {
    let config: ClientConfig = toml::from_str(contents)?;
    log_loaded(&config, None);
    Ok(config)
}

fn figment_base(path: &Path) -> Figment {
    let mut figment = Figment::new().merge(Serialized::defaults(ClientConfig::default()));
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    } else {
        debug!("configuration file missing; using defaults and env only path={}", path.display());
    }
    figment
}

fn profile_overrides(config: &ClientConfig, profile: &str) -> Result<Dict, LedgerError> {
    let profiles = config.profiles.as_ref().ok_or_else(|| LedgerError::ConfigError("no profiles section in config".to_string()))?;
    profiles.get(profile).cloned().ok_or_else(|| LedgerError::ConfigError(format!("profile '{profile}' not found in config")))
}

fn log_loaded(config: &ClientConfig, profile: Option<&str>) {
    let addresses: Vec<String> = config.network.iter().map(|entry| redact_address(&entry.address)).collect();
    debug!(
        "configuration loaded profile={} nodes={:?} operator={} max_attempts={}",
        profile.unwrap_or("default"),
        addresses,
        config.operator.as_ref().map(|op| op.account_id.as_str()).unwrap_or("none"),
        config.execution.max_attempts
    );
}
