//! `sysaudit-config`: configuration for the sysaudit auditing facility.
//!
//! Provides:
//! - Typed config schema (dispatch policy, logging)
//! - YAML read/write
//! - `${ENV_VAR}` substitution and `SYSAUDIT_*` overrides
//! - Default value application
//! - Validation

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{
    apply_env_overrides, process_env, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError,
};
pub use io::{config_dir, config_file_path, load_config, load_raw, write_config};
pub use schema::{DispatchConfig, LoggingConfig, SysauditConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load a config file, substitute env vars, apply overrides and defaults.
///
/// This is the main entry point for loading a config at runtime.
pub fn load_and_prepare(path: &Path) -> Result<SysauditConfig> {
    let raw = load_raw(path)?;
    prepare_with(raw, &process_env())
}

/// The processing pipeline of [`load_and_prepare`] against an explicit
/// environment. Validation findings are logged, not returned.
pub fn prepare_with(raw: Value, env: &HashMap<String, String>) -> Result<SysauditConfig> {
    let config = resolve_config(raw, env)?;

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }

    Ok(config)
}

/// Substitution, overrides and defaults without validation or logging.
pub fn resolve_config(raw: Value, env: &HashMap<String, String>) -> Result<SysauditConfig> {
    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;

    let config: SysauditConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config, env);
    Ok(apply_all_defaults(config))
}
