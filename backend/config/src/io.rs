//! Config file read/write.

use crate::schema::SysauditConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the sysaudit config directory.
/// Priority: `SYSAUDIT_CONFIG_DIR` env > `~/.sysaudit/` > `./.sysaudit`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SYSAUDIT_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".sysaudit"),
        None => PathBuf::from(".sysaudit"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read the config file as an untyped JSON tree, ready for env substitution.
///
/// A missing or empty file yields an empty object.
pub fn load_raw(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(match value {
        Value::Null => Value::Object(Default::default()),
        other => other,
    })
}

/// Load and parse the config without env substitution or defaults.
pub fn load_config(path: &Path) -> Result<SysauditConfig> {
    let value = load_raw(path)?;
    serde_json::from_value(value)
        .with_context(|| format!("Invalid config structure in: {}", path.display()))
}

/// Write config to disk atomically (write to temp file, rename).
///
/// The previous file, if any, is kept as `config.yaml.bak`.
pub fn write_config(config: &SysauditConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory: {}", parent.display())
        })?;
    }

    if path.exists() {
        let bak = path.with_extension("yaml.bak");
        if let Err(e) = fs::copy(path, &bak) {
            warn!("Failed to create backup {}: {}", bak.display(), e);
        }
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    let tmp_path = path.with_extension("yaml.tmp");
    fs::write(&tmp_path, yaml.as_bytes())
        .with_context(|| format!("Failed to write temp config: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("Failed to rename temp config to: {}", path.display()))?;

    info!(path = %path.display(), "Wrote config");
    Ok(())
}
