//! `sysaudit check`: load a config and print its validation report.

use anyhow::{bail, Result};
use std::path::Path;
use sysaudit_config::{load_raw, process_env, resolve_config, validate, ValidationReport};

use crate::terminal_output::{field_message, note_error, note_success, note_warn};

pub fn run(path: &Path) -> Result<()> {
    let report = check(path)?;

    for warning in &report.warnings {
        note_warn(&field_message(&warning.path, &warning.message));
    }
    for error in &report.errors {
        note_error(&field_message(&error.path, &error.message));
    }

    if !report.is_valid() {
        bail!(
            "{} has {} error(s)",
            path.display(),
            report.errors.len()
        );
    }
    note_success(&format!("{} is valid", path.display()));
    Ok(())
}

/// Load, substitute, and validate. Findings are returned for printing
/// rather than logged.
pub fn check(path: &Path) -> Result<ValidationReport> {
    let raw = load_raw(path)?;
    let config = resolve_config(raw, &process_env())?;
    Ok(validate(&config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_invalid_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "dispatch:\n  failurePolicy: loudly\n").unwrap();
        let report = check(&path).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert!(run(&path).is_err());
    }

    #[test]
    fn missing_file_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let report = check(&dir.path().join("config.yaml")).unwrap();
        assert!(report.is_valid());
    }
}
