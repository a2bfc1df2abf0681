//! `sysaudit emit`: report a single event through a configured auditor.

use anyhow::{Context, Result};
use std::path::Path;
use sysaudit::{AuditValue, Runtime};
use sysaudit_config::{load_and_prepare, LoggingConfig};

/// Bootstraps from the config at `path` with the event-log hook forced on,
/// then audits `event` with `args`.
pub fn run(path: &Path, event: &str, args: &[String]) -> Result<()> {
    let mut config = load_and_prepare(path)?;
    config
        .logging
        .get_or_insert_with(LoggingConfig::default)
        .log_events = Some(true);

    let mut runtime = Runtime::from_config(config)?;
    runtime.init_logging()?;

    let values: Vec<AuditValue> = args.iter().map(|a| parse_arg(a)).collect();
    runtime
        .auditor()
        .audit_event(event, &values)
        .with_context(|| format!("Failed to audit event '{event}'"))?;

    tracing::info!(event, hooks = runtime.auditor().hook_count(), "Event emitted");
    Ok(())
}

/// Interpret a command-line argument as int, float, bool, `none`, or text.
pub fn parse_arg(raw: &str) -> AuditValue {
    if let Ok(i) = raw.parse::<i64>() {
        return AuditValue::Int(i);
    }
    if let Ok(x) = raw.parse::<f64>() {
        if x.is_finite() {
            return AuditValue::Float(x);
        }
    }
    match raw {
        "true" => AuditValue::Bool(true),
        "false" => AuditValue::Bool(false),
        "none" => AuditValue::None,
        _ => AuditValue::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalars() {
        assert_eq!(parse_arg("42"), AuditValue::Int(42));
        assert_eq!(parse_arg("-1.5"), AuditValue::Float(-1.5));
        assert_eq!(parse_arg("true"), AuditValue::Bool(true));
        assert_eq!(parse_arg("none"), AuditValue::None);
    }

    #[test]
    fn everything_else_is_text() {
        assert_eq!(parse_arg("/etc/passwd"), AuditValue::from("/etc/passwd"));
        assert_eq!(parse_arg("inf"), AuditValue::from("inf"));
        assert_eq!(parse_arg("True"), AuditValue::from("True"));
    }

    #[test]
    fn emits_with_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        run(&path, "cli.test", &["1".into(), "x".into()]).unwrap();
    }
}
