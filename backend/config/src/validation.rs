//! Config validation: field checks with user-friendly messages.

use crate::schema::SysauditConfig;
use sysaudit_core::FailurePolicy;
use thiserror::Error;

const LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// Errors and warnings found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &SysauditConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_dispatch(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_dispatch(config: &SysauditConfig, report: &mut ValidationReport) {
    let Some(dispatch) = &config.dispatch else { return };
    if let Some(policy) = &dispatch.failure_policy {
        if let Err(e) = policy.parse::<FailurePolicy>() {
            report.error("dispatch.failurePolicy", e);
        }
    }
}

fn validate_logging(config: &SysauditConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };

    if let Some(level) = &logging.level {
        for directive in level.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            // "target=level"; a bare word is either a level or a target
            let Some((_, lvl)) = directive.rsplit_once('=') else {
                continue;
            };
            if !LEVELS.contains(&lvl.trim().to_ascii_lowercase().as_str()) {
                report.error(
                    "logging.level",
                    format!("Unknown level '{lvl}' in directive '{directive}'"),
                );
            }
        }
    }

    if let Some(dir) = &logging.dir {
        if dir.exists() && !dir.is_dir() {
            report.error("logging.dir", format!("{} is not a directory", dir.display()));
        } else if !dir.exists() {
            report.warn(
                "logging.dir",
                format!("{} does not exist yet; it will be created", dir.display()),
            );
        }
    }

    if logging.log_events == Some(true) && logging.redact == Some(false) {
        report.warn(
            "logging.redact",
            "Event arguments will be logged without redaction",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DispatchConfig, LoggingConfig};

    #[test]
    fn default_config_is_valid() {
        let report = validate(&crate::defaults::apply_all_defaults(SysauditConfig::default()));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn rejects_unknown_policy() {
        let cfg = SysauditConfig {
            dispatch: Some(DispatchConfig {
                failure_policy: Some("ignore".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "dispatch.failurePolicy");
    }

    #[test]
    fn accepts_target_directives() {
        let cfg = SysauditConfig {
            logging: Some(LoggingConfig {
                level: Some("sysaudit_hooks=debug, warn".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(validate(&cfg).is_valid());
    }

    #[test]
    fn accepts_bare_target_directive() {
        let cfg = SysauditConfig {
            logging: Some(LoggingConfig {
                level: Some("sysaudit_hooks,info".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(validate(&cfg).is_valid());
    }

    #[test]
    fn rejects_unknown_level() {
        let cfg = SysauditConfig {
            logging: Some(LoggingConfig {
                level: Some("sysaudit=loud".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.errors[0].message.contains("loud"));
    }

    #[test]
    fn warns_on_unredacted_event_logging() {
        let cfg = SysauditConfig {
            logging: Some(LoggingConfig {
                log_events: Some(true),
                redact: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn log_dir_must_be_a_directory() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let cfg = SysauditConfig {
            logging: Some(LoggingConfig {
                dir: Some(file.path().to_path_buf()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(!validate(&cfg).is_valid());
    }
}
