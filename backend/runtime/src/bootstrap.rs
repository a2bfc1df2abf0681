//! Build a ready-to-use auditor from configuration.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sysaudit_config::{config_dir, config_file_path, load_and_prepare, SysauditConfig};
use sysaudit_hooks::Auditor;
use sysaudit_logging::{init_logger, EventLogHook};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// An auditor plus the config it was built from.
///
/// Holds the file logger's flush guard once [`Runtime::init_logging`] ran.
pub struct Runtime {
    auditor: Auditor,
    config: SysauditConfig,
    log_guard: Option<WorkerGuard>,
}

impl Runtime {
    /// Load the config at `path` (or the default location) and build from it.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path: PathBuf = match path {
            Some(p) => p.to_path_buf(),
            None => config_file_path(&config_dir()),
        };
        let config = load_and_prepare(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        Self::from_config(config)
    }

    /// Build an auditor from an already prepared config. Registers the
    /// event-log hook when `logging.logEvents` is set.
    pub fn from_config(config: SysauditConfig) -> Result<Self> {
        let options = config.auditor_options()?;
        let auditor = Auditor::with_options(options);

        let logging = config.logging();
        if logging.log_events.unwrap_or(false) {
            let hook = EventLogHook::new(logging.redact.unwrap_or(true));
            auditor
                .register(Arc::new(hook))
                .context("Failed to register event-log hook")?;
        }

        info!(
            failure_policy = %options.failure_policy,
            announce_registration = options.announce_registration,
            hooks = auditor.hook_count(),
            "Auditor ready"
        );

        Ok(Self {
            auditor,
            config,
            log_guard: None,
        })
    }

    /// Install the global tracing subscriber described by `logging`.
    pub fn init_logging(&mut self) -> Result<()> {
        let logging = self.config.logging();
        let level = logging.level.as_deref().unwrap_or("info");
        self.log_guard = init_logger(level, logging.json.unwrap_or(false), logging.dir.as_deref())?;
        Ok(())
    }

    pub fn auditor(&self) -> &Auditor {
        &self.auditor
    }

    pub fn config(&self) -> &SysauditConfig {
        &self.config
    }

    /// Make this runtime's auditor the process-wide one.
    ///
    /// Returns `false` if a process auditor was already in place.
    pub fn install(&self) -> bool {
        crate::global::install(self.auditor.clone()).is_ok()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("auditor", &self.auditor)
            .field("config", &self.config)
            .field("file_logging", &self.log_guard.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysaudit_config::{prepare_with, DispatchConfig, LoggingConfig};
    use sysaudit_core::FailurePolicy;

    #[test]
    fn default_config_has_no_hooks() {
        let config = prepare_with(serde_json::json!({}), &Default::default()).unwrap();
        let runtime = Runtime::from_config(config).unwrap();
        assert_eq!(runtime.auditor().hook_count(), 0);
        assert_eq!(
            runtime.auditor().options().failure_policy,
            FailurePolicy::Swallow
        );
    }

    #[test]
    fn log_events_registers_event_hook() {
        let config = SysauditConfig {
            logging: Some(LoggingConfig {
                log_events: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let runtime = Runtime::from_config(config).unwrap();
        assert_eq!(runtime.auditor().hook_count(), 1);
        runtime
            .auditor()
            .audit_event("runtime.test", &["password=x".into()])
            .unwrap();
    }

    #[test]
    fn bad_policy_fails_bootstrap() {
        let config = SysauditConfig {
            dispatch: Some(DispatchConfig {
                failure_policy: Some("sometimes".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(Runtime::from_config(config).is_err());
    }

    #[test]
    fn load_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "dispatch:\n  failurePolicy: propagate\n").unwrap();
        let runtime = Runtime::load(Some(&path)).unwrap();
        assert_eq!(
            runtime.auditor().options().failure_policy,
            FailurePolicy::Propagate
        );
    }
}
