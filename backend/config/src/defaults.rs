//! Config defaults: fills every unset field after loading.

use crate::schema::{DispatchConfig, LoggingConfig, SysauditConfig};

/// Default tracing filter directive.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: SysauditConfig) -> SysauditConfig {
    let config = apply_dispatch_defaults(config);
    apply_logging_defaults(config)
}

/// Hook failures are swallowed and registration is silent unless configured.
fn apply_dispatch_defaults(mut config: SysauditConfig) -> SysauditConfig {
    let dispatch = config.dispatch.get_or_insert_with(DispatchConfig::default);
    if dispatch.failure_policy.is_none() {
        dispatch.failure_policy = Some("swallow".to_string());
    }
    if dispatch.announce_registration.is_none() {
        dispatch.announce_registration = Some(false);
    }
    config
}

fn apply_logging_defaults(mut config: SysauditConfig) -> SysauditConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    logging.json.get_or_insert(false);
    logging.log_events.get_or_insert(false);
    logging.redact.get_or_insert(true);
    config
}
