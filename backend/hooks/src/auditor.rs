//! The auditor: public surface of the auditing facility.
//!
//! Callers:
//! 1. Security tooling registers hooks → `auditor.addaudithook(...)` / `register(...)`
//! 2. Host code reports a sensitive operation → `auditor.audit(...)` / `audit!(...)`
//! 3. Every registered hook sees `(event, args)` in registration order, in the
//!    calling thread, until one of them fails.
//!
//! An `Auditor` is a cheap handle; clones share one registry.
use std::sync::Arc;

use sysaudit_core::{
    AuditError, AuditHook, AuditValue, AuditorOptions, EventArgs, FailurePolicy, HookFailure,
    REGISTRATION_EVENT,
};
use tracing::{debug, warn};

use crate::registry::HookRegistry;

/// How one pass over the hook chain ended.
#[derive(Debug)]
enum DispatchOutcome {
    Completed,
    Halted {
        position: usize,
        hook: String,
        failure: HookFailure,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Auditor {
    registry: HookRegistry,
    options: AuditorOptions,
}

impl Auditor {
    /// Empty auditor with the default (swallowing) failure policy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AuditorOptions) -> Self {
        Self {
            registry: HookRegistry::new(),
            options,
        }
    }

    pub fn options(&self) -> AuditorOptions {
        self.options
    }

    pub fn registry(&self) -> &HookRegistry {
        &self.registry
    }

    pub fn hook_count(&self) -> usize {
        self.registry.len()
    }

    /// `audit(event, *args)` with positional, loosely typed arguments.
    ///
    /// The first value must be the event name. Under the default policy this
    /// returns `Ok(())` even if a hook failed and cut the dispatch short.
    pub fn audit(&self, args: &[AuditValue]) -> Result<(), AuditError> {
        let (event, rest) = args
            .split_first()
            .ok_or(AuditError::MissingArgument("event"))?;
        let event = event
            .as_str()
            .ok_or_else(|| AuditError::invalid_type("event", "str", event.type_name()))?;
        self.audit_event(event, rest)
    }

    /// Typed entry point: the event name is already known to be text.
    pub fn audit_event(&self, event: &str, args: &[AuditValue]) -> Result<(), AuditError> {
        let args = EventArgs::try_from_slice(args)?;
        match self.run_hooks(event, &args)? {
            DispatchOutcome::Completed => Ok(()),
            DispatchOutcome::Halted {
                position,
                hook,
                failure,
            } => match self.options.failure_policy {
                FailurePolicy::Swallow => {
                    warn!(
                        event,
                        hook = %hook,
                        position,
                        error = %failure,
                        "[Audit] Hook failed; remaining hooks skipped"
                    );
                    Ok(())
                }
                FailurePolicy::Propagate => Err(AuditError::HookFailed {
                    event: event.to_string(),
                    hook,
                    source: failure,
                }),
            },
        }
    }

    /// `addaudithook(hook)`. The value is appended as-is; a value that is not
    /// a hook only fails once a dispatch reaches it.
    pub fn addaudithook(&self, args: &[AuditValue]) -> Result<(), AuditError> {
        let hook = args.first().ok_or(AuditError::MissingArgument("hook"))?;
        self.add_entry(hook.clone())
    }

    /// Typed registration of a known hook.
    pub fn register(&self, hook: Arc<dyn AuditHook>) -> Result<(), AuditError> {
        self.add_entry(AuditValue::Hook(hook))
    }

    fn add_entry(&self, hook: AuditValue) -> Result<(), AuditError> {
        if self.options.announce_registration {
            let outcome = self.run_hooks(REGISTRATION_EVENT, &EventArgs::empty())?;
            if let DispatchOutcome::Halted {
                hook: vetoed_by,
                failure,
                ..
            } = outcome
            {
                debug!(
                    vetoed_by = %vetoed_by,
                    error = %failure,
                    "[Audit] Registration vetoed by existing hook"
                );
                return Ok(());
            }
        }
        self.registry.append(hook)
    }

    fn run_hooks(&self, event: &str, args: &EventArgs) -> Result<DispatchOutcome, AuditError> {
        let hooks = self.registry.snapshot()?;
        debug!(event, hooks = hooks.len(), "[Audit] Dispatching");

        for (position, entry) in hooks.iter().enumerate() {
            let Some(hook) = entry.as_hook() else {
                return Ok(DispatchOutcome::Halted {
                    position,
                    hook: format!("<{}>", entry.type_name()),
                    failure: HookFailure::NotCallable {
                        type_name: entry.type_name().to_string(),
                    },
                });
            };
            if let Err(failure) = hook.call(event, args) {
                return Ok(DispatchOutcome::Halted {
                    position,
                    hook: hook.name().to_string(),
                    failure,
                });
            }
        }
        Ok(DispatchOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use sysaudit_core::hook_fn;

    type Log = Arc<Mutex<Vec<(String, String, EventArgs)>>>;

    fn recorder(label: &str, log: &Log) -> Arc<dyn AuditHook> {
        let label = label.to_string();
        let log = Arc::clone(log);
        hook_fn(label.clone(), move |event, args| {
            log.lock()
                .unwrap()
                .push((label.clone(), event.to_string(), args.clone()));
            Ok(())
        })
    }

    fn failing(label: &str, log: &Log) -> Arc<dyn AuditHook> {
        let label = label.to_string();
        let log = Arc::clone(log);
        hook_fn(label.clone(), move |event, args| {
            log.lock()
                .unwrap()
                .push((label.clone(), event.to_string(), args.clone()));
            Err(HookFailure::rejected(format!("{label} refuses {event}")))
        })
    }

    fn labels(log: &Log) -> Vec<String> {
        log.lock().unwrap().iter().map(|(l, _, _)| l.clone()).collect()
    }

    fn s(v: &str) -> AuditValue {
        AuditValue::from(v)
    }

    #[test]
    fn all_hooks_run_in_registration_order() {
        let auditor = Auditor::new();
        let log = Log::default();
        for label in ["h0", "h1", "h2", "h3"] {
            auditor.register(recorder(label, &log)).unwrap();
        }
        auditor
            .audit(&[s("test_event"), AuditValue::from(1), AuditValue::from(2)])
            .unwrap();

        let entries = log.lock().unwrap().clone();
        assert_eq!(labels(&log), vec!["h0", "h1", "h2", "h3"]);
        for (_, event, args) in entries {
            assert_eq!(event, "test_event");
            assert_eq!(args.as_slice(), &[AuditValue::from(1), AuditValue::from(2)]);
        }
    }

    #[test]
    fn failure_stops_dispatch_but_audit_succeeds() {
        let auditor = Auditor::new();
        let log = Log::default();
        auditor.register(recorder("h1", &log)).unwrap();
        auditor.register(failing("h2", &log)).unwrap();
        auditor.register(recorder("h3", &log)).unwrap();

        let result = auditor.audit(&[s("demo.event"), AuditValue::from(1), s("two")]);
        assert!(result.is_ok());

        let entries = log.lock().unwrap().clone();
        assert_eq!(labels(&log), vec!["h1", "h2"]);
        assert_eq!(entries[0].1, "demo.event");
        assert_eq!(entries[0].2.as_slice(), &[AuditValue::from(1), s("two")]);
    }

    #[test]
    fn failure_at_each_position_skips_the_rest() {
        for k in 0..4 {
            let auditor = Auditor::new();
            let log = Log::default();
            for i in 0..4 {
                let label = format!("h{i}");
                let hook = if i == k {
                    failing(&label, &log)
                } else {
                    recorder(&label, &log)
                };
                auditor.register(hook).unwrap();
            }
            assert!(auditor.audit(&[s("ev")]).is_ok());
            let expected: Vec<String> = (0..=k).map(|i| format!("h{i}")).collect();
            assert_eq!(labels(&log), expected);
        }
    }

    #[test]
    fn duplicate_registration_runs_twice() {
        let auditor = Auditor::new();
        let log = Log::default();
        let a = recorder("a", &log);
        auditor.register(Arc::clone(&a)).unwrap();
        auditor.register(recorder("b", &log)).unwrap();
        auditor.register(a).unwrap();
        auditor.audit(&[s("ev")]).unwrap();
        assert_eq!(labels(&log), vec!["a", "b", "a"]);
    }

    #[test]
    fn audit_without_arguments_is_argument_error() {
        let auditor = Auditor::new();
        let log = Log::default();
        auditor.register(recorder("h", &log)).unwrap();
        let err = auditor.audit(&[]).unwrap_err();
        assert!(matches!(err, AuditError::MissingArgument("event")));
        assert_eq!(err.to_string(), "missing required argument: event");
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn non_text_event_is_type_error() {
        let auditor = Auditor::new();
        let log = Log::default();
        auditor.register(recorder("h", &log)).unwrap();
        let err = auditor.audit(&[AuditValue::from(42)]).unwrap_err();
        assert!(matches!(err, AuditError::InvalidType { ref actual, .. } if actual == "int"));
        assert!(err.to_string().contains("not int"));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn addaudithook_without_arguments_is_argument_error() {
        let auditor = Auditor::new();
        auditor.register(hook_fn("h", |_, _| Ok(()))).unwrap();
        let err = auditor.addaudithook(&[]).unwrap_err();
        assert!(matches!(err, AuditError::MissingArgument("hook")));
        assert_eq!(auditor.hook_count(), 1);
    }

    #[test]
    fn addaudithook_appends_dynamic_hook_value() {
        let auditor = Auditor::new();
        let log = Log::default();
        auditor
            .addaudithook(&[AuditValue::hook(recorder("dyn", &log))])
            .unwrap();
        assert_eq!(auditor.hook_count(), 1);
        auditor.audit(&[s("ev")]).unwrap();
        assert_eq!(labels(&log), vec!["dyn"]);
    }

    #[test]
    fn non_callable_entry_halts_dispatch() {
        let auditor = Auditor::new();
        let log = Log::default();
        auditor.register(recorder("before", &log)).unwrap();
        auditor.addaudithook(&[AuditValue::from(7)]).unwrap();
        auditor.register(recorder("after", &log)).unwrap();

        assert!(auditor.audit(&[s("ev")]).is_ok());
        assert_eq!(labels(&log), vec!["before"]);
    }

    #[test]
    fn no_hooks_is_a_no_op() {
        let auditor = Auditor::new();
        assert!(auditor.audit(&[s("demo.event")]).is_ok());
    }

    #[test]
    fn repeated_audits_produce_identical_sequences() {
        let auditor = Auditor::new();
        let log = Log::default();
        auditor.register(recorder("a", &log)).unwrap();
        auditor.register(recorder("b", &log)).unwrap();

        auditor.audit(&[s("ev"), AuditValue::from(1)]).unwrap();
        let first = log.lock().unwrap().clone();
        log.lock().unwrap().clear();
        auditor.audit(&[s("ev"), AuditValue::from(1)]).unwrap();
        let second = log.lock().unwrap().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn propagate_policy_reports_hook_failure() {
        let auditor = Auditor::with_options(AuditorOptions {
            failure_policy: FailurePolicy::Propagate,
            ..Default::default()
        });
        let log = Log::default();
        auditor.register(failing("deny", &log)).unwrap();
        auditor.register(recorder("later", &log)).unwrap();

        let err = auditor.audit(&[s("open")]).unwrap_err();
        match err {
            AuditError::HookFailed { event, hook, source } => {
                assert_eq!(event, "open");
                assert_eq!(hook, "deny");
                assert!(matches!(source, HookFailure::Rejected(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(labels(&log), vec!["deny"]);
    }

    #[test]
    fn propagate_policy_still_validates_first() {
        let auditor = Auditor::with_options(AuditorOptions {
            failure_policy: FailurePolicy::Propagate,
            ..Default::default()
        });
        assert!(auditor.audit(&[AuditValue::None]).unwrap_err().is_validation());
    }

    #[test]
    fn hooks_may_register_and_audit_reentrantly() {
        let auditor = Auditor::new();
        let log = Log::default();
        let inner = recorder("inner", &log);

        let handle = auditor.clone();
        let nested_log = Arc::clone(&log);
        auditor
            .register(hook_fn("outer", move |event, _| {
                nested_log
                    .lock()
                    .unwrap()
                    .push(("outer".into(), event.to_string(), EventArgs::empty()));
                if event == "first" {
                    handle.register(Arc::clone(&inner)).unwrap();
                    handle.audit(&[AuditValue::from("nested")]).unwrap();
                }
                Ok(())
            }))
            .unwrap();

        auditor.audit(&[s("first")]).unwrap();
        let seen: Vec<(String, String)> = log
            .lock()
            .unwrap()
            .iter()
            .map(|(l, e, _)| (l.clone(), e.clone()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("outer".to_string(), "first".to_string()),
                ("outer".to_string(), "nested".to_string()),
                ("inner".to_string(), "nested".to_string()),
            ]
        );
        assert_eq!(auditor.hook_count(), 2);
    }

    #[test]
    fn concurrent_register_and_audit() {
        let auditor = Auditor::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        auditor
            .register(hook_fn("count", move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))
            .unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let auditor = auditor.clone();
                scope.spawn(move || {
                    for i in 0..100 {
                        auditor.audit(&[s("tick"), AuditValue::from(i)]).unwrap();
                    }
                });
            }
            let registrar = auditor.clone();
            scope.spawn(move || {
                for _ in 0..50 {
                    registrar.register(hook_fn("noop", |_, _| Ok(()))).unwrap();
                }
            });
        });

        assert_eq!(calls.load(Ordering::SeqCst), 400);
        assert_eq!(auditor.hook_count(), 51);
    }

    #[test]
    fn announcement_lets_existing_hooks_veto_registration() {
        let auditor = Auditor::with_options(AuditorOptions {
            announce_registration: true,
            ..Default::default()
        });
        let log = Log::default();
        auditor
            .register(hook_fn("gatekeeper", |event, _| {
                if event == REGISTRATION_EVENT {
                    return Err(HookFailure::rejected("no new hooks"));
                }
                Ok(())
            }))
            .unwrap();

        assert!(auditor.register(recorder("late", &log)).is_ok());
        assert_eq!(auditor.hook_count(), 1);
        auditor.audit(&[s("ev")]).unwrap();
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn announcement_is_observed_by_existing_hooks() {
        let auditor = Auditor::with_options(AuditorOptions {
            announce_registration: true,
            ..Default::default()
        });
        let log = Log::default();
        auditor.register(recorder("first", &log)).unwrap();
        auditor.register(recorder("second", &log)).unwrap();

        let seen = log.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, REGISTRATION_EVENT);
        assert!(seen[0].2.is_empty());
        assert_eq!(auditor.hook_count(), 2);
    }

    #[test]
    fn audit_macro_builds_arguments() {
        let auditor = Auditor::new();
        let log = Log::default();
        auditor.register(recorder("m", &log)).unwrap();
        crate::audit!(auditor, "demo.event", 1, "two").unwrap();
        crate::audit!(auditor, "bare").unwrap();

        let entries = log.lock().unwrap().clone();
        assert_eq!(entries[0].2.as_slice(), &[AuditValue::from(1), s("two")]);
        assert!(entries[1].2.is_empty());
    }
}
