//! The process-wide auditor.

use once_cell::sync::OnceCell;
use sysaudit_hooks::Auditor;

static PROCESS_AUDITOR: OnceCell<Auditor> = OnceCell::new();

/// The auditor shared by the whole process, created with default options on
/// first use unless one was [`install`]ed before.
pub fn process_auditor() -> &'static Auditor {
    PROCESS_AUDITOR.get_or_init(|| {
        tracing::debug!("Initializing default process auditor");
        Auditor::new()
    })
}

/// Install `auditor` as the process auditor. Fails, handing it back, once
/// the process auditor exists.
pub fn install(auditor: Auditor) -> Result<(), Auditor> {
    PROCESS_AUDITOR.set(auditor)
}
