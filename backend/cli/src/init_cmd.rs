//! `sysaudit init`: write a config file populated with defaults.

use anyhow::{bail, Result};
use std::path::Path;
use sysaudit_config::{apply_all_defaults, write_config, SysauditConfig};

use crate::terminal_output::note_success;

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(&apply_all_defaults(SysauditConfig::default()), path)?;
    note_success(&format!("Wrote {}", path.display()));
    Ok(())
}
