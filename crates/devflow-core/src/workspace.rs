use crate::config::Config;
use crate::error::Result;
use crate::state::State;
use crate::{io, paths};
use std::path::Path;

/// Scaffold `.devflow/` under `root`. Idempotent: existing config and
/// state files are left untouched. Returns `true` when the workspace was
/// newly created.
pub fn init(root: &Path, name: &str) -> Result<bool> {
    let already = is_initialized(root);

    io::ensure_dir(&paths::devflow_dir(root))?;
    io::ensure_dir(&root.join(paths::PROJECTS_DIR))?;

    if !paths::config_path(root).exists() {
        Config::new(name).save(root)?;
    }
    if !paths::state_path(root).exists() {
        State::new(name).save(root)?;
    }

    Ok(!already)
}

pub fn is_initialized(root: &Path) -> bool {
    paths::config_path(root).exists()
}
