use std::{
    env,
    path::{Path, PathBuf},
};

pub mod keymap;

/// Relative image roots are looked up in the working directory first, then
/// next to the executable.
pub fn resolve_image_root(configured: &Path) -> PathBuf {
    if configured.is_absolute() || configured.exists() {
        return configured.to_path_buf();
    }
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(configured)))
        .filter(|candidate| candidate.exists())
        .unwrap_or_else(|| configured.to_path_buf())
}
