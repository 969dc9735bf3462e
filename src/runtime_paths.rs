use std::{
    env,
    path::{Path, PathBuf},
};
use tauri::{path::BaseDirectory, AppHandle, Manager};

use crate::{BACKEND_IMAGE_NAME, BACKEND_RELATIVE_DIR, DESKTOP_DATA_DIR};

pub fn default_data_root_dir() -> Option<PathBuf> {
    home::home_dir().map(|home| home.join(DESKTOP_DATA_DIR))
}

/// Directory holding the shell executable; the backend ships next to it.
pub fn install_dir() -> Option<PathBuf> {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
}

pub fn backend_relative_path() -> PathBuf {
    let mut path = PathBuf::new();
    for part in BACKEND_RELATIVE_DIR {
        path.push(part);
    }
    path.join(BACKEND_IMAGE_NAME)
}

pub fn backend_executable_in(base_dir: &Path) -> PathBuf {
    base_dir.join(backend_relative_path())
}

/// Picks the first base directory that actually contains the backend, falling
/// back to the install dir so a missing backend still yields a concrete path to
/// report in the spawn error.
pub fn resolve_backend_executable<F>(app: &AppHandle, log: F) -> Option<PathBuf>
where
    F: Fn(&str),
{
    let install = install_dir();
    let resource = app
        .path()
        .resolve(backend_relative_path(), BaseDirectory::Resource)
        .ok();

    let candidates = install
        .iter()
        .map(|dir| backend_executable_in(dir))
        .chain(resource.clone());
    if let Some(found) = first_existing(candidates) {
        return Some(found);
    }

    log(&format!(
        "backend executable not found (checked install dir and resource dir): {}",
        backend_relative_path().display()
    ));
    install.map(|dir| backend_executable_in(&dir)).or(resource)
}

fn first_existing<I>(candidates: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    candidates.into_iter().find(|path| path.is_file())
}
