use std::sync::{Mutex, OnceLock};

use crate::{
    logging, runtime_paths, DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES, DESKTOP_LOG_PATH_ENV,
    DESKTOP_ROOT_ENV, LOG_BACKUP_COUNT,
};

static DESKTOP_LOG_WRITE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

pub(crate) fn desktop_log_path() -> std::path::PathBuf {
    logging::resolve_desktop_log_path(
        runtime_paths::default_data_root_dir(),
        DESKTOP_LOG_PATH_ENV,
        DESKTOP_ROOT_ENV,
        DESKTOP_LOG_FILE,
    )
}

pub(crate) fn append_desktop_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Runtime, message);
}

pub(crate) fn append_startup_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Startup, message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_desktop_log_with_category(logging::DesktopLogCategory::Shutdown, message);
}

fn append_desktop_log_with_category(category: logging::DesktopLogCategory, message: &str) {
    logging::append_log_line(
        &desktop_log_path(),
        category,
        message,
        DESKTOP_LOG_MAX_BYTES,
        LOG_BACKUP_COUNT,
        &DESKTOP_LOG_WRITE_LOCK,
    )
}
