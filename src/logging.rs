use std::{
    env,
    ffi::OsString,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopLogCategory {
    Startup,
    Runtime,
    Shutdown,
}

impl DesktopLogCategory {
    fn as_label(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Runtime => "runtime",
            Self::Shutdown => "shutdown",
        }
    }
}

fn remove_if_present(path: &Path, log_scope: &str, what: &str) {
    if let Err(error) = fs::remove_file(path) {
        if error.kind() != std::io::ErrorKind::NotFound {
            eprintln!(
                "[log rotation:{log_scope}] failed to remove {what} {}: {}",
                path.display(),
                error
            );
        }
    }
}

/// Shifts `path.1 .. path.N` up by one and moves the active file into `path.1`
/// once it has grown past `max_bytes`.
///
/// With `copy_and_truncate` the active file is copied and truncated in place,
/// which keeps file handles held by a child process valid.
pub fn rotate_log_if_needed(
    path: &Path,
    max_bytes: u64,
    backup_count: usize,
    log_scope: &str,
    copy_and_truncate: bool,
) {
    if max_bytes == 0 || backup_count == 0 {
        return;
    }

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(error) => {
            if error.kind() != std::io::ErrorKind::NotFound {
                eprintln!(
                    "[log rotation:{log_scope}] failed to read metadata for {}: {}",
                    path.display(),
                    error
                );
            }
            return;
        }
    };
    if metadata.len() < max_bytes {
        return;
    }

    remove_if_present(
        &rotated_log_path(path, backup_count),
        log_scope,
        "oldest backup",
    );

    for index in (1..backup_count).rev() {
        let source = rotated_log_path(path, index);
        if !source.exists() {
            continue;
        }
        let target = rotated_log_path(path, index + 1);
        remove_if_present(&target, log_scope, "backup");
        if let Err(error) = fs::rename(&source, &target) {
            eprintln!(
                "[log rotation:{log_scope}] failed to rename {} to {}: {}",
                source.display(),
                target.display(),
                error
            );
        }
    }

    let rotated = rotated_log_path(path, 1);
    remove_if_present(&rotated, log_scope, "first backup");

    if copy_and_truncate {
        match fs::copy(path, &rotated) {
            Ok(_) => {
                if let Err(error) = OpenOptions::new().write(true).truncate(true).open(path) {
                    eprintln!(
                        "[log rotation:{log_scope}] failed to truncate active log {}: {}",
                        path.display(),
                        error
                    );
                }
            }
            Err(error) => {
                eprintln!(
                    "[log rotation:{log_scope}] failed to copy {} to {}: {}",
                    path.display(),
                    rotated.display(),
                    error
                );
            }
        }
    } else if let Err(error) = fs::rename(path, &rotated) {
        eprintln!(
            "[log rotation:{log_scope}] failed to rotate {} to {}: {}",
            path.display(),
            rotated.display(),
            error
        );
    }
}

fn rotated_log_path(path: &Path, index: usize) -> PathBuf {
    let mut value = OsString::from(path.as_os_str());
    value.push(format!(".{index}"));
    PathBuf::from(value)
}

fn non_empty_env_path(env_name: &str) -> Option<PathBuf> {
    let raw = env::var(env_name).ok()?;
    let path = PathBuf::from(raw.trim());
    (!path.as_os_str().is_empty()).then_some(path)
}

pub fn resolve_log_dir(data_root: Option<PathBuf>, root_env: &str) -> PathBuf {
    if let Some(root) = non_empty_env_path(root_env) {
        return root.join("logs");
    }
    if let Some(root) = data_root {
        return root.join("logs");
    }

    env::temp_dir().join("mys-exchange").join("logs")
}

pub fn resolve_desktop_log_path(
    data_root: Option<PathBuf>,
    path_env: &str,
    root_env: &str,
    desktop_log_file: &str,
) -> PathBuf {
    if let Some(custom) = non_empty_env_path(path_env) {
        return custom;
    }

    resolve_log_dir(data_root, root_env).join(desktop_log_file)
}

pub fn format_log_line(category: DesktopLogCategory, message: &str) -> String {
    let timestamp = chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.3f %z")
        .to_string();
    format!("[{}] [{}] {}\n", timestamp, category.as_label(), message)
}

pub fn append_log_line(
    path: &Path,
    category: DesktopLogCategory,
    message: &str,
    max_bytes: u64,
    backup_count: usize,
    write_lock: &OnceLock<Mutex<()>>,
) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let _guard = match write_lock.get_or_init(|| Mutex::new(())).lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    rotate_log_if_needed(path, max_bytes, backup_count, "desktop", false);
    let line = format_log_line(category, message);
    if cfg!(debug_assertions) {
        eprint!("{line}");
    }
    let _ = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| file.write_all(line.as_bytes()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_log_if_needed_shifts_backups_and_moves_active_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let log = dir.path().join("desktop.log");
        fs::write(&log, b"0123456789").expect("write active log");
        fs::write(rotated_log_path(&log, 1), b"older").expect("write backup 1");

        rotate_log_if_needed(&log, 5, 3, "test", false);

        assert!(!log.exists());
        assert_eq!(
            fs::read(rotated_log_path(&log, 1)).expect("read backup 1"),
            b"0123456789"
        );
        assert_eq!(
            fs::read(rotated_log_path(&log, 2)).expect("read backup 2"),
            b"older"
        );
    }

    #[test]
    fn rotate_log_if_needed_keeps_small_files() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let log = dir.path().join("desktop.log");
        fs::write(&log, b"tiny").expect("write active log");

        rotate_log_if_needed(&log, 1024, 3, "test", false);

        assert!(log.exists());
        assert!(!rotated_log_path(&log, 1).exists());
    }

    #[test]
    fn rotate_log_if_needed_copy_and_truncate_keeps_active_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let log = dir.path().join("backend.log");
        fs::write(&log, b"backend output").expect("write active log");

        rotate_log_if_needed(&log, 4, 2, "test", true);

        assert_eq!(fs::metadata(&log).expect("active log metadata").len(), 0);
        assert_eq!(
            fs::read(rotated_log_path(&log, 1)).expect("read backup 1"),
            b"backend output"
        );
    }

    #[test]
    fn append_log_line_writes_category_and_message() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let log = dir.path().join("nested").join("desktop.log");
        let lock = OnceLock::new();

        append_log_line(
            &log,
            DesktopLogCategory::Shutdown,
            "backend stopped",
            1024 * 1024,
            2,
            &lock,
        );

        let content = fs::read_to_string(&log).expect("read log");
        assert!(content.contains("[shutdown] backend stopped"));
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn resolve_log_dir_prefers_data_root_over_temp_dir() {
        let root = PathBuf::from("/opt/mys");
        assert_eq!(
            resolve_log_dir(Some(root.clone()), "MYS_TEST_ROOT_ENV_UNSET"),
            root.join("logs")
        );
        assert!(resolve_log_dir(None, "MYS_TEST_ROOT_ENV_UNSET").ends_with("mys-exchange/logs"));
    }
}
