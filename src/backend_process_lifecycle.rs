use std::{
    path::PathBuf,
    process::Child,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread,
    time::Duration,
};

use crate::{
    append_desktop_log, logging, process_control, BackendSupervisor, BACKEND_LOG_MAX_BYTES,
    BACKEND_LOG_ROTATION_CHECK_INTERVAL, GRACEFUL_STOP_TIMEOUT_MS, LOG_BACKUP_COUNT,
};

impl BackendSupervisor {
    /// Terminates the backend. Safe to call any number of times; only the first
    /// call after a successful `start()` does any work.
    pub(crate) fn stop(&self) -> Result<(), String> {
        self.stop_with(|image_name| {
            process_control::kill_processes_by_image_name(image_name, append_desktop_log);
        })
    }

    /// The held handle is stopped first. `kill_by_name` runs only for a child
    /// this supervisor spawned whose handle did not confirm exit.
    pub(crate) fn stop_with<K>(&self, kill_by_name: K) -> Result<(), String>
    where
        K: Fn(&str),
    {
        let Some(plan) = self
            .plan
            .lock()
            .map_err(|_| "Backend plan lock poisoned.".to_string())?
            .take()
        else {
            return Ok(());
        };

        self.stop_log_rotation_worker();
        let child = self
            .child
            .lock()
            .map_err(|_| "Backend process lock poisoned.".to_string())?
            .take();

        let handle_outcome = match child {
            Some(mut child) => Some(process_control::stop_child_process_gracefully(
                &mut child,
                Duration::from_millis(GRACEFUL_STOP_TIMEOUT_MS),
                append_desktop_log,
            )),
            None => None,
        };

        if handle_outcome != Some(true) {
            if let Some(image_name) = plan.image_name.as_deref() {
                kill_by_name(image_name);
            }
        }

        match handle_outcome {
            Some(false) => Err(format!(
                "Backend process did not confirm exit after {}ms graceful stop timeout.",
                GRACEFUL_STOP_TIMEOUT_MS
            )),
            _ => Ok(()),
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        match self.child.lock() {
            Ok(mut guard) => child_is_alive(guard.as_mut()),
            Err(error) => {
                append_desktop_log(&format!(
                    "backend child lock poisoned while checking liveness: {error}"
                ));
                child_is_alive(error.into_inner().as_mut())
            }
        }
    }

    pub(crate) fn stop_log_rotation_worker(&self) {
        match self.log_rotator_stop.lock() {
            Ok(mut guard) => {
                if let Some(flag) = guard.take() {
                    flag.store(true, Ordering::Relaxed);
                }
            }
            Err(error) => {
                append_desktop_log(&format!(
                    "backend log rotator stop flag lock poisoned: {error}"
                ));
            }
        }
    }

    pub(crate) fn start_log_rotation_worker(&self, log_path: PathBuf, child_pid: u32) {
        self.stop_log_rotation_worker();
        let stop_flag = Arc::new(AtomicBool::new(false));
        match self.log_rotator_stop.lock() {
            Ok(mut guard) => {
                *guard = Some(stop_flag.clone());
            }
            Err(error) => {
                append_desktop_log(&format!(
                    "backend log rotator stop flag lock poisoned on start: {error}"
                ));
                return;
            }
        }

        let child = Arc::clone(&self.child);
        thread::spawn(move || {
            let log_scope = format!("backend(pid={child_pid})");
            loop {
                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }
                thread::sleep(BACKEND_LOG_ROTATION_CHECK_INTERVAL);
                if stop_flag.load(Ordering::Relaxed) {
                    break;
                }
                if !child_matches_pid_and_alive(&child, child_pid) {
                    break;
                }
                logging::rotate_log_if_needed(
                    &log_path,
                    BACKEND_LOG_MAX_BYTES,
                    LOG_BACKUP_COUNT,
                    &log_scope,
                    true,
                );
            }
        });
    }
}

fn child_is_alive(child: Option<&mut Child>) -> bool {
    child.is_some_and(|child| matches!(child.try_wait(), Ok(None)))
}

fn child_matches_pid_and_alive(child: &Mutex<Option<Child>>, child_pid: u32) -> bool {
    let mut guard = match child.lock() {
        Ok(guard) => guard,
        Err(error) => {
            append_desktop_log(&format!(
                "backend child lock poisoned while checking log rotator worker pid={child_pid}: {error}"
            ));
            return false;
        }
    };

    let Some(child) = guard.as_mut() else {
        return false;
    };
    if child.id() != child_pid {
        return false;
    }

    match child.try_wait() {
        Ok(None) => true,
        Ok(Some(status)) => {
            append_desktop_log(&format!(
                "backend process exited, stop log rotator worker: pid={child_pid}, status={status}"
            ));
            false
        }
        Err(error) => {
            append_desktop_log(&format!(
                "failed to poll backend process status for log rotator worker pid={child_pid}: {error}"
            ));
            false
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::LaunchPlan;

    fn sleep_plan(cwd: PathBuf) -> LaunchPlan {
        LaunchPlan {
            cmd: "sleep".to_string(),
            args: vec!["30".to_string()],
            cwd,
            image_name: None,
        }
    }

    #[test]
    fn start_spawns_planned_command_and_stop_terminates_it() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let supervisor = BackendSupervisor::default();
        let log_path = dir.path().join("logs").join("backend.log");

        let pid = supervisor
            .start(sleep_plan(dir.path().to_path_buf()), Some(&log_path))
            .expect("spawn backend");
        assert!(pid > 0);
        assert!(supervisor.is_running());
        assert!(log_path.exists());
        assert_eq!(
            supervisor
                .plan
                .lock()
                .expect("plan lock")
                .as_ref()
                .map(|plan| plan.cmd.as_str()),
            Some("sleep")
        );

        supervisor.stop().expect("stop backend");
        assert!(!supervisor.is_running());
        assert!(supervisor.child.lock().expect("child lock").is_none());
    }

    #[test]
    fn stop_is_idempotent() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let supervisor = BackendSupervisor::default();
        supervisor
            .start(sleep_plan(dir.path().to_path_buf()), None)
            .expect("spawn backend");

        assert!(supervisor.stop().is_ok());
        assert!(supervisor.stop().is_ok());
        assert!(!supervisor.is_running());
    }

    #[test]
    fn stop_without_start_is_a_no_op() {
        let supervisor = BackendSupervisor::default();
        assert!(supervisor.stop().is_ok());
        assert!(!supervisor.is_running());
    }

    #[test]
    fn second_start_keeps_existing_child() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let supervisor = BackendSupervisor::default();
        let first = supervisor
            .start(sleep_plan(dir.path().to_path_buf()), None)
            .expect("spawn backend");
        let second = supervisor
            .start(sleep_plan(dir.path().to_path_buf()), None)
            .expect("re-start backend");

        assert_eq!(first, second);
        supervisor.stop().expect("stop backend");
    }

    #[test]
    fn missing_executable_is_reported_and_stop_still_succeeds() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let supervisor = BackendSupervisor::default();
        let plan = LaunchPlan {
            cmd: dir
                .path()
                .join("flask_app/dist/run/run")
                .to_string_lossy()
                .into_owned(),
            args: Vec::new(),
            cwd: dir.path().to_path_buf(),
            image_name: None,
        };

        let error = supervisor.start(plan, None).expect_err("spawn should fail");
        assert!(error.contains("Failed to spawn backend process"));
        assert!(!supervisor.is_running());
        assert!(supervisor.stop().is_ok());
    }

    #[test]
    fn failed_spawn_never_kills_by_image_name() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let supervisor = BackendSupervisor::default();
        let plan = LaunchPlan {
            cmd: dir
                .path()
                .join("flask_app/dist/run/run")
                .to_string_lossy()
                .into_owned(),
            args: Vec::new(),
            cwd: dir.path().to_path_buf(),
            image_name: Some("run".to_string()),
        };
        assert!(supervisor.start(plan, None).is_err());
        assert!(supervisor.plan.lock().expect("plan lock").is_none());

        let killed = Mutex::new(Vec::<String>::new());
        supervisor
            .stop_with(|name| killed.lock().expect("kill log").push(name.to_string()))
            .expect("stop after failed spawn");
        assert!(killed.lock().expect("kill log").is_empty());
    }

    #[test]
    fn confirmed_exit_skips_kill_by_image_name() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let supervisor = BackendSupervisor::default();
        let mut plan = sleep_plan(dir.path().to_path_buf());
        plan.image_name = Some("sleep".to_string());
        supervisor.start(plan, None).expect("spawn backend");

        let killed = Mutex::new(Vec::<String>::new());
        supervisor
            .stop_with(|name| killed.lock().expect("kill log").push(name.to_string()))
            .expect("stop backend");
        assert!(killed.lock().expect("kill log").is_empty());
        assert!(!supervisor.is_running());
    }

    #[test]
    fn stop_tolerates_backend_that_already_exited() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let supervisor = BackendSupervisor::default();
        let plan = LaunchPlan {
            cmd: "true".to_string(),
            args: Vec::new(),
            cwd: dir.path().to_path_buf(),
            image_name: None,
        };
        supervisor.start(plan, None).expect("spawn backend");
        thread::sleep(Duration::from_millis(200));

        assert!(supervisor.stop().is_ok());
    }
}
