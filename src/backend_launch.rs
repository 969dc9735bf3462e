use std::{
    fs::{self, OpenOptions},
    path::Path,
    process::{Command, Stdio},
};

#[cfg(target_os = "windows")]
use std::os::windows::process::CommandExt;

use crate::{
    append_desktop_log, launch_plan, logging, AtomicFlagGuard, BackendSupervisor, LaunchPlan,
    BACKEND_LOG_MAX_BYTES, LOG_BACKUP_COUNT,
};
#[cfg(target_os = "windows")]
use crate::CREATE_NO_WINDOW;

impl BackendSupervisor {
    /// Spawns the backend without waiting for it. stdout/stderr go to
    /// `backend_log_path` when given, otherwise they are discarded.
    ///
    /// The plan is only recorded once the child exists, so a failed spawn
    /// leaves `stop()` with nothing to clean up.
    pub(crate) fn start(
        &self,
        plan: LaunchPlan,
        backend_log_path: Option<&Path>,
    ) -> Result<u32, String> {
        let _spawn_guard = AtomicFlagGuard::try_set(&self.is_spawning)
            .ok_or_else(|| "Backend spawn already in progress.".to_string())?;

        if let Some(child) = self
            .child
            .lock()
            .map_err(|_| "Backend process lock poisoned.".to_string())?
            .as_ref()
        {
            append_desktop_log("backend child already exists, skip re-spawn");
            return Ok(child.id());
        }

        let mut command = Command::new(&plan.cmd);
        command
            .args(&plan.args)
            .current_dir(&plan.cwd)
            .stdin(Stdio::null())
            .env("PYTHONUNBUFFERED", "1")
            .env("PYTHONIOENCODING", "utf-8");
        #[cfg(target_os = "windows")]
        {
            command.creation_flags(CREATE_NO_WINDOW);
        }

        match backend_log_path {
            Some(log_path) => {
                let (stdout, stderr) = open_backend_log(log_path)?;
                command.stdout(stdout).stderr(stderr);
            }
            None => {
                command.stdout(Stdio::null()).stderr(Stdio::null());
            }
        }

        let child = command.spawn().map_err(|error| {
            format!(
                "Failed to spawn backend process with command {:?}: {}",
                launch_plan::build_debug_command(&plan),
                error
            )
        })?;
        let child_pid = child.id();
        append_desktop_log(&format!(
            "spawned backend: pid={child_pid}, cmd={:?}, cwd={}",
            launch_plan::build_debug_command(&plan),
            plan.cwd.display()
        ));
        *self
            .child
            .lock()
            .map_err(|_| "Backend process lock poisoned.".to_string())? = Some(child);

        *self
            .plan
            .lock()
            .map_err(|_| "Backend plan lock poisoned.".to_string())? = Some(plan);

        match backend_log_path {
            Some(log_path) => self.start_log_rotation_worker(log_path.to_path_buf(), child_pid),
            None => self.stop_log_rotation_worker(),
        }
        Ok(child_pid)
    }
}

fn open_backend_log(log_path: &Path) -> Result<(Stdio, Stdio), String> {
    if let Some(log_parent) = log_path.parent() {
        fs::create_dir_all(log_parent).map_err(|error| {
            format!(
                "Failed to create backend log directory {}: {}",
                log_parent.display(),
                error
            )
        })?;
    }
    logging::rotate_log_if_needed(
        log_path,
        BACKEND_LOG_MAX_BYTES,
        LOG_BACKUP_COUNT,
        "backend",
        false,
    );

    let stdout_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|error| {
            format!(
                "Failed to open backend log {}: {}",
                log_path.display(),
                error
            )
        })?;
    let stderr_file = stdout_file
        .try_clone()
        .map_err(|error| format!("Failed to clone backend log handle: {error}"))?;
    Ok((Stdio::from(stdout_file), Stdio::from(stderr_file)))
}
