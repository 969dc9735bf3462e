use std::{env, path::PathBuf};

use tauri::AppHandle;

use crate::{
    app_helpers::desktop_log_path, append_startup_log, launch_plan, logging, runtime_paths, BackendSupervisor, LaunchPlan,
    BACKEND_CMD_ENV, BACKEND_CWD_ENV, BACKEND_LOG_FILE, DESKTOP_ROOT_ENV,
};

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn backend_log_path() -> PathBuf {
    let desktop_log = desktop_log_path();
    match desktop_log.parent() {
        Some(dir) => dir.join(BACKEND_LOG_FILE),
        None => logging::resolve_log_dir(runtime_paths::default_data_root_dir(), DESKTOP_ROOT_ENV)
            .join(BACKEND_LOG_FILE),
    }
}

impl BackendSupervisor {
    pub(crate) fn resolve_launch_plan(&self, app: &AppHandle) -> Result<LaunchPlan, String> {
        if let Some(custom_cmd) = non_empty_env(BACKEND_CMD_ENV) {
            append_startup_log(&format!("using custom backend command from {BACKEND_CMD_ENV}"));
            let fallback_cwd = runtime_paths::install_dir()
                .or_else(|| env::current_dir().ok())
                .unwrap_or_else(|| PathBuf::from("."));
            return launch_plan::resolve_custom_launch(
                &custom_cmd,
                non_empty_env(BACKEND_CWD_ENV).map(PathBuf::from),
                fallback_cwd,
            );
        }

        let executable = runtime_paths::resolve_backend_executable(app, append_startup_log)
            .ok_or_else(|| "Unable to resolve backend executable location.".to_string())?;
        launch_plan::resolve_bundled_launch(&executable)
    }

    /// Resolves and spawns the backend. Errors are for the caller to log; the
    /// shell keeps running either way.
    pub(crate) fn launch(&self, app: &AppHandle) -> Result<u32, String> {
        let plan = self.resolve_launch_plan(app)?;
        let log_path = backend_log_path();
        append_startup_log(&format!("backend log path: {}", log_path.display()));
        self.start(plan, Some(&log_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_log_lives_next_to_desktop_log() {
        let path = backend_log_path();
        assert_eq!(path.file_name().and_then(|name| name.to_str()), Some("backend.log"));
        assert_eq!(path.parent(), desktop_log_path().parent());
    }
}
