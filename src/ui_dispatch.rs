use tauri::{AppHandle, Manager};

use crate::{append_desktop_log, ShellState};

/// Queues `task` on the UI thread. The task is dropped without running if the
/// shell has started quitting by the time it is picked up.
pub fn dispatch_window_task<F>(
    app_handle: &AppHandle,
    task_name: &str,
    task: F,
) -> Result<(), String>
where
    F: FnOnce(&AppHandle) + Send + 'static,
{
    let main_app = app_handle.clone();
    let owned_name = task_name.to_string();
    app_handle
        .run_on_main_thread(move || {
            if main_app.state::<ShellState>().is_quitting() {
                append_desktop_log(&format!("'{owned_name}' skipped: application is quitting"));
                return;
            }
            task(&main_app);
        })
        .map_err(|error| format!("Failed to dispatch '{task_name}' on main thread: {error}"))
}
