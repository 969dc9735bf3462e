use tauri::{AppHandle, Manager};

use crate::{append_desktop_log, window_actions, BackendBridgeState, BridgeResult, ShellState};

#[tauri::command]
pub(crate) fn desktop_bridge_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn desktop_bridge_get_backend_state(app_handle: AppHandle) -> BackendBridgeState {
    let state = app_handle.state::<ShellState>();
    BackendBridgeState {
        running: state.backend.is_running(),
        window_state: state.window_state(),
        backend_url: state.config.backend_url.clone(),
    }
}

/// Sync commands run on the main thread, so window calls are safe here.
#[tauri::command]
pub(crate) fn desktop_bridge_refocus_main_window(app_handle: AppHandle) -> BridgeResult {
    let result = window_actions::refocus_main_window(&app_handle);
    if let Err(error) = &result {
        append_desktop_log(&format!("refocus requested by page failed: {error}"));
    }
    BridgeResult::from_result(result)
}
