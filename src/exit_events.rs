use tauri::{AppHandle, Manager};

use crate::{append_desktop_log, append_shutdown_log, exit_cleanup, window_actions, ShellState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExitRequestedDecision {
    AllowImmediateExit,
    KeepRunningInTray,
    RunBackendCleanupFirst,
}

/// `code` is `None` when the framework asks to exit because the last window
/// went away, and `Some` for explicit `exit()` calls.
fn decide_exit_requested_flow(
    has_exit_request_allowance: bool,
    is_quitting: bool,
    code: Option<i32>,
    keep_running_without_windows: bool,
) -> ExitRequestedDecision {
    if has_exit_request_allowance {
        ExitRequestedDecision::AllowImmediateExit
    } else if code.is_none() && !is_quitting && keep_running_without_windows {
        ExitRequestedDecision::KeepRunningInTray
    } else {
        ExitRequestedDecision::RunBackendCleanupFirst
    }
}

pub fn handle_exit_requested(app_handle: &AppHandle, code: Option<i32>, api: &tauri::ExitRequestApi) {
    let state = app_handle.state::<ShellState>();
    match decide_exit_requested_flow(
        state.take_exit_request_allowance(),
        state.is_quitting(),
        code,
        cfg!(target_os = "macos"),
    ) {
        ExitRequestedDecision::AllowImmediateExit => {
            append_shutdown_log("exit request allowed to pass through after backend cleanup");
            return;
        }
        ExitRequestedDecision::KeepRunningInTray => {
            api.prevent_exit();
            append_desktop_log("last window closed; staying resident in tray");
            return;
        }
        ExitRequestedDecision::RunBackendCleanupFirst => {}
    }

    // Exit is re-issued explicitly once the backend is down.
    api.prevent_exit();
    state.mark_quitting();
    if !exit_cleanup::try_begin_exit_cleanup(
        &state,
        exit_cleanup::ExitTrigger::ExitRequested,
        append_shutdown_log,
    ) {
        return;
    }

    append_shutdown_log("exit requested, stopping backend asynchronously");
    let app_handle_cloned = app_handle.clone();
    tauri::async_runtime::spawn_blocking(move || {
        let state = app_handle_cloned.state::<ShellState>();
        exit_cleanup::stop_backend_for_exit(
            &state,
            exit_cleanup::ExitTrigger::ExitRequested,
            append_shutdown_log,
        );
        state.allow_next_exit_request();
        app_handle_cloned.exit(0);
    });
}

pub fn handle_exit_event(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();
    if !exit_cleanup::try_begin_exit_cleanup(
        &state,
        exit_cleanup::ExitTrigger::ExitFallback,
        append_shutdown_log,
    ) {
        return;
    }

    append_shutdown_log("exit event triggered fallback backend cleanup");
    exit_cleanup::stop_backend_for_exit(
        &state,
        exit_cleanup::ExitTrigger::ExitFallback,
        append_shutdown_log,
    );
}

/// Dock activation: bring back the window, recreating it if needed.
pub fn handle_reopen(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();
    if state.is_quitting() {
        return;
    }
    window_actions::ensure_main_window(app_handle);
    window_actions::show_main_window(app_handle);
}
