use tauri::{AppHandle, Manager};

use crate::{backend_readiness, main_window, ui_dispatch, ShellState};

/// Waits for the backend off the UI thread and navigates the window again once
/// it answers, unless it was already listening when the window was created.
pub fn spawn_startup_task<F>(
    startup_app_handle: AppHandle,
    reachable_before_window: bool,
    log: F,
) where
    F: Fn(&str) + Copy + Send + 'static,
{
    if reachable_before_window {
        log("backend was reachable before the main window opened; no reload needed");
        return;
    }

    tauri::async_runtime::spawn(async move {
        let startup_worker_handle = startup_app_handle.clone();
        let outcome = match tauri::async_runtime::spawn_blocking(move || {
            let state = startup_worker_handle.state::<ShellState>();
            state
                .backend
                .wait_until_reachable(&state.config.backend_url, state.config.ready_timeout)
        })
        .await
        {
            Ok(outcome) => outcome,
            Err(error) => {
                log(&format!("backend readiness task failed: {error}"));
                return;
            }
        };

        log(&format!("backend readiness outcome: {outcome:?}"));
        if !backend_readiness::should_navigate_after_wait(reachable_before_window, outcome) {
            return;
        }

        let backend_url = startup_app_handle
            .state::<ShellState>()
            .config
            .backend_url
            .clone();
        if let Err(error) = ui_dispatch::dispatch_window_task(
            &startup_app_handle,
            "navigate backend",
            move |main_app| {
                if let Err(navigate_error) =
                    main_window::navigate_main_window_to_backend(main_app, &backend_url)
                {
                    log(&navigate_error);
                }
            },
        ) {
            log(&error);
        }
    });
}

