use tauri::{webview::PageLoadEvent, Manager, RunEvent, WindowEvent};

use crate::{
    append_desktop_log, append_startup_log, backend_readiness,
    close_policy::{self, CloseRequestDecision},
    desktop_bridge, exit_events, main_window, shell_config::ShellConfig, startup_task,
    tray_setup, window_actions,
    window_state::WindowTransition,
    ShellState, BACKEND_PING_TIMEOUT_MS, MAIN_WINDOW_LABEL,
};

fn handle_close_requested(window: &tauri::Window, api: &tauri::CloseRequestApi) {
    let app_handle = window.app_handle();
    let state = app_handle.state::<ShellState>();
    let decision = close_policy::decide_close_request(
        state.is_quitting(),
        state.config.confirm_close_dialog,
        state.close_prompt_open(),
    );

    match decision {
        CloseRequestDecision::AllowClose => {}
        CloseRequestDecision::HideToTray => {
            api.prevent_close();
            window_actions::hide_main_window(app_handle);
        }
        CloseRequestDecision::Ignore => {
            api.prevent_close();
            append_desktop_log("close request ignored: confirmation already open");
        }
        CloseRequestDecision::AskUser => {
            api.prevent_close();
            if !state.try_open_close_prompt() {
                return;
            }
            match main_window::main_window(app_handle) {
                Some(webview_window) => close_policy::prompt_close_choice(&webview_window),
                None => {
                    state.finish_close_prompt();
                    append_desktop_log("close prompt skipped: main window not found");
                }
            }
        }
    }
}

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        crate::app_helpers::desktop_log_path().display()
    ));

    let config = ShellConfig::from_env(append_startup_log);
    append_startup_log(&format!("shell config: {config:?}"));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            append_desktop_log("second instance launched, refocusing main window");
            window_actions::show_main_window(app);
        }))
        .plugin(tauri_plugin_dialog::init())
        .manage(ShellState::new(config))
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::desktop_bridge_is_desktop_runtime,
            crate::desktop_bridge_commands::desktop_bridge_get_backend_state,
            crate::desktop_bridge_commands::desktop_bridge_refocus_main_window,
        ])
        .on_window_event(|window, event| {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            match event {
                WindowEvent::CloseRequested { api, .. } => handle_close_requested(window, api),
                WindowEvent::Focused(focused) => {
                    let state = window.app_handle().state::<ShellState>();
                    if state.config.forward_focus_events && !state.is_quitting() {
                        main_window::forward_focus_event(window, *focused, append_desktop_log);
                    }
                }
                WindowEvent::Destroyed => {
                    let state = window.app_handle().state::<ShellState>();
                    if !state.window_state().is_destroyed() {
                        state.apply_window_transition(WindowTransition::Destroy);
                    }
                    append_desktop_log("main window destroyed");
                }
                _ => {}
            }
        })
        .on_page_load(|webview, payload| {
            if webview.window().label() != MAIN_WINDOW_LABEL {
                return;
            }
            let state = webview.app_handle().state::<ShellState>();
            let inject =
                desktop_bridge::should_inject_desktop_bridge(&state.config.backend_url, payload.url());

            match payload.event() {
                PageLoadEvent::Started => {
                    append_desktop_log(&format!("page-load started: {}", payload.url()));
                }
                PageLoadEvent::Finished => {
                    append_desktop_log(&format!("page-load finished: {}", payload.url()));
                    state.apply_window_transition(WindowTransition::PageLoaded);
                }
            }
            if inject {
                desktop_bridge::inject_desktop_bridge(webview, append_desktop_log);
            }
        })
        .setup(|app| {
            let app_handle = app.handle().clone();
            let state = app_handle.state::<ShellState>();

            match state.backend.launch(&app_handle) {
                Ok(pid) => append_startup_log(&format!("backend spawned with pid {pid}")),
                Err(error) => append_startup_log(&format!("failed to start backend: {error}")),
            }

            let reachable_before_window = backend_readiness::ping_backend(
                &state.config.backend_url,
                BACKEND_PING_TIMEOUT_MS,
            );
            match main_window::create_main_window(&app_handle, &state.config) {
                Ok(_) => {
                    state.apply_window_transition(WindowTransition::BeginLoad);
                }
                Err(error) => append_startup_log(&format!("failed to create main window: {error}")),
            }

            if let Err(error) = tray_setup::setup_tray(&app_handle) {
                append_startup_log(&format!("failed to initialize tray: {error}"));
            }

            startup_task::spawn_startup_task(
                app_handle.clone(),
                reachable_before_window,
                append_startup_log,
            );
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { code, api, .. } => {
                exit_events::handle_exit_requested(app_handle, code, &api);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            #[cfg(target_os = "macos")]
            RunEvent::Reopen { .. } => {
                exit_events::handle_reopen(app_handle);
            }
            _ => {}
        });
}
