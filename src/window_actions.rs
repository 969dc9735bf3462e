use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, append_shutdown_log, main_window, tray_setup,
    window_state::WindowTransition, ShellState,
};

pub fn show_main_window(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();
    if state.is_quitting() {
        append_desktop_log("show_main_window skipped: application is quitting");
        return;
    }
    if state.window_state().is_destroyed() {
        ensure_main_window(app_handle);
    }
    main_window::show_main_window(app_handle, append_desktop_log);
    state.apply_window_transition(WindowTransition::Show);
}

pub fn hide_main_window(app_handle: &AppHandle) {
    main_window::hide_main_window(app_handle, append_desktop_log);
    app_handle.state::<ShellState>().record_hide_to_tray();
}

pub fn toggle_main_window(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();
    if let Some(visible) = main_window::main_window_is_visible(app_handle) {
        let tracked = state.window_state().is_visible();
        if visible != tracked {
            append_desktop_log(&format!(
                "main window visibility drifted from tracked state: visible={visible}, tracked={:?}",
                state.window_state()
            ));
            state.apply_window_transition(if visible {
                WindowTransition::Show
            } else {
                WindowTransition::Hide
            });
        }
    }

    match state.toggle_transition() {
        WindowTransition::Hide => hide_main_window(app_handle),
        _ => show_main_window(app_handle),
    }
}

/// Brings the window to the front, restoring it from minimized or hidden.
pub fn refocus_main_window(app_handle: &AppHandle) -> Result<(), String> {
    if main_window::main_window(app_handle).is_none() {
        return Err("Main window not found.".to_string());
    }
    show_main_window(app_handle);
    Ok(())
}

/// Recreates the main window if it was destroyed while the app kept running.
pub fn ensure_main_window(app_handle: &AppHandle) {
    let state = app_handle.state::<ShellState>();
    if state.is_quitting() || main_window::main_window(app_handle).is_some() {
        return;
    }

    state.apply_window_transition(WindowTransition::Recreate);
    match main_window::create_main_window(app_handle, &state.config) {
        Ok(_) => {
            state.apply_window_transition(WindowTransition::BeginLoad);
            append_desktop_log("main window recreated");
        }
        Err(error) => {
            state.apply_window_transition(WindowTransition::Destroy);
            append_desktop_log(&format!("failed to recreate main window: {error}"));
        }
    }
}

/// Full quit: set the lifecycle flag, destroy the window, then request exit.
/// Backend termination runs from the exit handler.
pub fn quit_application(app_handle: &AppHandle, source: &str) {
    let state = app_handle.state::<ShellState>();
    state.begin_quit();
    append_shutdown_log(&format!("{source} requested quit, exiting desktop process"));
    tray_setup::disable_tray_menu(app_handle, append_shutdown_log);

    main_window::destroy_main_window(app_handle, append_shutdown_log);
    app_handle.exit(0);
}
