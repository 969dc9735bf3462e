use tauri::AppHandle;

use crate::{append_desktop_log, tray_actions, window_actions};

pub fn handle_tray_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match tray_actions::action_from_menu_id(menu_id) {
        Some(tray_actions::TrayMenuAction::ShowWindow) => {
            window_actions::show_main_window(app_handle)
        }
        Some(tray_actions::TrayMenuAction::Quit) => {
            window_actions::quit_application(app_handle, "tray menu")
        }
        None => append_desktop_log(&format!("unknown tray menu id ignored: {menu_id}")),
    }
}
