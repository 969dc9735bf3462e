#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_helpers;
mod app_runtime;
mod app_types;
mod backend_launch;
mod backend_process_lifecycle;
mod backend_readiness;
mod backend_startup;
mod close_policy;
mod desktop_bridge;
mod desktop_bridge_commands;
mod exit_cleanup;
mod exit_events;
mod exit_state;
mod launch_plan;
mod logging;
mod main_window;
mod process_control;
mod runtime_paths;
mod shell_config;
mod shell_locale;
mod shell_state;
mod startup_task;
mod tray_actions;
mod tray_menu_handler;
mod tray_setup;
mod ui_dispatch;
mod window_actions;
mod window_state;

pub(crate) use app_constants::*;
pub(crate) use app_helpers::{append_desktop_log, append_shutdown_log, append_startup_log};
pub(crate) use app_types::{
    AtomicFlagGuard, BackendBridgeState, BackendSupervisor, BridgeResult, LaunchPlan, ShellState,
    TrayMenuState,
};

fn main() {
    app_runtime::run();
}
