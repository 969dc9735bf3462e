use std::{
    path::PathBuf,
    process::Child,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};
use tauri::menu::MenuItem;

use crate::{exit_state, shell_config::ShellConfig, window_state};

#[derive(Clone)]
pub(crate) struct TrayMenuState {
    pub(crate) show_item: MenuItem<tauri::Wry>,
    pub(crate) quit_item: MenuItem<tauri::Wry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LaunchPlan {
    pub(crate) cmd: String,
    pub(crate) args: Vec<String>,
    pub(crate) cwd: PathBuf,
    /// Process image name used for the kill-by-name fallback, if safe to use.
    pub(crate) image_name: Option<String>,
}

/// Owns the backend child process for the lifetime of the shell.
#[derive(Debug, Default)]
pub(crate) struct BackendSupervisor {
    pub(crate) child: Arc<Mutex<Option<Child>>>,
    pub(crate) plan: Mutex<Option<LaunchPlan>>,
    pub(crate) log_rotator_stop: Mutex<Option<Arc<AtomicBool>>>,
    pub(crate) is_spawning: AtomicBool,
}

#[derive(Debug)]
pub(crate) struct ShellState {
    pub(crate) config: ShellConfig,
    pub(crate) backend: BackendSupervisor,
    pub(crate) exit_state: Mutex<exit_state::ExitStateMachine>,
    pub(crate) window_state: Mutex<window_state::WindowStateMachine>,
    pub(crate) close_prompt_open: AtomicBool,
}

impl ShellState {
    pub(crate) fn new(config: ShellConfig) -> Self {
        Self {
            config,
            backend: BackendSupervisor::default(),
            exit_state: Mutex::new(exit_state::ExitStateMachine::default()),
            window_state: Mutex::new(window_state::WindowStateMachine::default()),
            close_prompt_open: AtomicBool::new(false),
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BackendBridgeState {
    pub(crate) running: bool,
    pub(crate) window_state: window_state::MainWindowState,
    pub(crate) backend_url: String,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct BridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl BridgeResult {
    pub(crate) fn from_result(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                reason: None,
            },
            Err(reason) => Self {
                ok: false,
                reason: Some(reason),
            },
        }
    }
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
