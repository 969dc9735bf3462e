use std::time::Duration;

pub(crate) const PRODUCT_NAME: &str = "米游社商品兑换小助手";
pub(crate) const MAIN_WINDOW_LABEL: &str = "main";

pub(crate) const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/";
pub(crate) const BACKEND_URL_ENV: &str = "MYS_DESKTOP_BACKEND_URL";
pub(crate) const BACKEND_CMD_ENV: &str = "MYS_DESKTOP_BACKEND_CMD";
pub(crate) const BACKEND_CWD_ENV: &str = "MYS_DESKTOP_BACKEND_CWD";
pub(crate) const BACKEND_RELATIVE_DIR: [&str; 3] = ["flask_app", "dist", "run"];
#[cfg(target_os = "windows")]
pub(crate) const BACKEND_IMAGE_NAME: &str = "run.exe";
#[cfg(not(target_os = "windows"))]
pub(crate) const BACKEND_IMAGE_NAME: &str = "run";

pub(crate) const CONFIRM_CLOSE_ENV: &str = "MYS_DESKTOP_CONFIRM_CLOSE";
pub(crate) const WINDOW_SIZE_ENV: &str = "MYS_DESKTOP_WINDOW_SIZE";
pub(crate) const FORWARD_FOCUS_ENV: &str = "MYS_DESKTOP_FORWARD_FOCUS";
pub(crate) const DEFAULT_WINDOW_WIDTH: u32 = 1000;
pub(crate) const DEFAULT_WINDOW_HEIGHT: u32 = 650;
pub(crate) const WINDOW_WIDTH_MIN: u32 = 400;
pub(crate) const WINDOW_WIDTH_MAX: u32 = 7680;
pub(crate) const WINDOW_HEIGHT_MIN: u32 = 300;
pub(crate) const WINDOW_HEIGHT_MAX: u32 = 4320;

pub(crate) const READY_TIMEOUT_ENV: &str = "MYS_DESKTOP_READY_TIMEOUT_MS";
pub(crate) const DEFAULT_READY_TIMEOUT_MS: u64 = 20_000;
pub(crate) const READY_TIMEOUT_MIN_MS: u64 = 1_000;
pub(crate) const READY_TIMEOUT_MAX_MS: u64 = 300_000;
pub(crate) const READY_BACKOFF_INITIAL_MS: u64 = 200;
pub(crate) const READY_BACKOFF_MAX_MS: u64 = 2_000;
pub(crate) const BACKEND_PING_TIMEOUT_MS: u64 = 800;

pub(crate) const GRACEFUL_STOP_TIMEOUT_MS: u64 = 10_000;

pub(crate) const DESKTOP_ROOT_ENV: &str = "MYS_DESKTOP_ROOT";
pub(crate) const DESKTOP_LOG_PATH_ENV: &str = "MYS_DESKTOP_LOG_PATH";
pub(crate) const DESKTOP_DATA_DIR: &str = ".mys-exchange";
pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const BACKEND_LOG_FILE: &str = "backend.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub(crate) const BACKEND_LOG_MAX_BYTES: u64 = 20 * 1024 * 1024;
pub(crate) const LOG_BACKUP_COUNT: usize = 5;
pub(crate) const BACKEND_LOG_ROTATION_CHECK_INTERVAL: Duration = Duration::from_secs(20);

pub(crate) const TRAY_ID: &str = "mys-exchange-tray";
pub(crate) const WINDOW_FOCUSED_EVENT: &str = "window-focused";
pub(crate) const WINDOW_BLURRED_EVENT: &str = "window-blurred";
pub(crate) const SHELL_LOCALE_ENV: &str = "MYS_DESKTOP_LOCALE";
pub(crate) const DEFAULT_SHELL_LOCALE: &str = "zh-CN";

#[cfg(target_os = "windows")]
pub(crate) const CREATE_NO_WINDOW: u32 = 0x0800_0000;
