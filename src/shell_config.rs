//! Shell behavior knobs.
//!
//! One controller covers every historic flavor of the shell; what used to be
//! separate code paths (close confirmation, window size, focus forwarding) is
//! now data in [`ShellConfig`]. Values come from built-in defaults and may be
//! overridden by `MYS_DESKTOP_*` environment variables. Invalid overrides are
//! logged and ignored.

use std::{env, time::Duration};

use url::Url;

use crate::{
    BACKEND_URL_ENV, CONFIRM_CLOSE_ENV, DEFAULT_BACKEND_URL, DEFAULT_READY_TIMEOUT_MS,
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, FORWARD_FOCUS_ENV, READY_TIMEOUT_ENV,
    READY_TIMEOUT_MAX_MS, READY_TIMEOUT_MIN_MS, WINDOW_HEIGHT_MAX, WINDOW_HEIGHT_MIN,
    WINDOW_SIZE_ENV, WINDOW_WIDTH_MAX, WINDOW_WIDTH_MIN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Ask "hide to tray or quit?" when the window close button is pressed.
    /// When off, closing always hides.
    pub confirm_close_dialog: bool,
    pub window_size: WindowSize,
    /// Emit `window-focused` / `window-blurred` to the loaded page.
    pub forward_focus_events: bool,
    pub backend_url: String,
    pub ready_timeout: Duration,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            confirm_close_dialog: true,
            window_size: WindowSize::default(),
            forward_focus_events: true,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            ready_timeout: Duration::from_millis(DEFAULT_READY_TIMEOUT_MS),
        }
    }
}

impl ShellConfig {
    pub fn from_env<F>(log: F) -> Self
    where
        F: Fn(&str),
    {
        Self::from_lookup(|name| env::var(name).ok(), log)
    }

    pub(crate) fn from_lookup<L, F>(lookup: L, log: F) -> Self
    where
        L: Fn(&str) -> Option<String>,
        F: Fn(&str),
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(CONFIRM_CLOSE_ENV) {
            config.confirm_close_dialog =
                parse_bool_flag(&raw, CONFIRM_CLOSE_ENV, config.confirm_close_dialog, &log);
        }
        if let Some(raw) = lookup(FORWARD_FOCUS_ENV) {
            config.forward_focus_events =
                parse_bool_flag(&raw, FORWARD_FOCUS_ENV, config.forward_focus_events, &log);
        }
        if let Some(raw) = lookup(WINDOW_SIZE_ENV) {
            config.window_size = parse_window_size(&raw, config.window_size, &log);
        }
        if let Some(raw) = lookup(BACKEND_URL_ENV) {
            config.backend_url = normalize_backend_url(&raw, DEFAULT_BACKEND_URL);
            if config.backend_url != raw.trim() {
                log(&format!(
                    "{BACKEND_URL_ENV}='{raw}' normalized to '{}'",
                    config.backend_url
                ));
            }
        }
        if let Some(raw) = lookup(READY_TIMEOUT_ENV) {
            config.ready_timeout = Duration::from_millis(parse_clamped_ms(
                &raw,
                READY_TIMEOUT_ENV,
                DEFAULT_READY_TIMEOUT_MS,
                READY_TIMEOUT_MIN_MS,
                READY_TIMEOUT_MAX_MS,
                &log,
            ));
        }

        config
    }
}

pub fn parse_bool_flag<F>(raw: &str, env_name: &str, fallback: bool, log: F) -> bool
where
    F: Fn(&str),
{
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => true,
        "0" | "false" | "off" | "no" => false,
        _ => {
            log(&format!(
                "invalid {env_name}='{raw}', fallback to {fallback}"
            ));
            fallback
        }
    }
}

pub fn parse_window_size<F>(raw: &str, fallback: WindowSize, log: F) -> WindowSize
where
    F: Fn(&str),
{
    let parsed = raw
        .trim()
        .to_ascii_lowercase()
        .split_once('x')
        .and_then(|(width, height)| {
            Some((
                width.trim().parse::<u32>().ok()?,
                height.trim().parse::<u32>().ok()?,
            ))
        });

    let Some((width, height)) = parsed else {
        log(&format!(
            "invalid {WINDOW_SIZE_ENV}='{raw}', expected WIDTHxHEIGHT; fallback to {}x{}",
            fallback.width, fallback.height
        ));
        return fallback;
    };

    let clamped = WindowSize {
        width: width.clamp(WINDOW_WIDTH_MIN, WINDOW_WIDTH_MAX),
        height: height.clamp(WINDOW_HEIGHT_MIN, WINDOW_HEIGHT_MAX),
    };
    if clamped.width != width || clamped.height != height {
        log(&format!(
            "{WINDOW_SIZE_ENV}='{raw}' is out of range, clamped to {}x{}",
            clamped.width, clamped.height
        ));
    }
    clamped
}

pub fn parse_clamped_ms<F>(
    raw: &str,
    env_name: &str,
    fallback_ms: u64,
    min_ms: u64,
    max_ms: u64,
    log: F,
) -> u64
where
    F: Fn(&str),
{
    match raw.trim().parse::<u128>() {
        Ok(parsed) if parsed > 0 => {
            if parsed < min_ms as u128 {
                log(&format!(
                    "{env_name}='{raw}' is below minimum {min_ms}ms, clamped to {min_ms}ms"
                ));
                min_ms
            } else if parsed > max_ms as u128 {
                log(&format!(
                    "{env_name}='{raw}' is above maximum {max_ms}ms, clamped to {max_ms}ms"
                ));
                max_ms
            } else {
                parsed as u64
            }
        }
        _ => {
            log(&format!(
                "invalid {env_name}='{raw}', fallback to {fallback_ms}ms"
            ));
            fallback_ms
        }
    }
}

pub fn normalize_backend_url(raw: &str, default_url: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default_url.to_string();
    }

    match Url::parse(trimmed) {
        Ok(mut parsed) if matches!(parsed.scheme(), "http" | "https") => {
            if parsed.path().is_empty() {
                parsed.set_path("/");
            }
            parsed.to_string()
        }
        _ => default_url.to_string(),
    }
}
