use tauri::{AppHandle, Emitter, Manager, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use url::Url;

use crate::{
    shell_config::ShellConfig, MAIN_WINDOW_LABEL, PRODUCT_NAME, WINDOW_BLURRED_EVENT,
    WINDOW_FOCUSED_EVENT,
};

pub fn main_window(app_handle: &AppHandle) -> Option<WebviewWindow> {
    app_handle.get_webview_window(MAIN_WINDOW_LABEL)
}

pub fn backend_target_url(backend_url: &str) -> Result<Url, String> {
    Url::parse(backend_url).map_err(|error| format!("Invalid backend URL {backend_url}: {error}"))
}

/// Builds the main window already pointed at the backend URL, so loading
/// starts immediately on construction.
pub fn create_main_window(
    app_handle: &AppHandle,
    config: &ShellConfig,
) -> Result<WebviewWindow, String> {
    let backend_url = backend_target_url(&config.backend_url)?;

    let builder = WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::External(backend_url),
    )
    .title(PRODUCT_NAME)
    .inner_size(
        f64::from(config.window_size.width),
        f64::from(config.window_size.height),
    )
    .center()
    .visible(true);

    let builder = match app_handle.default_window_icon() {
        Some(icon) => builder
            .icon(icon.clone())
            .map_err(|error| format!("Failed to set main window icon: {error}"))?,
        None => builder,
    };

    builder
        .build()
        .map_err(|error| format!("Failed to create main window: {error}"))
}

pub fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = main_window(app_handle) else {
        log("show_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

pub fn hide_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = main_window(app_handle) else {
        log("hide_main_window skipped: main window not found");
        return;
    };
    if let Err(error) = window.hide() {
        log(&format!("failed to hide main window: {error}"));
    }
}

pub fn destroy_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = main_window(app_handle) else {
        return;
    };
    if let Err(error) = window.destroy() {
        log(&format!("failed to destroy main window: {error}"));
    }
}

pub fn main_window_is_visible(app_handle: &AppHandle) -> Option<bool> {
    main_window(app_handle).and_then(|window| window.is_visible().ok())
}

/// Uses the native navigation API, so it also works when the webview is
/// showing the engine's own error page.
pub fn navigate_main_window_to_backend(
    app_handle: &AppHandle,
    backend_url: &str,
) -> Result<(), String> {
    let target = backend_target_url(backend_url)?;
    let Some(window) = main_window(app_handle) else {
        return Err("Main window is unavailable after backend became ready.".to_string());
    };

    window
        .navigate(target)
        .map_err(|error| format!("Failed to navigate to backend: {error}"))
}

pub fn focus_event_name(focused: bool) -> &'static str {
    if focused {
        WINDOW_FOCUSED_EVENT
    } else {
        WINDOW_BLURRED_EVENT
    }
}

pub fn forward_focus_event<F>(window: &tauri::Window, focused: bool, log: F)
where
    F: Fn(&str),
{
    let event_name = focus_event_name(focused);
    if let Err(error) = window.emit_to(window.label(), event_name, ()) {
        log(&format!("failed to forward {event_name} to main window: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::{backend_target_url, focus_event_name};

    #[test]
    fn focus_event_name_matches_page_contract() {
        assert_eq!(focus_event_name(true), "window-focused");
        assert_eq!(focus_event_name(false), "window-blurred");
    }

    #[test]
    fn backend_target_url_is_passed_through_as_a_url() {
        let target = backend_target_url("http://localhost:5000/").expect("valid backend url");
        assert_eq!(target.as_str(), "http://localhost:5000/");

        let quoted = backend_target_url("http://localhost:5000/?q=';alert(1)//")
            .expect("quotes are url data");
        assert_eq!(quoted.host_str(), Some("localhost"));
        assert_eq!(quoted.port(), Some(5000));
        assert!(!quoted.as_str().contains('\''));
    }

    #[test]
    fn backend_target_url_rejects_relative_input() {
        let error = backend_target_url("/index.html").unwrap_err();
        assert!(error.contains("/index.html"));
    }
}
