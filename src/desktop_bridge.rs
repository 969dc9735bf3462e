use std::{net::IpAddr, sync::OnceLock};

use url::Url;

use crate::{WINDOW_BLURRED_EVENT, WINDOW_FOCUSED_EVENT};

static DESKTOP_BRIDGE_BOOTSTRAP_TEMPLATE: &str = include_str!("bridge_bootstrap.js");
static DESKTOP_BRIDGE_BOOTSTRAP_SCRIPT: OnceLock<String> = OnceLock::new();

fn desktop_bridge_bootstrap_script() -> &'static str {
    DESKTOP_BRIDGE_BOOTSTRAP_SCRIPT
        .get_or_init(|| {
            DESKTOP_BRIDGE_BOOTSTRAP_TEMPLATE
                .replace("{WINDOW_FOCUSED_EVENT}", WINDOW_FOCUSED_EVENT)
                .replace("{WINDOW_BLURRED_EVENT}", WINDOW_BLURRED_EVENT)
        })
        .as_str()
}

pub fn inject_desktop_bridge<F>(webview: &tauri::Webview<tauri::Wry>, log: F)
where
    F: Fn(&str),
{
    if let Err(error) = webview.eval(desktop_bridge_bootstrap_script()) {
        log(&format!("failed to inject desktop bridge script: {error}"));
    }
}

fn same_origin(left: &Url, right: &Url) -> bool {
    left.scheme() == right.scheme()
        && left.host_str() == right.host_str()
        && left.port_or_known_default() == right.port_or_known_default()
}

fn is_loopback_host(host: Option<&str>) -> bool {
    match host {
        Some("localhost") => true,
        Some(raw) => raw
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback()),
        None => false,
    }
}

/// Same origin as the backend, treating `localhost` and loopback addresses as
/// interchangeable when scheme and port agree.
pub fn is_backend_origin(backend_url: &Url, page_url: &Url) -> bool {
    if same_origin(backend_url, page_url) {
        return true;
    }
    if !matches!(backend_url.scheme(), "http" | "https") || backend_url.scheme() != page_url.scheme()
    {
        return false;
    }

    is_loopback_host(backend_url.host_str())
        && is_loopback_host(page_url.host_str())
        && backend_url.port_or_known_default() == page_url.port_or_known_default()
}

pub fn should_inject_desktop_bridge(backend_url: &str, page_url: &Url) -> bool {
    let Ok(backend_url) = Url::parse(backend_url) else {
        return false;
    };
    is_backend_origin(&backend_url, page_url)
}
