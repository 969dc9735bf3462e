use std::{env, sync::OnceLock};

use crate::{DEFAULT_SHELL_LOCALE, SHELL_LOCALE_ENV};

static SHELL_TEXTS: OnceLock<ShellTexts> = OnceLock::new();

#[derive(Debug, Clone, Copy)]
pub struct ShellTexts {
    pub tray_tooltip: &'static str,
    pub tray_show: &'static str,
    pub tray_quit: &'static str,
    pub close_prompt_title: &'static str,
    pub close_prompt_message: &'static str,
    pub close_prompt_hide: &'static str,
    pub close_prompt_quit: &'static str,
}

pub fn shell_texts_for_locale(locale: &str) -> ShellTexts {
    if locale == "en-US" {
        return ShellTexts {
            tray_tooltip: "Miyoushe Exchange Helper",
            tray_show: "Show",
            tray_quit: "Quit",
            close_prompt_title: "Confirm",
            close_prompt_message: "Quit the program or hide it to the tray?",
            close_prompt_hide: "Hide to tray",
            close_prompt_quit: "Quit",
        };
    }

    ShellTexts {
        tray_tooltip: "米游社商品兑换小助手",
        tray_show: "显示",
        tray_quit: "退出",
        close_prompt_title: "确认",
        close_prompt_message: "你想要关闭程序还是隐藏到托盘？",
        close_prompt_hide: "隐藏到托盘",
        close_prompt_quit: "关闭程序",
    }
}

/// Texts for the locale picked once per process from the environment.
pub fn shell_texts() -> ShellTexts {
    *SHELL_TEXTS.get_or_init(|| {
        shell_texts_for_locale(resolve_shell_locale(DEFAULT_SHELL_LOCALE, |name| {
            env::var(name).ok()
        }))
    })
}

pub fn resolve_shell_locale<L>(default_shell_locale: &'static str, lookup: L) -> &'static str
where
    L: Fn(&str) -> Option<String>,
{
    for env_key in [SHELL_LOCALE_ENV, "LC_ALL", "LANG"] {
        if let Some(locale) = lookup(env_key).as_deref().and_then(normalize_shell_locale) {
            return locale;
        }
    }

    default_shell_locale
}

pub(crate) fn normalize_shell_locale(raw: &str) -> Option<&'static str> {
    let lowered = raw.trim().to_ascii_lowercase();
    if lowered.starts_with("zh") {
        return Some("zh-CN");
    }
    if lowered.starts_with("en") {
        return Some("en-US");
    }
    None
}
