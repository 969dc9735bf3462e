use tauri::{AppHandle, Manager, WebviewWindow};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind, MessageDialogResult};

use crate::{append_desktop_log, shell_locale, window_actions, ShellState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRequestDecision {
    /// Quit already confirmed; let the framework close the window.
    AllowClose,
    HideToTray,
    AskUser,
    /// A confirmation is already on screen.
    Ignore,
}

pub fn decide_close_request(
    is_quitting: bool,
    confirm_close_dialog: bool,
    prompt_already_open: bool,
) -> CloseRequestDecision {
    if is_quitting {
        CloseRequestDecision::AllowClose
    } else if !confirm_close_dialog {
        CloseRequestDecision::HideToTray
    } else if prompt_already_open {
        CloseRequestDecision::Ignore
    } else {
        CloseRequestDecision::AskUser
    }
}

/// Dialog buttons in display order: index 0 hides, index 1 quits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseChoice {
    HideToTray = 0,
    Quit = 1,
}

impl CloseChoice {
    /// Only an explicit press of the quit button quits. Dismissing the dialog
    /// (Esc, title-bar close) keeps the app running in the tray.
    pub fn from_dialog_result(result: &MessageDialogResult, quit_label: &str) -> Self {
        match result {
            MessageDialogResult::Custom(label) if label == quit_label => Self::Quit,
            _ => Self::HideToTray,
        }
    }
}

pub fn apply_close_choice(app_handle: &AppHandle, choice: CloseChoice) {
    match choice {
        CloseChoice::HideToTray => {
            append_desktop_log("close prompt answered: hide to tray");
            window_actions::hide_main_window(app_handle);
        }
        CloseChoice::Quit => {
            append_desktop_log("close prompt answered: quit");
            window_actions::quit_application(app_handle, "close prompt");
        }
    }
}

/// Shows the hide-or-quit prompt without blocking the event loop; the answer
/// is applied from the dialog callback.
pub fn prompt_close_choice(window: &WebviewWindow) {
    let app_handle = window.app_handle().clone();
    let texts = shell_locale::shell_texts();

    let callback_app = app_handle.clone();
    app_handle
        .dialog()
        .message(texts.close_prompt_message)
        .title(texts.close_prompt_title)
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::OkCancelCustom(
            texts.close_prompt_hide.to_string(),
            texts.close_prompt_quit.to_string(),
        ))
        .parent(window)
        .show_with_result(move |result| {
            let state = callback_app.state::<ShellState>();
            state.finish_close_prompt();
            apply_close_choice(
                &callback_app,
                CloseChoice::from_dialog_result(&result, texts.close_prompt_quit),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_is_allowed_once_quitting() {
        assert_eq!(
            decide_close_request(true, true, false),
            CloseRequestDecision::AllowClose
        );
        assert_eq!(
            decide_close_request(true, false, true),
            CloseRequestDecision::AllowClose
        );
    }

    #[test]
    fn close_hides_when_confirmation_is_disabled() {
        assert_eq!(
            decide_close_request(false, false, false),
            CloseRequestDecision::HideToTray
        );
    }

    #[test]
    fn close_asks_once_when_confirmation_is_enabled() {
        assert_eq!(
            decide_close_request(false, true, false),
            CloseRequestDecision::AskUser
        );
        assert_eq!(
            decide_close_request(false, true, true),
            CloseRequestDecision::Ignore
        );
    }

    #[test]
    fn close_never_destroys_without_quit_choice() {
        for confirm in [true, false] {
            for prompt_open in [true, false] {
                assert_ne!(
                    decide_close_request(false, confirm, prompt_open),
                    CloseRequestDecision::AllowClose
                );
            }
        }
    }

    #[test]
    fn close_choice_indices_match_button_order() {
        assert_eq!(CloseChoice::HideToTray as usize, 0);
        assert_eq!(CloseChoice::Quit as usize, 1);
    }

    #[test]
    fn only_the_quit_button_quits() {
        let texts = shell_locale::shell_texts_for_locale("zh-CN");
        assert_eq!(
            CloseChoice::from_dialog_result(
                &MessageDialogResult::Custom(texts.close_prompt_quit.to_string()),
                texts.close_prompt_quit
            ),
            CloseChoice::Quit
        );
        assert_eq!(
            CloseChoice::from_dialog_result(
                &MessageDialogResult::Custom(texts.close_prompt_hide.to_string()),
                texts.close_prompt_quit
            ),
            CloseChoice::HideToTray
        );
    }

    #[test]
    fn dismissing_the_close_prompt_hides_to_tray() {
        let quit_label = shell_locale::shell_texts_for_locale("en-US").close_prompt_quit;
        for dismissed in [
            MessageDialogResult::Cancel,
            MessageDialogResult::No,
            MessageDialogResult::Ok,
        ] {
            assert_eq!(
                CloseChoice::from_dialog_result(&dismissed, quit_label),
                CloseChoice::HideToTray
            );
        }
    }
}
