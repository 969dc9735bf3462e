use std::sync::{atomic::Ordering, Mutex, MutexGuard};

use crate::{
    append_desktop_log,
    exit_state::ExitLifecycleState,
    window_state::{MainWindowState, WindowTransition},
    ShellState,
};

fn lock_or_recover<'a, T>(mutex: &'a Mutex<T>, purpose: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(error) => {
            append_desktop_log(&format!("shell state lock poisoned when {purpose}: {error}"));
            error.into_inner()
        }
    }
}

impl ShellState {
    pub(crate) fn mark_quitting(&self) {
        lock_or_recover(&self.exit_state, "marking quitting").mark_quitting();
    }

    pub(crate) fn is_quitting(&self) -> bool {
        lock_or_recover(&self.exit_state, "reading quitting state").is_quitting()
    }

    pub(crate) fn exit_phase(&self) -> ExitLifecycleState {
        lock_or_recover(&self.exit_state, "reading exit phase").state()
    }

    pub(crate) fn try_begin_exit_cleanup(&self) -> bool {
        lock_or_recover(&self.exit_state, "beginning cleanup").try_begin_cleanup()
    }

    pub(crate) fn allow_next_exit_request(&self) {
        lock_or_recover(&self.exit_state, "allowing next exit request").allow_next_exit_request();
    }

    pub(crate) fn take_exit_request_allowance(&self) -> bool {
        lock_or_recover(&self.exit_state, "taking exit request allowance")
            .take_exit_request_allowance()
    }

    pub(crate) fn window_state(&self) -> MainWindowState {
        lock_or_recover(&self.window_state, "reading window state").state()
    }

    pub(crate) fn apply_window_transition(&self, transition: WindowTransition) -> MainWindowState {
        let mut machine = lock_or_recover(&self.window_state, "applying window transition");
        if !machine.apply(transition) {
            append_desktop_log(&format!(
                "window transition {transition:?} ignored in state {:?}",
                machine.state()
            ));
        }
        machine.state()
    }

    pub(crate) fn toggle_transition(&self) -> WindowTransition {
        lock_or_recover(&self.window_state, "reading toggle transition").toggle_transition()
    }

    /// State side of "hide to tray": the window is tracked as hidden while the
    /// lifecycle flag and the backend are left alone.
    pub(crate) fn record_hide_to_tray(&self) -> MainWindowState {
        self.apply_window_transition(WindowTransition::Hide)
    }

    /// State side of a confirmed quit from the tray or the close prompt. The
    /// backend is stopped later by the exit handler.
    pub(crate) fn begin_quit(&self) -> MainWindowState {
        self.mark_quitting();
        self.apply_window_transition(WindowTransition::Destroy)
    }

    /// Only one close confirmation may be on screen at a time.
    pub(crate) fn try_open_close_prompt(&self) -> bool {
        self.close_prompt_open
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn close_prompt_open(&self) -> bool {
        self.close_prompt_open.load(Ordering::Acquire)
    }

    pub(crate) fn finish_close_prompt(&self) {
        self.close_prompt_open.store(false, Ordering::Release);
    }
}
