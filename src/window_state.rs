#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MainWindowState {
    #[default]
    Created,
    Loading,
    Visible,
    Hidden,
    Destroyed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowTransition {
    BeginLoad,
    PageLoaded,
    Show,
    Hide,
    Destroy,
    Recreate,
}

impl MainWindowState {
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Loading | Self::Visible)
    }

    pub fn is_destroyed(self) -> bool {
        self == Self::Destroyed
    }

    /// Returns the next state, or `None` when the transition does not apply
    /// (e.g. anything but `Recreate` on a destroyed window).
    pub fn next(self, transition: WindowTransition) -> Option<Self> {
        use MainWindowState::*;
        use WindowTransition::*;

        match (self, transition) {
            (Destroyed, Recreate) => Some(Created),
            (Destroyed, _) => None,
            (_, Recreate) => None,
            (_, Destroy) => Some(Destroyed),
            (Created, BeginLoad) => Some(Loading),
            (Loading, PageLoaded) => Some(Visible),
            (Hidden, PageLoaded) => Some(Hidden),
            (Visible, PageLoaded) => Some(Visible),
            (Created, PageLoaded) => Some(Visible),
            (_, BeginLoad) => Some(self),
            (_, Show) => Some(Visible),
            (_, Hide) => Some(Hidden),
        }
    }
}

/// Current state plus the transitions actually applied.
#[derive(Debug, Default)]
pub struct WindowStateMachine {
    state: MainWindowState,
}

impl WindowStateMachine {
    pub fn state(&self) -> MainWindowState {
        self.state
    }

    pub fn apply(&mut self, transition: WindowTransition) -> bool {
        match self.state.next(transition) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }

    pub fn toggle_transition(&self) -> WindowTransition {
        if self.state.is_visible() {
            WindowTransition::Hide
        } else {
            WindowTransition::Show
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_machine() -> WindowStateMachine {
        let mut machine = WindowStateMachine::default();
        assert!(machine.apply(WindowTransition::BeginLoad));
        assert!(machine.apply(WindowTransition::PageLoaded));
        assert_eq!(machine.state(), MainWindowState::Visible);
        machine
    }

    #[test]
    fn window_walks_created_loading_visible() {
        let mut machine = WindowStateMachine::default();
        assert_eq!(machine.state(), MainWindowState::Created);
        machine.apply(WindowTransition::BeginLoad);
        assert_eq!(machine.state(), MainWindowState::Loading);
        assert!(machine.state().is_visible());
        machine.apply(WindowTransition::PageLoaded);
        assert_eq!(machine.state(), MainWindowState::Visible);
    }

    #[test]
    fn any_show_hide_sequence_ends_in_last_action() {
        let sequences: [&[WindowTransition]; 4] = [
            &[WindowTransition::Hide, WindowTransition::Hide],
            &[WindowTransition::Show, WindowTransition::Show],
            &[
                WindowTransition::Hide,
                WindowTransition::Show,
                WindowTransition::Hide,
            ],
            &[
                WindowTransition::Show,
                WindowTransition::Hide,
                WindowTransition::Hide,
                WindowTransition::Show,
            ],
        ];

        for sequence in sequences {
            let mut machine = loaded_machine();
            for transition in sequence {
                machine.apply(*transition);
            }
            let expected = match sequence.last() {
                Some(WindowTransition::Hide) => MainWindowState::Hidden,
                _ => MainWindowState::Visible,
            };
            assert_eq!(machine.state(), expected, "sequence {sequence:?}");
        }
    }

    #[test]
    fn toggle_round_trips_visibility() {
        let mut machine = loaded_machine();
        let first = machine.toggle_transition();
        assert_eq!(first, WindowTransition::Hide);
        machine.apply(first);
        assert_eq!(machine.state(), MainWindowState::Hidden);

        let second = machine.toggle_transition();
        assert_eq!(second, WindowTransition::Show);
        machine.apply(second);
        assert_eq!(machine.state(), MainWindowState::Visible);
    }

    #[test]
    fn late_page_load_does_not_unhide_window() {
        let mut machine = WindowStateMachine::default();
        machine.apply(WindowTransition::BeginLoad);
        machine.apply(WindowTransition::Hide);
        machine.apply(WindowTransition::PageLoaded);
        assert_eq!(machine.state(), MainWindowState::Hidden);
    }

    #[test]
    fn destroyed_is_terminal_until_recreated() {
        let mut machine = loaded_machine();
        assert!(machine.apply(WindowTransition::Destroy));
        assert!(!machine.apply(WindowTransition::Show));
        assert!(!machine.apply(WindowTransition::Hide));
        assert!(machine.state().is_destroyed());

        assert!(machine.apply(WindowTransition::Recreate));
        assert_eq!(machine.state(), MainWindowState::Created);
        assert!(!machine.apply(WindowTransition::Recreate));
    }
}
