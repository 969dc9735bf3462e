/// Forward-only application lifecycle. `is_quitting()` is the lifecycle flag
/// consulted by close interception; once it reads true it never reads false
/// again for the rest of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitLifecycleState {
    #[default]
    Running,
    QuittingRequested,
    CleanupInProgress,
    ReadyToExit,
    Exiting,
}

#[derive(Debug, Default)]
pub struct ExitStateMachine {
    state: ExitLifecycleState,
}

impl ExitStateMachine {
    pub fn state(&self) -> ExitLifecycleState {
        self.state
    }

    pub fn is_quitting(&self) -> bool {
        self.state != ExitLifecycleState::Running
    }

    fn advance(&mut self, from: &[ExitLifecycleState], to: ExitLifecycleState) -> bool {
        if !from.contains(&self.state) {
            return false;
        }
        self.state = to;
        true
    }

    pub fn mark_quitting(&mut self) {
        self.advance(
            &[ExitLifecycleState::Running],
            ExitLifecycleState::QuittingRequested,
        );
    }

    /// Claims the single backend cleanup slot.
    pub fn try_begin_cleanup(&mut self) -> bool {
        self.advance(
            &[
                ExitLifecycleState::Running,
                ExitLifecycleState::QuittingRequested,
            ],
            ExitLifecycleState::CleanupInProgress,
        )
    }

    pub fn allow_next_exit_request(&mut self) {
        self.advance(
            &[ExitLifecycleState::CleanupInProgress],
            ExitLifecycleState::ReadyToExit,
        );
    }

    pub fn take_exit_request_allowance(&mut self) -> bool {
        self.advance(&[ExitLifecycleState::ReadyToExit], ExitLifecycleState::Exiting)
    }
}
