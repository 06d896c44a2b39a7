/// What the shell does once the last window has closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlatformPolicy {
    QuitOnLastWindowClosed,
    StayResident,
}

impl PlatformPolicy {
    pub(crate) fn current() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    pub(crate) fn for_os(os: &str) -> Self {
        if os == "macos" {
            PlatformPolicy::StayResident
        } else {
            PlatformPolicy::QuitOnLastWindowClosed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LifecycleState {
    NotReady,
    Ready,
    AllWindowsClosed,
    Reactivated,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitDecision {
    Allow,
    StayResident,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ActivateDecision {
    RecreateMainWindow,
    FocusMainWindow,
    Ignore,
}

#[derive(Debug)]
pub(crate) struct LifecycleMachine {
    state: LifecycleState,
    policy: PlatformPolicy,
}

impl LifecycleMachine {
    pub(crate) fn new(policy: PlatformPolicy) -> Self {
        Self {
            state: LifecycleState::NotReady,
            policy,
        }
    }

    pub(crate) fn state(&self) -> LifecycleState {
        self.state
    }

    /// Returns `false` when the shell was already started.
    pub(crate) fn mark_ready(&mut self) -> bool {
        if self.state != LifecycleState::NotReady {
            return false;
        }
        self.state = LifecycleState::Ready;
        true
    }

    pub(crate) fn mark_quitting(&mut self) {
        self.state = LifecycleState::Quitting;
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.state == LifecycleState::Quitting
    }

    /// `code` is `None` when the host asks because the last window closed,
    /// `Some` for explicit exits.
    pub(crate) fn on_exit_requested(&mut self, code: Option<i32>) -> ExitDecision {
        if code.is_some() || self.is_quitting() {
            self.mark_quitting();
            return ExitDecision::Allow;
        }

        match self.policy {
            PlatformPolicy::QuitOnLastWindowClosed => {
                self.mark_quitting();
                ExitDecision::Allow
            }
            PlatformPolicy::StayResident => {
                self.state = LifecycleState::AllWindowsClosed;
                ExitDecision::StayResident
            }
        }
    }

    pub(crate) fn on_activate(
        &mut self,
        open_windows: usize,
        main_window_present: bool,
    ) -> ActivateDecision {
        if matches!(
            self.state,
            LifecycleState::NotReady | LifecycleState::Quitting
        ) {
            return ActivateDecision::Ignore;
        }

        if open_windows == 0 {
            self.state = LifecycleState::Reactivated;
            return ActivateDecision::RecreateMainWindow;
        }
        if main_window_present {
            return ActivateDecision::FocusMainWindow;
        }
        ActivateDecision::Ignore
    }
}
