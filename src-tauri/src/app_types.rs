use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use url::Url;

use crate::lifecycle::{
    ActivateDecision, ExitDecision, LifecycleMachine, LifecycleState, PlatformPolicy,
};

#[derive(Debug)]
pub(crate) struct ShellState {
    pub(crate) lifecycle: Mutex<LifecycleMachine>,
    pub(crate) is_loading_main_content: AtomicBool,
    main_content_url: Mutex<Option<Url>>,
}

impl ShellState {
    pub(crate) fn new(policy: PlatformPolicy) -> Self {
        Self {
            lifecycle: Mutex::new(LifecycleMachine::new(policy)),
            is_loading_main_content: AtomicBool::new(false),
            main_content_url: Mutex::new(None),
        }
    }

    pub(crate) fn expect_main_content(&self, url: Url) {
        if let Ok(mut expected) = self.main_content_url.lock() {
            *expected = Some(url);
        }
    }

    pub(crate) fn expected_main_content(&self) -> Option<Url> {
        self.main_content_url
            .lock()
            .ok()
            .and_then(|expected| expected.clone())
    }

    pub(crate) fn mark_ready(&self) -> bool {
        self.lifecycle
            .lock()
            .map(|mut machine| machine.mark_ready())
            .unwrap_or(false)
    }

    pub(crate) fn mark_quitting(&self) {
        if let Ok(mut machine) = self.lifecycle.lock() {
            machine.mark_quitting();
        }
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.lifecycle
            .lock()
            .map(|machine| machine.is_quitting())
            .unwrap_or(true)
    }

    pub(crate) fn lifecycle_state(&self) -> Option<LifecycleState> {
        self.lifecycle.lock().ok().map(|machine| machine.state())
    }

    pub(crate) fn on_exit_requested(&self, code: Option<i32>) -> ExitDecision {
        self.lifecycle
            .lock()
            .map(|mut machine| machine.on_exit_requested(code))
            .unwrap_or(ExitDecision::Allow)
    }

    pub(crate) fn on_activate(
        &self,
        open_windows: usize,
        main_window_present: bool,
    ) -> ActivateDecision {
        self.lifecycle
            .lock()
            .map(|mut machine| machine.on_activate(open_windows, main_window_present))
            .unwrap_or(ActivateDecision::Ignore)
    }
}

#[derive(Debug, Default)]
pub(crate) struct UpdatePromptState {
    pub(crate) last_prompted_version: Mutex<Option<String>>,
}

impl UpdatePromptState {
    /// Records `version` and reports whether the user has not been asked about it yet.
    pub(crate) fn claim_prompt(&self, version: &str) -> bool {
        match self.last_prompted_version.lock() {
            Ok(mut guard) => {
                if guard.as_deref() == Some(version) {
                    return false;
                }
                *guard = Some(version.to_string());
                true
            }
            Err(_) => true,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct BridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl BridgeResult {
    pub(crate) fn ok() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DesktopAppUpdateCheckResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
    pub(crate) current_version: String,
    pub(crate) latest_version: Option<String>,
    pub(crate) has_update: bool,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateAvailablePayload {
    pub(crate) version: String,
    pub(crate) current_version: String,
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}
