use tauri::{AppHandle, ExitRequestApi, Manager};

use crate::{append_desktop_log, lifecycle::ExitDecision, ShellState};

pub(crate) fn handle_exit_requested(app_handle: &AppHandle, code: Option<i32>, api: &ExitRequestApi) {
    let Some(state) = app_handle.try_state::<ShellState>() else {
        return;
    };

    match state.on_exit_requested(code) {
        ExitDecision::Allow => {
            append_desktop_log(&format!("exit requested (code={code:?}), shutting down"));
        }
        ExitDecision::StayResident => {
            api.prevent_exit();
            append_desktop_log("all windows closed, staying resident until explicit quit");
        }
    }
}

pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    let state = app_handle
        .try_state::<ShellState>()
        .and_then(|state| state.lifecycle_state());
    append_desktop_log(&format!("desktop process exiting (lifecycle={state:?})"));
}
