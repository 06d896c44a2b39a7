use tauri::{AppHandle, Manager};

use crate::{lifecycle::ActivateDecision, main_window, ShellState, MAIN_WINDOW_LABEL};

/// Handles "activate": recreate the main window when nothing is open, otherwise focus it.
pub fn activate_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let windows = app_handle.webview_windows();
    let state = app_handle.state::<ShellState>();
    match state.on_activate(windows.len(), windows.contains_key(MAIN_WINDOW_LABEL)) {
        ActivateDecision::RecreateMainWindow => {
            log("activate with no open windows, recreating main window");
            if let Err(error) = main_window::create_main_window(app_handle, &log) {
                log(&format!("failed to recreate main window: {error}"));
            }
        }
        ActivateDecision::FocusMainWindow => main_window::show_main_window(app_handle, &log),
        ActivateDecision::Ignore => log("activate ignored"),
    }
}

pub fn reload_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    main_window::reload_main_window(app_handle, log);
}

pub fn quit_app<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let state = app_handle.state::<ShellState>();
    state.mark_quitting();
    log("quit requested, exiting desktop process");
    app_handle.exit(0);
}
