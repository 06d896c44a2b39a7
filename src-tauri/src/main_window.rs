use tauri::{AppHandle, Manager, WebviewWindow};

use crate::{content_loader, window_factory, ShellConfig, MAIN_WINDOW_LABEL};

pub(crate) fn create_main_window<F>(app_handle: &AppHandle, log: F) -> Result<WebviewWindow, String>
where
    F: Fn(&str),
{
    let config = app_handle.state::<ShellConfig>();
    log("creating main window");
    let window = window_factory::window_builder(
        app_handle,
        MAIN_WINDOW_LABEL,
        &config.main_window,
        window_factory::blank_page_url()?,
    )
    .build()
    .map_err(|error| format!("Failed to create main window: {error}"))?;

    if let Err(error) = window.maximize() {
        log(&format!("failed to maximize main window: {error}"));
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }

    spawn_main_content_load(app_handle.clone(), window.clone());
    Ok(window)
}

pub(crate) fn spawn_main_content_load(app_handle: AppHandle, window: WebviewWindow) {
    tauri::async_runtime::spawn_blocking(move || {
        content_loader::load_main_window_content(&app_handle, &window);
    });
}

pub(crate) fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("show_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

pub(crate) fn reload_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("reload_main_window skipped: main window not found");
        return;
    };

    log("reloading main window content");
    spawn_main_content_load(app_handle.clone(), window);
}
