use tauri::{
    menu::{Menu, MenuItem, PredefinedMenuItem, Submenu},
    AppHandle,
};

use crate::menu_actions;

pub fn setup_app_menu(app_handle: &AppHandle) -> Result<(), String> {
    let check_updates_item = MenuItem::with_id(
        app_handle,
        menu_actions::MENU_CHECK_FOR_UPDATES,
        "Check for Updates…",
        true,
        None::<&str>,
    )
    .map_err(|error| format!("Failed to create check-for-updates menu item: {error}"))?;
    let quit_item = MenuItem::with_id(
        app_handle,
        menu_actions::MENU_QUIT,
        "Quit",
        true,
        Some("CmdOrCtrl+Q"),
    )
    .map_err(|error| format!("Failed to create quit menu item: {error}"))?;
    let reload_item = MenuItem::with_id(
        app_handle,
        menu_actions::MENU_RELOAD_WINDOW,
        "Reload",
        true,
        Some("CmdOrCtrl+R"),
    )
    .map_err(|error| format!("Failed to create reload menu item: {error}"))?;

    let predefined = |result: tauri::Result<PredefinedMenuItem<tauri::Wry>>, name: &str| {
        result.map_err(|error| format!("Failed to create {name} menu item: {error}"))
    };
    let file_separator = predefined(PredefinedMenuItem::separator(app_handle), "separator")?;
    let undo = predefined(PredefinedMenuItem::undo(app_handle, None), "undo")?;
    let redo = predefined(PredefinedMenuItem::redo(app_handle, None), "redo")?;
    let edit_separator = predefined(PredefinedMenuItem::separator(app_handle), "separator")?;
    let cut = predefined(PredefinedMenuItem::cut(app_handle, None), "cut")?;
    let copy = predefined(PredefinedMenuItem::copy(app_handle, None), "copy")?;
    let paste = predefined(PredefinedMenuItem::paste(app_handle, None), "paste")?;
    let select_all = predefined(PredefinedMenuItem::select_all(app_handle, None), "select all")?;
    let fullscreen = predefined(PredefinedMenuItem::fullscreen(app_handle, None), "fullscreen")?;
    let minimize = predefined(PredefinedMenuItem::minimize(app_handle, None), "minimize")?;
    let close_window = predefined(PredefinedMenuItem::close_window(app_handle, None), "close")?;

    let file_menu = Submenu::with_items(
        app_handle,
        "File",
        true,
        &[&check_updates_item, &file_separator, &quit_item],
    )
    .map_err(|error| format!("Failed to build File menu: {error}"))?;
    let edit_menu = Submenu::with_items(
        app_handle,
        "Edit",
        true,
        &[&undo, &redo, &edit_separator, &cut, &copy, &paste, &select_all],
    )
    .map_err(|error| format!("Failed to build Edit menu: {error}"))?;
    let view_menu = Submenu::with_items(app_handle, "View", true, &[&reload_item, &fullscreen])
        .map_err(|error| format!("Failed to build View menu: {error}"))?;
    let window_menu = Submenu::with_items(app_handle, "Window", true, &[&minimize, &close_window])
        .map_err(|error| format!("Failed to build Window menu: {error}"))?;

    let menu = Menu::with_items(
        app_handle,
        &[&file_menu, &edit_menu, &view_menu, &window_menu],
    )
    .map_err(|error| format!("Failed to build application menu: {error}"))?;

    app_handle
        .set_menu(menu)
        .map_err(|error| format!("Failed to install application menu: {error}"))?;
    Ok(())
}
