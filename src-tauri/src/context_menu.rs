use tauri::{
    menu::{Menu, PredefinedMenuItem},
    AppHandle, Manager, WebviewWindow,
};

use crate::append_desktop_log;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContextMenuEntry {
    Cut,
    Copy,
    Paste,
}

// Clipboard entries only.
pub(crate) const CONTEXT_MENU_ENTRIES: [ContextMenuEntry; 3] = [
    ContextMenuEntry::Cut,
    ContextMenuEntry::Copy,
    ContextMenuEntry::Paste,
];

pub(crate) struct ContextMenuState {
    menu: Menu<tauri::Wry>,
}

fn build_entry(
    app_handle: &AppHandle,
    entry: ContextMenuEntry,
) -> tauri::Result<PredefinedMenuItem<tauri::Wry>> {
    match entry {
        ContextMenuEntry::Cut => PredefinedMenuItem::cut(app_handle, None),
        ContextMenuEntry::Copy => PredefinedMenuItem::copy(app_handle, None),
        ContextMenuEntry::Paste => PredefinedMenuItem::paste(app_handle, None),
    }
}

pub fn setup_context_menu(app_handle: &AppHandle) -> Result<(), String> {
    let menu = Menu::new(app_handle)
        .map_err(|error| format!("Failed to create context menu: {error}"))?;
    for entry in CONTEXT_MENU_ENTRIES {
        let item = build_entry(app_handle, entry)
            .map_err(|error| format!("Failed to create context menu item {entry:?}: {error}"))?;
        menu.append(&item)
            .map_err(|error| format!("Failed to append context menu item {entry:?}: {error}"))?;
    }

    if !app_handle.manage(ContextMenuState { menu }) {
        append_desktop_log("context menu state already exists, skipping manage");
    }
    Ok(())
}

pub fn show_context_menu(window: &WebviewWindow) -> Result<(), String> {
    let state = window
        .app_handle()
        .try_state::<ContextMenuState>()
        .ok_or_else(|| "Context menu is not initialized.".to_string())?;
    window
        .popup_menu(&state.menu)
        .map_err(|error| format!("Failed to show context menu: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_menu_only_offers_clipboard_entries() {
        assert_eq!(
            CONTEXT_MENU_ENTRIES,
            [
                ContextMenuEntry::Cut,
                ContextMenuEntry::Copy,
                ContextMenuEntry::Paste
            ]
        );
    }
}
