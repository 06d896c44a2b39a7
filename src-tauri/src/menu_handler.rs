use tauri::AppHandle;

use crate::{
    append_desktop_log, append_update_log, menu_actions, update_check, window_actions,
};

pub fn handle_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match menu_actions::action_from_menu_id(menu_id) {
        Some(menu_actions::AppMenuAction::ReloadWindow) => {
            window_actions::reload_main_window(app_handle, append_desktop_log)
        }
        Some(menu_actions::AppMenuAction::CheckForUpdates) => {
            append_update_log("update check requested from menu");
            let app_handle_cloned = app_handle.clone();
            tauri::async_runtime::spawn(async move {
                update_check::run_update_check(
                    &app_handle_cloned,
                    update_check::UpdateCheckTrigger::Manual,
                )
                .await;
            });
        }
        Some(menu_actions::AppMenuAction::Quit) => {
            window_actions::quit_app(app_handle, append_desktop_log)
        }
        None => {}
    }
}
