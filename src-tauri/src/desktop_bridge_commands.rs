use tauri::{AppHandle, WebviewWindow};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_updater::UpdaterExt;

use crate::{
    append_desktop_log, append_update_log, context_menu, update_check, BridgeResult,
    DesktopAppUpdateCheckResult,
};

#[tauri::command]
pub(crate) fn desktop_bridge_is_desktop_runtime() -> bool {
    true
}

#[tauri::command]
pub(crate) fn desktop_bridge_show_context_menu(webview_window: WebviewWindow) -> BridgeResult {
    match context_menu::show_context_menu(&webview_window) {
        Ok(()) => BridgeResult::ok(),
        Err(error) => {
            append_desktop_log(&error);
            BridgeResult::failed(error)
        }
    }
}

#[tauri::command]
pub(crate) async fn desktop_bridge_check_app_update(
    app_handle: AppHandle,
) -> DesktopAppUpdateCheckResult {
    let current_version = app_handle.package_info().version.to_string();

    let updater = match app_handle.updater() {
        Ok(updater) => updater,
        Err(error) => {
            let reason = format!("Failed to initialize updater: {error}");
            append_update_log(&reason);
            return DesktopAppUpdateCheckResult {
                ok: false,
                reason: Some(reason),
                current_version,
                latest_version: None,
                has_update: false,
            };
        }
    };

    match updater.check().await {
        Ok(Some(update)) => DesktopAppUpdateCheckResult {
            ok: true,
            reason: None,
            has_update: update_check::is_newer_version(&current_version, &update.version),
            latest_version: Some(update.version.clone()),
            current_version,
        },
        Ok(None) => DesktopAppUpdateCheckResult {
            ok: true,
            reason: None,
            current_version: current_version.clone(),
            latest_version: Some(current_version),
            has_update: false,
        },
        Err(error) => {
            // ok=true keeps routine network or feed errors out of the UI.
            append_update_log(&format!("update check (silent): {error}"));
            DesktopAppUpdateCheckResult {
                ok: true,
                reason: None,
                current_version,
                latest_version: None,
                has_update: false,
            }
        }
    }
}

#[tauri::command]
pub(crate) async fn desktop_bridge_install_app_update(app_handle: AppHandle) -> BridgeResult {
    let updater = match app_handle.updater() {
        Ok(updater) => updater,
        Err(error) => {
            let reason = format!("Failed to initialize updater: {error}");
            append_update_log(&reason);
            return BridgeResult::failed(reason);
        }
    };

    let update = match updater.check().await {
        Ok(Some(update)) => update,
        Ok(None) => return BridgeResult::failed("Already on latest desktop version."),
        Err(error) => {
            let reason = format!("Failed to check desktop app update: {error}");
            append_update_log(&reason);
            return BridgeResult::failed(reason);
        }
    };

    let target_version = update.version.clone();
    let should_install = app_handle
        .dialog()
        .message(format!(
            "Ledger Desk {target_version} will be downloaded and installed, then the app restarts. Continue?"
        ))
        .title("Install Update")
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::YesNo)
        .blocking_show();
    if !should_install {
        append_update_log("user declined to install update");
        return BridgeResult {
            ok: true,
            reason: Some("user declined".to_string()),
        };
    }

    if let Err(reason) = update_check::download_and_install(&update).await {
        append_update_log(&reason);
        return BridgeResult::failed(reason);
    }

    append_update_log(&format!(
        "desktop app update installed to version {target_version}; restarting app"
    ));
    app_handle.request_restart();

    BridgeResult::ok()
}
