use std::time::{Duration, Instant};

use semver::Version;
use tauri::{AppHandle, Emitter, EventTarget, Manager};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_updater::{Update, UpdaterExt};

use crate::{
    append_update_log, ShellState, UpdateAvailablePayload, UpdatePromptState, MAIN_WINDOW_LABEL,
    UPDATE_AVAILABLE_EVENT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpdateCheckTrigger {
    Startup,
    Scheduled,
    Manual,
}

impl UpdateCheckTrigger {
    fn as_str(self) -> &'static str {
        match self {
            UpdateCheckTrigger::Startup => "startup",
            UpdateCheckTrigger::Scheduled => "scheduled",
            UpdateCheckTrigger::Manual => "manual",
        }
    }
}

/// Falls back to plain inequality only when neither side is semver; a
/// mixed pair is never treated as an upgrade.
pub(crate) fn is_newer_version(current: &str, latest: &str) -> bool {
    let strip = |raw: &str| raw.trim().trim_start_matches('v').to_string();
    match (Version::parse(&strip(current)), Version::parse(&strip(latest))) {
        (Ok(current), Ok(latest)) => latest > current,
        (Err(_), Err(_)) => strip(current) != strip(latest),
        _ => false,
    }
}

pub(crate) fn should_prompt(trigger: UpdateCheckTrigger, first_prompt_for_version: bool) -> bool {
    trigger == UpdateCheckTrigger::Manual || first_prompt_for_version
}

pub(crate) fn spawn_update_checks(app_handle: AppHandle, interval: Option<Duration>) {
    let Some(interval) = interval else {
        append_update_log("automatic update checks are disabled");
        return;
    };

    tauri::async_runtime::spawn(async move {
        let mut trigger = UpdateCheckTrigger::Startup;
        loop {
            let quitting = app_handle
                .try_state::<ShellState>()
                .map(|state| state.is_quitting())
                .unwrap_or(false);
            if quitting {
                return;
            }

            run_update_check(&app_handle, trigger).await;
            tokio::time::sleep(interval).await;
            trigger = UpdateCheckTrigger::Scheduled;
        }
    });
}

fn show_info(app_handle: &AppHandle, title: &str, message: String) {
    app_handle
        .dialog()
        .message(message)
        .title(title)
        .kind(MessageDialogKind::Info)
        .blocking_show();
}

pub(crate) async fn run_update_check(app_handle: &AppHandle, trigger: UpdateCheckTrigger) {
    let current_version = app_handle.package_info().version.to_string();
    let updater = match app_handle.updater() {
        Ok(updater) => updater,
        Err(error) => {
            append_update_log(&format!("failed to initialize updater: {error}"));
            return;
        }
    };

    append_update_log(&format!(
        "checking for updates: trigger={} current_version={}",
        trigger.as_str(),
        current_version
    ));
    let check_started = Instant::now();
    let update = match updater.check().await {
        Ok(Some(update)) if is_newer_version(&current_version, &update.version) => update,
        Ok(Some(update)) => {
            append_update_log(&format!(
                "ignoring offered version {} (current {})",
                update.version, current_version
            ));
            return;
        }
        Ok(None) => {
            append_update_log(&format!(
                "check finished: has_update=false current_version={} elapsed_ms={}",
                current_version,
                check_started.elapsed().as_millis()
            ));
            if trigger == UpdateCheckTrigger::Manual {
                show_info(
                    app_handle,
                    "No Updates",
                    format!("Ledger Desk {current_version} is the latest version."),
                );
            }
            return;
        }
        Err(error) => {
            // Missing latest.json or no network are routine; keep them out of the UI.
            append_update_log(&format!(
                "check failed (silent): current_version={} elapsed_ms={} error={}",
                current_version,
                check_started.elapsed().as_millis(),
                error
            ));
            return;
        }
    };

    let new_version = update.version.clone();
    append_update_log(&format!(
        "check finished: has_update=true current_version={} latest_version={} elapsed_ms={}",
        current_version,
        new_version,
        check_started.elapsed().as_millis()
    ));

    if let Err(error) = app_handle.emit_to(
        EventTarget::webview_window(MAIN_WINDOW_LABEL),
        UPDATE_AVAILABLE_EVENT,
        UpdateAvailablePayload {
            version: new_version.clone(),
            current_version: current_version.clone(),
        },
    ) {
        append_update_log(&format!("failed to notify main window about update: {error}"));
    }

    let first_prompt = app_handle
        .try_state::<UpdatePromptState>()
        .map(|state| state.claim_prompt(&new_version))
        .unwrap_or(true);
    if !should_prompt(trigger, first_prompt) {
        append_update_log(&format!("already asked about {new_version}, not prompting again"));
        return;
    }

    let should_update = app_handle
        .dialog()
        .message(format!(
            "Ledger Desk {new_version} is available. Download and install it now?"
        ))
        .title("Update Available")
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::YesNo)
        .blocking_show();
    if !should_update {
        append_update_log("user postponed the update");
        return;
    }

    if let Err(reason) = download_and_install(&update).await {
        append_update_log(&reason);
        return;
    }

    append_update_log(&format!("update {new_version} installed, restarting"));
    app_handle.request_restart();
}

pub(crate) async fn download_and_install(update: &Update) -> Result<(), String> {
    append_update_log(&format!("downloading update {}", update.version));
    let bytes = update
        .download(|_, _| {}, || {})
        .await
        .map_err(|error| format!("Failed to download desktop app update: {error}"))?;
    update
        .install(&bytes)
        .map_err(|error| format!("Failed to install desktop app update: {error}"))
}
