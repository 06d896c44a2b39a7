use tauri::{webview::PageLoadEvent, Manager, RunEvent};

use crate::{
    append_content_log, append_desktop_error_log, append_desktop_log, append_startup_log,
    content_loader, context_menu, exit_events, logging::LogLevel, main_window, menu_handler, menu_setup,
    print_router, update_check, window_actions, ShellConfig, ShellState, UpdatePromptState,
    MAIN_WINDOW_LABEL,
};

pub(crate) fn run() {
    let config = ShellConfig::from_env(!tauri::is_dev());

    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        crate::app_helpers::desktop_logger().path().display()
    ));
    append_startup_log(&format!(
        "run mode: {} (platform policy {:?})",
        config.run_mode.as_str(),
        config.platform_policy
    ));

    let app = tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, _argv, _cwd| {
            append_desktop_log("second instance launched, activating main window");
            window_actions::activate_main_window(app_handle, append_desktop_log);
        }))
        .plugin(tauri_plugin_updater::Builder::new().build())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_process::init())
        .manage(ShellState::new(config.platform_policy))
        .manage(UpdatePromptState::default())
        .invoke_handler(tauri::generate_handler![
            crate::print_router::print_invoice,
            crate::print_router::print_statement,
            crate::print_router::print_stock,
            crate::print_router::print_surface_ready,
            crate::print_router::print_surface_printed,
            crate::desktop_bridge_commands::desktop_bridge_is_desktop_runtime,
            crate::desktop_bridge_commands::desktop_bridge_show_context_menu,
            crate::desktop_bridge_commands::desktop_bridge_check_app_update,
            crate::desktop_bridge_commands::desktop_bridge_install_app_update,
        ])
        .on_menu_event(|app_handle, event| {
            menu_handler::handle_menu_event(app_handle, event.id().as_ref());
        })
        .on_page_load(|webview, payload| {
            let label = webview.label().to_string();
            match payload.event() {
                PageLoadEvent::Started => append_content_log(
                    LogLevel::Debug,
                    &format!("page-load started in {label}: {}", payload.url()),
                ),
                PageLoadEvent::Finished => {
                    append_content_log(
                        LogLevel::Debug,
                        &format!("page-load finished in {label}: {}", payload.url()),
                    );
                    if label == MAIN_WINDOW_LABEL {
                        content_loader::verify_main_page_load(webview.app_handle(), payload.url());
                    }
                }
            }
        })
        .setup(move |app| {
            let app_handle = app.handle().clone();
            if !app_handle.state::<ShellState>().mark_ready() {
                append_startup_log("ready signal received twice, ignoring");
            }

            if let Err(error) = context_menu::setup_context_menu(&app_handle) {
                append_desktop_error_log(&format!("failed to initialize context menu: {error}"));
            }

            app.manage(print_router::build_print_desk(&app_handle, &config));
            append_startup_log("ipc routes registered: print-invoice, print-statement, print-stock");

            if let Err(error) = menu_setup::setup_app_menu(&app_handle) {
                append_desktop_error_log(&format!("failed to initialize app menu: {error}"));
            }

            let update_check_interval = config.update_check_interval;
            app.manage(config);

            if let Err(error) = main_window::create_main_window(&app_handle, append_startup_log) {
                append_desktop_error_log(&error);
            }

            update_check::spawn_update_checks(app_handle, update_check_interval);
            Ok(())
        })
        .build(tauri::generate_context!());

    let app = match app {
        Ok(app) => app,
        Err(error) => {
            append_desktop_error_log(&format!("failed to build desktop application: {error}"));
            std::process::exit(1);
        }
    };

    app.run(|app_handle, event| match event {
        RunEvent::ExitRequested { code, api, .. } => {
            exit_events::handle_exit_requested(app_handle, code, &api);
        }
        RunEvent::Exit => {
            exit_events::handle_exit_event(app_handle);
        }
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            window_actions::activate_main_window(app_handle, append_desktop_log);
        }
        _ => {}
    });
}
