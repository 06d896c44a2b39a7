#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_helpers;
mod app_runtime;
mod app_types;
mod content_loader;
mod context_menu;
mod desktop_bridge;
mod desktop_bridge_commands;
mod exit_events;
mod lifecycle;
mod logging;
mod main_window;
mod menu_actions;
mod menu_handler;
mod menu_setup;
mod print_errors;
mod print_job;
mod print_orchestrator;
mod print_router;
mod print_surface;
#[cfg(test)]
mod print_test_support;
mod runtime_paths;
mod shell_config;
mod update_check;
mod window_actions;
mod window_factory;

pub(crate) use app_constants::*;
pub(crate) use app_helpers::{
    append_content_log, append_desktop_error_log, append_desktop_log, append_print_log,
    append_startup_log, append_update_log,
};
pub(crate) use app_types::{
    AtomicFlagGuard, BridgeResult, DesktopAppUpdateCheckResult, ShellState,
    UpdateAvailablePayload, UpdatePromptState,
};
pub(crate) use shell_config::ShellConfig;

fn main() {
    app_runtime::run();
}
