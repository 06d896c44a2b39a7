use std::path::Path;

use serde_json::Value;
use tauri::{utils::config::FrontendDist, AppHandle, Manager, WebviewWindow};

use crate::{
    append_print_log,
    content_loader,
    logging::LogLevel,
    print_job::{DocumentKind, PrintJobReport},
    print_orchestrator::{PrintOrchestrator, SurfaceFactory},
    print_surface::{SurfaceSignals, TauriSurfaceFactory, TemplateSource},
    ShellConfig,
};

pub(crate) type PrintDesk = PrintOrchestrator<TauriSurfaceFactory>;

/// Packaged builds check the bundle; dev builds check `frontendDist` on disk,
/// which the dev server serves templates from.
fn template_source(app_handle: &AppHandle) -> TemplateSource {
    if !tauri::is_dev() {
        return TemplateSource::Bundled;
    }
    match app_handle.config().build.frontend_dist.as_ref() {
        Some(FrontendDist::Directory(dir)) => {
            TemplateSource::Directory(Path::new(env!("CARGO_MANIFEST_DIR")).join(dir))
        }
        _ => {
            append_print_log(
                LogLevel::Warn,
                "frontendDist is not a directory, print templates are not checked before loading",
            );
            TemplateSource::Unchecked
        }
    }
}

pub(crate) fn build_print_desk(app_handle: &AppHandle, config: &ShellConfig) -> PrintDesk {
    let factory = TauriSurfaceFactory::new(
        app_handle.clone(),
        content_loader::app_asset_origin(app_handle),
        template_source(app_handle),
    );
    PrintOrchestrator::new(factory, config.print_window, config.print_options)
}

pub(crate) async fn route_print_request<F, L>(
    desk: Option<&PrintOrchestrator<F>>,
    kind: DocumentKind,
    data: Value,
    log: L,
) -> Result<PrintJobReport, String>
where
    F: SurfaceFactory,
    L: Fn(LogLevel, &str) + Send + Sync,
{
    log(
        LogLevel::Debug,
        &format!("ipc request {} received", kind.request_name()),
    );
    let Some(desk) = desk else {
        return Err("Print service is not ready.".to_string());
    };
    desk.submit(kind, data, log)
        .await
        .map_err(|error| error.to_string())
}

#[tauri::command]
pub(crate) async fn print_invoice(
    app_handle: AppHandle,
    data: Value,
) -> Result<PrintJobReport, String> {
    let desk = app_handle.try_state::<PrintDesk>();
    route_print_request(desk.as_deref(), DocumentKind::Invoice, data, append_print_log).await
}

#[tauri::command]
pub(crate) async fn print_statement(
    app_handle: AppHandle,
    data: Value,
) -> Result<PrintJobReport, String> {
    let desk = app_handle.try_state::<PrintDesk>();
    route_print_request(desk.as_deref(), DocumentKind::Statement, data, append_print_log).await
}

#[tauri::command]
pub(crate) async fn print_stock(
    app_handle: AppHandle,
    data: Value,
) -> Result<PrintJobReport, String> {
    let desk = app_handle.try_state::<PrintDesk>();
    route_print_request(desk.as_deref(), DocumentKind::Stock, data, append_print_log).await
}

fn surface_signals(app_handle: &AppHandle, label: &str) -> Option<std::sync::Arc<SurfaceSignals>> {
    let signals = app_handle
        .try_state::<PrintDesk>()
        .and_then(|desk| desk.factory().signals_for(label));
    if signals.is_none() {
        append_print_log(
            LogLevel::Debug,
            &format!("surface report from {label} ignored: no print job owns it"),
        );
    }
    signals
}

#[tauri::command]
pub(crate) fn print_surface_ready(
    app_handle: AppHandle,
    webview_window: WebviewWindow,
    path: String,
    renderer: bool,
) {
    let label = webview_window.label();
    let Some(signals) = surface_signals(&app_handle, label) else {
        return;
    };
    if !signals.report_ready(&path, renderer) {
        append_print_log(
            LogLevel::Debug,
            &format!("ready report from {label} at {path} arrived with no load pending"),
        );
    }
}

#[tauri::command]
pub(crate) fn print_surface_printed(
    app_handle: AppHandle,
    webview_window: WebviewWindow,
    ok: bool,
    reason: Option<String>,
) {
    let label = webview_window.label();
    let Some(signals) = surface_signals(&app_handle, label) else {
        return;
    };
    let result = if ok {
        Ok(())
    } else {
        Err(reason.unwrap_or_else(|| "print dialog failed".to_string()))
    };
    if !signals.report_printed(label, result) {
        append_print_log(
            LogLevel::Debug,
            &format!("print report from {label} arrived with no dialog pending"),
        );
    }
}
