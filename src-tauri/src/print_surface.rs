use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use serde_json::Value;
use tauri::{AppHandle, Emitter, EventTarget, Manager, WebviewWindow, WindowEvent};
use tokio::sync::oneshot;
use url::Url;

use crate::{
    append_print_log,
    logging::LogLevel,
    print_errors::PrintError,
    print_orchestrator::{LoadSignal, PrintSignal, RenderSurface, SurfaceFactory},
    shell_config::{PrintOptions, WindowConfig},
    window_factory,
};

/// Where print templates come from, used to reject missing ones before navigating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TemplateSource {
    /// Embedded in the app bundle.
    Bundled,
    /// Served by the dev server out of this directory.
    Directory(PathBuf),
    Unchecked,
}

impl TemplateSource {
    pub(crate) fn contains<R>(&self, template: &str, bundled: R) -> bool
    where
        R: Fn(&str) -> bool,
    {
        match self {
            TemplateSource::Bundled => bundled(template),
            TemplateSource::Directory(root) => root.join(template).is_file(),
            TemplateSource::Unchecked => true,
        }
    }
}

type Reply = oneshot::Sender<Result<(), PrintError>>;

struct PendingLoad {
    template: String,
    reply: Reply,
}

pub(crate) fn template_path_matches(path: &str, template: &str) -> bool {
    path.trim_start_matches('/') == template.trim_start_matches('/')
}

/// Page-side handshakes for one surface: "ready to render" and "dialog closed".
#[derive(Default)]
pub(crate) struct SurfaceSignals {
    load: Mutex<Option<PendingLoad>>,
    print: Mutex<Option<Reply>>,
}

impl SurfaceSignals {
    fn arm_load(&self, template: &str) -> Result<LoadSignal, String> {
        let (reply, receiver) = oneshot::channel();
        let mut slot = self
            .load
            .lock()
            .map_err(|_| "pending load lock poisoned".to_string())?;
        *slot = Some(PendingLoad {
            template: template.to_string(),
            reply,
        });
        Ok(receiver)
    }

    fn arm_print(&self) -> Result<PrintSignal, String> {
        let (reply, receiver) = oneshot::channel();
        let mut slot = self
            .print
            .lock()
            .map_err(|_| "pending print lock poisoned".to_string())?;
        *slot = Some(reply);
        Ok(receiver)
    }

    fn disarm(&self) {
        if let Ok(mut slot) = self.load.lock() {
            slot.take();
        }
        if let Ok(mut slot) = self.print.lock() {
            slot.take();
        }
    }

    /// The page at `path` has its event listener registered; `renderer` says
    /// whether a template handler claimed the payload. Returns false when no
    /// load was waiting.
    pub(crate) fn report_ready(&self, path: &str, renderer: bool) -> bool {
        let Some(pending) = self.load.lock().ok().and_then(|mut slot| slot.take()) else {
            return false;
        };

        let outcome = if !template_path_matches(path, &pending.template) {
            Err(PrintError::LoadFailed {
                template: pending.template,
                reason: format!("surface landed on {path}"),
            })
        } else if !renderer {
            Err(PrintError::LoadFailed {
                template: pending.template,
                reason: format!("page at {path} did not register a print renderer"),
            })
        } else {
            Ok(())
        };
        let _ = pending.reply.send(outcome);
        true
    }

    pub(crate) fn report_printed(&self, label: &str, result: Result<(), String>) -> bool {
        let Some(reply) = self.print.lock().ok().and_then(|mut slot| slot.take()) else {
            return false;
        };
        let _ = reply.send(result.map_err(|reason| PrintError::PrintFailed {
            label: label.to_string(),
            reason,
        }));
        true
    }
}

/// Drops any pending handshake so the job sees the surface as terminated.
/// Returns whether the destruction was unexpected.
pub(crate) fn handle_surface_destroyed<L>(
    label: &str,
    signals: &SurfaceSignals,
    released: &AtomicBool,
    log: L,
) -> bool
where
    L: Fn(LogLevel, &str),
{
    let unexpected = !released.load(Ordering::SeqCst);
    if unexpected {
        log(
            LogLevel::Warn,
            &format!("print surface {label} was destroyed before its job completed"),
        );
    }
    signals.disarm();
    unexpected
}

type SignalRegistry = Arc<Mutex<HashMap<String, Arc<SurfaceSignals>>>>;

fn unregister(registry: &SignalRegistry, label: &str) {
    if let Ok(mut surfaces) = registry.lock() {
        surfaces.remove(label);
    }
}

pub(crate) struct TauriSurfaceFactory {
    app_handle: AppHandle,
    asset_origin: Url,
    templates: TemplateSource,
    registry: SignalRegistry,
}

impl TauriSurfaceFactory {
    pub(crate) fn new(app_handle: AppHandle, asset_origin: Url, templates: TemplateSource) -> Self {
        Self {
            app_handle,
            asset_origin,
            templates,
            registry: SignalRegistry::default(),
        }
    }

    pub(crate) fn signals_for(&self, label: &str) -> Option<Arc<SurfaceSignals>> {
        self.registry
            .lock()
            .ok()
            .and_then(|surfaces| surfaces.get(label).cloned())
    }
}

impl SurfaceFactory for TauriSurfaceFactory {
    type Surface = TauriPrintSurface;

    fn acquire(&self, label: &str, config: &WindowConfig) -> Result<TauriPrintSurface, PrintError> {
        let unavailable = |reason: String| PrintError::SurfaceUnavailable {
            label: label.to_string(),
            reason,
        };

        let window = window_factory::window_builder(
            &self.app_handle,
            label,
            config,
            window_factory::blank_page_url().map_err(unavailable)?,
        )
        .skip_taskbar(true)
        .build()
        .map_err(|error| unavailable(error.to_string()))?;

        if let Err(error) = window.remove_menu() {
            append_print_log(
                LogLevel::Debug,
                &format!("failed to strip menu from print surface {label}: {error}"),
            );
        }

        let signals = Arc::new(SurfaceSignals::default());
        let released = Arc::new(AtomicBool::new(false));
        let destroyed = Arc::new(AtomicBool::new(false));
        self.registry
            .lock()
            .map_err(|_| unavailable("surface registry lock poisoned".to_string()))?
            .insert(label.to_string(), signals.clone());

        let event_label = label.to_string();
        let event_signals = signals.clone();
        let event_released = released.clone();
        let event_destroyed = destroyed.clone();
        let event_registry = self.registry.clone();
        window.on_window_event(move |event| {
            if !matches!(event, WindowEvent::Destroyed) {
                return;
            }
            event_destroyed.store(true, Ordering::SeqCst);
            unregister(&event_registry, &event_label);
            handle_surface_destroyed(
                &event_label,
                &event_signals,
                &event_released,
                append_print_log,
            );
        });

        Ok(TauriPrintSurface {
            window,
            app_handle: self.app_handle.clone(),
            asset_origin: self.asset_origin.clone(),
            templates: self.templates.clone(),
            registry: self.registry.clone(),
            signals,
            released,
            destroyed,
        })
    }
}

pub(crate) struct TauriPrintSurface {
    window: WebviewWindow,
    app_handle: AppHandle,
    asset_origin: Url,
    templates: TemplateSource,
    registry: SignalRegistry,
    signals: Arc<SurfaceSignals>,
    released: Arc<AtomicBool>,
    destroyed: Arc<AtomicBool>,
}

impl TauriPrintSurface {
    fn failure(&self, reason: impl ToString) -> (String, String) {
        (self.window.label().to_string(), reason.to_string())
    }
}

impl RenderSurface for TauriPrintSurface {
    fn label(&self) -> &str {
        self.window.label()
    }

    fn load(&self, template: &str) -> Result<LoadSignal, PrintError> {
        let load_failed = |reason: String| PrintError::LoadFailed {
            template: template.to_string(),
            reason,
        };

        let bundled = |path: &str| self.app_handle.asset_resolver().get(path.to_string()).is_some();
        if !self.templates.contains(template, bundled) {
            return Err(PrintError::TemplateMissing {
                template: template.to_string(),
            });
        }

        let url = self
            .asset_origin
            .join(template)
            .map_err(|error| load_failed(error.to_string()))?;
        let target = serde_json::to_string(url.as_str())
            .map_err(|error| load_failed(error.to_string()))?;

        let receiver = self.signals.arm_load(template).map_err(load_failed)?;
        if let Err(error) = self
            .window
            .eval(&format!("window.location.replace({target});"))
        {
            self.signals.disarm();
            return Err(load_failed(error.to_string()));
        }
        Ok(receiver)
    }

    fn show(&self) -> Result<(), PrintError> {
        self.window.show().map_err(|error| {
            let (label, reason) = self.failure(error);
            PrintError::ShowFailed { label, reason }
        })
    }

    fn deliver(&self, event: &str, payload: &Value) -> Result<(), PrintError> {
        self.window
            .emit_to(
                EventTarget::webview_window(self.window.label()),
                event,
                payload,
            )
            .map_err(|error| {
                let (label, reason) = self.failure(error);
                PrintError::DeliveryFailed { label, reason }
            })
    }

    // The page opens the dialog once the payload is rendered and reports back
    // on `afterprint`. The webview dialog has no options, so `options` is only
    // recorded; `{ silent: false, marginsMode: 0 }` is its default behavior.
    fn print(&self, options: &PrintOptions) -> Result<PrintSignal, PrintError> {
        append_print_log(
            LogLevel::Debug,
            &format!(
                "opening print dialog on {} (silent={}, margins={})",
                self.window.label(),
                options.silent,
                u8::from(options.margins_mode)
            ),
        );
        let print_failed = |reason: String| {
            let (label, reason) = self.failure(reason);
            PrintError::PrintFailed { label, reason }
        };

        let receiver = self.signals.arm_print().map_err(print_failed)?;
        if let Err(error) = self.window.eval("window.__LEDGER_DESK_PRINT__();") {
            self.signals.disarm();
            return Err(print_failed(error.to_string()));
        }
        Ok(receiver)
    }

    fn release(&self) -> Result<(), PrintError> {
        self.released.store(true, Ordering::SeqCst);
        unregister(&self.registry, self.window.label());
        if self.is_destroyed() {
            return Ok(());
        }
        self.window.destroy().map_err(|error| {
            let (label, reason) = self.failure(error);
            PrintError::ReleaseFailed { label, reason }
        })
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
}
