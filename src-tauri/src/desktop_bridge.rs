use crate::{PRINT_DOCUMENT_EVENT, UPDATE_AVAILABLE_EVENT};

/// Which flavor of the preload bridge a window receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BridgeRole {
    Main,
    PrintSurface,
}

const BRIDGE_PRELUDE: &str = r#"
  if (window.__LEDGER_DESK_BRIDGE__) {
    return;
  }
  const tauri = () => window.__TAURI__;
  const invoke = (command, args) => tauri().core.invoke(command, args);
  const currentWindow = () => tauri().webviewWindow.getCurrentWebviewWindow();
"#;

const MAIN_BRIDGE_BODY: &str = r#"
  const bridge = {
    isDesktopRuntime: () => invoke('desktop_bridge_is_desktop_runtime'),
    printInvoice: (data) => invoke('print_invoice', { data }),
    printStatement: (data) => invoke('print_statement', { data }),
    printStock: (data) => invoke('print_stock', { data }),
    checkForUpdates: () => invoke('desktop_bridge_check_app_update'),
    installUpdate: () => invoke('desktop_bridge_install_app_update'),
    onUpdateAvailable: (handler) =>
      currentWindow().listen('__UPDATE_EVENT__', (event) => handler(event.payload)),
  };
  window.addEventListener('contextmenu', (event) => {
    const target = event.target;
    const editable = target && (target.isContentEditable || /^(INPUT|TEXTAREA)$/.test(target.tagName));
    const selection = window.getSelection && String(window.getSelection());
    if (!editable && !selection) {
      return;
    }
    event.preventDefault();
    invoke('desktop_bridge_show_context_menu').catch(() => {});
  });
"#;

// The page announces itself only after its listener is registered, so the
// payload is never emitted into the void. Handlers added by the template are
// replayed the last payload if it came first.
const PRINT_BRIDGE_BODY: &str = r#"
  let pending = null;
  let markReceived = null;
  const received = new Promise((resolve) => {
    markReceived = resolve;
  });
  const handlers = [];
  const announce = (listening) => {
    if (window.location.protocol === 'about:') {
      return;
    }
    const ready = (registered) =>
      invoke('print_surface_ready', {
        path: window.location.pathname,
        renderer: registered && handlers.length > 0,
      });
    const whenLoaded = (registered) => {
      if (document.readyState === 'complete') {
        ready(registered);
      } else {
        window.addEventListener('load', () => ready(registered), { once: true });
      }
    };
    listening.then(() => whenLoaded(true), () => whenLoaded(false));
  };
  const subscribe = () =>
    announce(
      currentWindow().listen('__PRINT_EVENT__', (event) => {
        pending = event.payload;
        handlers.forEach((handler) => handler(event.payload));
        markReceived();
      })
    );
  if (tauri()) {
    subscribe();
  } else {
    window.addEventListener('DOMContentLoaded', subscribe, { once: true });
  }
  const runPrint = () =>
    received
      .then(() => new Promise((resolve) => window.requestAnimationFrame(() => resolve())))
      .then(() => {
        let reported = false;
        const report = (ok, reason) => {
          if (reported) {
            return;
          }
          reported = true;
          invoke('print_surface_printed', { ok, reason: reason ?? null });
        };
        window.addEventListener('afterprint', () => report(true), { once: true });
        try {
          window.print();
        } catch (error) {
          report(false, String(error));
        }
      });
  Object.defineProperty(window, '__LEDGER_DESK_PRINT__', { value: runPrint });
  const bridge = {
    isDesktopRuntime: () => invoke('desktop_bridge_is_desktop_runtime'),
    onPrintDocument: (handler) => {
      handlers.push(handler);
      if (pending !== null) {
        handler(pending);
      }
    },
  };
"#;

const BRIDGE_EPILOGUE: &str = r#"
  Object.defineProperty(window, '__LEDGER_DESK_BRIDGE__', { value: bridge });
  window.desktopShell = bridge;
"#;

pub(crate) fn bridge_script(role: BridgeRole) -> String {
    let body = match role {
        BridgeRole::Main => MAIN_BRIDGE_BODY.replace("__UPDATE_EVENT__", UPDATE_AVAILABLE_EVENT),
        BridgeRole::PrintSurface => PRINT_BRIDGE_BODY.replace("__PRINT_EVENT__", PRINT_DOCUMENT_EVENT),
    };
    format!("(() => {{{BRIDGE_PRELUDE}{body}{BRIDGE_EPILOGUE}}})();")
}
