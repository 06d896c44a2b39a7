use tauri::{AppHandle, WebviewUrl, WebviewWindowBuilder, Wry};
use url::Url;

use crate::{desktop_bridge, shell_config::WindowConfig};

pub(crate) fn blank_page_url() -> Result<WebviewUrl, String> {
    Url::parse("about:blank")
        .map(WebviewUrl::External)
        .map_err(|error| format!("Invalid blank page URL: {error}"))
}

/// Builder preloaded with `config`; callers attach their own hooks and build it.
pub(crate) fn window_builder<'a>(
    app_handle: &'a AppHandle,
    label: &str,
    config: &WindowConfig,
    url: WebviewUrl,
) -> WebviewWindowBuilder<'a, Wry, AppHandle> {
    let preload = desktop_bridge::bridge_script(config.preload);
    WebviewWindowBuilder::new(app_handle, label, url)
        .title(config.title)
        .inner_size(config.width, config.height)
        .visible(config.visible)
        .initialization_script(&preload)
}
