use std::{env, time::Duration};

use serde::Serialize;
use url::Url;

use crate::{
    desktop_bridge::BridgeRole, lifecycle::PlatformPolicy, DEFAULT_DEV_SERVER_URL,
    DEFAULT_UPDATE_CHECK_INTERVAL_MINS, DEV_MODE_ENV, DEV_SERVER_URL_ENV, PACKAGED_ENTRY_PATH,
    UPDATE_CHECK_INTERVAL_ENV,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunMode {
    Development,
    Production,
}

impl RunMode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            RunMode::Development => "development",
            RunMode::Production => "production",
        }
    }
}

/// Declarative description of a webview window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WindowConfig {
    pub(crate) title: &'static str,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) visible: bool,
    pub(crate) preload: BridgeRole,
}

pub(crate) const MAIN_WINDOW_CONFIG: WindowConfig = WindowConfig {
    title: "Ledger Desk",
    width: 800.0,
    height: 600.0,
    visible: false,
    preload: BridgeRole::Main,
};

// A4 at 96 dpi, one config for every document kind.
pub(crate) const PRINT_WINDOW_CONFIG: WindowConfig = WindowConfig {
    title: "Ledger Desk Print",
    width: 706.95553,
    height: 1000.0,
    visible: false,
    preload: BridgeRole::PrintSurface,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub(crate) enum MarginsMode {
    Default = 0,
}

impl From<MarginsMode> for u8 {
    fn from(mode: MarginsMode) -> Self {
        mode as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PrintOptions {
    pub(crate) silent: bool,
    pub(crate) margins_mode: MarginsMode,
}

pub(crate) const PRINT_OPTIONS: PrintOptions = PrintOptions {
    silent: false,
    margins_mode: MarginsMode::Default,
};

/// Startup configuration, resolved once and read-only afterwards.
#[derive(Debug, Clone)]
pub(crate) struct ShellConfig {
    pub(crate) run_mode: RunMode,
    pub(crate) platform_policy: PlatformPolicy,
    pub(crate) dev_server_url: Url,
    pub(crate) packaged_entry: &'static str,
    pub(crate) main_window: WindowConfig,
    pub(crate) print_window: WindowConfig,
    pub(crate) print_options: PrintOptions,
    pub(crate) update_check_interval: Option<Duration>,
}

impl ShellConfig {
    pub(crate) fn from_env(is_packaged: bool) -> Self {
        Self::from_lookup(|key| env::var(key).ok(), is_packaged)
    }

    pub(crate) fn from_lookup<F>(lookup: F, is_packaged: bool) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            run_mode: resolve_run_mode(lookup(DEV_MODE_ENV).as_deref(), is_packaged),
            platform_policy: PlatformPolicy::current(),
            dev_server_url: normalize_dev_server_url(
                lookup(DEV_SERVER_URL_ENV).as_deref().unwrap_or_default(),
            ),
            packaged_entry: PACKAGED_ENTRY_PATH,
            main_window: MAIN_WINDOW_CONFIG,
            print_window: PRINT_WINDOW_CONFIG,
            print_options: PRINT_OPTIONS,
            update_check_interval: resolve_update_check_interval(
                lookup(UPDATE_CHECK_INTERVAL_ENV).as_deref(),
            ),
        }
    }
}

/// Integer prefix of `raw`, ignoring leading whitespace; `"1abc"` yields 1.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

pub(crate) fn resolve_run_mode(override_value: Option<&str>, is_packaged: bool) -> RunMode {
    let development = match override_value {
        Some(raw) => parse_leading_int(raw) == Some(1),
        None => !is_packaged,
    };
    if development {
        RunMode::Development
    } else {
        RunMode::Production
    }
}

pub(crate) fn normalize_dev_server_url(raw: &str) -> Url {
    let fallback = || Url::parse(DEFAULT_DEV_SERVER_URL).expect("default dev server URL is valid");
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return fallback();
    }

    match Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => parsed,
        _ => fallback(),
    }
}

fn resolve_update_check_interval(raw: Option<&str>) -> Option<Duration> {
    let minutes = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_UPDATE_CHECK_INTERVAL_MINS);
    if minutes == 0 {
        return None;
    }
    let seconds = minutes
        .checked_mul(60)
        .unwrap_or(DEFAULT_UPDATE_CHECK_INTERVAL_MINS * 60);
    Some(Duration::from_secs(seconds))
}
