use std::{
    net::{TcpStream, ToSocketAddrs},
    thread,
    time::Duration,
};

use tauri::{AppHandle, Manager, WebviewWindow};
use url::Url;

use crate::{
    append_content_log, logging::LogLevel, shell_config::RunMode, AtomicFlagGuard, ShellConfig,
    ShellState,
};

const DEV_SERVER_PROBE_TIMEOUT: Duration = Duration::from_millis(800);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code} - {description}")]
pub(crate) struct LoadFailure {
    pub(crate) code: i32,
    pub(crate) description: String,
}

impl LoadFailure {
    // Chromium net error numbering, matching what webviews report.
    pub(crate) const ERR_FAILED: i32 = -2;
    pub(crate) const ERR_FILE_NOT_FOUND: i32 = -6;
    pub(crate) const ERR_CONNECTION_REFUSED: i32 = -102;
    pub(crate) const ERR_INVALID_URL: i32 = -300;

    pub(crate) fn new(code: i32, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ContentTarget {
    DevServer(Url),
    Packaged { entry: &'static str, url: Url },
}

impl ContentTarget {
    pub(crate) fn url(&self) -> &Url {
        match self {
            ContentTarget::DevServer(url) => url,
            ContentTarget::Packaged { url, .. } => url,
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            ContentTarget::DevServer(_) => "development URL",
            ContentTarget::Packaged { .. } => "packaged entry",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct LoadPolicy {
    pub(crate) attempts: u32,
    pub(crate) retry_delay: Duration,
}

pub(crate) const MAIN_CONTENT_LOAD_POLICY: LoadPolicy = LoadPolicy {
    attempts: 2,
    retry_delay: Duration::from_secs(1),
};

pub(crate) trait ContentSurface {
    fn probe(&self, target: &ContentTarget) -> Result<(), LoadFailure>;
    fn navigate(&self, url: &Url) -> Result<(), LoadFailure>;
}

pub(crate) fn packaged_asset_origin() -> Url {
    let raw = if cfg!(any(target_os = "windows", target_os = "android")) {
        "http://tauri.localhost/"
    } else {
        "tauri://localhost/"
    };
    Url::parse(raw).expect("asset protocol origin is a valid URL")
}

/// Origin that serves bundled frontend files (templates and the packaged entry).
pub(crate) fn app_asset_origin(app_handle: &AppHandle) -> Url {
    if tauri::is_dev() {
        if let Some(dev_url) = app_handle.config().build.dev_url.clone() {
            return dev_url;
        }
    }
    packaged_asset_origin()
}

pub(crate) fn resolve_content_target(
    run_mode: RunMode,
    dev_server_url: &Url,
    asset_origin: &Url,
    packaged_entry: &'static str,
) -> Result<ContentTarget, LoadFailure> {
    match run_mode {
        RunMode::Development => Ok(ContentTarget::DevServer(dev_server_url.clone())),
        RunMode::Production => asset_origin
            .join(packaged_entry)
            .map(|url| ContentTarget::Packaged {
                entry: packaged_entry,
                url,
            })
            .map_err(|error| {
                LoadFailure::new(
                    LoadFailure::ERR_INVALID_URL,
                    format!("invalid packaged entry {packaged_entry}: {error}"),
                )
            }),
    }
}

/// Points the window at `target`, re-attempting per `policy`. Safe to call
/// again after a failure: it only ever navigates the given window.
pub(crate) fn load_main_content<S, L>(
    surface: &S,
    target: &ContentTarget,
    policy: &LoadPolicy,
    log: L,
) -> Result<(), LoadFailure>
where
    S: ContentSurface,
    L: Fn(LogLevel, &str),
{
    let attempts = policy.attempts.max(1);
    log(
        LogLevel::Info,
        &format!("loading {}: {}", target.describe(), target.url()),
    );

    let mut attempt = 1;
    loop {
        let result = surface
            .probe(target)
            .and_then(|()| surface.navigate(target.url()));
        match result {
            Ok(()) => {
                log(
                    LogLevel::Info,
                    &format!("{} loaded: {}", target.describe(), target.url()),
                );
                return Ok(());
            }
            Err(failure) => {
                log(LogLevel::Error, &format!("did-fail-load: {failure}"));
                if attempt >= attempts {
                    return Err(failure);
                }
            }
        }

        attempt += 1;
        log(
            LogLevel::Warn,
            &format!(
                "retrying {} (attempt {attempt}/{attempts})",
                target.describe()
            ),
        );
        thread::sleep(policy.retry_delay);
    }
}

fn probe_tcp(url: &Url, timeout: Duration) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let port = url.port_or_known_default().unwrap_or(80);
    let addrs = match (host, port).to_socket_addrs() {
        Ok(addrs) => addrs.collect::<Vec<_>>(),
        Err(_) => return false,
    };
    addrs
        .iter()
        .any(|address| TcpStream::connect_timeout(address, timeout).is_ok())
}

struct TauriContentSurface<'a> {
    app_handle: &'a AppHandle,
    window: &'a WebviewWindow,
    verify_assets: bool,
}

impl ContentSurface for TauriContentSurface<'_> {
    fn probe(&self, target: &ContentTarget) -> Result<(), LoadFailure> {
        match target {
            ContentTarget::DevServer(url) => {
                if probe_tcp(url, DEV_SERVER_PROBE_TIMEOUT) {
                    Ok(())
                } else {
                    Err(LoadFailure::new(
                        LoadFailure::ERR_CONNECTION_REFUSED,
                        format!("ERR_CONNECTION_REFUSED ({url})"),
                    ))
                }
            }
            ContentTarget::Packaged { entry, .. } => {
                if !self.verify_assets
                    || self.app_handle.asset_resolver().get(entry.to_string()).is_some()
                {
                    Ok(())
                } else {
                    Err(LoadFailure::new(
                        LoadFailure::ERR_FILE_NOT_FOUND,
                        format!("ERR_FILE_NOT_FOUND ({entry})"),
                    ))
                }
            }
        }
    }

    fn navigate(&self, url: &Url) -> Result<(), LoadFailure> {
        let target = serde_json::to_string(url.as_str()).map_err(|error| {
            LoadFailure::new(LoadFailure::ERR_INVALID_URL, error.to_string())
        })?;
        self.window
            .eval(&format!("window.location.replace({target});"))
            .map_err(|error| LoadFailure::new(LoadFailure::ERR_FAILED, error.to_string()))
    }
}

fn same_site(url: &Url, expected: &Url) -> bool {
    url.scheme() == expected.scheme()
        && url.host_str() == expected.host_str()
        && url.port_or_known_default() == expected.port_or_known_default()
}

/// Compares where the main window actually landed with the target it was sent
/// to. A dev-server root accepts any route on the same site.
pub(crate) fn check_main_page_load(url: &Url, expected: &Url) -> Result<(), LoadFailure> {
    if url.scheme() == "about" {
        return Ok(());
    }
    let path_ok = expected.path() == "/" || url.path() == expected.path();
    if same_site(url, expected) && path_ok {
        return Ok(());
    }
    Err(LoadFailure::new(
        LoadFailure::ERR_FAILED,
        format!("landed on {url} instead of {expected}"),
    ))
}

pub(crate) fn verify_main_page_load(app_handle: &AppHandle, url: &Url) {
    let Some(expected) = app_handle
        .try_state::<ShellState>()
        .and_then(|state| state.expected_main_content())
    else {
        return;
    };
    if let Err(failure) = check_main_page_load(url, &expected) {
        append_content_log(LogLevel::Error, &format!("did-fail-load: {failure}"));
    }
}

pub(crate) fn load_main_window_content(app_handle: &AppHandle, window: &WebviewWindow) {
    let state = app_handle.state::<ShellState>();
    let Some(_loading) = AtomicFlagGuard::try_set(&state.is_loading_main_content) else {
        append_content_log(
            LogLevel::Debug,
            "main content load already in progress, skipping",
        );
        return;
    };

    let config = app_handle.state::<ShellConfig>();
    let asset_origin = app_asset_origin(app_handle);
    let target = match resolve_content_target(
        config.run_mode,
        &config.dev_server_url,
        &asset_origin,
        config.packaged_entry,
    ) {
        Ok(target) => target,
        Err(failure) => {
            append_content_log(LogLevel::Error, &format!("did-fail-load: {failure}"));
            return;
        }
    };

    let surface = TauriContentSurface {
        app_handle,
        window,
        verify_assets: !tauri::is_dev(),
    };
    state.expect_main_content(target.url().clone());
    if let Err(failure) = load_main_content(
        &surface,
        &target,
        &MAIN_CONTENT_LOAD_POLICY,
        append_content_log,
    ) {
        append_content_log(
            LogLevel::Error,
            &format!("giving up on {}: {failure}", target.url()),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, collections::VecDeque};

    use super::*;

    struct FakeContentSurface {
        probe_results: RefCell<VecDeque<Result<(), LoadFailure>>>,
        navigations: RefCell<Vec<String>>,
    }

    impl FakeContentSurface {
        fn with_probes(results: Vec<Result<(), LoadFailure>>) -> Self {
            Self {
                probe_results: RefCell::new(results.into()),
                navigations: RefCell::new(Vec::new()),
            }
        }
    }

    impl ContentSurface for FakeContentSurface {
        fn probe(&self, _target: &ContentTarget) -> Result<(), LoadFailure> {
            self.probe_results
                .borrow_mut()
                .pop_front()
                .unwrap_or(Ok(()))
        }

        fn navigate(&self, url: &Url) -> Result<(), LoadFailure> {
            self.navigations.borrow_mut().push(url.to_string());
            Ok(())
        }
    }

    const NO_DELAY: LoadPolicy = LoadPolicy {
        attempts: 2,
        retry_delay: Duration::ZERO,
    };

    fn dev_url() -> Url {
        Url::parse("http://localhost:4200/").unwrap()
    }

    fn refused() -> LoadFailure {
        LoadFailure::new(LoadFailure::ERR_CONNECTION_REFUSED, "ERR_CONNECTION_REFUSED")
    }

    #[test]
    fn development_mode_targets_dev_server() {
        let target = resolve_content_target(
            RunMode::Development,
            &dev_url(),
            &packaged_asset_origin(),
            "app/browser/index.html",
        )
        .unwrap();
        assert_eq!(target, ContentTarget::DevServer(dev_url()));
    }

    #[test]
    fn production_mode_targets_packaged_entry() {
        let origin = Url::parse("tauri://localhost/").unwrap();
        let target =
            resolve_content_target(RunMode::Production, &dev_url(), &origin, "app/browser/index.html")
                .unwrap();
        assert_eq!(
            target.url().as_str(),
            "tauri://localhost/app/browser/index.html"
        );
        assert!(matches!(
            target,
            ContentTarget::Packaged {
                entry: "app/browser/index.html",
                ..
            }
        ));
    }

    #[test]
    fn load_retries_once_and_logs_failure_code() {
        let surface = FakeContentSurface::with_probes(vec![Err(refused()), Ok(())]);
        let logs = RefCell::new(Vec::new());

        let result = load_main_content(
            &surface,
            &ContentTarget::DevServer(dev_url()),
            &NO_DELAY,
            |level, message: &str| logs.borrow_mut().push((level, message.to_string())),
        );

        assert!(result.is_ok());
        assert_eq!(surface.navigations.borrow().as_slice(), ["http://localhost:4200/"]);
        assert!(logs.borrow().iter().any(|(level, message)| {
            *level == LogLevel::Error && message == "did-fail-load: -102 - ERR_CONNECTION_REFUSED"
        }));
    }

    #[test]
    fn load_gives_up_after_the_retry() {
        let surface = FakeContentSurface::with_probes(vec![Err(refused()), Err(refused()), Ok(())]);
        let logs = RefCell::new(Vec::new());

        let result = load_main_content(
            &surface,
            &ContentTarget::DevServer(dev_url()),
            &NO_DELAY,
            |level, message: &str| logs.borrow_mut().push((level, message.to_string())),
        );

        assert_eq!(result, Err(refused()));
        assert!(surface.navigations.borrow().is_empty());
        let failures = logs
            .borrow()
            .iter()
            .filter(|(level, _)| *level == LogLevel::Error)
            .count();
        assert_eq!(failures, 2);
    }

    #[test]
    fn main_page_load_on_another_site_is_a_failed_load() {
        let expected = dev_url();
        let landed = Url::parse("http://localhost:4300/").unwrap();
        let failure = check_main_page_load(&landed, &expected).unwrap_err();
        assert_eq!(failure.code, LoadFailure::ERR_FAILED);
        assert!(failure.to_string().starts_with("-2 - landed on http://localhost:4300/"));
    }

    #[test]
    fn main_page_load_accepts_routes_and_the_blank_start_page() {
        let expected = dev_url();
        let route = Url::parse("http://localhost:4200/invoices/7").unwrap();
        assert!(check_main_page_load(&route, &expected).is_ok());
        let blank = Url::parse("about:blank").unwrap();
        assert!(check_main_page_load(&blank, &expected).is_ok());
    }

    #[test]
    fn packaged_main_page_must_land_on_the_entry() {
        let expected = Url::parse("tauri://localhost/app/browser/index.html").unwrap();
        assert!(check_main_page_load(&expected, &expected).is_ok());
        let error_page = Url::parse("tauri://localhost/404.html").unwrap();
        assert!(check_main_page_load(&error_page, &expected).is_err());
    }

    #[test]
    fn reloading_after_failure_only_navigates_the_same_window() {
        let surface = FakeContentSurface::with_probes(vec![Err(refused()), Err(refused())]);
        let target = ContentTarget::DevServer(dev_url());

        assert!(load_main_content(&surface, &target, &NO_DELAY, |_, _: &str| {}).is_err());
        assert!(load_main_content(&surface, &target, &NO_DELAY, |_, _: &str| {}).is_ok());
        assert_eq!(surface.navigations.borrow().len(), 1);
    }
}
