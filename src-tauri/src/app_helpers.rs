use std::{env, sync::OnceLock};

use crate::{
    logging::{self, DesktopLogger, LogLevel},
    runtime_paths, DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES, LOG_LEVEL_ENV,
};

static DESKTOP_LOGGER: OnceLock<DesktopLogger> = OnceLock::new();

pub(crate) fn desktop_logger() -> &'static DesktopLogger {
    DESKTOP_LOGGER.get_or_init(|| {
        let threshold = env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|raw| LogLevel::parse(&raw))
            .unwrap_or(LogLevel::Debug);
        DesktopLogger::new(
            logging::resolve_desktop_log_path(
                runtime_paths::default_packaged_root_dir(),
                DESKTOP_LOG_FILE,
            ),
            threshold,
            DESKTOP_LOG_MAX_BYTES,
        )
    })
}

pub(crate) fn append_startup_log(message: &str) {
    desktop_logger().write(LogLevel::Info, "startup", message);
}

pub(crate) fn append_desktop_log(message: &str) {
    desktop_logger().write(LogLevel::Info, "desktop", message);
}

pub(crate) fn append_desktop_error_log(message: &str) {
    desktop_logger().write(LogLevel::Error, "desktop", message);
}

pub(crate) fn append_content_log(level: LogLevel, message: &str) {
    desktop_logger().write(level, "content", message);
}

pub(crate) fn append_print_log(level: LogLevel, message: &str) {
    desktop_logger().write(level, "print", message);
}

pub(crate) fn append_update_log(message: &str) {
    desktop_logger().write(LogLevel::Info, "update", message);
}
