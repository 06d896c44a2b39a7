pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const PRINT_WINDOW_LABEL_PREFIX: &str = "print-";

pub(crate) const DEFAULT_DEV_SERVER_URL: &str = "http://localhost:4200/";
pub(crate) const PACKAGED_ENTRY_PATH: &str = "app/browser/index.html";

pub(crate) const DEV_MODE_ENV: &str = "LEDGER_DESK_IS_DEV";
pub(crate) const DEV_SERVER_URL_ENV: &str = "LEDGER_DESK_DEV_URL";
pub(crate) const ROOT_DIR_ENV: &str = "LEDGER_DESK_ROOT";
pub(crate) const LOG_LEVEL_ENV: &str = "LEDGER_DESK_LOG_LEVEL";
pub(crate) const UPDATE_CHECK_INTERVAL_ENV: &str = "LEDGER_DESK_UPDATE_CHECK_INTERVAL_MINS";

pub(crate) const DEFAULT_UPDATE_CHECK_INTERVAL_MINS: u64 = 6 * 60;

pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;

pub(crate) const PRINT_DOCUMENT_EVENT: &str = "printDocument";
pub(crate) const UPDATE_AVAILABLE_EVENT: &str = "update-available";
