pub const MENU_RELOAD_WINDOW: &str = "menu_reload_window";
pub const MENU_CHECK_FOR_UPDATES: &str = "menu_check_for_updates";
pub const MENU_QUIT: &str = "menu_quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMenuAction {
    ReloadWindow,
    CheckForUpdates,
    Quit,
}

pub fn action_from_menu_id(menu_id: &str) -> Option<AppMenuAction> {
    match menu_id {
        MENU_RELOAD_WINDOW => Some(AppMenuAction::ReloadWindow),
        MENU_CHECK_FOR_UPDATES => Some(AppMenuAction::CheckForUpdates),
        MENU_QUIT => Some(AppMenuAction::Quit),
        _ => None,
    }
}
