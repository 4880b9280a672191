pub(crate) const SDK_SCRIPT_ELEMENT_ID: &str = "telegram-webapp-sdk";
pub(crate) const SDK_SCRIPT_URL: &str = "https://telegram.org/js/telegram-web-app.js";
pub(crate) const THEME_CHANGED_EVENT: &str = "themeChanged";
pub(crate) const PAGE_ROOT_ID: &str = "telepage-web-shell-root";
pub(crate) const EXPAND_BUTTON_ID: &str = "telepage-web-shell-expand";
pub(crate) const CLOSE_BUTTON_ID: &str = "telepage-web-shell-close";
pub(crate) const BRIDGE_FAIL_QUERY_FLAG: &str = "tp_bridge_fail=1";
