pub mod bridge;
pub mod identity;
pub mod state;
pub mod theme;

pub use bridge::{
    AttachRoute, BridgeCapabilities, BridgeLoadFailure, LoadStep, plan_bridge_load,
};
pub use identity::{ABSENT_USER_LABEL, UNKNOWN_USER_LABEL, UserIdentity, display_name};
pub use state::{
    AppAction, AppState, ApplyOutcome, BridgeCommand, BridgeIntent, QueuedIntent,
    STATUS_CLOSE_UNAVAILABLE, STATUS_EXPANDED, STATUS_EXPAND_UNAVAILABLE,
    STATUS_SDK_ALREADY_LOADED, STATUS_SDK_READY, apply_action,
};
pub use theme::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_BUTTON_COLOR, DEFAULT_BUTTON_TEXT_COLOR,
    DEFAULT_CARD_BACKGROUND_COLOR, DEFAULT_PANEL_BACKGROUND_COLOR, DEFAULT_TEXT_COLOR, Palette,
    ThemeParameters, resolve_palette, theme_dump,
};
