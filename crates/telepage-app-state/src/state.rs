use serde::{Deserialize, Serialize};

use crate::bridge::{AttachRoute, BridgeCapabilities, BridgeLoadFailure};
use crate::identity::UserIdentity;
use crate::theme::ThemeParameters;

pub const STATUS_SDK_READY: &str = "Telegram Web App SDK loaded and ready!";
pub const STATUS_SDK_ALREADY_LOADED: &str = "Telegram Web App SDK already loaded.";
pub const STATUS_EXPANDED: &str = "Web App expanded to full screen.";
pub const STATUS_EXPAND_UNAVAILABLE: &str = "Telegram WebApp expand function not available.";
pub const STATUS_CLOSE_UNAVAILABLE: &str = "Telegram WebApp close function not available.";

/// Everything the surface renders from, owned by a single cell in the shell.
///
/// Identity, session token and theme are only written by bridge actions;
/// rendering never mutates state. The intent queue is invisible to the
/// renderer, so queue-only updates report `changed: false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bridge: Option<BridgeCapabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<UserIdentity>,
    #[serde(default)]
    pub session_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub intent_queue: Vec<QueuedIntent>,
    #[serde(default)]
    next_intent_id: u64,
}

/// A user-initiated request waiting for the drain loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedIntent {
    pub id: u64,
    pub intent: BridgeIntent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeIntent {
    Expand,
    Close,
}

impl BridgeIntent {
    pub fn label(self) -> &'static str {
        match self {
            BridgeIntent::Expand => "expand",
            BridgeIntent::Close => "close",
        }
    }
}

/// Bridge calls the reducer has cleared for execution. Emitted only when the
/// matching capability was present at drain time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeCommand {
    InvokeExpand,
    InvokeClose,
}

#[derive(Debug, Clone, Default)]
pub struct ApplyOutcome {
    /// Whether visible state changed and a re-render is due.
    pub changed: bool,
    pub commands: Vec<BridgeCommand>,
    pub drained_intents: Vec<QueuedIntent>,
}

pub fn apply_action(state: &mut AppState, action: AppAction) -> ApplyOutcome {
    match action {
        AppAction::BridgeAttached {
            route,
            capabilities,
            identity,
            session_token,
            theme,
        } => {
            state.bridge = Some(capabilities);
            state.identity = identity;
            state.session_token = session_token;
            state.theme = theme;
            state.status_message = Some(
                match route {
                    AttachRoute::FreshLoad => STATUS_SDK_READY,
                    AttachRoute::AlreadyPresent => STATUS_SDK_ALREADY_LOADED,
                }
                .to_string(),
            );
            state.error_message = None;
            ApplyOutcome {
                changed: true,
                ..ApplyOutcome::default()
            }
        }
        AppAction::BridgeLoadFailed { failure } => {
            let message = failure.to_string();
            let changed = state.error_message.as_deref() != Some(message.as_str());
            state.error_message = Some(message);
            ApplyOutcome {
                changed,
                ..ApplyOutcome::default()
            }
        }
        AppAction::ThemeChanged { theme } => {
            let changed = state.theme != theme;
            state.theme = theme;
            ApplyOutcome {
                changed,
                ..ApplyOutcome::default()
            }
        }
        AppAction::QueueIntent { intent } => {
            state.next_intent_id += 1;
            state.intent_queue.push(QueuedIntent {
                id: state.next_intent_id,
                intent,
            });
            ApplyOutcome::default()
        }
        AppAction::DrainIntents => {
            let drained: Vec<QueuedIntent> = state.intent_queue.drain(..).collect();
            let mut changed = false;
            let mut commands = Vec::new();
            for queued in &drained {
                match queued.intent {
                    BridgeIntent::Expand => {
                        if state.bridge.is_some_and(|caps| caps.has_expand) {
                            commands.push(BridgeCommand::InvokeExpand);
                            changed |= set_status(state, STATUS_EXPANDED);
                        } else {
                            changed |= set_status(state, STATUS_EXPAND_UNAVAILABLE);
                        }
                    }
                    BridgeIntent::Close => {
                        if state.bridge.is_some_and(|caps| caps.has_close) {
                            commands.push(BridgeCommand::InvokeClose);
                        } else {
                            changed |= set_status(state, STATUS_CLOSE_UNAVAILABLE);
                        }
                    }
                }
            }
            ApplyOutcome {
                changed,
                commands,
                drained_intents: drained,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppAction {
    /// Bridge handle captured; replaces identity, token and theme wholesale
    /// and overwrites both display slots (a stale error does not outlive a
    /// successful attach).
    BridgeAttached {
        route: AttachRoute,
        capabilities: BridgeCapabilities,
        identity: Option<UserIdentity>,
        session_token: String,
        theme: Option<ThemeParameters>,
    },
    BridgeLoadFailed {
        failure: BridgeLoadFailure,
    },
    /// Full theme replacement from a themeChanged notification.
    ThemeChanged {
        theme: Option<ThemeParameters>,
    },
    QueueIntent {
        intent: BridgeIntent,
    },
    DrainIntents,
}

fn set_status(state: &mut AppState, message: &str) -> bool {
    if state.status_message.as_deref() == Some(message) {
        return false;
    }
    state.status_message = Some(message.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::resolve_palette;
    use serde_json::json;

    fn attach_action(route: AttachRoute, capabilities: BridgeCapabilities) -> AppAction {
        AppAction::BridgeAttached {
            route,
            capabilities,
            identity: None,
            session_token: String::new(),
            theme: None,
        }
    }

    fn all_capabilities() -> BridgeCapabilities {
        BridgeCapabilities {
            has_expand: true,
            has_close: true,
        }
    }

    fn drain(state: &mut AppState) -> ApplyOutcome {
        apply_action(state, AppAction::DrainIntents)
    }

    fn queue_and_drain(state: &mut AppState, intent: BridgeIntent) -> ApplyOutcome {
        let _ = apply_action(state, AppAction::QueueIntent { intent });
        drain(state)
    }

    #[test]
    fn fresh_attach_sets_ready_status() {
        let mut state = AppState::default();
        let outcome = apply_action(
            &mut state,
            attach_action(AttachRoute::FreshLoad, all_capabilities()),
        );
        assert!(outcome.changed);
        assert_eq!(state.status_message.as_deref(), Some(STATUS_SDK_READY));
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn already_present_attach_sets_already_loaded_status() {
        let mut state = AppState::default();
        let _ = apply_action(
            &mut state,
            attach_action(AttachRoute::AlreadyPresent, all_capabilities()),
        );
        assert_eq!(
            state.status_message.as_deref(),
            Some(STATUS_SDK_ALREADY_LOADED)
        );
    }

    #[test]
    fn attach_overwrites_a_stale_error() {
        let mut state = AppState::default();
        let _ = apply_action(
            &mut state,
            AppAction::BridgeLoadFailed {
                failure: BridgeLoadFailure::ScriptLoadFailed,
            },
        );
        assert!(state.error_message.is_some());

        let _ = apply_action(
            &mut state,
            attach_action(AttachRoute::FreshLoad, all_capabilities()),
        );
        assert_eq!(state.error_message, None);
        assert_eq!(state.status_message.as_deref(), Some(STATUS_SDK_READY));
    }

    #[test]
    fn script_failure_surfaces_exact_error_text() {
        let mut state = AppState::default();
        let outcome = apply_action(
            &mut state,
            AppAction::BridgeLoadFailed {
                failure: BridgeLoadFailure::ScriptLoadFailed,
            },
        );
        assert!(outcome.changed);
        assert_eq!(
            state.error_message.as_deref(),
            Some("Failed to load Telegram Web App SDK script.")
        );
        assert_eq!(state.bridge, None);
    }

    #[test]
    fn entry_point_failure_surfaces_exact_error_text() {
        let mut state = AppState::default();
        let _ = apply_action(
            &mut state,
            AppAction::BridgeLoadFailed {
                failure: BridgeLoadFailure::EntryPointMissing,
            },
        );
        assert_eq!(
            state.error_message.as_deref(),
            Some("Telegram Web App SDK not found after loading.")
        );
    }

    #[test]
    fn expand_with_capability_invokes_and_reports_full_screen() {
        let mut state = AppState::default();
        let _ = apply_action(
            &mut state,
            attach_action(AttachRoute::FreshLoad, all_capabilities()),
        );
        let outcome = queue_and_drain(&mut state, BridgeIntent::Expand);
        assert_eq!(outcome.commands, vec![BridgeCommand::InvokeExpand]);
        assert!(outcome.changed);
        assert_eq!(state.status_message.as_deref(), Some(STATUS_EXPANDED));
    }

    #[test]
    fn expand_without_bridge_is_a_guarded_no_op() {
        let mut state = AppState::default();
        let outcome = queue_and_drain(&mut state, BridgeIntent::Expand);
        assert!(outcome.commands.is_empty());
        assert_eq!(
            state.status_message.as_deref(),
            Some(STATUS_EXPAND_UNAVAILABLE)
        );
    }

    #[test]
    fn expand_without_the_capability_is_a_guarded_no_op() {
        let mut state = AppState::default();
        let _ = apply_action(
            &mut state,
            attach_action(
                AttachRoute::FreshLoad,
                BridgeCapabilities {
                    has_expand: false,
                    has_close: true,
                },
            ),
        );
        let outcome = queue_and_drain(&mut state, BridgeIntent::Expand);
        assert!(outcome.commands.is_empty());
        assert_eq!(
            state.status_message.as_deref(),
            Some(STATUS_EXPAND_UNAVAILABLE)
        );
    }

    #[test]
    fn close_with_capability_invokes_without_touching_status() {
        let mut state = AppState::default();
        let _ = apply_action(
            &mut state,
            attach_action(AttachRoute::FreshLoad, all_capabilities()),
        );
        let outcome = queue_and_drain(&mut state, BridgeIntent::Close);
        assert_eq!(outcome.commands, vec![BridgeCommand::InvokeClose]);
        assert!(!outcome.changed);
        assert_eq!(state.status_message.as_deref(), Some(STATUS_SDK_READY));
    }

    #[test]
    fn close_without_the_capability_is_a_guarded_no_op() {
        let mut state = AppState::default();
        let _ = apply_action(
            &mut state,
            attach_action(
                AttachRoute::FreshLoad,
                BridgeCapabilities {
                    has_expand: true,
                    has_close: false,
                },
            ),
        );
        let outcome = queue_and_drain(&mut state, BridgeIntent::Close);
        assert!(outcome.commands.is_empty());
        assert_eq!(
            state.status_message.as_deref(),
            Some(STATUS_CLOSE_UNAVAILABLE)
        );
    }

    #[test]
    fn close_without_bridge_is_a_guarded_no_op() {
        let mut state = AppState::default();
        let outcome = queue_and_drain(&mut state, BridgeIntent::Close);
        assert!(outcome.commands.is_empty());
        assert_eq!(
            state.status_message.as_deref(),
            Some(STATUS_CLOSE_UNAVAILABLE)
        );
    }

    #[test]
    fn intents_drain_in_arrival_order_with_monotonic_ids() {
        let mut state = AppState::default();
        let _ = apply_action(
            &mut state,
            AppAction::QueueIntent {
                intent: BridgeIntent::Expand,
            },
        );
        let _ = apply_action(
            &mut state,
            AppAction::QueueIntent {
                intent: BridgeIntent::Close,
            },
        );
        let outcome = drain(&mut state);
        let ids: Vec<u64> = outcome.drained_intents.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(outcome.drained_intents[0].intent, BridgeIntent::Expand);
        assert_eq!(outcome.drained_intents[1].intent, BridgeIntent::Close);
        assert!(state.intent_queue.is_empty());
    }

    #[test]
    fn queueing_alone_does_not_change_visible_state() {
        let mut state = AppState::default();
        let outcome = apply_action(
            &mut state,
            AppAction::QueueIntent {
                intent: BridgeIntent::Expand,
            },
        );
        assert!(!outcome.changed);
        assert_eq!(state.intent_queue.len(), 1);
        assert_eq!(state.status_message, None);
    }

    #[test]
    fn draining_an_empty_queue_is_inert() {
        let mut state = AppState::default();
        let outcome = drain(&mut state);
        assert!(!outcome.changed);
        assert!(outcome.commands.is_empty());
        assert!(outcome.drained_intents.is_empty());
    }

    #[test]
    fn theme_change_replaces_the_palette_wholesale() {
        let mut state = AppState::default();
        let first: ThemeParameters = serde_json::from_value(json!({
            "bg_color": "#111111",
            "hint_color": "#999999"
        }))
        .expect("first theme decodes");
        let second: ThemeParameters = serde_json::from_value(json!({
            "bg_color": "#222222"
        }))
        .expect("second theme decodes");

        let _ = apply_action(
            &mut state,
            AppAction::ThemeChanged {
                theme: Some(first),
            },
        );
        let outcome = apply_action(
            &mut state,
            AppAction::ThemeChanged {
                theme: Some(second.clone()),
            },
        );
        assert!(outcome.changed);
        assert_eq!(state.theme, Some(second));
        let dump = crate::theme::theme_dump(state.theme.as_ref());
        assert!(!dump.contains("hint_color"));
    }

    #[test]
    fn identical_theme_replay_reports_no_change() {
        let mut state = AppState::default();
        let theme: ThemeParameters =
            serde_json::from_value(json!({ "bg_color": "#111111" })).expect("theme decodes");
        let _ = apply_action(
            &mut state,
            AppAction::ThemeChanged {
                theme: Some(theme.clone()),
            },
        );
        let outcome = apply_action(
            &mut state,
            AppAction::ThemeChanged { theme: Some(theme) },
        );
        assert!(!outcome.changed);
    }

    #[test]
    fn successful_attach_scenario_shows_the_documented_surface() {
        let mut state = AppState::default();
        let identity: UserIdentity =
            serde_json::from_value(json!({ "id": 1, "first_name": "Ann" }))
                .expect("identity decodes");
        let theme: ThemeParameters =
            serde_json::from_value(json!({ "bg_color": "#111" })).expect("theme decodes");

        let _ = apply_action(
            &mut state,
            AppAction::BridgeAttached {
                route: AttachRoute::FreshLoad,
                capabilities: all_capabilities(),
                identity: Some(identity),
                session_token: "tok123".to_string(),
                theme: Some(theme),
            },
        );

        assert_eq!(crate::identity::display_name(state.identity.as_ref()), "Ann");
        assert_eq!(state.session_token, "tok123");
        assert_eq!(resolve_palette(state.theme.as_ref()).background, "#111");
        assert_eq!(state.status_message.as_deref(), Some(STATUS_SDK_READY));
    }

    #[test]
    fn failed_load_scenario_still_answers_button_presses() {
        let mut state = AppState::default();
        let _ = apply_action(
            &mut state,
            AppAction::BridgeLoadFailed {
                failure: BridgeLoadFailure::ScriptLoadFailed,
            },
        );
        assert_eq!(
            state.error_message.as_deref(),
            Some("Failed to load Telegram Web App SDK script.")
        );

        let expand = queue_and_drain(&mut state, BridgeIntent::Expand);
        assert!(expand.commands.is_empty());
        assert_eq!(
            state.status_message.as_deref(),
            Some(STATUS_EXPAND_UNAVAILABLE)
        );

        let close = queue_and_drain(&mut state, BridgeIntent::Close);
        assert!(close.commands.is_empty());
        assert_eq!(
            state.status_message.as_deref(),
            Some(STATUS_CLOSE_UNAVAILABLE)
        );
        // The load error stays on screen alongside the guard statuses.
        assert!(state.error_message.is_some());
    }

    #[test]
    fn state_serializes_without_empty_optional_fields() {
        let state = AppState::default();
        let encoded = serde_json::to_value(&state).expect("state serializes");
        assert_eq!(
            encoded,
            json!({
                "session_token": "",
                "intent_queue": [],
                "next_intent_id": 0
            })
        );
    }
}
