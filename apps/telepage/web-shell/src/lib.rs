#![allow(clippy::needless_pass_by_value)]

#[cfg(any(target_arch = "wasm32", test))]
mod page_view;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::{Cell, RefCell};

    use serde::Serialize;
    use telepage_app_state::{
        AppAction, AppState, AttachRoute, BridgeCapabilities, BridgeCommand, BridgeIntent,
        BridgeLoadFailure, LoadStep, QueuedIntent, ThemeParameters, UserIdentity, apply_action,
        plan_bridge_load,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::HtmlElement;

    use crate::page_view::{
        NO_TOKEN_TEXT, NO_USER_TEXT, PAGE_HEADING, PageView, THEME_SECTION_TITLE, TOKEN_NOTE_TEXT,
        TOKEN_SECTION_TITLE, TokenSection, USER_SECTION_TITLE, UserSection, page_view,
    };
    use crate::wasm_constants::*;

    mod bridge;
    mod dom;
    mod lifecycle;

    use bridge::*;
    use dom::*;
    use lifecycle::*;

    thread_local! {
        static APP_STATE: RefCell<AppState> = RefCell::new(AppState::default());
        static DIAGNOSTICS: RefCell<BootDiagnostics> = RefCell::new(BootDiagnostics::default());
        static BRIDGE_HANDLE: RefCell<Option<BridgeHandle>> = const { RefCell::new(None) };
        static COMMAND_LOOP_ACTIVE: Cell<bool> = const { Cell::new(false) };
        static SCRIPT_LOAD_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static SCRIPT_ERROR_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static THEME_CHANGED_HANDLER: RefCell<Option<Closure<dyn FnMut()>>> = const { RefCell::new(None) };
        static PAGE_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
    }

    #[derive(Debug, Clone, Serialize)]
    struct BootDiagnostics {
        phase: String,
        detail: String,
        boot_started_at_unix_ms: Option<u64>,
        script_inserted: bool,
        bridge_route: Option<String>,
        theme_updates: u64,
        intent_total: u64,
        last_intent: Option<String>,
        pending_intents: usize,
        last_error: Option<String>,
    }

    impl Default for BootDiagnostics {
        fn default() -> Self {
            Self {
                phase: "idle".to_string(),
                detail: "display surface not started".to_string(),
                boot_started_at_unix_ms: None,
                script_inserted: false,
                bridge_route: None,
                theme_updates: 0,
                intent_total: 0,
                last_intent: None,
                pending_intents: 0,
                last_error: None,
            }
        }
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        set_boot_phase("booting", "initializing telepage display surface");
        spawn_local(async {
            if let Err(error) = boot().await {
                set_boot_error(&error);
            }
        });
    }

    #[wasm_bindgen]
    pub fn boot_diagnostics_json() -> String {
        DIAGNOSTICS.with(|state| {
            serde_json::to_string(&*state.borrow()).unwrap_or_else(|_| {
                "{\"phase\":\"error\",\"detail\":\"diagnostics serialization failed\"}".to_string()
            })
        })
    }

    #[wasm_bindgen]
    pub fn app_state_json() -> String {
        APP_STATE.with(|state| {
            serde_json::to_string(&*state.borrow()).unwrap_or_else(|_| "{}".to_string())
        })
    }

    #[wasm_bindgen]
    pub fn request_expand() {
        queue_intent(BridgeIntent::Expand);
    }

    #[wasm_bindgen]
    pub fn request_close() {
        queue_intent(BridgeIntent::Close);
    }

    async fn boot() -> Result<(), String> {
        let boot_started_at_unix_ms = epoch_millis_now();
        DIAGNOSTICS.with(|state| {
            state.borrow_mut().boot_started_at_unix_ms = Some(boot_started_at_unix_ms);
        });

        ensure_page_dom()?;
        set_boot_phase("booting", "acquiring host bridge");
        initialize_bridge()?;
        render_current_state();
        set_boot_phase("ready", "display surface active");
        schedule_intent_processing();
        Ok(())
    }

    fn dispatch_action(action: AppAction) {
        let (changed, commands) = APP_STATE.with(|state| {
            let mut state = state.borrow_mut();
            let outcome = apply_action(&mut state, action);
            update_diagnostics_from_state(state.intent_queue.len());
            (outcome.changed, outcome.commands)
        });
        if changed {
            render_current_state();
        }
        execute_bridge_commands(&commands);
    }

    fn queue_intent(intent: BridgeIntent) {
        APP_STATE.with(|state| {
            let mut state = state.borrow_mut();
            let _ = apply_action(&mut state, AppAction::QueueIntent { intent });
            update_diagnostics_from_state(state.intent_queue.len());
        });
        schedule_intent_processing();
    }

    fn schedule_intent_processing() {
        let already_active = COMMAND_LOOP_ACTIVE.with(|active| {
            if active.get() {
                true
            } else {
                active.set(true);
                false
            }
        });

        if already_active {
            return;
        }

        spawn_local(async {
            loop {
                let outcome = APP_STATE.with(|state| {
                    let mut state = state.borrow_mut();
                    let outcome = apply_action(&mut state, AppAction::DrainIntents);
                    update_diagnostics_from_state(state.intent_queue.len());
                    outcome
                });

                if outcome.drained_intents.is_empty() {
                    break;
                }

                record_intent_metrics(&outcome.drained_intents);
                if outcome.changed {
                    render_current_state();
                }
                execute_bridge_commands(&outcome.commands);
            }

            COMMAND_LOOP_ACTIVE.with(|active| active.set(false));

            let has_pending = APP_STATE.with(|state| !state.borrow().intent_queue.is_empty());
            if has_pending {
                schedule_intent_processing();
            }
        });
    }

    fn execute_bridge_commands(commands: &[BridgeCommand]) {
        if commands.is_empty() {
            return;
        }
        BRIDGE_HANDLE.with(|slot| {
            let slot = slot.borrow();
            let Some(handle) = slot.as_ref() else {
                return;
            };
            for command in commands {
                let result = match command {
                    BridgeCommand::InvokeExpand => handle.invoke_expand(),
                    BridgeCommand::InvokeClose => handle.invoke_close(),
                };
                if let Err(error) = result {
                    web_sys::console::warn_1(&JsValue::from_str(&format!(
                        "bridge call failed: {error}"
                    )));
                }
            }
        });
    }

    fn record_intent_metrics(drained: &[QueuedIntent]) {
        DIAGNOSTICS.with(|diagnostics| {
            let mut diagnostics = diagnostics.borrow_mut();
            for queued in drained {
                diagnostics.intent_total = diagnostics.intent_total.saturating_add(1);
                diagnostics.last_intent = Some(queued.intent.label().to_string());
            }
        });
    }

    fn render_current_state() {
        let view = APP_STATE.with(|state| page_view(&state.borrow()));
        if let Err(error) = render_page(&view) {
            set_boot_error(&error);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{app_state_json, boot_diagnostics_json, request_close, request_expand};

#[cfg(not(target_arch = "wasm32"))]
pub fn boot_diagnostics_json() -> String {
    "{\"phase\":\"native\",\"detail\":\"display surface diagnostics only available on wasm\"}"
        .to_string()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn app_state_json() -> String {
    serde_json::to_string(&telepage_app_state::AppState::default())
        .unwrap_or_else(|_| "{}".to_string())
}
