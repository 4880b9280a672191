use super::*;

pub(super) fn set_boot_phase(phase: &str, detail: &str) {
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.phase = phase.to_string();
        state.detail = detail.to_string();
        if phase != "error" {
            state.last_error = None;
        }
    });
    update_status_dom(phase, detail, false);
}

pub(super) fn set_boot_error(message: &str) {
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.phase = "error".to_string();
        state.detail = "startup failed".to_string();
        state.last_error = Some(message.to_string());
    });
    update_status_dom("error", message, true);
}

pub(super) fn update_status_dom(phase: &str, detail: &str, is_error: bool) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let Some(status) = document.get_element_by_id("telepage-web-shell-status") {
                if let Ok(status) = status.dyn_into::<HtmlElement>() {
                    let label = if is_error { "Boot error" } else { "Boot" };
                    status.set_inner_text(&format!("{label}: {phase} ({detail})"));
                    let color = if is_error { "#f87171" } else { "#cbd5e1" };
                    let _ = status.style().set_property("color", color);
                }
            }
        }
    }
}

pub(super) fn epoch_millis_now() -> u64 {
    let now = js_sys::Date::now();
    if !now.is_finite() || now.is_sign_negative() {
        return 0;
    }
    now.floor().min(u64::MAX as f64) as u64
}

pub(super) fn should_force_bridge_failure() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let Ok(search) = window.location().search() else {
        return false;
    };
    search.contains(BRIDGE_FAIL_QUERY_FLAG)
}

pub(super) fn update_diagnostics_from_state(pending_intents: usize) {
    DIAGNOSTICS.with(|state| {
        state.borrow_mut().pending_intents = pending_intents;
    });
}

pub(super) fn note_script_inserted() {
    DIAGNOSTICS.with(|state| {
        state.borrow_mut().script_inserted = true;
    });
}

pub(super) fn note_bridge_route(route: AttachRoute) {
    DIAGNOSTICS.with(|state| {
        state.borrow_mut().bridge_route = Some(route.label().to_string());
    });
}

pub(super) fn note_theme_update() {
    DIAGNOSTICS.with(|state| {
        let mut state = state.borrow_mut();
        state.theme_updates = state.theme_updates.saturating_add(1);
    });
}
