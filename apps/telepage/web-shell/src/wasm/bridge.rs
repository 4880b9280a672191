use super::*;

#[derive(Debug, thiserror::Error)]
enum BridgeValueError {
    #[error("payload is not serializable: {0}")]
    Stringify(String),
    #[error("payload shape mismatch: {0}")]
    Shape(#[from] serde_json::Error),
}

fn decode_bridge_value<T>(value: &JsValue) -> Result<T, BridgeValueError>
where
    T: serde::de::DeserializeOwned,
{
    let json = js_sys::JSON::stringify(value)
        .map_err(|error| BridgeValueError::Stringify(format!("{error:?}")))?;
    let json = String::from(json);
    Ok(serde_json::from_str(&json)?)
}

/// Handle on the host page's `Telegram.WebApp` global.
pub(super) struct BridgeHandle {
    webapp: js_sys::Object,
}

impl BridgeHandle {
    pub(super) fn from_global() -> Option<Self> {
        let window = web_sys::window()?;
        let telegram = js_sys::Reflect::get(&window, &JsValue::from_str("Telegram")).ok()?;
        if !telegram.is_object() {
            return None;
        }
        let webapp = js_sys::Reflect::get(&telegram, &JsValue::from_str("WebApp")).ok()?;
        if !webapp.is_object() {
            return None;
        }
        Some(Self {
            webapp: js_sys::Object::from(webapp),
        })
    }

    fn field(&self, name: &str) -> Option<JsValue> {
        js_sys::Reflect::get(self.webapp.as_ref(), &JsValue::from_str(name))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null())
    }

    fn method(&self, name: &str) -> Option<js_sys::Function> {
        self.field(name)
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok())
    }

    pub(super) fn capabilities(&self) -> BridgeCapabilities {
        BridgeCapabilities {
            has_expand: self.method("expand").is_some(),
            has_close: self.method("close").is_some(),
        }
    }

    pub(super) fn signal_ready(&self) {
        let Some(ready) = self.method("ready") else {
            web_sys::console::warn_1(&JsValue::from_str("bridge ready() is not available"));
            return;
        };
        if let Err(error) = ready.call0(self.webapp.as_ref()) {
            web_sys::console::warn_1(&JsValue::from_str(&format!(
                "bridge ready() failed: {error:?}"
            )));
        }
    }

    pub(super) fn invoke_expand(&self) -> Result<(), String> {
        let expand = self
            .method("expand")
            .ok_or_else(|| "bridge expand() is not available".to_string())?;
        expand
            .call0(self.webapp.as_ref())
            .map(|_| ())
            .map_err(|error| format!("bridge expand() failed: {error:?}"))
    }

    pub(super) fn invoke_close(&self) -> Result<(), String> {
        let close = self
            .method("close")
            .ok_or_else(|| "bridge close() is not available".to_string())?;
        close
            .call0(self.webapp.as_ref())
            .map(|_| ())
            .map_err(|error| format!("bridge close() failed: {error:?}"))
    }

    pub(super) fn read_session_token(&self) -> String {
        self.field("initData")
            .and_then(|value| value.as_string())
            .unwrap_or_default()
    }

    pub(super) fn read_identity(&self) -> Option<UserIdentity> {
        let init_data = self.field("initDataUnsafe")?;
        let user = js_sys::Reflect::get(&init_data, &JsValue::from_str("user")).ok()?;
        if user.is_undefined() || user.is_null() {
            return None;
        }
        match decode_bridge_value::<UserIdentity>(&user) {
            Ok(identity) => Some(identity),
            Err(error) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "bridge user payload rejected: {error}"
                )));
                None
            }
        }
    }

    pub(super) fn read_theme(&self) -> Option<ThemeParameters> {
        let theme = self.field("themeParams")?;
        match decode_bridge_value::<ThemeParameters>(&theme) {
            Ok(theme) => Some(theme),
            Err(error) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!(
                    "bridge theme payload rejected: {error}"
                )));
                None
            }
        }
    }

    // Safe to call on every attach; the slot guard keeps a single live
    // subscription no matter how often the shell re-enters the loader.
    pub(super) fn subscribe_theme_changed(&self) {
        THEME_CHANGED_HANDLER.with(|slot| {
            if slot.borrow().is_some() {
                return;
            }
            let Some(on_event) = self.method("onEvent") else {
                web_sys::console::warn_1(&JsValue::from_str("bridge onEvent() is not available"));
                return;
            };
            let callback = Closure::<dyn FnMut()>::wrap(Box::new(on_theme_changed));
            let subscribed = on_event.call2(
                self.webapp.as_ref(),
                &JsValue::from_str(THEME_CHANGED_EVENT),
                callback.as_ref(),
            );
            match subscribed {
                Ok(_) => {
                    *slot.borrow_mut() = Some(callback);
                }
                Err(error) => {
                    web_sys::console::warn_1(&JsValue::from_str(&format!(
                        "bridge onEvent() failed: {error:?}"
                    )));
                }
            }
        });
    }
}

fn on_theme_changed() {
    let theme =
        BRIDGE_HANDLE.with(|slot| slot.borrow().as_ref().and_then(BridgeHandle::read_theme));
    note_theme_update();
    dispatch_action(AppAction::ThemeChanged { theme });
}

pub(super) fn initialize_bridge() -> Result<(), String> {
    if should_force_bridge_failure() {
        dispatch_action(AppAction::BridgeLoadFailed {
            failure: BridgeLoadFailure::ScriptLoadFailed,
        });
        return Ok(());
    }

    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let document = window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())?;

    let script_present = document.get_element_by_id(SDK_SCRIPT_ELEMENT_ID).is_some();
    let existing = BridgeHandle::from_global();

    match plan_bridge_load(script_present, existing.is_some()) {
        LoadStep::InsertScript => insert_bridge_script(&document)?,
        LoadStep::AttachExisting => {
            if let Some(handle) = existing {
                attach_bridge(handle, AttachRoute::AlreadyPresent);
            }
        }
        LoadStep::AwaitPendingLoad => {}
    }

    Ok(())
}

fn insert_bridge_script(document: &web_sys::Document) -> Result<(), String> {
    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;
    let script = document
        .create_element("script")
        .map_err(|_| "failed to create bridge script element".to_string())?
        .dyn_into::<web_sys::HtmlScriptElement>()
        .map_err(|_| "bridge script element is not HtmlScriptElement".to_string())?;
    script.set_id(SDK_SCRIPT_ELEMENT_ID);
    script.set_src(SDK_SCRIPT_URL);
    script.set_async(true);

    SCRIPT_LOAD_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            on_bridge_script_load();
        }));
        let _ = script.add_event_listener_with_callback("load", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });

    SCRIPT_ERROR_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            on_bridge_script_error();
        }));
        let _ = script.add_event_listener_with_callback("error", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });

    body.append_child(&script)
        .map_err(|_| "failed to append bridge script".to_string())?;
    note_script_inserted();
    Ok(())
}

fn on_bridge_script_load() {
    match BridgeHandle::from_global() {
        Some(handle) => attach_bridge(handle, AttachRoute::FreshLoad),
        None => dispatch_action(AppAction::BridgeLoadFailed {
            failure: BridgeLoadFailure::EntryPointMissing,
        }),
    }
}

fn on_bridge_script_error() {
    dispatch_action(AppAction::BridgeLoadFailed {
        failure: BridgeLoadFailure::ScriptLoadFailed,
    });
}

fn attach_bridge(handle: BridgeHandle, route: AttachRoute) {
    // ready() belongs to the load we initiated; an already-present bridge
    // has had it signalled by whoever inserted the script.
    if route == AttachRoute::FreshLoad {
        handle.signal_ready();
    }
    handle.subscribe_theme_changed();

    let capabilities = handle.capabilities();
    let identity = handle.read_identity();
    let session_token = handle.read_session_token();
    let theme = handle.read_theme();

    BRIDGE_HANDLE.with(|slot| {
        *slot.borrow_mut() = Some(handle);
    });
    note_bridge_route(route);

    dispatch_action(AppAction::BridgeAttached {
        route,
        capabilities,
        identity,
        session_token,
        theme,
    });
}
