use super::*;

pub(super) fn ensure_page_dom() -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let document = window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())?;
    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;

    let status = match document.get_element_by_id("telepage-web-shell-status") {
        Some(existing) => existing
            .dyn_into::<HtmlElement>()
            .map_err(|_| "status element exists but is not HtmlElement".to_string())?,
        None => {
            let element = document
                .create_element("div")
                .map_err(|_| "failed to create status element".to_string())?;
            element.set_id("telepage-web-shell-status");
            let status = element
                .dyn_into::<HtmlElement>()
                .map_err(|_| "status element is not HtmlElement".to_string())?;
            status
                .style()
                .set_property("position", "fixed")
                .map_err(|_| "failed to style status element".to_string())?;
            status
                .style()
                .set_property("top", "12px")
                .map_err(|_| "failed to style status element".to_string())?;
            status
                .style()
                .set_property("left", "12px")
                .map_err(|_| "failed to style status element".to_string())?;
            status
                .style()
                .set_property("font-family", "monospace")
                .map_err(|_| "failed to style status element".to_string())?;
            status
                .style()
                .set_property("font-size", "12px")
                .map_err(|_| "failed to style status element".to_string())?;
            status
                .style()
                .set_property("color", "#cbd5e1")
                .map_err(|_| "failed to style status element".to_string())?;
            body.append_child(&status)
                .map_err(|_| "failed to append status element".to_string())?;
            status
        }
    };

    status.set_inner_text("Boot: starting");

    if document.get_element_by_id(PAGE_ROOT_ID).is_none() {
        let root = document
            .create_element("main")
            .map_err(|_| "failed to create page root".to_string())?
            .dyn_into::<HtmlElement>()
            .map_err(|_| "page root is not HtmlElement".to_string())?;
        root.set_id(PAGE_ROOT_ID);
        root.style()
            .set_property("min-height", "100vh")
            .map_err(|_| "failed to style page root".to_string())?;
        root.style()
            .set_property("display", "flex")
            .map_err(|_| "failed to style page root".to_string())?;
        root.style()
            .set_property("align-items", "center")
            .map_err(|_| "failed to style page root".to_string())?;
        root.style()
            .set_property("justify-content", "center")
            .map_err(|_| "failed to style page root".to_string())?;
        root.style()
            .set_property("padding", "16px")
            .map_err(|_| "failed to style page root".to_string())?;
        root.style()
            .set_property("box-sizing", "border-box")
            .map_err(|_| "failed to style page root".to_string())?;
        body.append_child(&root)
            .map_err(|_| "failed to append page root".to_string())?;
    }

    install_page_click_handler(&document)?;
    Ok(())
}

fn install_page_click_handler(document: &web_sys::Document) -> Result<(), String> {
    let root = document
        .get_element_by_id(PAGE_ROOT_ID)
        .ok_or_else(|| "page root is missing".to_string())?;

    // Rendering rebuilds the buttons, so the listener delegates from the
    // stable root instead of binding to any particular button instance.
    PAGE_CLICK_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(
            move |event: web_sys::Event| {
                let Some(target) = event.target() else {
                    return;
                };
                let Ok(element) = target.dyn_into::<web_sys::Element>() else {
                    return;
                };
                let id = element.id();
                if id == EXPAND_BUTTON_ID {
                    queue_intent(BridgeIntent::Expand);
                } else if id == CLOSE_BUTTON_ID {
                    queue_intent(BridgeIntent::Close);
                }
            },
        ));
        let _ = root.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });
    Ok(())
}

fn create_block(document: &web_sys::Document, tag: &str) -> Result<HtmlElement, String> {
    document
        .create_element(tag)
        .map_err(|_| format!("failed to create {tag} element"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| format!("{tag} element is not HtmlElement"))
}

fn left_section(document: &web_sys::Document) -> Result<HtmlElement, String> {
    let section = create_block(document, "div")?;
    let _ = section.style().set_property("margin", "0 0 24px");
    let _ = section.style().set_property("text-align", "left");
    Ok(section)
}

fn section_title(document: &web_sys::Document, text: &str) -> Result<HtmlElement, String> {
    let title = create_block(document, "h2")?;
    title.set_inner_text(text);
    let _ = title.style().set_property("font-size", "20px");
    let _ = title.style().set_property("font-weight", "600");
    let _ = title.style().set_property("margin", "0 0 8px");
    Ok(title)
}

pub(super) fn render_page(view: &PageView) -> Result<(), String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let document = window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())?;
    let root = document
        .get_element_by_id(PAGE_ROOT_ID)
        .ok_or_else(|| "page root is missing".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "page root is not HtmlElement".to_string())?;

    root.set_inner_html("");
    let _ = root
        .style()
        .set_property("background-color", &view.palette.background);
    let _ = root.style().set_property("color", &view.palette.text);

    let card = create_block(&document, "div")?;
    let _ = card
        .style()
        .set_property("background-color", &view.palette.card_background);
    let _ = card.style().set_property("padding", "32px");
    let _ = card.style().set_property("border-radius", "8px");
    let _ = card
        .style()
        .set_property("box-shadow", "0 10px 25px rgba(0, 0, 0, 0.1)");
    let _ = card.style().set_property("max-width", "448px");
    let _ = card.style().set_property("width", "100%");
    let _ = card.style().set_property("text-align", "center");

    let heading = create_block(&document, "h1")?;
    heading.set_inner_text(PAGE_HEADING);
    let _ = heading.style().set_property("font-size", "30px");
    let _ = heading.style().set_property("font-weight", "700");
    let _ = heading.style().set_property("margin", "0 0 16px");
    let _ = card.append_child(&heading);

    if let Some(error_line) = view.error_line.as_deref() {
        let line = create_block(&document, "p")?;
        line.set_inner_text(error_line);
        let _ = line.style().set_property("color", "#ef4444");
        let _ = line.style().set_property("margin", "0 0 16px");
        let _ = card.append_child(&line);
    }

    if let Some(status_line) = view.status_line.as_deref() {
        let line = create_block(&document, "p")?;
        line.set_inner_text(status_line);
        let _ = line.style().set_property("color", "#22c55e");
        let _ = line.style().set_property("margin", "0 0 16px");
        let _ = card.append_child(&line);
    }

    append_user_section(&document, &card, &view.user_section)?;
    append_token_section(&document, &card, view)?;
    append_theme_section(&document, &card, view)?;
    append_action_buttons(&document, &card, view)?;

    let _ = root.append_child(&card);
    Ok(())
}

fn append_user_section(
    document: &web_sys::Document,
    card: &HtmlElement,
    user_section: &UserSection,
) -> Result<(), String> {
    match user_section {
        UserSection::Present { rows } => {
            let section = left_section(document)?;
            let title = section_title(document, USER_SECTION_TITLE)?;
            let _ = section.append_child(&title);
            for row in rows {
                let line = create_block(document, "p")?;
                let _ = line.style().set_property("margin", "0 0 4px");
                let label = create_block(document, "strong")?;
                label.set_inner_text(&format!("{}:", row.label));
                let _ = line.append_child(&label);
                let value = create_block(document, "span")?;
                value.set_inner_text(&format!(" {}", row.value));
                let _ = line.append_child(&value);
                let _ = section.append_child(&line);
            }
            let _ = card.append_child(&section);
        }
        UserSection::Absent => {
            let line = create_block(document, "p")?;
            line.set_inner_text(NO_USER_TEXT);
            let _ = line.style().set_property("margin", "0 0 24px");
            let _ = card.append_child(&line);
        }
    }
    Ok(())
}

fn append_token_section(
    document: &web_sys::Document,
    card: &HtmlElement,
    view: &PageView,
) -> Result<(), String> {
    match &view.token_section {
        TokenSection::Token { raw } => {
            let section = left_section(document)?;
            let title = section_title(document, TOKEN_SECTION_TITLE)?;
            let _ = section.append_child(&title);

            let panel = create_block(document, "div")?;
            panel.set_inner_text(raw);
            let _ = panel
                .style()
                .set_property("background-color", &view.palette.panel_background);
            let _ = panel.style().set_property("padding", "12px");
            let _ = panel.style().set_property("border-radius", "4px");
            let _ = panel.style().set_property("font-size", "14px");
            let _ = panel.style().set_property("word-break", "break-all");
            let _ = section.append_child(&panel);

            let note = create_block(document, "p")?;
            note.set_inner_text(TOKEN_NOTE_TEXT);
            let _ = note.style().set_property("font-size", "12px");
            let _ = note.style().set_property("margin", "8px 0 0");
            let _ = section.append_child(&note);

            let _ = card.append_child(&section);
        }
        TokenSection::Placeholder => {
            let line = create_block(document, "p")?;
            line.set_inner_text(NO_TOKEN_TEXT);
            let _ = line.style().set_property("margin", "0 0 24px");
            let _ = card.append_child(&line);
        }
    }
    Ok(())
}

fn append_theme_section(
    document: &web_sys::Document,
    card: &HtmlElement,
    view: &PageView,
) -> Result<(), String> {
    let section = left_section(document)?;
    let title = section_title(document, THEME_SECTION_TITLE)?;
    let _ = section.append_child(&title);

    let dump = create_block(document, "pre")?;
    dump.set_inner_text(&view.theme_dump);
    let _ = dump
        .style()
        .set_property("background-color", &view.palette.panel_background);
    let _ = dump.style().set_property("padding", "12px");
    let _ = dump.style().set_property("border-radius", "4px");
    let _ = dump.style().set_property("font-size", "14px");
    let _ = dump.style().set_property("overflow-x", "auto");
    let _ = dump.style().set_property("margin", "0");
    let _ = section.append_child(&dump);

    let _ = card.append_child(&section);
    Ok(())
}

fn append_action_buttons(
    document: &web_sys::Document,
    card: &HtmlElement,
    view: &PageView,
) -> Result<(), String> {
    let actions = create_block(document, "div")?;
    let _ = actions.style().set_property("display", "flex");
    let _ = actions.style().set_property("flex-direction", "column");
    let _ = actions.style().set_property("gap", "16px");

    for (id, label) in [
        (EXPAND_BUTTON_ID, view.buttons[0]),
        (CLOSE_BUTTON_ID, view.buttons[1]),
    ] {
        let button = create_block(document, "button")?;
        button.set_id(id);
        button.set_inner_text(label);
        let _ = button
            .style()
            .set_property("background-color", &view.palette.button_background);
        let _ = button
            .style()
            .set_property("color", &view.palette.button_text);
        let _ = button.style().set_property("padding", "12px 24px");
        let _ = button.style().set_property("border-radius", "8px");
        let _ = button.style().set_property("font-weight", "600");
        let _ = button.style().set_property("font-size", "16px");
        let _ = button.style().set_property("border", "none");
        let _ = button.style().set_property("cursor", "pointer");
        let _ = actions.append_child(&button);
    }

    let _ = card.append_child(&actions);
    Ok(())
}
