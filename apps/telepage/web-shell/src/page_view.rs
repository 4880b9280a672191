use telepage_app_state::{AppState, Palette, resolve_palette, theme_dump};

pub(crate) const PAGE_HEADING: &str = "Hello Telegram Web App!";
pub(crate) const USER_SECTION_TITLE: &str = "User Data:";
pub(crate) const TOKEN_SECTION_TITLE: &str = "Telegram Init Data (Auth Data):";
pub(crate) const THEME_SECTION_TITLE: &str = "Theme Parameters:";
pub(crate) const NO_USER_TEXT: &str =
    "No user data available (might not be opened from Telegram, or data is not provided).";
pub(crate) const NO_TOKEN_TEXT: &str = "No init data available.";
pub(crate) const TOKEN_NOTE_TEXT: &str = "*This data is used by your bot's backend to verify the authenticity of the user and the session. It is not a persistent user access token.*";
pub(crate) const EXPAND_BUTTON_LABEL: &str = "Expand Web App";
pub(crate) const CLOSE_BUTTON_LABEL: &str = "Close Web App";

/// Everything the DOM layer paints, derived from state with no side effects.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PageView {
    pub(crate) palette: Palette,
    pub(crate) error_line: Option<String>,
    pub(crate) status_line: Option<String>,
    pub(crate) user_section: UserSection,
    pub(crate) token_section: TokenSection,
    pub(crate) theme_dump: String,
    pub(crate) buttons: [&'static str; 2],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UserSection {
    Present { rows: Vec<UserRow> },
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UserRow {
    pub(crate) label: &'static str,
    pub(crate) value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenSection {
    Token { raw: String },
    Placeholder,
}

pub(crate) fn page_view(state: &AppState) -> PageView {
    let user_section = match state.identity.as_ref() {
        Some(identity) => {
            let mut rows = vec![
                UserRow {
                    label: "Display Name",
                    value: identity.display_name(),
                },
                UserRow {
                    label: "ID",
                    value: identity.id.to_string(),
                },
            ];
            if let Some(handle) = identity.username_handle() {
                rows.push(UserRow {
                    label: "Username",
                    value: handle,
                });
            }
            if let Some(code) = identity.language_code() {
                rows.push(UserRow {
                    label: "Language Code",
                    value: code.to_string(),
                });
            }
            UserSection::Present { rows }
        }
        None => UserSection::Absent,
    };

    let token_section = if state.session_token.is_empty() {
        TokenSection::Placeholder
    } else {
        TokenSection::Token {
            raw: state.session_token.clone(),
        }
    };

    PageView {
        palette: resolve_palette(state.theme.as_ref()),
        error_line: state.error_message.clone(),
        status_line: state.status_message.clone(),
        user_section,
        token_section,
        theme_dump: theme_dump(state.theme.as_ref()),
        buttons: [EXPAND_BUTTON_LABEL, CLOSE_BUTTON_LABEL],
    }
}
