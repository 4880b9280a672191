use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";
pub const DEFAULT_TEXT_COLOR: &str = "#000000";
pub const DEFAULT_BUTTON_COLOR: &str = "#007bff";
pub const DEFAULT_BUTTON_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_CARD_BACKGROUND_COLOR: &str = "#f0f0f0";
pub const DEFAULT_PANEL_BACKGROUND_COLOR: &str = "#e2e8f0";

/// Host-supplied palette, replaced wholesale on every theme-change event.
///
/// Only the named roles drive layout colors; everything else the host sends
/// is retained so the inspection dump shows the palette exactly as supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_bg_color: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Colors the renderer actually paints with, after fallback resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: String,
    pub text: String,
    pub button_background: String,
    pub button_text: String,
    pub card_background: String,
    pub panel_background: String,
}

impl Default for Palette {
    fn default() -> Self {
        resolve_palette(None)
    }
}

/// Resolves every color role, substituting the fixed default wherever the
/// theme is absent or the host sent an empty value. The secondary role feeds
/// both the card and the data panels, each with its own fallback.
pub fn resolve_palette(theme: Option<&ThemeParameters>) -> Palette {
    Palette {
        background: role(theme, |t| t.bg_color.as_deref(), DEFAULT_BACKGROUND_COLOR),
        text: role(theme, |t| t.text_color.as_deref(), DEFAULT_TEXT_COLOR),
        button_background: role(theme, |t| t.button_color.as_deref(), DEFAULT_BUTTON_COLOR),
        button_text: role(
            theme,
            |t| t.button_text_color.as_deref(),
            DEFAULT_BUTTON_TEXT_COLOR,
        ),
        card_background: role(
            theme,
            |t| t.secondary_bg_color.as_deref(),
            DEFAULT_CARD_BACKGROUND_COLOR,
        ),
        panel_background: role(
            theme,
            |t| t.secondary_bg_color.as_deref(),
            DEFAULT_PANEL_BACKGROUND_COLOR,
        ),
    }
}

fn role<'a>(
    theme: Option<&'a ThemeParameters>,
    pick: impl Fn(&'a ThemeParameters) -> Option<&'a str>,
    fallback: &str,
) -> String {
    theme
        .and_then(pick)
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Pretty-printed dump of the palette as supplied, `null` before any theme
/// has arrived.
pub fn theme_dump(theme: Option<&ThemeParameters>) -> String {
    match theme {
        Some(theme) => serde_json::to_string_pretty(theme).unwrap_or_else(|_| "null".to_string()),
        None => "null".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn theme_from(value: serde_json::Value) -> ThemeParameters {
        serde_json::from_value(value).expect("theme payload decodes")
    }

    #[test]
    fn every_role_falls_back_when_no_theme_arrived() {
        let palette = resolve_palette(None);
        assert_eq!(palette.background, DEFAULT_BACKGROUND_COLOR);
        assert_eq!(palette.text, DEFAULT_TEXT_COLOR);
        assert_eq!(palette.button_background, DEFAULT_BUTTON_COLOR);
        assert_eq!(palette.button_text, DEFAULT_BUTTON_TEXT_COLOR);
        assert_eq!(palette.card_background, DEFAULT_CARD_BACKGROUND_COLOR);
        assert_eq!(palette.panel_background, DEFAULT_PANEL_BACKGROUND_COLOR);
    }

    #[test]
    fn supplied_roles_pass_through_unchanged() {
        let theme = theme_from(json!({
            "bg_color": "#111111",
            "text_color": "#eeeeee",
            "button_color": "#2481cc",
            "button_text_color": "#fefefe",
            "secondary_bg_color": "#181818"
        }));
        let palette = resolve_palette(Some(&theme));
        assert_eq!(palette.background, "#111111");
        assert_eq!(palette.text, "#eeeeee");
        assert_eq!(palette.button_background, "#2481cc");
        assert_eq!(palette.button_text, "#fefefe");
        assert_eq!(palette.card_background, "#181818");
        assert_eq!(palette.panel_background, "#181818");
    }

    #[test]
    fn missing_roles_fall_back_individually() {
        let theme = theme_from(json!({ "bg_color": "#111111" }));
        let palette = resolve_palette(Some(&theme));
        assert_eq!(palette.background, "#111111");
        assert_eq!(palette.text, DEFAULT_TEXT_COLOR);
        assert_eq!(palette.button_background, DEFAULT_BUTTON_COLOR);
        assert_eq!(palette.card_background, DEFAULT_CARD_BACKGROUND_COLOR);
        assert_eq!(palette.panel_background, DEFAULT_PANEL_BACKGROUND_COLOR);
    }

    #[test]
    fn empty_role_values_fall_back() {
        let theme = theme_from(json!({ "bg_color": "" }));
        let palette = resolve_palette(Some(&theme));
        assert_eq!(palette.background, DEFAULT_BACKGROUND_COLOR);
    }

    #[test]
    fn dump_is_null_before_any_theme() {
        assert_eq!(theme_dump(None), "null");
    }

    #[test]
    fn dump_preserves_fields_beyond_the_named_roles() {
        let theme = theme_from(json!({
            "bg_color": "#111111",
            "hint_color": "#999999",
            "link_color": "#2481cc"
        }));
        let dump = theme_dump(Some(&theme));
        assert!(dump.contains("\"bg_color\": \"#111111\""));
        assert!(dump.contains("\"hint_color\": \"#999999\""));
        assert!(dump.contains("\"link_color\": \"#2481cc\""));
        assert_eq!(theme.extra.len(), 2);
    }

    #[test]
    fn dump_round_trips_through_decode() {
        let theme = theme_from(json!({
            "bg_color": "#17212b",
            "hint_color": "#708499"
        }));
        let dump = theme_dump(Some(&theme));
        let reparsed: ThemeParameters =
            serde_json::from_str(&dump).expect("dump decodes back into a theme");
        assert_eq!(reparsed, theme);
    }
}
