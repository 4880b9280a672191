use serde::{Deserialize, Serialize};

pub const UNKNOWN_USER_LABEL: &str = "Unknown User";
pub const ABSENT_USER_LABEL: &str = "N/A";

/// Profile fields the host bridge reports for the current user.
///
/// Everything except `id` is optional, and the host may send empty strings
/// where it has no value, so both absence and emptiness count as "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

impl UserIdentity {
    /// Preferred human label: first+last, then first, then @username,
    /// then a fixed fallback.
    pub fn display_name(&self) -> String {
        let first = present_field(self.first_name.as_deref());
        let last = present_field(self.last_name.as_deref());
        match (first, last) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_string(),
            (None, _) => match present_field(self.username.as_deref()) {
                Some(username) => format!("@{username}"),
                None => UNKNOWN_USER_LABEL.to_string(),
            },
        }
    }

    pub fn username_handle(&self) -> Option<String> {
        present_field(self.username.as_deref()).map(|username| format!("@{username}"))
    }

    pub fn language_code(&self) -> Option<&str> {
        present_field(self.language_code.as_deref())
    }
}

/// Display name for a possibly-absent identity.
pub fn display_name(identity: Option<&UserIdentity>) -> String {
    match identity {
        Some(identity) => identity.display_name(),
        None => ABSENT_USER_LABEL.to_string(),
    }
}

fn present_field(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity(first: Option<&str>, last: Option<&str>, username: Option<&str>) -> UserIdentity {
        UserIdentity {
            id: 1,
            first_name: first.map(ToString::to_string),
            last_name: last.map(ToString::to_string),
            username: username.map(ToString::to_string),
            language_code: None,
        }
    }

    #[test]
    fn full_name_wins_over_username() {
        let user = identity(Some("Ann"), Some("Lee"), Some("annlee"));
        assert_eq!(user.display_name(), "Ann Lee");
    }

    #[test]
    fn first_name_alone_is_used_without_last_name() {
        let user = identity(Some("Ann"), None, Some("annlee"));
        assert_eq!(user.display_name(), "Ann");
    }

    #[test]
    fn username_is_at_prefixed_when_names_are_missing() {
        let user = identity(None, None, Some("annlee"));
        assert_eq!(user.display_name(), "@annlee");
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let user = identity(Some(""), Some("Lee"), Some("annlee"));
        assert_eq!(user.display_name(), "@annlee");
    }

    #[test]
    fn last_name_without_first_name_falls_through_to_username() {
        let user = identity(None, Some("Lee"), Some("annlee"));
        assert_eq!(user.display_name(), "@annlee");
    }

    #[test]
    fn bare_identity_uses_unknown_user_label() {
        let user = identity(None, None, None);
        assert_eq!(user.display_name(), UNKNOWN_USER_LABEL);
    }

    #[test]
    fn absent_identity_uses_absent_label() {
        assert_eq!(display_name(None), ABSENT_USER_LABEL);
    }

    #[test]
    fn decodes_bridge_user_payload_and_ignores_unknown_fields() {
        let payload = json!({
            "id": 42,
            "first_name": "Ann",
            "username": "annlee",
            "language_code": "en",
            "is_premium": true,
            "photo_url": "https://t.me/i/userpic/320/annlee.jpg"
        });
        let user: UserIdentity =
            serde_json::from_value(payload).expect("bridge user payload decodes");
        assert_eq!(user.id, 42);
        assert_eq!(user.first_name.as_deref(), Some("Ann"));
        assert_eq!(user.last_name, None);
        assert_eq!(user.username_handle().as_deref(), Some("@annlee"));
        assert_eq!(user.language_code(), Some("en"));
    }

    #[test]
    fn decode_fails_without_an_id() {
        let payload = json!({ "first_name": "Ann" });
        assert!(serde_json::from_value::<UserIdentity>(payload).is_err());
    }
}
