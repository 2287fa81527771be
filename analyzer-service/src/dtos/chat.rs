use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Who authored a history entry.
///
/// Matching is exact and case-sensitive: anything other than `"user"` or
/// `"assistant"` becomes `Other` and is left out of the rendered context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Assistant,
    #[serde(other)]
    Other,
}

/// One prior turn. Never rejects a request: an absent role means `User`, any
/// role that is not one of the two known strings (including `null` and
/// non-strings) is `Other`, and a `null` content is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Role,
    #[serde(default, deserialize_with = "lenient_content")]
    pub content: String,
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(role) => match role.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other,
        },
        _ => Role::Other,
    })
}

fn lenient_content<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(content) => content,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

impl HistoryEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub history: Option<Vec<HistoryEntry>>,
}

impl ChatRequest {
    /// The message, if present and non-empty.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub response: String,
    pub model: String,
}

impl ChatResponse {
    pub fn new(response: String, model: impl Into<String>) -> Self {
        Self {
            success: true,
            response,
            model: model.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_role_defaults_to_user_and_unknown_roles_map_to_other() {
        let entries: Vec<HistoryEntry> = serde_json::from_str(
            r#"[{"content": "hi"}, {"role": "system", "content": "x"}, {"role": "Assistant"}]"#,
        )
        .unwrap();

        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[1].role, Role::Other);
        assert_eq!(entries[2].role, Role::Other);
        assert_eq!(entries[2].content, "");
    }

    #[test]
    fn null_and_non_string_roles_map_to_other() {
        let entries: Vec<HistoryEntry> = serde_json::from_str(
            r#"[{"role": null, "content": "a"}, {"role": 1, "content": "b"}, {"role": {"x": 1}}]"#,
        )
        .unwrap();

        assert!(entries.iter().all(|e| e.role == Role::Other));
    }

    #[test]
    fn null_content_is_empty_and_scalars_render_as_text() {
        let entries: Vec<HistoryEntry> = serde_json::from_str(
            r#"[{"role": "user", "content": null}, {"role": "user", "content": 42}]"#,
        )
        .unwrap();

        assert_eq!(entries[0].content, "");
        assert_eq!(entries[1].content, "42");
    }

    #[test]
    fn empty_or_null_message_is_treated_as_missing() {
        let empty: ChatRequest = serde_json::from_str(r#"{"message": ""}"#).unwrap();
        let null: ChatRequest = serde_json::from_str(r#"{"message": null}"#).unwrap();
        let absent: ChatRequest = serde_json::from_str("{}").unwrap();

        assert_eq!(empty.message(), None);
        assert_eq!(null.message(), None);
        assert_eq!(absent.message(), None);
        assert!(absent.history().is_empty());
    }
}
