use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Emoji shown on a button or select menu option
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Emoji {
    /// A unicode emoji such as `"🐶"`
    Unicode(String),
    /// A custom guild emoji
    Custom {
        /// Emoji snowflake
        id: u64,
        /// Emoji name
        name: Option<String>,
        /// Whether the emoji is animated
        animated: bool,
    },
}

impl Emoji {
    /// Create a custom emoji reference from its id
    pub fn custom(id: u64) -> Self {
        Self::Custom {
            id,
            name: None,
            animated: false,
        }
    }
}

impl From<&str> for Emoji {
    fn from(value: &str) -> Self {
        Self::Unicode(value.to_string())
    }
}

impl From<String> for Emoji {
    fn from(value: String) -> Self {
        Self::Unicode(value)
    }
}

impl From<char> for Emoji {
    fn from(value: char) -> Self {
        Self::Unicode(value.to_string())
    }
}

impl From<u64> for Emoji {
    fn from(value: u64) -> Self {
        Self::custom(value)
    }
}

impl std::fmt::Display for Emoji {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unicode(s) => f.write_str(s),
            Self::Custom {
                id,
                name: Some(name),
                animated,
            } => {
                let prefix = if *animated { "a" } else { "" };
                write!(f, "<{}:{}:{}>", prefix, name, id)
            }
            Self::Custom { id, name: None, .. } => write!(f, "{}", id),
        }
    }
}

// Partial emoji object: unicode emojis only carry a name, custom ones an id
impl Serialize for Emoji {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unicode(name) => {
                let mut state = serializer.serialize_struct("Emoji", 1)?;
                state.serialize_field("name", name)?;
                state.end()
            }
            Self::Custom { id, name, animated } => {
                let mut state = serializer.serialize_struct("Emoji", 3)?;
                state.serialize_field("id", &id.to_string())?;
                state.serialize_field("name", name)?;
                state.serialize_field("animated", animated)?;
                state.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unicode_serializes_name_only() {
        let emoji = Emoji::from("🐶");
        assert_eq!(serde_json::to_value(&emoji).unwrap(), json!({ "name": "🐶" }));
    }

    #[test]
    fn test_custom_serializes_id_as_string() {
        let emoji = Emoji::Custom {
            id: 41771983429993937,
            name: Some("moyai".into()),
            animated: true,
        };
        assert_eq!(
            serde_json::to_value(&emoji).unwrap(),
            json!({ "id": "41771983429993937", "name": "moyai", "animated": true })
        );
        assert_eq!(emoji.to_string(), "<a:moyai:41771983429993937>");
    }
}
