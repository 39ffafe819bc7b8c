use serde::{Deserialize, Serialize, Serializer};

use super::Emoji;

/// Visual style of a button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    /// Blurple
    #[default]
    Primary,
    /// Grey
    Secondary,
    /// Green
    Success,
    /// Red
    Danger,
    /// Navigates to a URL instead of sending an interaction
    Link,
}

impl ButtonStyle {
    /// Numeric value used on the wire
    pub fn value(self) -> u8 {
        match self {
            Self::Primary => 1,
            Self::Secondary => 2,
            Self::Success => 3,
            Self::Danger => 4,
            Self::Link => 5,
        }
    }
}

impl Serialize for ButtonStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

/// A declared button.
///
/// `custom_id` is the id round-tripped through interactions. For
/// [`ButtonStyle::Link`] buttons it holds the URL instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Text shown on the button
    pub label: String,
    /// Custom id, or URL for link buttons
    pub custom_id: String,
    /// Button style
    pub style: ButtonStyle,
    /// Optional emoji shown before the label
    pub emoji: Option<Emoji>,
    /// Stored disabled flag
    pub is_disabled: bool,
}

impl Button {
    /// Create an enabled button without an emoji
    pub fn new(label: impl Into<String>, custom_id: impl Into<String>, style: ButtonStyle) -> Self {
        Self {
            label: label.into(),
            custom_id: custom_id.into(),
            style,
            emoji: None,
            is_disabled: false,
        }
    }

    /// Create a link button pointing at `url`
    pub fn link(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(label, url, ButtonStyle::Link)
    }

    /// Set the emoji
    pub fn with_emoji(mut self, emoji: impl Into<Emoji>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    /// Set the stored disabled flag
    pub fn disabled(mut self, is_disabled: bool) -> Self {
        self.is_disabled = is_disabled;
        self
    }

    /// Whether this is a link button
    pub fn is_link(&self) -> bool {
        self.style == ButtonStyle::Link
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_builder() {
        let button = Button::new("Dog", "dog", ButtonStyle::Primary)
            .with_emoji("🐶")
            .disabled(true);

        assert_eq!(button.label, "Dog");
        assert_eq!(button.custom_id, "dog");
        assert_eq!(button.emoji, Some(Emoji::Unicode("🐶".into())));
        assert!(button.is_disabled);
        assert!(!button.is_link());
    }

    #[test]
    fn test_style_values() {
        assert_eq!(ButtonStyle::Primary.value(), 1);
        assert_eq!(ButtonStyle::Danger.value(), 4);
        assert_eq!(serde_json::to_string(&ButtonStyle::Link).unwrap(), "5");
        assert!(Button::link("Docs", "https://example.com").is_link());
    }
}
