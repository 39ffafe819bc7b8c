use super::Emoji;

/// One choice inside a [`SelectMenu`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectMenuOption {
    /// Text shown for the option
    pub label: String,
    /// Value reported back when the option is selected
    pub custom_id: String,
    /// Secondary text under the label (empty for none)
    pub description: String,
    /// Optional emoji
    pub emoji: Option<Emoji>,
    /// Whether the option is pre-selected
    pub is_default: bool,
}

impl SelectMenuOption {
    /// Create an option with an empty description
    pub fn new(label: impl Into<String>, custom_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            custom_id: custom_id.into(),
            description: String::new(),
            emoji: None,
            is_default: false,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the emoji
    pub fn with_emoji(mut self, emoji: impl Into<Emoji>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }

    /// Mark as pre-selected
    pub fn default_selected(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }
}

/// A declared select menu.
///
/// Options render in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectMenu {
    /// Custom id round-tripped through interactions
    pub custom_id: String,
    /// Text shown when nothing is selected
    pub placeholder: String,
    /// Stored disabled flag
    pub is_disabled: bool,
    /// Minimum number of options a user must pick
    pub min_values: u8,
    /// Maximum number of options a user may pick
    pub max_values: u8,
    /// Options in render order
    pub options: Vec<SelectMenuOption>,
}

impl SelectMenu {
    /// Create an enabled single-choice select menu with no options
    pub fn new(custom_id: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            placeholder: placeholder.into(),
            is_disabled: false,
            min_values: 1,
            max_values: 1,
            options: Vec::new(),
        }
    }

    /// Append an option
    pub fn option(mut self, option: SelectMenuOption) -> Self {
        self.options.push(option);
        self
    }

    /// Set the minimum number of selected options
    pub fn min_values(mut self, min_values: u8) -> Self {
        self.min_values = min_values;
        self
    }

    /// Set the maximum number of selected options
    pub fn max_values(mut self, max_values: u8) -> Self {
        self.max_values = max_values;
        self
    }

    /// Set the stored disabled flag
    pub fn disabled(mut self, is_disabled: bool) -> Self {
        self.is_disabled = is_disabled;
        self
    }

    /// Look up an option by id
    pub fn get_option(&self, custom_id: &str) -> Option<&SelectMenuOption> {
        self.options.iter().find(|o| o.custom_id == custom_id)
    }

    /// Check the selection bounds and option ids.
    ///
    /// Returns a human readable reason on failure, or the first duplicated
    /// option id.
    pub(crate) fn validate(&self) -> Result<(), SelectMenuProblem> {
        if self.min_values < 1 {
            return Err(SelectMenuProblem::Bounds(
                "min_values must be at least 1".into(),
            ));
        }
        if self.min_values > self.max_values {
            return Err(SelectMenuProblem::Bounds(format!(
                "min_values ({}) exceeds max_values ({})",
                self.min_values, self.max_values
            )));
        }
        if !self.options.is_empty() && usize::from(self.max_values) > self.options.len() {
            return Err(SelectMenuProblem::Bounds(format!(
                "max_values ({}) exceeds option count ({})",
                self.max_values,
                self.options.len()
            )));
        }

        for (i, option) in self.options.iter().enumerate() {
            if self.options[..i]
                .iter()
                .any(|o| o.custom_id == option.custom_id)
            {
                return Err(SelectMenuProblem::DuplicateOption(option.custom_id.clone()));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectMenuProblem {
    Bounds(String),
    DuplicateOption(String),
}
