//! Layout rendering: registry → action rows.
//!
//! Row order is fixed:
//!
//! 1. one row holding every ungrouped button (omitted when there are none)
//! 2. one row per button group
//! 3. one row per select menu
//!
//! Within each row, controls keep their declaration order. A `Some` disabled
//! override replaces every stored disabled flag; `None` keeps them.
//!
//! Rows serialize to the Discord message component JSON shape.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::component::{Button, ButtonStyle, Emoji, SelectMenu, SelectMenuOption};
use crate::registry::{ControlRegistry, Registry};

const ACTION_ROW_TYPE: u8 = 1;
const BUTTON_TYPE: u8 = 2;
const STRING_SELECT_TYPE: u8 = 3;

/// A horizontal row of rendered controls
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActionRow {
    /// Controls in display order
    pub components: Vec<RowComponent>,
}

impl ActionRow {
    /// Number of controls in the row
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the row has no controls
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Whether every control in the row is disabled
    pub fn all_disabled(&self) -> bool {
        self.components.iter().all(RowComponent::is_disabled)
    }

    /// Custom ids of the row's controls, in order
    pub fn custom_ids(&self) -> Vec<&str> {
        self.components.iter().map(RowComponent::custom_id).collect()
    }
}

/// One rendered control
#[derive(Debug, Clone, PartialEq)]
pub enum RowComponent {
    /// A button
    Button(ButtonPrimitive),
    /// A select menu
    SelectMenu(SelectMenuPrimitive),
}

impl RowComponent {
    /// Effective disabled flag
    pub fn is_disabled(&self) -> bool {
        match self {
            Self::Button(b) => b.disabled,
            Self::SelectMenu(m) => m.disabled,
        }
    }

    /// Custom id (URL for link buttons)
    pub fn custom_id(&self) -> &str {
        match self {
            Self::Button(b) => &b.custom_id,
            Self::SelectMenu(m) => &m.custom_id,
        }
    }
}

/// Rendered button
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonPrimitive {
    /// Style
    pub style: ButtonStyle,
    /// Custom id, or URL for link buttons
    pub custom_id: String,
    /// Label
    pub label: String,
    /// Emoji
    pub emoji: Option<Emoji>,
    /// Effective disabled flag
    pub disabled: bool,
}

/// Rendered select menu
#[derive(Debug, Clone, PartialEq)]
pub struct SelectMenuPrimitive {
    /// Custom id
    pub custom_id: String,
    /// Placeholder text
    pub placeholder: String,
    /// Minimum selections
    pub min_values: u8,
    /// Maximum selections
    pub max_values: u8,
    /// Effective disabled flag
    pub disabled: bool,
    /// Options in declaration order
    pub options: Vec<SelectOptionPrimitive>,
}

/// Rendered select menu option
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SelectOptionPrimitive {
    /// Label
    pub label: String,
    /// Value reported on selection
    #[serde(rename = "value")]
    pub custom_id: String,
    /// Description
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Emoji
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<Emoji>,
    /// Pre-selected
    #[serde(rename = "default")]
    pub is_default: bool,
}

impl ButtonPrimitive {
    fn from_button(button: &Button, disabled: Option<bool>) -> Self {
        Self {
            style: button.style,
            custom_id: button.custom_id.clone(),
            label: button.label.clone(),
            emoji: button.emoji.clone(),
            disabled: disabled.unwrap_or(button.is_disabled),
        }
    }
}

impl SelectMenuPrimitive {
    fn from_menu(menu: &SelectMenu, disabled: Option<bool>) -> Self {
        Self {
            custom_id: menu.custom_id.clone(),
            placeholder: menu.placeholder.clone(),
            min_values: menu.min_values,
            max_values: menu.max_values,
            disabled: disabled.unwrap_or(menu.is_disabled),
            options: menu.options.iter().map(SelectOptionPrimitive::from).collect(),
        }
    }
}

impl From<&SelectMenuOption> for SelectOptionPrimitive {
    fn from(option: &SelectMenuOption) -> Self {
        Self {
            label: option.label.clone(),
            custom_id: option.custom_id.clone(),
            description: option.description.clone(),
            emoji: option.emoji.clone(),
            is_default: option.is_default,
        }
    }
}

fn button_row<'a>(buttons: impl IntoIterator<Item = &'a Button>, disabled: Option<bool>) -> ActionRow {
    ActionRow {
        components: buttons
            .into_iter()
            .map(|b| RowComponent::Button(ButtonPrimitive::from_button(b, disabled)))
            .collect(),
    }
}

/// Render the registry into action rows
pub fn render(registry: &ControlRegistry, disabled: Option<bool>) -> Vec<ActionRow> {
    let mut rows = Vec::new();

    if !registry.buttons().is_empty() {
        rows.push(button_row(
            registry.buttons().iter().map(|(_, entry)| &entry.button),
            disabled,
        ));
    }

    for (_, group) in registry.groups().iter() {
        rows.push(button_row(&group.buttons, disabled));
    }

    for (_, entry) in registry.select_menus().iter() {
        rows.push(ActionRow {
            components: vec![RowComponent::SelectMenu(SelectMenuPrimitive::from_menu(
                &entry.menu,
                disabled,
            ))],
        });
    }

    rows
}

impl Serialize for ActionRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ActionRow", 2)?;
        state.serialize_field("type", &ACTION_ROW_TYPE)?;
        state.serialize_field("components", &self.components)?;
        state.end()
    }
}

impl Serialize for RowComponent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Button(b) => b.serialize(serializer),
            Self::SelectMenu(m) => m.serialize(serializer),
        }
    }
}

impl Serialize for ButtonPrimitive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Button", 6)?;
        state.serialize_field("type", &BUTTON_TYPE)?;
        state.serialize_field("style", &self.style)?;
        state.serialize_field("label", &self.label)?;
        // Link buttons carry a URL instead of a custom id
        if self.style == ButtonStyle::Link {
            state.serialize_field("url", &self.custom_id)?;
        } else {
            state.serialize_field("custom_id", &self.custom_id)?;
        }
        if let Some(emoji) = &self.emoji {
            state.serialize_field("emoji", emoji)?;
        }
        state.serialize_field("disabled", &self.disabled)?;
        state.end()
    }
}

impl Serialize for SelectMenuPrimitive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SelectMenu", 7)?;
        state.serialize_field("type", &STRING_SELECT_TYPE)?;
        state.serialize_field("custom_id", &self.custom_id)?;
        state.serialize_field("placeholder", &self.placeholder)?;
        state.serialize_field("min_values", &self.min_values)?;
        state.serialize_field("max_values", &self.max_values)?;
        state.serialize_field("disabled", &self.disabled)?;
        state.serialize_field("options", &self.options)?;
        state.end()
    }
}
