//! Control registry: declared controls bound to a menu instance.
//!
//! Registries are built once and then read-only. [`ControlRegistry::bind`]
//! consumes a menu's declarations, binds each handler to the owning
//! definition and returns an immutable registry. Rebuilding replaces the
//! whole registry rather than mutating it.
//!
//! ## Design
//!
//! - **Trait defines contract**: `get`, `contains`, `iter`, `len`
//! - **Insertion order is iteration order**: render order follows declaration
//! - **Duplicates are rejected**: ids are unique per scope

use std::borrow::Borrow;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::component::{Button, SelectMenu, SelectMenuProblem};
use crate::error::{IdScope, MenuError, MenuResult};
use crate::handler::{
    bind_group, bind_select, bind_timeout, BoundButtonHandler, BoundGroupHandler,
    BoundSelectHandler, BoundTimeoutHandler, Control, ControlKind, MenuDefinition,
};

/// A read-only registry for key-value lookups
///
/// Implementations are expected to be immutable after construction.
pub trait Registry {
    /// The key type used for lookups
    type Key;

    /// The value type stored in the registry
    type Value;

    /// Get a value by key
    fn get<Q>(&self, key: &Q) -> Option<&Self::Value>
    where
        Self::Key: Borrow<Q>,
        Q: ?Sized + Eq + std::hash::Hash;

    /// Check if the registry contains a key
    fn contains<Q>(&self, key: &Q) -> bool
    where
        Self::Key: Borrow<Q>,
        Q: ?Sized + Eq + std::hash::Hash,
    {
        self.get(key).is_some()
    }

    /// List all key-value pairs
    fn iter(&self) -> impl Iterator<Item = (&Self::Key, &Self::Value)>;

    /// Number of entries in the registry
    fn len(&self) -> usize;

    /// Check if the registry is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// String-keyed registry that iterates in insertion order
#[derive(Debug, Clone)]
pub struct OrderedRegistry<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for OrderedRegistry<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> OrderedRegistry<V> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new entry.
    ///
    /// Hands the value back if the key is already taken.
    pub fn try_register(&mut self, key: impl Into<String>, value: V) -> Result<(), V> {
        let key = key.into();
        if self.index.contains_key(&key) {
            return Err(value);
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        Ok(())
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl<V> Registry for OrderedRegistry<V> {
    type Key = String;
    type Value = V;

    fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        String: Borrow<Q>,
        Q: ?Sized + Eq + std::hash::Hash,
    {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// An ungrouped button and its bound handler
#[derive(Debug, Clone)]
pub struct RegisteredButton {
    /// The declared button
    pub button: Button,
    pub(crate) handler: BoundButtonHandler,
}

/// A button group and its shared handler
#[derive(Debug, Clone)]
pub struct RegisteredGroup {
    /// Group key (the handler's declared name)
    pub name: String,
    /// Buttons in declaration order
    pub buttons: Vec<Button>,
    pub(crate) handler: BoundGroupHandler,
}

/// A select menu and its bound handler
#[derive(Debug, Clone)]
pub struct RegisteredSelectMenu {
    /// The declared select menu
    pub menu: SelectMenu,
    pub(crate) handler: BoundSelectHandler,
}

/// The timeout handler
#[derive(Debug, Clone)]
pub struct RegisteredTimeout {
    /// Whether to disable every control after the handler runs
    pub disable_components: bool,
    pub(crate) handler: BoundTimeoutHandler,
}

/// All controls of one menu instance
#[derive(Debug, Clone, Default)]
pub struct ControlRegistry {
    buttons: OrderedRegistry<RegisteredButton>,
    groups: OrderedRegistry<RegisteredGroup>,
    select_menus: OrderedRegistry<RegisteredSelectMenu>,
    timeout: Option<RegisteredTimeout>,
}

impl ControlRegistry {
    /// Bind `controls` to `owner` and collect them.
    ///
    /// Fails on the first duplicate id, on an invalid select menu, or when
    /// more than one timeout handler is declared. Nothing is kept on failure.
    pub fn bind<D: MenuDefinition>(owner: &Arc<D>, controls: Vec<Control<D>>) -> MenuResult<Self> {
        let timeouts = controls
            .iter()
            .filter(|c| matches!(c.kind, ControlKind::Timeout { .. }))
            .count();
        if timeouts > 1 {
            return Err(MenuError::MultipleTimeoutHandlers { count: timeouts });
        }

        let mut registry = Self::default();

        for control in controls {
            match control.kind {
                ControlKind::Button { button, handler } => {
                    let id = button.custom_id.clone();
                    let entry = RegisteredButton {
                        button,
                        handler: handler.bind(owner),
                    };
                    if registry.buttons.try_register(id.clone(), entry).is_err() {
                        return Err(MenuError::duplicate(IdScope::Button, id));
                    }
                }
                ControlKind::Group {
                    name,
                    buttons,
                    handler,
                } => {
                    let entry = RegisteredGroup {
                        name: name.clone(),
                        buttons,
                        handler: bind_group(handler, owner),
                    };
                    if registry.groups.try_register(name.clone(), entry).is_err() {
                        return Err(MenuError::duplicate(IdScope::Group, name));
                    }
                }
                ControlKind::SelectMenu { menu, handler } => {
                    match menu.validate() {
                        Ok(()) => {}
                        Err(SelectMenuProblem::Bounds(reason)) => {
                            return Err(MenuError::invalid_select(&menu.custom_id, reason));
                        }
                        Err(SelectMenuProblem::DuplicateOption(id)) => {
                            return Err(MenuError::duplicate(IdScope::Option, id));
                        }
                    }
                    let id = menu.custom_id.clone();
                    let entry = RegisteredSelectMenu {
                        menu,
                        handler: bind_select(handler, owner),
                    };
                    if registry.select_menus.try_register(id.clone(), entry).is_err() {
                        return Err(MenuError::duplicate(IdScope::SelectMenu, id));
                    }
                }
                ControlKind::Timeout {
                    disable_components,
                    handler,
                } => {
                    registry.timeout = Some(RegisteredTimeout {
                        disable_components,
                        handler: bind_timeout(handler, owner),
                    });
                }
            }
        }

        registry.warn_on_shared_ids();

        debug!(
            buttons = registry.buttons.len(),
            groups = registry.groups.len(),
            select_menus = registry.select_menus.len(),
            has_timeout_handler = registry.timeout.is_some(),
            "Control registry built"
        );

        Ok(registry)
    }

    // A press on a shared id runs both the flat and the group handler
    fn warn_on_shared_ids(&self) {
        for group in self.groups.values() {
            for button in &group.buttons {
                if self.buttons.contains(button.custom_id.as_str()) {
                    warn!(
                        id = %button.custom_id,
                        group = %group.name,
                        "Button id is registered both ungrouped and in a group; both handlers will run"
                    );
                }
            }
        }
    }

    /// Ungrouped buttons by id
    pub fn buttons(&self) -> &OrderedRegistry<RegisteredButton> {
        &self.buttons
    }

    /// Button groups by key
    pub fn groups(&self) -> &OrderedRegistry<RegisteredGroup> {
        &self.groups
    }

    /// Select menus by id
    pub fn select_menus(&self) -> &OrderedRegistry<RegisteredSelectMenu> {
        &self.select_menus
    }

    /// The timeout handler, if declared
    pub fn timeout_handler(&self) -> Option<&RegisteredTimeout> {
        self.timeout.as_ref()
    }

    /// Ungrouped button by id
    pub fn button(&self, custom_id: &str) -> Option<&RegisteredButton> {
        self.buttons.get(custom_id)
    }

    /// Select menu by id
    pub fn select_menu(&self, custom_id: &str) -> Option<&RegisteredSelectMenu> {
        self.select_menus.get(custom_id)
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
            && self.groups.is_empty()
            && self.select_menus.is_empty()
            && self.timeout.is_none()
    }
}
