//! Error types for menu construction and dispatch

use thiserror::Error;

use crate::host::HostError;

/// Which id namespace a duplicate was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScope {
    /// Ungrouped buttons
    Button,
    /// Button group keys
    Group,
    /// Select menus
    SelectMenu,
    /// Options inside a single select menu
    Option,
}

impl std::fmt::Display for IdScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Button => "button",
            Self::Group => "button group",
            Self::SelectMenu => "select menu",
            Self::Option => "select menu option",
        };
        f.write_str(name)
    }
}

/// Errors raised by a [`ComponentMenu`](crate::ComponentMenu)
#[derive(Debug, Error)]
pub enum MenuError {
    /// Two controls in the same scope share an id
    #[error("Duplicate {scope} id: {id}")]
    DuplicateId {
        /// Namespace the collision happened in
        scope: IdScope,
        /// The colliding id
        id: String,
    },

    /// More than one timeout handler was declared
    #[error("Multiple timeout handlers declared ({count})")]
    MultipleTimeoutHandlers {
        /// How many were found
        count: usize,
    },

    /// Select menu bounds do not make sense
    #[error("Invalid select menu '{id}': {reason}")]
    InvalidSelectMenu {
        /// Select menu id
        id: String,
        /// What is wrong with it
        reason: String,
    },

    /// A select menu interaction referenced an id that was never registered
    #[error("Unknown select menu: {0}")]
    UnknownSelectMenu(String),

    /// `edit_msg` was called before `run` captured a message
    #[error("Menu message has not been sent yet")]
    MessageNotSent,

    /// A control handler returned an error
    #[error("Handler for '{control}' failed: {source}")]
    Handler {
        /// Id of the control (or group key) whose handler failed
        control: String,
        /// Error returned by the handler
        #[source]
        source: anyhow::Error,
    },

    /// The host framework rejected a request
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Result alias for menu operations
pub type MenuResult<T> = Result<T, MenuError>;

impl MenuError {
    /// Create a duplicate id error
    pub fn duplicate(scope: IdScope, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            scope,
            id: id.into(),
        }
    }

    /// Create an invalid select menu error
    pub fn invalid_select(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelectMenu {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a handler failure
    pub fn handler(control: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Handler {
            control: control.into(),
            source,
        }
    }

    /// Whether this error comes from a bad menu declaration
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateId { .. }
                | Self::MultipleTimeoutHandlers { .. }
                | Self::InvalidSelectMenu { .. }
        )
    }

    /// Short category name for logs
    pub fn category(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "duplicate_id",
            Self::MultipleTimeoutHandlers { .. } => "multiple_timeout_handlers",
            Self::InvalidSelectMenu { .. } => "invalid_select_menu",
            Self::UnknownSelectMenu(_) => "unknown_select_menu",
            Self::MessageNotSent => "message_not_sent",
            Self::Handler { .. } => "handler",
            Self::Host(_) => "host",
        }
    }
}
