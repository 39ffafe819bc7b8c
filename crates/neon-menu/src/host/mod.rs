//! Adapter traits for the host chat framework.
//!
//! The menu never talks to a chat platform directly. A host integration
//! supplies three things:
//!
//! - [`MenuMessage`]: the sent message the menu is attached to
//! - [`ComponentInteraction`]: one inbound button press or selection, with its
//!   two acknowledgement flavours
//! - [`EventSource`]: a wait-with-timeout over interaction-created events
//!
//! [`BroadcastEventSource`] is a ready-made [`EventSource`] over a tokio
//! broadcast channel for hosts that fan events out in-process.

mod broadcast;

pub use broadcast::{BroadcastEventSource, InteractionPublisher};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::render::ActionRow;

/// Snowflake of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UserId(pub u64);

/// Snowflake of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MessageId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of component an interaction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// A button press
    Button,
    /// A string select menu choice
    SelectMenu,
    /// Any other component kind, by wire value
    Other(u8),
}

/// How an initial interaction response is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// Edit the message the component is attached to
    MessageUpdate,
}

/// Payload for a message edit
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageEdit {
    /// New message content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Replacement action rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ActionRow>>,
}

impl MessageEdit {
    /// An edit that changes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Replace the action rows
    pub fn with_components(mut self, components: Vec<ActionRow>) -> Self {
        self.components = Some(components);
        self
    }
}

impl From<&str> for MessageEdit {
    fn from(content: &str) -> Self {
        Self::new().with_content(content)
    }
}

impl From<String> for MessageEdit {
    fn from(content: String) -> Self {
        Self::new().with_content(content)
    }
}

impl From<Vec<ActionRow>> for MessageEdit {
    fn from(components: Vec<ActionRow>) -> Self {
        Self::new().with_components(components)
    }
}

/// Errors returned by host adapters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The target does not exist any more. For initial responses this means
    /// the response window closed or the interaction was already answered.
    #[error("Unknown interaction or message")]
    NotFound,

    /// The platform refused the request
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// Platform status code
        status: u16,
        /// Platform error message
        message: String,
    },

    /// The request never reached the platform
    #[error("Transport error: {0}")]
    Transport(String),
}

impl HostError {
    /// Create a rejection error
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Whether this is the "not found / expired" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Outcome of an [`EventSource::wait_for`] that produced no event
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WaitError {
    /// No matching event arrived in time
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// The host stopped delivering events
    #[error("Event stream closed")]
    Closed,
}

/// The message a menu is attached to
#[async_trait]
pub trait MenuMessage: Send + Sync + fmt::Debug {
    /// Message id, used to scope incoming interactions
    fn id(&self) -> MessageId;

    /// Edit the message directly
    async fn edit(&self, edit: MessageEdit) -> Result<(), HostError>;
}

/// An inbound component interaction
#[async_trait]
pub trait ComponentInteraction: Send + Sync + fmt::Debug {
    /// Message the component belongs to
    fn message_id(&self) -> MessageId;

    /// User who operated the component
    fn user_id(&self) -> UserId;

    /// Component kind
    fn component_type(&self) -> ComponentType;

    /// Custom id of the component
    fn custom_id(&self) -> &str;

    /// Selected values (empty for buttons)
    fn values(&self) -> &[String];

    /// Acknowledge the interaction. Valid once, inside the response window.
    ///
    /// Must fail with [`HostError::NotFound`] when the window has closed or
    /// the interaction was already acknowledged.
    async fn create_initial_response(
        &self,
        kind: ResponseType,
        edit: MessageEdit,
    ) -> Result<(), HostError>;

    /// Edit the already-sent initial response
    async fn edit_initial_response(&self, edit: MessageEdit) -> Result<(), HostError>;
}

/// A slash/prefix command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInteraction {
    /// Command name
    pub name: String,
    /// Invoking user
    pub user_id: UserId,
}

/// Any interaction delivered by the host
#[derive(Debug, Clone)]
pub enum Interaction {
    /// Button press or menu selection
    Component(Arc<dyn ComponentInteraction>),
    /// Application command
    Command(CommandInteraction),
}

impl Interaction {
    /// The component interaction, if this is one
    pub fn as_component(&self) -> Option<&Arc<dyn ComponentInteraction>> {
        match self {
            Self::Component(inner) => Some(inner),
            Self::Command(_) => None,
        }
    }
}

/// Interaction-created gateway event
#[derive(Debug, Clone)]
pub struct InteractionCreateEvent {
    /// The interaction that was created
    pub interaction: Interaction,
}

impl InteractionCreateEvent {
    /// Wrap a component interaction
    pub fn component(interaction: Arc<dyn ComponentInteraction>) -> Self {
        Self {
            interaction: Interaction::Component(interaction),
        }
    }

    /// Wrap a command interaction
    pub fn command(command: CommandInteraction) -> Self {
        Self {
            interaction: Interaction::Command(command),
        }
    }
}

/// Predicate used to filter events while waiting
pub type EventPredicate<'a> = &'a (dyn Fn(&InteractionCreateEvent) -> bool + Send + Sync);

/// Wait-with-timeout over the host's interaction events
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Wait for the next event matching `predicate`.
    ///
    /// The deadline is `timeout` from the start of this call. Events that do
    /// not match are skipped.
    async fn wait_for(
        &self,
        timeout: Duration,
        predicate: EventPredicate<'_>,
    ) -> Result<InteractionCreateEvent, WaitError>;
}
