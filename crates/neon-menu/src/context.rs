//! Request and handler contexts.
//!
//! [`RequestContext`] is what a command hands to a new menu: who asked and
//! where interaction events come from. [`MenuContext`] is what every handler
//! receives: enough of the running menu to edit its message and re-render
//! its controls.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{MenuError, MenuResult};
use crate::host::{ComponentInteraction, EventSource, MenuMessage, MessageEdit, ResponseType, UserId};
use crate::registry::ControlRegistry;
use crate::render::{self, ActionRow};

/// The command invocation a menu was created for
#[derive(Clone)]
pub struct RequestContext {
    /// User who ran the command
    pub user_id: UserId,
    /// Where the menu waits for interactions
    pub events: Arc<dyn EventSource>,
}

impl RequestContext {
    /// Create a request context
    pub fn new(user_id: UserId, events: Arc<dyn EventSource>) -> Self {
        Self { user_id, events }
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// Handle passed to control handlers
#[derive(Debug, Clone)]
pub struct MenuContext {
    pub(crate) message: Option<Arc<dyn MenuMessage>>,
    pub(crate) interaction: Option<Arc<dyn ComponentInteraction>>,
    pub(crate) registry: Arc<ControlRegistry>,
}

impl MenuContext {
    /// Edit the menu message.
    ///
    /// Answers the current interaction if there is one, otherwise edits the
    /// message directly.
    pub async fn edit_msg(&self, edit: impl Into<MessageEdit>) -> MenuResult<()> {
        edit_message(
            self.message.as_deref(),
            self.interaction.as_deref(),
            edit.into(),
        )
        .await
    }

    /// Render the menu's controls
    pub fn render(&self, disabled: Option<bool>) -> Vec<ActionRow> {
        render::render(&self.registry, disabled)
    }

    /// The interaction being handled, if any
    pub fn interaction(&self) -> Option<&Arc<dyn ComponentInteraction>> {
        self.interaction.as_ref()
    }
}

/// Apply an edit through whichever path the platform currently accepts.
///
/// An interaction must be acknowledged with its initial response inside a
/// short window; once that is used up or expired the platform answers
/// `NotFound` and the already-sent response has to be edited instead.
pub(crate) async fn edit_message(
    message: Option<&dyn MenuMessage>,
    interaction: Option<&dyn ComponentInteraction>,
    edit: MessageEdit,
) -> MenuResult<()> {
    if let Some(interaction) = interaction {
        return match interaction
            .create_initial_response(ResponseType::MessageUpdate, edit.clone())
            .await
        {
            Ok(()) => Ok(()),
            Err(err) if err.is_not_found() => {
                debug!(
                    custom_id = interaction.custom_id(),
                    "Initial response unavailable, editing it instead"
                );
                interaction.edit_initial_response(edit).await?;
                Ok(())
            }
            Err(err) => Err(err.into()),
        };
    }

    match message {
        Some(message) => {
            message.edit(edit).await?;
            Ok(())
        }
        None => Err(MenuError::MessageNotSent),
    }
}
