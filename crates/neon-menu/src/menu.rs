//! The running menu: build, wait, dispatch, time out.
//!
//! A [`ComponentMenu`] moves through
//!
//! ```text
//! Idle -> Waiting -> Dispatching -> Waiting -> ...
//!                 \-> TimedOut
//!                 \-> Exited
//! ```
//!
//! Each wait has its own deadline; handlers run to completion before the
//! next wait starts.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::MenuConfig;
use crate::context::{edit_message, MenuContext, RequestContext};
use crate::error::{MenuError, MenuResult};
use crate::handler::MenuDefinition;
use crate::host::{
    ComponentInteraction, ComponentType, InteractionCreateEvent, MenuMessage, MessageEdit,
    WaitError,
};
use crate::registry::ControlRegistry;
use crate::render::{self, ActionRow};

/// Control id used when reporting timeout handler failures
const TIMEOUT_CONTROL: &str = "on_timeout";

/// Lifecycle state of a [`ComponentMenu`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MenuState {
    /// Not running yet
    #[default]
    Idle,
    /// Waiting for the next interaction
    Waiting,
    /// Running a handler
    Dispatching,
    /// No interaction arrived in time; the timeout path ran
    TimedOut,
    /// Stopped without timing out
    Exited,
}

impl MenuState {
    /// Whether `run` has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::TimedOut | Self::Exited)
    }
}

impl fmt::Display for MenuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Waiting => "waiting",
            Self::Dispatching => "dispatching",
            Self::TimedOut => "timed_out",
            Self::Exited => "exited",
        };
        f.write_str(name)
    }
}

/// One interactive menu attached to one message.
///
/// Call [`build`](Self::build) to register the definition's controls and get
/// the rows to send, then [`run`](Self::run) with the sent message.
pub struct ComponentMenu<D: MenuDefinition> {
    definition: Arc<D>,
    context: RequestContext,
    timeout: Duration,
    author_only: bool,
    registry: Arc<ControlRegistry>,
    message: Option<Arc<dyn MenuMessage>>,
    interaction: Option<Arc<dyn ComponentInteraction>>,
    state: MenuState,
}

impl<D: MenuDefinition> ComponentMenu<D> {
    /// Create a menu for `definition`.
    ///
    /// `timeout` applies to each wait separately. With `author_only` set,
    /// an interaction from anyone but the requester ends the menu.
    pub fn new(definition: D, context: RequestContext, timeout: Duration, author_only: bool) -> Self {
        Self {
            definition: Arc::new(definition),
            context,
            timeout,
            author_only,
            registry: Arc::new(ControlRegistry::default()),
            message: None,
            interaction: None,
            state: MenuState::Idle,
        }
    }

    /// Create a menu with options from a [`MenuConfig`]
    pub fn with_config(definition: D, context: RequestContext, config: &MenuConfig) -> Self {
        Self::new(definition, context, config.timeout(), config.author_only)
    }

    /// Register the definition's controls and render them.
    ///
    /// On failure the previously built registry stays in place.
    pub fn build(&mut self) -> MenuResult<Vec<ActionRow>> {
        let registry = ControlRegistry::bind(&self.definition, D::controls())?;
        self.registry = Arc::new(registry);
        Ok(self.render(None))
    }

    /// Render the registered controls.
    ///
    /// `Some(flag)` forces every control's disabled flag.
    pub fn render(&self, disabled: Option<bool>) -> Vec<ActionRow> {
        render::render(&self.registry, disabled)
    }

    /// Edit the menu message, through the current interaction when there is one
    pub async fn edit_msg(&self, edit: impl Into<MessageEdit>) -> MenuResult<()> {
        edit_message(
            self.message.as_deref(),
            self.interaction.as_deref(),
            edit.into(),
        )
        .await
    }

    /// Context handed to handlers
    pub fn handler_context(&self) -> MenuContext {
        MenuContext {
            message: self.message.clone(),
            interaction: self.interaction.clone(),
            registry: Arc::clone(&self.registry),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> MenuState {
        self.state
    }

    /// The menu definition
    pub fn definition(&self) -> &Arc<D> {
        &self.definition
    }

    /// Registered controls
    pub fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    /// Per-wait timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether only the requester may operate the menu
    pub fn author_only(&self) -> bool {
        self.author_only
    }

    /// The message passed to `run`
    pub fn message(&self) -> Option<&Arc<dyn MenuMessage>> {
        self.message.as_ref()
    }

    /// The most recent interaction
    pub fn interaction(&self) -> Option<&Arc<dyn ComponentInteraction>> {
        self.interaction.as_ref()
    }

    /// Drive the menu until it times out or exits.
    ///
    /// Only component interactions on `message` are considered. Handler and
    /// edit failures end the loop and are returned. A failure while
    /// dispatching leaves the menu `Exited`; one in the timeout path leaves
    /// it `TimedOut`.
    pub async fn run(&mut self, message: Arc<dyn MenuMessage>) -> MenuResult<()> {
        let message_id = message.id();
        self.message = Some(message);
        info!(%message_id, timeout = ?self.timeout, author_only = self.author_only, "Menu running");

        let result = self.run_loop().await;
        if result.is_err() && self.state != MenuState::TimedOut {
            self.state = MenuState::Exited;
        }
        result
    }

    async fn run_loop(&mut self) -> MenuResult<()> {
        let message_id = match &self.message {
            Some(message) => message.id(),
            None => return Err(MenuError::MessageNotSent),
        };
        let on_message = move |event: &InteractionCreateEvent| {
            event
                .interaction
                .as_component()
                .is_some_and(|interaction| interaction.message_id() == message_id)
        };

        loop {
            self.state = MenuState::Waiting;
            debug!(%message_id, "Waiting for interaction");

            let waited = self.context.events.wait_for(self.timeout, &on_message).await;
            let event = match waited {
                Ok(event) => event,
                Err(WaitError::Timeout(elapsed)) => {
                    self.state = MenuState::TimedOut;
                    info!(%message_id, ?elapsed, "Menu timed out");
                    return self.on_timeout().await;
                }
                Err(WaitError::Closed) => {
                    self.state = MenuState::Exited;
                    info!(%message_id, "Event stream closed, menu exiting");
                    return Ok(());
                }
            };

            let Some(interaction) = event.interaction.as_component().cloned() else {
                continue;
            };
            self.interaction = Some(Arc::clone(&interaction));

            if self.author_only && interaction.user_id() != self.context.user_id {
                self.state = MenuState::Exited;
                info!(
                    %message_id,
                    user = %interaction.user_id(),
                    requester = %self.context.user_id,
                    "Interaction from another user, menu exiting"
                );
                return Ok(());
            }

            self.state = MenuState::Dispatching;
            self.dispatch(interaction.as_ref()).await?;
        }
    }

    async fn dispatch(&self, interaction: &dyn ComponentInteraction) -> MenuResult<()> {
        let custom_id = interaction.custom_id();

        match interaction.component_type() {
            ComponentType::Button => {
                let mut handled = false;

                if let Some(entry) = self.registry.button(custom_id) {
                    debug!(custom_id, "Dispatching button");
                    entry
                        .handler
                        .call(self.handler_context(), &entry.button)
                        .await
                        .map_err(|err| MenuError::handler(custom_id, err))?;
                    handled = true;
                }

                for group in self.registry.groups().values() {
                    let Some(button) = group.buttons.iter().find(|b| b.custom_id == custom_id)
                    else {
                        continue;
                    };
                    debug!(custom_id, group = %group.name, "Dispatching button group");
                    group
                        .handler
                        .call(self.handler_context(), button)
                        .await
                        .map_err(|err| MenuError::handler(&group.name, err))?;
                    handled = true;
                }

                if !handled {
                    debug!(custom_id, "No handler for button");
                }
            }
            ComponentType::SelectMenu => {
                let entry = self
                    .registry
                    .select_menu(custom_id)
                    .ok_or_else(|| MenuError::UnknownSelectMenu(custom_id.to_string()))?;
                let values = interaction.values().to_vec();
                debug!(custom_id, ?values, "Dispatching select menu");
                entry
                    .handler
                    .call(self.handler_context(), values)
                    .await
                    .map_err(|err| MenuError::handler(custom_id, err))?;
            }
            ComponentType::Other(kind) => {
                warn!(custom_id, kind, "Ignoring interaction from unsupported component");
            }
        }

        Ok(())
    }

    async fn on_timeout(&self) -> MenuResult<()> {
        let disable = match self.registry.timeout_handler() {
            Some(timeout) => {
                timeout
                    .handler
                    .call(self.handler_context())
                    .await
                    .map_err(|err| MenuError::handler(TIMEOUT_CONTROL, err))?;
                timeout.disable_components
            }
            None => true,
        };

        if disable {
            debug!("Disabling menu controls");
            self.edit_msg(self.render(Some(true))).await?;
        }
        Ok(())
    }
}

impl<D: MenuDefinition> fmt::Debug for ComponentMenu<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentMenu")
            .field("requester", &self.context.user_id)
            .field("timeout", &self.timeout)
            .field("author_only", &self.author_only)
            .field("state", &self.state)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
