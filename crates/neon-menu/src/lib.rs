//! # neon-menu
//!
//! Declarative component menus for chat bots: buttons, button groups and
//! select menus are declared once per menu type, bound to a running instance,
//! rendered into action rows and driven by an interaction dispatch loop that
//! ends on timeout.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use neon_menu::{
//!     Button, ButtonHandler, ButtonStyle, ComponentMenu, Control, MenuDefinition, MenuMessage,
//!     RequestContext,
//! };
//!
//! struct PetMenu;
//!
//! impl MenuDefinition for PetMenu {
//!     fn controls() -> Vec<Control<Self>> {
//!         vec![
//!             Control::button(
//!                 Button::new("Dog", "dog", ButtonStyle::Primary).with_emoji("🐶"),
//!                 ButtonHandler::no_payload(|_menu, ctx| async move {
//!                     ctx.edit_msg("Dogs are so cute!").await?;
//!                     Ok(())
//!                 }),
//!             ),
//!             Control::on_timeout(true, |_menu, ctx| async move {
//!                 ctx.edit_msg("Timed out!").await?;
//!                 Ok(())
//!             }),
//!         ]
//!     }
//! }
//!
//! async fn pet_command(ctx: RequestContext, sent: Arc<dyn MenuMessage>) -> anyhow::Result<()> {
//!     let mut menu = ComponentMenu::new(PetMenu, ctx, Duration::from_secs(30), true);
//!     let _rows = menu.build()?;
//!     // ... attach `_rows` to the outbound message, then:
//!     menu.run(sent).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod component;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod host;
pub mod menu;
pub mod registry;
pub mod render;
pub mod test_support;

pub use component::{Button, ButtonStyle, Emoji, SelectMenu, SelectMenuOption};
pub use config::{ConfigError, MenuConfig};
pub use context::{MenuContext, RequestContext};
pub use error::{IdScope, MenuError, MenuResult};
pub use handler::{ButtonHandler, Control, HandlerFuture, MenuDefinition};
pub use host::{
    BroadcastEventSource, CommandInteraction, ComponentInteraction, ComponentType, EventSource,
    HostError, Interaction, InteractionCreateEvent, InteractionPublisher, MenuMessage, MessageEdit,
    MessageId, ResponseType, UserId, WaitError,
};
pub use menu::{ComponentMenu, MenuState};
pub use registry::{ControlRegistry, OrderedRegistry, Registry};
pub use render::{ActionRow, ButtonPrimitive, RowComponent, SelectMenuPrimitive, SelectOptionPrimitive};
