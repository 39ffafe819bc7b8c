//! Control declarations and handler binding.
//!
//! A menu type lists its controls once, in order, through
//! [`MenuDefinition::controls`]. Each control carries an async handler that
//! receives the owning definition (`Arc<D>`), a [`MenuContext`] for editing
//! the message, and the control's payload.
//!
//! Button handlers pick their payload explicitly:
//!
//! - [`ButtonHandler::with_button`]: called with the pressed [`Button`]
//! - [`ButtonHandler::no_payload`]: called without it
//!
//! When the registry is built every handler is bound to the running
//! instance by capturing its `Arc<D>`.
//!
//! # Example
//!
//! ```rust
//! use neon_menu::{Button, ButtonHandler, ButtonStyle, Control, MenuDefinition, SelectMenu, SelectMenuOption};
//!
//! struct Elements;
//!
//! impl MenuDefinition for Elements {
//!     fn controls() -> Vec<Control<Self>> {
//!         vec![
//!             Control::button(
//!                 Button::new("earth", "earth_button", ButtonStyle::Success).with_emoji("🌳"),
//!                 ButtonHandler::with_button(|_menu, ctx, button| async move {
//!                     ctx.edit_msg(format!("{} - {}", button.label, button.custom_id)).await?;
//!                     Ok(())
//!                 }),
//!             ),
//!             Control::select_menu(
//!                 SelectMenu::new("sample_select_menu", "Pick fire or water!")
//!                     .option(SelectMenuOption::new("Water", "water").with_emoji("💧"))
//!                     .option(SelectMenuOption::new("Fire", "fire").with_emoji("🔥")),
//!                 |_menu, ctx, values| async move {
//!                     ctx.edit_msg(format!("You chose: {}!", values[0])).await?;
//!                     Ok(())
//!                 },
//!             ),
//!         ]
//!     }
//! }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::component::{Button, SelectMenu};
use crate::context::MenuContext;

/// Future returned by every handler
pub type HandlerFuture = BoxFuture<'static, anyhow::Result<()>>;

type ButtonCallback<D> = Arc<dyn Fn(Arc<D>, MenuContext, Button) -> HandlerFuture + Send + Sync>;
type PlainCallback<D> = Arc<dyn Fn(Arc<D>, MenuContext) -> HandlerFuture + Send + Sync>;
type ValuesCallback<D> =
    Arc<dyn Fn(Arc<D>, MenuContext, Vec<String>) -> HandlerFuture + Send + Sync>;

/// A menu type: owns user state and declares its controls
pub trait MenuDefinition: Send + Sync + Sized + 'static {
    /// Controls in declaration order.
    ///
    /// Called on every build, so it should return the same list each time.
    fn controls() -> Vec<Control<Self>>;
}

enum ButtonHandlerKind<D> {
    WithButton(ButtonCallback<D>),
    NoPayload(PlainCallback<D>),
}

/// Handler for an ungrouped button
pub struct ButtonHandler<D>(ButtonHandlerKind<D>);

impl<D: MenuDefinition> ButtonHandler<D> {
    /// Handler that receives the pressed button
    pub fn with_button<F, Fut>(handler: F) -> Self
    where
        F: Fn(Arc<D>, MenuContext, Button) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self(ButtonHandlerKind::WithButton(Arc::new(
            move |owner, ctx, button| Box::pin(handler(owner, ctx, button)) as HandlerFuture,
        )))
    }

    /// Handler that only needs the menu and context
    pub fn no_payload<F, Fut>(handler: F) -> Self
    where
        F: Fn(Arc<D>, MenuContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self(ButtonHandlerKind::NoPayload(Arc::new(move |owner, ctx| {
            Box::pin(handler(owner, ctx)) as HandlerFuture
        })))
    }

    /// Whether the handler is called with the pressed button
    pub fn takes_button(&self) -> bool {
        matches!(self.0, ButtonHandlerKind::WithButton(_))
    }

    pub(crate) fn bind(self, owner: &Arc<D>) -> BoundButtonHandler {
        let owner = Arc::clone(owner);
        match self.0 {
            ButtonHandlerKind::WithButton(callback) => BoundButtonHandler::WithButton(Arc::new(
                move |ctx, button| callback(Arc::clone(&owner), ctx, button),
            )),
            ButtonHandlerKind::NoPayload(callback) => {
                BoundButtonHandler::NoPayload(Arc::new(move |ctx| callback(Arc::clone(&owner), ctx)))
            }
        }
    }
}

pub(crate) enum ControlKind<D> {
    Button {
        button: Button,
        handler: ButtonHandler<D>,
    },
    Group {
        name: String,
        buttons: Vec<Button>,
        handler: ButtonCallback<D>,
    },
    SelectMenu {
        menu: SelectMenu,
        handler: ValuesCallback<D>,
    },
    Timeout {
        disable_components: bool,
        handler: PlainCallback<D>,
    },
}

/// One declared control of a menu type
pub struct Control<D> {
    pub(crate) kind: ControlKind<D>,
}

impl<D: MenuDefinition> Control<D> {
    /// An ungrouped button
    pub fn button(button: Button, handler: ButtonHandler<D>) -> Self {
        Self {
            kind: ControlKind::Button { button, handler },
        }
    }

    /// Buttons sharing one handler, rendered on their own row.
    ///
    /// `name` identifies the group and must be unique within the menu.
    pub fn group<F, Fut>(
        name: impl Into<String>,
        buttons: impl IntoIterator<Item = Button>,
        handler: F,
    ) -> Self
    where
        F: Fn(Arc<D>, MenuContext, Button) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            kind: ControlKind::Group {
                name: name.into(),
                buttons: buttons.into_iter().collect(),
                handler: Arc::new(move |owner, ctx, button| {
                    Box::pin(handler(owner, ctx, button)) as HandlerFuture
                }),
            },
        }
    }

    /// A select menu; the handler receives the selected values
    pub fn select_menu<F, Fut>(menu: SelectMenu, handler: F) -> Self
    where
        F: Fn(Arc<D>, MenuContext, Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            kind: ControlKind::SelectMenu {
                menu,
                handler: Arc::new(move |owner, ctx, values| {
                    Box::pin(handler(owner, ctx, values)) as HandlerFuture
                }),
            },
        }
    }

    /// The timeout handler.
    ///
    /// With `disable_components` set, every control is rendered disabled
    /// after the handler returns.
    pub fn on_timeout<F, Fut>(disable_components: bool, handler: F) -> Self
    where
        F: Fn(Arc<D>, MenuContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            kind: ControlKind::Timeout {
                disable_components,
                handler: Arc::new(move |owner, ctx| Box::pin(handler(owner, ctx)) as HandlerFuture),
            },
        }
    }

    /// Custom id, group key, or `None` for the timeout handler
    pub fn id(&self) -> Option<&str> {
        match &self.kind {
            ControlKind::Button { button, .. } => Some(&button.custom_id),
            ControlKind::Group { name, .. } => Some(name),
            ControlKind::SelectMenu { menu, .. } => Some(&menu.custom_id),
            ControlKind::Timeout { .. } => None,
        }
    }
}

impl<D> fmt::Debug for Control<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ControlKind::Button { button, .. } => {
                f.debug_tuple("Control::Button").field(&button.custom_id).finish()
            }
            ControlKind::Group { name, .. } => f.debug_tuple("Control::Group").field(name).finish(),
            ControlKind::SelectMenu { menu, .. } => {
                f.debug_tuple("Control::SelectMenu").field(&menu.custom_id).finish()
            }
            ControlKind::Timeout {
                disable_components, ..
            } => f
                .debug_struct("Control::Timeout")
                .field("disable_components", disable_components)
                .finish(),
        }
    }
}

type BoundButtonFn = Arc<dyn Fn(MenuContext, Button) -> HandlerFuture + Send + Sync>;
type BoundPlainFn = Arc<dyn Fn(MenuContext) -> HandlerFuture + Send + Sync>;
type BoundValuesFn = Arc<dyn Fn(MenuContext, Vec<String>) -> HandlerFuture + Send + Sync>;

#[derive(Clone)]
pub(crate) enum BoundButtonHandler {
    WithButton(BoundButtonFn),
    NoPayload(BoundPlainFn),
}

impl BoundButtonHandler {
    pub(crate) fn call(&self, ctx: MenuContext, button: &Button) -> HandlerFuture {
        match self {
            Self::WithButton(f) => f(ctx, button.clone()),
            Self::NoPayload(f) => f(ctx),
        }
    }
}

#[derive(Clone)]
pub(crate) struct BoundGroupHandler(BoundButtonFn);

impl BoundGroupHandler {
    pub(crate) fn call(&self, ctx: MenuContext, button: &Button) -> HandlerFuture {
        (self.0)(ctx, button.clone())
    }
}

#[derive(Clone)]
pub(crate) struct BoundSelectHandler(BoundValuesFn);

impl BoundSelectHandler {
    pub(crate) fn call(&self, ctx: MenuContext, values: Vec<String>) -> HandlerFuture {
        (self.0)(ctx, values)
    }
}

#[derive(Clone)]
pub(crate) struct BoundTimeoutHandler(BoundPlainFn);

impl BoundTimeoutHandler {
    pub(crate) fn call(&self, ctx: MenuContext) -> HandlerFuture {
        (self.0)(ctx)
    }
}

pub(crate) fn bind_group<D: MenuDefinition>(
    callback: ButtonCallback<D>,
    owner: &Arc<D>,
) -> BoundGroupHandler {
    let owner = Arc::clone(owner);
    BoundGroupHandler(Arc::new(move |ctx, button| {
        callback(Arc::clone(&owner), ctx, button)
    }))
}

pub(crate) fn bind_select<D: MenuDefinition>(
    callback: ValuesCallback<D>,
    owner: &Arc<D>,
) -> BoundSelectHandler {
    let owner = Arc::clone(owner);
    BoundSelectHandler(Arc::new(move |ctx, values| {
        callback(Arc::clone(&owner), ctx, values)
    }))
}

pub(crate) fn bind_timeout<D: MenuDefinition>(
    callback: PlainCallback<D>,
    owner: &Arc<D>,
) -> BoundTimeoutHandler {
    let owner = Arc::clone(owner);
    BoundTimeoutHandler(Arc::new(move |ctx| callback(Arc::clone(&owner), ctx)))
}

macro_rules! opaque_debug {
    ($($ty:ident),*) => {
        $(
            impl fmt::Debug for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(concat!(stringify!($ty), "(..)"))
                }
            }
        )*
    };
}

opaque_debug!(BoundButtonHandler, BoundGroupHandler, BoundSelectHandler, BoundTimeoutHandler);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ButtonStyle;

    struct Pets;

    impl MenuDefinition for Pets {
        fn controls() -> Vec<Control<Self>> {
            vec![
                Control::button(
                    Button::new("Dog", "dog", ButtonStyle::Primary),
                    ButtonHandler::no_payload(|_, _| async { Ok(()) }),
                ),
                Control::on_timeout(false, |_, _| async { Ok(()) }),
            ]
        }
    }

    #[test]
    fn test_handler_payload_variant() {
        let plain = ButtonHandler::<Pets>::no_payload(|_, _| async { Ok(()) });
        let with = ButtonHandler::<Pets>::with_button(|_, _, _| async { Ok(()) });
        assert!(!plain.takes_button());
        assert!(with.takes_button());
    }

    #[test]
    fn test_control_ids_in_declaration_order() {
        let controls = Pets::controls();
        let ids: Vec<_> = controls.iter().map(Control::id).collect();
        assert_eq!(ids, vec![Some("dog"), None]);
    }

    #[test]
    fn test_control_debug() {
        let controls = Pets::controls();
        assert_eq!(format!("{:?}", controls[0]), "Control::Button(\"dog\")");
        assert_eq!(
            format!("{:?}", controls[1]),
            "Control::Timeout { disable_components: false }"
        );
    }
}
