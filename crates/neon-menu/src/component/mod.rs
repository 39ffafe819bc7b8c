//! Declared control data: buttons, select menus and their options.
//!
//! These types carry only what is rendered. Handlers are attached when the
//! control is declared (see [`Control`](crate::Control)).

mod button;
mod emoji;
mod select_menu;

pub use button::{Button, ButtonStyle};
pub use emoji::Emoji;
pub use select_menu::{SelectMenu, SelectMenuOption};
pub(crate) use select_menu::SelectMenuProblem;
