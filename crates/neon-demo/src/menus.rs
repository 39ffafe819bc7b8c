//! Sample menus.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use neon_menu::{
    Button, ButtonHandler, ButtonStyle, Control, MenuDefinition, SelectMenu, SelectMenuOption,
};

/// Four pet buttons, each answering with a message
#[derive(Debug, Default)]
pub struct PetMenu {
    picks: AtomicUsize,
}

impl PetMenu {
    /// Content of the menu message
    pub const PROMPT: &'static str = "Choose a pet!";

    /// How many pets were picked
    pub fn picks(&self) -> usize {
        self.picks.load(Ordering::Relaxed)
    }
}

fn pet(button: Button, reply: &'static str) -> Control<PetMenu> {
    Control::button(
        button,
        ButtonHandler::no_payload(move |menu: Arc<PetMenu>, ctx| async move {
            menu.picks.fetch_add(1, Ordering::Relaxed);
            ctx.edit_msg(reply).await?;
            Ok(())
        }),
    )
}

impl MenuDefinition for PetMenu {
    fn controls() -> Vec<Control<Self>> {
        vec![
            pet(
                Button::new("Dog", "dog", ButtonStyle::Primary).with_emoji('🐶'),
                "Dogs are so cute!",
            ),
            pet(
                Button::new("Cat", "cat", ButtonStyle::Danger).with_emoji('🐱'),
                "Cats are adorable!",
            ),
            pet(
                Button::new("Fish", "fish", ButtonStyle::Success).with_emoji('🐟'),
                "Fish are so cool!",
            ),
            pet(
                Button::new("Bird", "bird", ButtonStyle::Secondary).with_emoji('🐦'),
                "Birds are so small and cute!",
            ),
        ]
    }
}

/// A payload button, a button group, a select menu and a timeout handler
#[derive(Debug, Default)]
pub struct ElementsMenu {
    chosen: Mutex<Vec<String>>,
}

impl ElementsMenu {
    /// Content of the menu message
    pub const PROMPT: &'static str = "Pick an element!";

    /// Every select menu choice so far
    pub fn chosen(&self) -> Vec<String> {
        self.chosen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, values: &[String]) {
        self.chosen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend_from_slice(values);
    }
}

impl MenuDefinition for ElementsMenu {
    fn controls() -> Vec<Control<Self>> {
        vec![
            Control::button(
                Button::new("Earth", "earth_button", ButtonStyle::Success).with_emoji('🌳'),
                ButtonHandler::with_button(|_menu, ctx, button| async move {
                    ctx.edit_msg(format!("{} - {}", button.label, button.custom_id))
                        .await?;
                    Ok(())
                }),
            ),
            Control::group(
                "wind_rock",
                [
                    Button::new("Wind", "wind", ButtonStyle::Primary).with_emoji('💨'),
                    Button::new("Rock", "rock", ButtonStyle::Secondary).with_emoji('🪨'),
                ],
                |_menu, ctx, button| async move {
                    ctx.edit_msg(format!("{} was pressed", button.label)).await?;
                    Ok(())
                },
            ),
            Control::select_menu(
                SelectMenu::new("sample_select_menu", "Pick fire or water!")
                    .option(
                        SelectMenuOption::new("Water", "water")
                            .with_description("Calm and clear")
                            .with_emoji('💧'),
                    )
                    .option(
                        SelectMenuOption::new("Fire", "fire")
                            .with_description("Hot and bright")
                            .with_emoji('🔥'),
                    ),
                |menu: Arc<ElementsMenu>, ctx, values| async move {
                    menu.record(&values);
                    ctx.edit_msg(format!("You chose: {}!", values.join(", ")))
                        .await?;
                    Ok(())
                },
            ),
            Control::on_timeout(true, |_menu, ctx| async move {
                ctx.edit_msg("Timed out!").await?;
                Ok(())
            }),
        ]
    }
}
