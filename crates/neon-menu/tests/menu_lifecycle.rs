//! Menu Lifecycle Integration Tests
//!
//! Drives complete menus through the public API with scripted events:
//!
//! 1. **Dispatch**: buttons, groups and select menus reach their handlers
//! 2. **Authorization**: other users end an author-only menu
//! 3. **Timeouts**: per-wait deadlines and the disabled re-render
//! 4. **Declaration errors**: caught at build time
//!
//! Timing tests run on tokio's paused clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use neon_menu::test_support::mocks::{MockInteraction, MockMessage, ScriptedEvents};
use neon_menu::{
    BroadcastEventSource, Button, ButtonHandler, ButtonStyle, ComponentMenu, Control, EventSource,
    HostError, IdScope, MenuDefinition, MenuError, MenuMessage, MenuState, MessageId,
    RequestContext, RowComponent, SelectMenu, SelectMenuOption, UserId,
};

const U1: UserId = UserId(1);
const U2: UserId = UserId(2);
const MSG: MessageId = MessageId(42);

/// Records which handlers ran and with what
#[derive(Default)]
struct Log(Mutex<Vec<String>>);

impl Log {
    fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

// ============================================================================
// Menu definitions
// ============================================================================

#[derive(Default)]
struct PetMenu {
    log: Log,
}

impl MenuDefinition for PetMenu {
    fn controls() -> Vec<Control<Self>> {
        let pet = |label: &str, id: &str, style, reply: &'static str| {
            let id_owned = id.to_string();
            Control::button(
                Button::new(label, id, style),
                ButtonHandler::no_payload(move |menu: Arc<PetMenu>, ctx| {
                    let id = id_owned.clone();
                    async move {
                        menu.log.push(id);
                        ctx.edit_msg(reply).await?;
                        Ok(())
                    }
                }),
            )
        };

        vec![
            pet("Dog", "dog", ButtonStyle::Primary, "Dogs are so cute!"),
            pet("Cat", "cat", ButtonStyle::Danger, "Cats are adorable!"),
            pet("Fish", "fish", ButtonStyle::Success, "Fish are so cool!"),
            pet("Bird", "bird", ButtonStyle::Secondary, "Birds are so small and cute!"),
        ]
    }
}

#[derive(Default)]
struct ElementsMenu {
    log: Log,
}

impl MenuDefinition for ElementsMenu {
    fn controls() -> Vec<Control<Self>> {
        vec![
            Control::button(
                Button::new("Earth", "earth", ButtonStyle::Success),
                ButtonHandler::with_button(|menu: Arc<ElementsMenu>, _ctx, button| async move {
                    menu.log.push(format!("button:{}", button.label));
                    Ok(())
                }),
            ),
            Control::group(
                "wind_rock",
                [
                    Button::new("Wind", "wind", ButtonStyle::Primary),
                    Button::new("Rock", "rock", ButtonStyle::Secondary),
                ],
                |menu: Arc<ElementsMenu>, _ctx, button| async move {
                    menu.log.push(format!("group:{}", button.custom_id));
                    Ok(())
                },
            ),
            Control::select_menu(
                SelectMenu::new("pick", "Pick fire or water!")
                    .option(SelectMenuOption::new("Water", "water"))
                    .option(SelectMenuOption::new("Fire", "fire")),
                |menu: Arc<ElementsMenu>, ctx, values| async move {
                    menu.log.push(format!("select:{}", values.join(",")));
                    ctx.edit_msg(format!("You chose: {}!", values[0])).await?;
                    Ok(())
                },
            ),
        ]
    }
}

/// Shares an id between an ungrouped button and a group
#[derive(Default)]
struct Collision {
    log: Log,
}

impl MenuDefinition for Collision {
    fn controls() -> Vec<Control<Self>> {
        vec![
            Control::button(
                Button::new("Go", "go", ButtonStyle::Primary),
                ButtonHandler::no_payload(|menu: Arc<Collision>, _| async move {
                    menu.log.push("flat");
                    Ok(())
                }),
            ),
            Control::group(
                "grouped",
                [Button::new("Go", "go", ButtonStyle::Primary)],
                |menu: Arc<Collision>, _, _| async move {
                    menu.log.push("group");
                    Ok(())
                },
            ),
        ]
    }
}

#[derive(Default)]
struct DisableOnTimeout {
    log: Log,
}

impl MenuDefinition for DisableOnTimeout {
    fn controls() -> Vec<Control<Self>> {
        vec![
            Control::button(
                Button::new("Dog", "dog", ButtonStyle::Primary),
                ButtonHandler::no_payload(|_, _| async { Ok(()) }),
            ),
            Control::on_timeout(true, |menu: Arc<DisableOnTimeout>, ctx| async move {
                menu.log.push("timeout");
                ctx.edit_msg("Timed out!").await?;
                Ok(())
            }),
        ]
    }
}

/// Locks its own controls from inside a handler
#[derive(Default)]
struct LockOnPress {
    log: Log,
}

impl MenuDefinition for LockOnPress {
    fn controls() -> Vec<Control<Self>> {
        vec![
            Control::button(
                Button::new("Lock", "lock", ButtonStyle::Danger),
                ButtonHandler::no_payload(|menu: Arc<LockOnPress>, ctx| async move {
                    if let Some(interaction) = ctx.interaction() {
                        menu.log.push(interaction.custom_id());
                    }
                    ctx.edit_msg(ctx.render(Some(true))).await?;
                    Ok(())
                }),
            ),
            Control::button(
                Button::new("Other", "other", ButtonStyle::Secondary),
                ButtonHandler::no_payload(|_, _| async { Ok(()) }),
            ),
        ]
    }
}

struct DuplicateIds;

impl MenuDefinition for DuplicateIds {
    fn controls() -> Vec<Control<Self>> {
        let dog = || {
            Control::button(
                Button::new("Dog", "dog", ButtonStyle::Primary),
                ButtonHandler::no_payload(|_, _| async { Ok(()) }),
            )
        };
        vec![dog(), dog()]
    }
}

struct TwoTimeouts;

impl MenuDefinition for TwoTimeouts {
    fn controls() -> Vec<Control<Self>> {
        vec![
            Control::on_timeout(true, |_, _| async { Ok(()) }),
            Control::on_timeout(false, |_, _| async { Ok(()) }),
        ]
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn request(events: &Arc<ScriptedEvents>) -> RequestContext {
    RequestContext::new(U1, Arc::clone(events) as Arc<dyn EventSource>)
}

fn press(user: UserId, id: &str) -> Arc<MockInteraction> {
    Arc::new(MockInteraction::button(MSG, user, id))
}

fn sent_message() -> Arc<MockMessage> {
    Arc::new(MockMessage::new(MSG))
}

// ============================================================================
// Dispatch
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_author_only_dog_then_other_user_cat() {
    let events = Arc::new(ScriptedEvents::new());
    let dog = press(U1, "dog");
    let cat = press(U2, "cat");
    events.push(dog.event());
    events.push(cat.event());

    let mut menu = ComponentMenu::new(
        PetMenu::default(),
        request(&events),
        Duration::from_secs(30),
        true,
    );
    menu.build().unwrap();
    menu.run(sent_message()).await.unwrap();

    assert_eq!(menu.definition().log.entries(), vec!["dog"]);
    assert_eq!(menu.state(), MenuState::Exited);
    assert_eq!(menu.message().unwrap().id(), MSG);
    assert_eq!(menu.interaction().unwrap().custom_id(), "cat");

    let responses = dog.initial_responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].1.content.as_deref(), Some("Dogs are so cute!"));
    assert_eq!(cat.total_edits(), 0);
    // Exited before a third wait
    assert_eq!(events.wait_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_anyone_may_press_when_not_author_only() {
    let events = Arc::new(ScriptedEvents::new());
    events.push(press(U2, "cat").event());
    events.push_close();

    let mut menu = ComponentMenu::new(
        PetMenu::default(),
        request(&events),
        Duration::from_secs(30),
        false,
    );
    menu.build().unwrap();
    menu.run(sent_message()).await.unwrap();

    assert_eq!(menu.definition().log.entries(), vec!["cat"]);
}

#[tokio::test]
async fn test_select_menu_receives_values() {
    let events = Arc::new(ScriptedEvents::new());
    let pick = Arc::new(MockInteraction::select(MSG, U1, "pick", ["fire"]));
    events.push(pick.event());
    events.push_close();

    let mut menu = ComponentMenu::new(
        ElementsMenu::default(),
        request(&events),
        Duration::from_secs(30),
        true,
    );
    menu.build().unwrap();
    menu.run(sent_message()).await.unwrap();

    assert_eq!(menu.definition().log.entries(), vec!["select:fire"]);
    assert_eq!(
        pick.initial_responses()[0].1.content.as_deref(),
        Some("You chose: fire!")
    );
}

#[tokio::test]
async fn test_handler_payload_variants_and_groups() {
    let events = Arc::new(ScriptedEvents::new());
    events.push(press(U1, "earth").event());
    events.push(press(U1, "rock").event());
    events.push(press(U1, "wind").event());
    events.push_close();

    let mut menu = ComponentMenu::new(
        ElementsMenu::default(),
        request(&events),
        Duration::from_secs(30),
        true,
    );
    menu.build().unwrap();
    menu.run(sent_message()).await.unwrap();

    assert_eq!(
        menu.definition().log.entries(),
        vec!["button:Earth", "group:rock", "group:wind"]
    );
}

#[tokio::test]
async fn test_shared_id_runs_flat_and_group_handlers() {
    let events = Arc::new(ScriptedEvents::new());
    events.push(press(U1, "go").event());
    events.push_close();

    let mut menu = ComponentMenu::new(
        Collision::default(),
        request(&events),
        Duration::from_secs(30),
        true,
    );
    menu.build().unwrap();
    menu.run(sent_message()).await.unwrap();

    assert_eq!(menu.definition().log.entries(), vec!["flat", "group"]);
}

#[tokio::test]
async fn test_second_edit_in_handler_uses_followup() {
    struct TwoEdits;

    impl MenuDefinition for TwoEdits {
        fn controls() -> Vec<Control<Self>> {
            vec![Control::button(
                Button::new("Go", "go", ButtonStyle::Primary),
                ButtonHandler::no_payload(|_, ctx| async move {
                    ctx.edit_msg("Working...").await?;
                    ctx.edit_msg("Done").await?;
                    Ok(())
                }),
            )]
        }
    }

    let events = Arc::new(ScriptedEvents::new());
    let go = press(U1, "go");
    events.push(go.event());
    events.push_close();

    let mut menu = ComponentMenu::new(TwoEdits, request(&events), Duration::from_secs(30), true);
    menu.build().unwrap();
    menu.run(sent_message()).await.unwrap();

    assert_eq!(go.initial_responses().len(), 1);
    assert_eq!(go.followup_edits()[0].content.as_deref(), Some("Done"));
}

#[tokio::test]
async fn test_handler_rerenders_disabled_controls() {
    let events = Arc::new(ScriptedEvents::new());
    let lock = press(U1, "lock");
    events.push(lock.event());
    events.push_close();

    let mut menu = ComponentMenu::new(
        LockOnPress::default(),
        request(&events),
        Duration::from_secs(30),
        true,
    );
    let sent = menu.build().unwrap();
    assert!(!sent[0].all_disabled());
    menu.run(sent_message()).await.unwrap();

    assert_eq!(menu.definition().log.entries(), vec!["lock"]);
    let responses = lock.initial_responses();
    assert_eq!(responses.len(), 1);
    let rows = responses[0].1.components.as_ref().unwrap();
    assert_eq!(rows[0].custom_ids(), vec!["lock", "other"]);
    assert!(rows.iter().all(|row| row.all_disabled()));
}

#[tokio::test]
async fn test_rejected_acknowledgement_fails_run() {
    let events = Arc::new(ScriptedEvents::new());
    let dog = Arc::new(
        MockInteraction::button(MSG, U1, "dog")
            .failing_with(HostError::rejected(403, "Missing Access")),
    );
    events.push(dog.event());
    events.push_close();

    let mut menu = ComponentMenu::new(
        PetMenu::default(),
        request(&events),
        Duration::from_secs(30),
        true,
    );
    menu.build().unwrap();
    let err = menu.run(sent_message()).await.unwrap_err();

    let (control, source) = match err {
        MenuError::Handler { control, source } => (control, source),
        other => panic!("expected handler error, got {other:?}"),
    };
    assert_eq!(control, "dog");
    assert!(matches!(
        source.downcast_ref::<MenuError>(),
        Some(MenuError::Host(HostError::Rejected { status: 403, .. }))
    ));
    assert_eq!(menu.state(), MenuState::Exited);
    assert_eq!(dog.total_edits(), 0);
}

// ============================================================================
// Timeouts
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_timeout_without_handler_disables_everything_once() {
    let events = Arc::new(ScriptedEvents::new());
    let message = sent_message();

    let mut menu = ComponentMenu::new(
        PetMenu::default(),
        request(&events),
        Duration::from_secs(5),
        true,
    );
    menu.build().unwrap();

    let started = tokio::time::Instant::now();
    menu.run(Arc::clone(&message) as Arc<dyn MenuMessage>)
        .await
        .unwrap();

    assert_eq!(started.elapsed(), Duration::from_secs(5));
    assert_eq!(menu.state(), MenuState::TimedOut);

    let edits = message.edits();
    assert_eq!(edits.len(), 1);
    let rows = edits[0].components.as_ref().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 4);
    assert!(rows.iter().all(|row| row.all_disabled()));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_handler_runs_then_disables() {
    let events = Arc::new(ScriptedEvents::new());
    let message = sent_message();

    let mut menu = ComponentMenu::new(
        DisableOnTimeout::default(),
        request(&events),
        Duration::from_secs(5),
        true,
    );
    menu.build().unwrap();
    menu.run(Arc::clone(&message) as Arc<dyn MenuMessage>)
        .await
        .unwrap();

    assert_eq!(menu.definition().log.entries(), vec!["timeout"]);
    let edits = message.edits();
    assert_eq!(edits.len(), 2);
    assert_eq!(edits[0].content.as_deref(), Some("Timed out!"));
    assert!(edits[1].components.as_ref().unwrap()[0].all_disabled());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_edit_failure_reaches_caller() {
    let events = Arc::new(ScriptedEvents::new());
    let message = sent_message();
    message.fail_edits_with(HostError::transport("connection reset"));

    let mut menu = ComponentMenu::new(
        PetMenu::default(),
        request(&events),
        Duration::from_secs(5),
        true,
    );
    menu.build().unwrap();
    let err = menu
        .run(Arc::clone(&message) as Arc<dyn MenuMessage>)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MenuError::Host(HostError::Transport(ref reason)) if reason == "connection reset"
    ));
    assert_eq!(menu.state(), MenuState::TimedOut);
    assert!(message.edits().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_restarts_for_each_wait() {
    let events = Arc::new(ScriptedEvents::new());
    events.push(press(U1, "dog").event());
    events.push(press(U1, "cat").event());

    let mut menu = ComponentMenu::new(
        PetMenu::default(),
        request(&events),
        Duration::from_secs(5),
        true,
    );
    menu.build().unwrap();
    menu.run(sent_message()).await.unwrap();

    assert_eq!(events.wait_timeouts(), vec![Duration::from_secs(5); 3]);
    assert_eq!(menu.definition().log.entries(), vec!["dog", "cat"]);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_after_interaction_edits_through_it() {
    let events = Arc::new(ScriptedEvents::new());
    let dog = press(U1, "dog");
    events.push(dog.event());
    let message = sent_message();

    let mut menu = ComponentMenu::new(
        PetMenu::default(),
        request(&events),
        Duration::from_secs(5),
        true,
    );
    menu.build().unwrap();
    menu.run(Arc::clone(&message) as Arc<dyn MenuMessage>)
        .await
        .unwrap();

    // The handler used the initial response; the disable edit follows up on it
    assert_eq!(dog.initial_responses().len(), 1);
    assert_eq!(dog.followup_edits().len(), 1);
    assert!(message.edits().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_broadcast_source_drives_menu() {
    let (publisher, source) = BroadcastEventSource::channel(16);
    let ctx = RequestContext::new(U1, Arc::new(source) as Arc<dyn EventSource>);
    let mut menu = ComponentMenu::new(PetMenu::default(), ctx, Duration::from_secs(5), true);
    menu.build().unwrap();

    let message = sent_message();
    let run = tokio::spawn(async move {
        menu.run(message as Arc<dyn MenuMessage>).await.map(|()| menu)
    });

    while publisher.active_waits() == 0 {
        tokio::task::yield_now().await;
    }
    let fish = press(U1, "fish");
    publisher.publish(fish.event());

    let menu = run.await.unwrap().unwrap();
    assert_eq!(menu.definition().log.entries(), vec!["fish"]);
    assert_eq!(menu.state(), MenuState::TimedOut);
}

// ============================================================================
// Declaration errors
// ============================================================================

#[test]
fn test_duplicate_id_fails_build() {
    let events = Arc::new(ScriptedEvents::new());
    let mut menu = ComponentMenu::new(DuplicateIds, request(&events), Duration::from_secs(1), true);

    let err = menu.build().unwrap_err();
    assert!(matches!(
        err,
        MenuError::DuplicateId { scope: IdScope::Button, ref id } if id == "dog"
    ));
    assert!(menu.registry().is_empty());
}

#[test]
fn test_two_timeout_handlers_fail_build() {
    let events = Arc::new(ScriptedEvents::new());
    let mut menu = ComponentMenu::new(TwoTimeouts, request(&events), Duration::from_secs(1), true);

    let err = menu.build().unwrap_err();
    assert!(matches!(err, MenuError::MultipleTimeoutHandlers { count: 2 }));
}

#[test]
fn test_build_layout() {
    let events = Arc::new(ScriptedEvents::new());
    let mut menu = ComponentMenu::new(
        ElementsMenu::default(),
        request(&events),
        Duration::from_secs(1),
        true,
    );

    let rows = menu.build().unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].custom_ids(), vec!["earth"]);
    assert_eq!(rows[1].custom_ids(), vec!["wind", "rock"]);
    match &rows[2].components[0] {
        RowComponent::SelectMenu(select) => {
            let values: Vec<_> = select.options.iter().map(|o| o.custom_id.as_str()).collect();
            assert_eq!(values, vec!["water", "fire"]);
        }
        other => panic!("expected select menu, got {other:?}"),
    }
    assert!(!rows.iter().any(|row| row.all_disabled()));
}
