//! In-process host that prints instead of calling a chat platform.
//!
//! Every outbound payload is recorded in a [`Transcript`] and, when printing
//! is on, written to stdout as one JSON line. Scripted interactions are
//! published through a [`BroadcastEventSource`] one at a time: each is sent
//! once the menu has taken the previous one and is waiting again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use neon_menu::{
    BroadcastEventSource, ComponentInteraction, ComponentMenu, ComponentType,
    HostError, InteractionCreateEvent, MenuConfig, MenuDefinition, MenuMessage, MenuState,
    MessageEdit, MessageId, RequestContext, ResponseType, UserId,
};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::script::{Action, ScriptLine};

/// User who runs the menu command
pub const REQUESTER: UserId = UserId(1);

/// Id of the menu message
pub const MENU_MESSAGE: MessageId = MessageId(1000);

const EVENT_CAPACITY: usize = 16;
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// How a payload reached the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptAction {
    /// The menu message was sent
    Send,
    /// The message was edited directly
    Edit,
    /// An interaction was answered with a message update
    InitialResponse,
    /// An interaction's response was edited
    EditInitialResponse,
}

/// One recorded payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    /// Delivery path
    pub action: TranscriptAction,
    /// The payload
    pub payload: MessageEdit,
}

/// Shared log of everything the host sent
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Arc<Mutex<Vec<TranscriptEntry>>>,
    echo: bool,
}

impl Transcript {
    /// A transcript that only records
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript that also prints each entry to stdout
    pub fn printing() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    /// Record a payload
    pub fn record(&self, action: TranscriptAction, payload: MessageEdit) -> Result<(), HostError> {
        let entry = TranscriptEntry { action, payload };
        if self.echo {
            let line =
                serde_json::to_string(&entry).map_err(|e| HostError::transport(e.to_string()))?;
            println!("{line}");
        }
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry);
        Ok(())
    }

    /// Entries so far
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

/// The sent menu message
#[derive(Debug)]
pub struct ConsoleMessage {
    id: MessageId,
    transcript: Transcript,
}

impl ConsoleMessage {
    /// Create a message that records edits into `transcript`
    pub fn new(id: MessageId, transcript: Transcript) -> Self {
        Self { id, transcript }
    }
}

#[async_trait]
impl MenuMessage for ConsoleMessage {
    fn id(&self) -> MessageId {
        self.id
    }

    async fn edit(&self, edit: MessageEdit) -> Result<(), HostError> {
        self.transcript.record(TranscriptAction::Edit, edit)
    }
}

/// A scripted interaction
#[derive(Debug)]
pub struct ConsoleInteraction {
    message_id: MessageId,
    user_id: UserId,
    component_type: ComponentType,
    custom_id: String,
    values: Vec<String>,
    responded: AtomicBool,
    transcript: Transcript,
}

impl ConsoleInteraction {
    /// Build the interaction a script line describes
    pub fn new(message_id: MessageId, line: &ScriptLine, transcript: Transcript) -> Self {
        let (component_type, values) = match &line.action {
            Action::Button { .. } => (ComponentType::Button, Vec::new()),
            Action::Select { values, .. } => (ComponentType::SelectMenu, values.clone()),
        };
        Self {
            message_id,
            user_id: line.user,
            component_type,
            custom_id: line.action.custom_id().to_string(),
            values,
            responded: AtomicBool::new(false),
            transcript,
        }
    }
}

#[async_trait]
impl ComponentInteraction for ConsoleInteraction {
    fn message_id(&self) -> MessageId {
        self.message_id
    }

    fn user_id(&self) -> UserId {
        self.user_id
    }

    fn component_type(&self) -> ComponentType {
        self.component_type
    }

    fn custom_id(&self) -> &str {
        &self.custom_id
    }

    fn values(&self) -> &[String] {
        &self.values
    }

    async fn create_initial_response(
        &self,
        kind: ResponseType,
        edit: MessageEdit,
    ) -> Result<(), HostError> {
        if self.responded.swap(true, Ordering::SeqCst) {
            return Err(HostError::NotFound);
        }
        debug!(custom_id = %self.custom_id, ?kind, "Initial response");
        self.transcript.record(TranscriptAction::InitialResponse, edit)
    }

    async fn edit_initial_response(&self, edit: MessageEdit) -> Result<(), HostError> {
        if !self.responded.load(Ordering::SeqCst) {
            return Err(HostError::NotFound);
        }
        self.transcript
            .record(TranscriptAction::EditInitialResponse, edit)
    }
}

/// Result of a finished demo run
#[derive(Debug)]
pub struct DemoRun<D> {
    /// Final menu state
    pub state: MenuState,
    /// The menu definition, for inspecting its state
    pub definition: Arc<D>,
}

/// Send `definition` as a menu, replay `script` against it and wait for it
/// to finish.
///
/// Without `linger` the event stream closes after the last scripted
/// interaction, so the menu exits instead of timing out.
pub async fn run_demo<D: MenuDefinition>(
    definition: D,
    prompt: &str,
    config: &MenuConfig,
    script: Vec<ScriptLine>,
    linger: bool,
    transcript: Transcript,
) -> Result<DemoRun<D>> {
    let (publisher, source) = BroadcastEventSource::channel(EVENT_CAPACITY);
    let ctx = RequestContext::new(REQUESTER, Arc::new(source));
    let mut menu = ComponentMenu::with_config(definition, ctx, config);

    let rows = menu.build().context("Invalid menu declaration")?;
    transcript.record(
        TranscriptAction::Send,
        MessageEdit::new().with_content(prompt).with_components(rows),
    )?;

    let message: Arc<dyn MenuMessage> =
        Arc::new(ConsoleMessage::new(MENU_MESSAGE, transcript.clone()));
    let task = tokio::spawn(async move {
        let result = menu.run(message).await;
        (menu, result)
    });

    let mut published = 0;
    for line in script {
        let ready = wait_until(&task, || {
            publisher.delivered() == published && publisher.active_waits() > 0
        })
        .await;
        if !ready {
            info!("Menu finished before the script ended");
            break;
        }
        debug!(user = %line.user, action = ?line.action, "Replaying interaction");
        let interaction = ConsoleInteraction::new(MENU_MESSAGE, &line, transcript.clone());
        publisher.publish(InteractionCreateEvent::component(Arc::new(interaction)));
        published += 1;
    }
    wait_until(&task, || publisher.delivered() == published).await;

    if !linger {
        drop(publisher);
    }

    let (menu, result) = task.await.context("Menu task panicked")?;
    result.context("Menu failed")?;

    Ok(DemoRun {
        state: menu.state(),
        definition: Arc::clone(menu.definition()),
    })
}

// Poll until `condition` holds; false if the menu task ended first
async fn wait_until<T>(task: &JoinHandle<T>, condition: impl Fn() -> bool) -> bool {
    loop {
        if condition() {
            return true;
        }
        if task.is_finished() {
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(id: &str) -> ConsoleInteraction {
        ConsoleInteraction::new(
            MENU_MESSAGE,
            &ScriptLine::button(REQUESTER, id),
            Transcript::new(),
        )
    }

    #[tokio::test]
    async fn test_interaction_answers_once() {
        let interaction = press("dog");

        assert!(interaction.edit_initial_response("early".into()).await.is_err());
        interaction
            .create_initial_response(ResponseType::MessageUpdate, "first".into())
            .await
            .unwrap();
        let again = interaction
            .create_initial_response(ResponseType::MessageUpdate, "second".into())
            .await;
        assert_eq!(again, Err(HostError::NotFound));
        interaction.edit_initial_response("third".into()).await.unwrap();

        let actions: Vec<_> = interaction
            .transcript
            .entries()
            .into_iter()
            .map(|e| e.action)
            .collect();
        assert_eq!(
            actions,
            vec![TranscriptAction::InitialResponse, TranscriptAction::EditInitialResponse]
        );
    }

    #[test]
    fn test_select_line_carries_values() {
        let line = ScriptLine::select(REQUESTER, "pick", ["fire"]);
        let interaction = ConsoleInteraction::new(MENU_MESSAGE, &line, Transcript::new());
        assert_eq!(interaction.component_type(), ComponentType::SelectMenu);
        assert_eq!(interaction.values(), ["fire".to_string()]);
    }

    #[test]
    fn test_transcript_entry_json() {
        let entry = TranscriptEntry {
            action: TranscriptAction::EditInitialResponse,
            payload: "hi".into(),
        };
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            serde_json::json!({
                "action": "edit_initial_response",
                "payload": { "content": "hi" }
            })
        );
    }
}
