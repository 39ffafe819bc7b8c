//! Mock Implementations for Testing
//!
//! In-memory implementations of the host traits. They are:
//!
//! - **Deterministic**: scripted events replay in order
//! - **Observable**: every edit and response is recorded for assertions
//! - **Configurable**: acknowledgement failures can be injected
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use neon_menu::test_support::mocks::{MockInteraction, ScriptedEvents};
//! use neon_menu::{EventSource, MessageId, UserId};
//!
//! # async fn example() {
//! let events = ScriptedEvents::new();
//! events.push(Arc::new(MockInteraction::button(MessageId(1), UserId(7), "dog")).event());
//!
//! let any = |_: &neon_menu::InteractionCreateEvent| true;
//! let event = events.wait_for(Duration::from_secs(30), &any).await.unwrap();
//! assert_eq!(event.interaction.as_component().unwrap().custom_id(), "dog");
//! assert_eq!(events.wait_count(), 1);
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::host::{
    ComponentInteraction, ComponentType, EventPredicate, EventSource, HostError,
    InteractionCreateEvent, MenuMessage, MessageEdit, MessageId, ResponseType, UserId, WaitError,
};

/// A sent message that records every edit
#[derive(Debug, Default)]
pub struct MockMessage {
    id: u64,
    edits: Mutex<Vec<MessageEdit>>,
    failure: Mutex<Option<HostError>>,
}

impl MockMessage {
    /// Create a message with the given id
    pub fn new(id: MessageId) -> Self {
        Self {
            id: id.0,
            ..Self::default()
        }
    }

    /// Make every following edit fail with `error`
    pub fn fail_edits_with(&self, error: HostError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// Edits applied so far
    pub fn edits(&self) -> Vec<MessageEdit> {
        self.edits.lock().unwrap().clone()
    }
}

#[async_trait]
impl MenuMessage for MockMessage {
    fn id(&self) -> MessageId {
        MessageId(self.id)
    }

    async fn edit(&self, edit: MessageEdit) -> Result<(), HostError> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        self.edits.lock().unwrap().push(edit);
        Ok(())
    }
}

/// A component interaction that behaves like the platform's response window.
///
/// The first `create_initial_response` succeeds; later ones fail with
/// [`HostError::NotFound`], as do all of them once [`expired`](Self::expired)
/// is set.
#[derive(Debug)]
pub struct MockInteraction {
    message_id: MessageId,
    user_id: UserId,
    component_type: ComponentType,
    custom_id: String,
    values: Vec<String>,
    expired: bool,
    failure: Option<HostError>,
    responded: AtomicBool,
    initial_responses: Mutex<Vec<(ResponseType, MessageEdit)>>,
    followup_edits: Mutex<Vec<MessageEdit>>,
}

impl MockInteraction {
    fn new(
        message_id: MessageId,
        user_id: UserId,
        component_type: ComponentType,
        custom_id: impl Into<String>,
        values: Vec<String>,
    ) -> Self {
        Self {
            message_id,
            user_id,
            component_type,
            custom_id: custom_id.into(),
            values,
            expired: false,
            failure: None,
            responded: AtomicBool::new(false),
            initial_responses: Mutex::new(Vec::new()),
            followup_edits: Mutex::new(Vec::new()),
        }
    }

    /// A button press
    pub fn button(message_id: MessageId, user_id: UserId, custom_id: impl Into<String>) -> Self {
        Self::new(message_id, user_id, ComponentType::Button, custom_id, Vec::new())
    }

    /// A select menu choice
    pub fn select<I, S>(
        message_id: MessageId,
        user_id: UserId,
        custom_id: impl Into<String>,
        values: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self::new(message_id, user_id, ComponentType::SelectMenu, custom_id, values)
    }

    /// An interaction from an arbitrary component kind
    pub fn other(
        message_id: MessageId,
        user_id: UserId,
        kind: u8,
        custom_id: impl Into<String>,
    ) -> Self {
        Self::new(message_id, user_id, ComponentType::Other(kind), custom_id, Vec::new())
    }

    /// The response window has already closed
    pub fn expired(mut self) -> Self {
        self.expired = true;
        self
    }

    /// Every acknowledgement fails with `error`
    pub fn failing_with(mut self, error: HostError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Wrap into an interaction-created event
    pub fn event(self: &Arc<Self>) -> InteractionCreateEvent {
        InteractionCreateEvent::component(Arc::clone(self) as Arc<dyn ComponentInteraction>)
    }

    /// Initial responses sent so far
    pub fn initial_responses(&self) -> Vec<(ResponseType, MessageEdit)> {
        self.initial_responses.lock().unwrap().clone()
    }

    /// Edits applied to the initial response
    pub fn followup_edits(&self) -> Vec<MessageEdit> {
        self.followup_edits.lock().unwrap().clone()
    }

    /// Total edits that reached the user through this interaction
    pub fn total_edits(&self) -> usize {
        self.initial_responses.lock().unwrap().len() + self.followup_edits.lock().unwrap().len()
    }
}

#[async_trait]
impl ComponentInteraction for MockInteraction {
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
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        if self.expired || self.responded.swap(true, Ordering::SeqCst) {
            return Err(HostError::NotFound);
        }
        self.initial_responses.lock().unwrap().push((kind, edit));
        Ok(())
    }

    async fn edit_initial_response(&self, edit: MessageEdit) -> Result<(), HostError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        self.followup_edits.lock().unwrap().push(edit);
        Ok(())
    }
}

#[derive(Debug)]
enum Step {
    Event(InteractionCreateEvent),
    Close,
}

/// An [`EventSource`] that replays queued events.
///
/// Each wait takes queued events in order, skipping those the predicate
/// rejects. When the queue runs dry the wait sleeps for its full timeout and
/// reports [`WaitError::Timeout`], so tests should run on a paused clock.
#[derive(Debug, Default)]
pub struct ScriptedEvents {
    queue: Mutex<VecDeque<Step>>,
    waits: Mutex<Vec<Duration>>,
}

impl ScriptedEvents {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event
    pub fn push(&self, event: InteractionCreateEvent) {
        self.queue.lock().unwrap().push_back(Step::Event(event));
    }

    /// Queue the end of the event stream
    pub fn push_close(&self) {
        self.queue.lock().unwrap().push_back(Step::Close);
    }

    /// Number of waits started
    pub fn wait_count(&self) -> usize {
        self.waits.lock().unwrap().len()
    }

    /// Timeout passed to each wait, in order
    pub fn wait_timeouts(&self) -> Vec<Duration> {
        self.waits.lock().unwrap().clone()
    }

    /// Events not consumed yet
    pub fn remaining(&self) -> usize {
        self.queue.lock().unwrap().len()
    }
}

#[async_trait]
impl EventSource for ScriptedEvents {
    async fn wait_for(
        &self,
        timeout: Duration,
        predicate: EventPredicate<'_>,
    ) -> Result<InteractionCreateEvent, WaitError> {
        self.waits.lock().unwrap().push(timeout);

        loop {
            let step = self.queue.lock().unwrap().pop_front();
            match step {
                Some(Step::Event(event)) if predicate(&event) => return Ok(event),
                Some(Step::Event(_)) => continue,
                Some(Step::Close) => return Err(WaitError::Closed),
                None => break,
            }
        }

        tokio::time::sleep(timeout).await;
        Err(WaitError::Timeout(timeout))
    }
}
