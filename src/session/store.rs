//! Conversation store
//!
//! Holds the transcript, the ship gallery and the generation status for one
//! session. Every mutation is broadcast as a [`StoreEvent`] so renderers can
//! follow along without polling.

use crate::error::{CruiseSimError, Result};
use crate::session::message::{GeneratedShip, GenerationStatus, Message};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use ulid::{Generator, Ulid};

/// Buffered events per subscriber before the slowest one starts lagging
const EVENT_CAPACITY: usize = 64;

/// Store shared between the orchestrator and renderers
pub type SharedStore = Arc<RwLock<ConversationStore>>;

/// Change notification emitted after each mutation
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    MessageAppended(Message),
    ShipAdded(GeneratedShip),
    StatusChanged(GenerationStatus),
}

/// Transcript, gallery and status for one session
///
/// The transcript is append-only and the gallery only grows at the front.
/// Neither collection supports removal.
pub struct ConversationStore {
    transcript: Vec<Message>,
    gallery: Vec<GeneratedShip>,
    status: GenerationStatus,
    ids: Generator,
    events: broadcast::Sender<StoreEvent>,
}

impl ConversationStore {
    /// Creates an empty store in the `Idle` state
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            transcript: Vec::new(),
            gallery: Vec::new(),
            status: GenerationStatus::Idle,
            ids: Generator::new(),
            events,
        }
    }

    /// Creates a store whose transcript opens with the captain's greeting
    ///
    /// # Examples
    ///
    /// ```
    /// use cruisesim::session::{ConversationStore, Role};
    ///
    /// let store = ConversationStore::with_greeting("Ahoy!");
    /// assert_eq!(store.transcript().len(), 1);
    /// assert_eq!(store.transcript()[0].role(), Role::Assistant);
    /// ```
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut store = Self::new();
        let id = store.next_id();
        store.append_message(Message::assistant(id, greeting));
        store
    }

    /// Wraps the store for sharing
    pub fn into_shared(self) -> SharedStore {
        Arc::new(RwLock::new(self))
    }

    /// Next identifier for a message or ship
    ///
    /// Identifiers are strictly increasing within one store.
    pub fn next_id(&mut self) -> Ulid {
        match self.ids.generate() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("Monotonic id generator exhausted ({}), using a fresh id", e);
                Ulid::new()
            }
        }
    }

    /// Appends a message to the end of the transcript
    pub fn append_message(&mut self, message: Message) {
        tracing::debug!("Appending {} message {}", message.role(), message.id());
        self.transcript.push(message.clone());
        self.emit(StoreEvent::MessageAppended(message));
    }

    /// Inserts a ship at the front of the gallery
    pub fn prepend_ship(&mut self, ship: GeneratedShip) {
        tracing::debug!("Adding ship '{}' to gallery", ship.name);
        self.gallery.insert(0, ship.clone());
        self.emit(StoreEvent::ShipAdded(ship));
    }

    /// Overwrites the status
    ///
    /// No transition check happens here; the orchestrator owns legality.
    pub fn set_status(&mut self, status: GenerationStatus) {
        tracing::debug!("Status {} -> {}", self.status, status);
        self.status = status;
        self.emit(StoreEvent::StatusChanged(status));
    }

    /// Messages in creation order
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    /// Ships, newest first
    pub fn gallery(&self) -> &[GeneratedShip] {
        &self.gallery
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    /// Receives every event emitted after this call
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl std::fmt::Debug for ConversationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationStore")
            .field("transcript", &self.transcript.len())
            .field("gallery", &self.gallery.len())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Acquires the read lock, mapping poisoning to a session error
pub fn read_store(store: &SharedStore) -> Result<RwLockReadGuard<'_, ConversationStore>> {
    store
        .read()
        .map_err(|_| CruiseSimError::Session("conversation store lock poisoned".to_string()).into())
}

/// Acquires the write lock, mapping poisoning to a session error
pub fn write_store(store: &SharedStore) -> Result<RwLockWriteGuard<'_, ConversationStore>> {
    store
        .write()
        .map_err(|_| CruiseSimError::Session("conversation store lock poisoned".to_string()).into())
}
