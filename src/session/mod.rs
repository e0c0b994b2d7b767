//! Conversation session
//!
//! This module holds everything one chat session needs:
//!
//! - `message`: transcript entries, gallery entries and the status flag
//! - `rules`: keyword heuristics for image triggers, style and ship names
//! - `store`: the observable conversation store
//! - `orchestrator`: the generation cycle state machine

pub mod message;
pub mod orchestrator;
pub mod rules;
pub mod store;

pub use message::{GeneratedShip, GenerationStatus, Message, Role, ShipAttachment};
pub use orchestrator::{CycleOutcome, Orchestrator, RejectReason, FAILURE_MESSAGE, FALLBACK_REPLY};
pub use store::{read_store, write_store, ConversationStore, SharedStore, StoreEvent};
