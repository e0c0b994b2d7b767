//! Generation cycle orchestration
//!
//! The orchestrator turns one user submission into a complete cycle:
//!
//! 1. record the user message and move to `Thinking`
//! 2. ask the provider for the captain's reply
//! 3. when the text asks for it, move to `GeneratingImage` and request a
//!    styled render
//! 4. merge the results into the transcript and gallery and return to `Idle`
//!
//! Any provider failure aborts the whole cycle. The transcript then gets a
//! fixed apology instead of a partial reply and the gallery is untouched.

use crate::error::{CruiseSimError, Result};
use crate::prompts::build_image_prompt;
use crate::providers::{
    GeneratedImage, HistoryEntry, ImageRequest, Provider, ProviderRole, DEFAULT_ASPECT_RATIO,
};
use crate::session::message::{GeneratedShip, GenerationStatus, Message, ShipAttachment};
use crate::session::rules::{classify_style, derive_ship_name, should_generate_image};
use crate::session::store::{read_store, write_store, ConversationStore, SharedStore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Assistant text appended when a cycle fails
pub const FAILURE_MESSAGE: &str =
    "Stormy seas! I encountered an error processing your request. Please try again.";

/// Assistant text used when the provider replies with nothing
pub const FALLBACK_REPLY: &str = "I've processed your request, Captain!";

/// Gallery description used when the provider replies with nothing
pub fn fallback_description(ship_name: &str) -> String {
    format!("A custom ship concept named {}.", ship_name)
}

/// Why a submission did not start a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The text was empty after trimming
    Empty,
    /// Another cycle is still running
    Busy,
}

/// Result of one call to [`Orchestrator::submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Nothing was recorded
    Rejected(RejectReason),
    /// The captain replied; `ship` is set when an image was produced
    Completed {
        reply: Message,
        ship: Option<GeneratedShip>,
    },
    /// A provider call failed and the apology was recorded
    Failed { notice: Message, error: String },
}

/// Drives generation cycles against a provider and a shared store
///
/// The orchestrator is the only writer of the store during a cycle. Store
/// locks are released before every provider call.
///
/// # Examples
///
/// ```no_run
/// use cruisesim::config::GeminiConfig;
/// use cruisesim::providers::GeminiProvider;
/// use cruisesim::session::{ConversationStore, CycleOutcome, Orchestrator};
/// use std::sync::Arc;
///
/// # async fn example() -> cruisesim::error::Result<()> {
/// let provider = Arc::new(GeminiProvider::new(GeminiConfig::default())?);
/// let store = ConversationStore::with_greeting("Ahoy!").into_shared();
/// let orchestrator = Orchestrator::new(provider, store);
///
/// if let CycleOutcome::Completed { reply, .. } =
///     orchestrator.submit("build a neon party boat").await?
/// {
///     println!("{}", reply.content());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    store: SharedStore,
    call_timeout: Option<Duration>,
    aspect_ratio: String,
}

impl Orchestrator {
    /// Creates an orchestrator without a per-call timeout
    pub fn new(provider: Arc<dyn Provider>, store: SharedStore) -> Self {
        Self {
            provider,
            store,
            call_timeout: None,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
        }
    }

    /// Bounds each provider call; a call that runs out counts as a failure
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Aspect ratio requested for ship renders
    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self
    }

    /// The store this orchestrator writes to
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Runs one generation cycle for `text`
    ///
    /// # Arguments
    ///
    /// * `text` - Raw user input
    ///
    /// # Returns
    ///
    /// Returns `Rejected` without touching the store when the text is blank
    /// or a cycle is already running. Provider failures are reported as
    /// `Failed`, never as an error.
    ///
    /// # Errors
    ///
    /// Returns error only if the store lock is poisoned
    pub async fn submit(&self, text: &str) -> Result<CycleOutcome> {
        if text.trim().is_empty() {
            tracing::debug!("Ignoring empty submission");
            return Ok(CycleOutcome::Rejected(RejectReason::Empty));
        }

        let history = {
            let mut store = write_store(&self.store)?;
            if !store.status().accepts_input() {
                tracing::debug!("Rejecting submission while {}", store.status());
                return Ok(CycleOutcome::Rejected(RejectReason::Busy));
            }

            let history = provider_history(store.transcript());
            let id = store.next_id();
            store.append_message(Message::user(id, text));
            store.set_status(GenerationStatus::Thinking);
            history
        };

        tracing::info!(
            "Starting cycle with {} ({} history turns)",
            self.provider.name(),
            history.len()
        );

        let guard = CycleGuard::arm(&self.store);
        let generated = self.generate(text, &history).await;
        guard.disarm();

        match generated {
            Ok((reply, image)) => self.merge(text, reply, image),
            Err(error) => self.fail(error),
        }
    }

    async fn generate(
        &self,
        text: &str,
        history: &[HistoryEntry],
    ) -> Result<(String, Option<GeneratedImage>)> {
        let reply = self
            .bounded(self.provider.generate_reply(text, history))
            .await?;

        if !should_generate_image(text) {
            return Ok((reply, None));
        }

        {
            let mut store = write_store(&self.store)?;
            store.set_status(GenerationStatus::GeneratingImage);
        }

        let style = classify_style(text);
        tracing::debug!("Requesting {} render", style);
        let request = ImageRequest::new(build_image_prompt(style, text), style)
            .with_aspect_ratio(self.aspect_ratio.clone());
        let image = self.bounded(self.provider.generate_image(&request)).await?;

        Ok((reply, image))
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                CruiseSimError::Provider(format!("Provider call timed out after {:?}", limit))
            })?,
            None => call.await,
        }
    }

    fn merge(
        &self,
        text: &str,
        reply: String,
        image: Option<GeneratedImage>,
    ) -> Result<CycleOutcome> {
        let mut store = write_store(&self.store)?;

        let (message, ship) = match image {
            Some(image) => {
                let name = derive_ship_name(text);
                let image_url = image.to_data_uri();
                let description = if reply.is_empty() {
                    fallback_description(&name)
                } else {
                    reply.clone()
                };

                let ship_id = store.next_id();
                let ship = GeneratedShip::new(ship_id, name.clone(), description, image_url.clone());
                store.prepend_ship(ship.clone());
                tracing::info!("Launched {}", name);

                let message_id = store.next_id();
                let message = Message::assistant_with_ship(
                    message_id,
                    reply_or_fallback(reply),
                    ShipAttachment {
                        image_url,
                        ship_name: name,
                    },
                );
                (message, Some(ship))
            }
            None => {
                let message_id = store.next_id();
                (Message::assistant(message_id, reply_or_fallback(reply)), None)
            }
        };

        store.append_message(message.clone());
        store.set_status(GenerationStatus::Idle);

        Ok(CycleOutcome::Completed {
            reply: message,
            ship,
        })
    }

    fn fail(&self, error: anyhow::Error) -> Result<CycleOutcome> {
        tracing::error!("Generation cycle failed: {:#}", error);

        let notice = record_failure(&mut *write_store(&self.store)?);

        Ok(CycleOutcome::Failed {
            notice,
            error: error.to_string(),
        })
    }

    /// Current status, for renderers that do not hold a subscription
    pub fn status(&self) -> Result<GenerationStatus> {
        Ok(read_store(&self.store)?.status())
    }
}

/// Settles a cycle whose future is dropped between `Thinking` and the merge,
/// recording it as a failure so the store returns to `Idle`
struct CycleGuard<'a> {
    store: &'a SharedStore,
    armed: bool,
}

impl<'a> CycleGuard<'a> {
    fn arm(store: &'a SharedStore) -> Self {
        Self { store, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!("Generation cycle abandoned before it finished");
        match write_store(self.store) {
            Ok(mut store) => {
                record_failure(&mut store);
            }
            Err(e) => tracing::error!("Could not settle abandoned cycle: {}", e),
        }
    }
}

/// Error, apology, Idle
fn record_failure(store: &mut ConversationStore) -> Message {
    store.set_status(GenerationStatus::Error);
    let id = store.next_id();
    let notice = Message::assistant(id, FAILURE_MESSAGE);
    store.append_message(notice.clone());
    store.set_status(GenerationStatus::Idle);
    notice
}

fn reply_or_fallback(reply: String) -> String {
    if reply.is_empty() {
        FALLBACK_REPLY.to_string()
    } else {
        reply
    }
}

/// Maps the transcript onto provider history, skipping roles the provider
/// cannot represent
fn provider_history(transcript: &[Message]) -> Vec<HistoryEntry> {
    transcript
        .iter()
        .filter_map(|message| match ProviderRole::try_from(message.role()) {
            Ok(role) => Some(HistoryEntry::new(role, message.content())),
            Err(e) => {
                tracing::debug!("Leaving message {} out of history: {}", message.id(), e);
                None
            }
        })
        .collect()
}
