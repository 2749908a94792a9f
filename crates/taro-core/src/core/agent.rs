//! Agent engine contract and event channel plumbing.
//!
//! The engine itself (model calls, tool execution, conversational memory)
//! lives behind [`TurnAgent`]. The session runtime only needs to start a
//! turn and consume the resulting event stream.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::core::events::AgentEvent;

/// Channel-based event sender (async, bounded).
///
/// Events are wrapped in `Arc` so an engine can fan them out to multiple
/// consumers without cloning payloads.
pub type AgentEventTx = mpsc::Sender<Arc<AgentEvent>>;

/// Channel-based event receiver (async, bounded).
pub type AgentEventRx = mpsc::Receiver<Arc<AgentEvent>>;

/// Default channel capacity for event streams.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 128;

/// Creates a bounded event channel with the default capacity.
pub fn create_event_channel() -> (AgentEventTx, AgentEventRx) {
    mpsc::channel(DEFAULT_EVENT_CHANNEL_CAPACITY)
}

/// Event sender wrapper that hides the `Arc` wrapping from engines.
#[derive(Clone)]
pub struct EventSender {
    tx: AgentEventTx,
}

impl EventSender {
    pub fn new(tx: AgentEventTx) -> Self {
        Self { tx }
    }

    /// Sends an event, awaiting channel capacity.
    ///
    /// A closed channel means the consumer abandoned the turn; the event is
    /// dropped silently in that case.
    pub async fn send(&self, event: AgentEvent) {
        let _ = self.tx.send(Arc::new(event)).await;
    }
}

/// One queued user message handed to the engine.
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// The user's message body.
    pub query: String,
    /// Identity used to resume the engine's conversational memory.
    /// `None` starts a fresh thread.
    pub thread_id: Option<String>,
    /// Recursion limit forwarded to the engine's internal loop.
    pub recursion_limit: u32,
}

/// The agent engine collaborator.
///
/// `start_turn` must not block: implementations spawn the turn and return
/// the receiving end of its event stream immediately. Errors from the
/// stream itself arrive as [`AgentEvent::Error`]; errors returned here mean
/// the turn could not start at all.
pub trait TurnAgent: Send + Sync + 'static {
    /// Starts a turn for the given request.
    ///
    /// # Errors
    /// Returns an error if the turn cannot be started.
    fn start_turn(&self, request: TurnRequest) -> Result<AgentEventRx>;
}
