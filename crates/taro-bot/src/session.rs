//! Per-conversation session state.

use std::collections::VecDeque;

use tokio_util::sync::CancellationToken;

use crate::render::RenderContext;

/// Title shown before the first message arrives and after a context reset.
pub const DEFAULT_TITLE: &str = "**New Chat**";

/// State for one `(open_id, chat_id)` conversation.
///
/// A session is only mutated by the processing pass that owns its key (the
/// `busy` flag) and by the card-action dispatcher; both go through the
/// session lock held by the router.
#[derive(Debug)]
pub struct Session {
    /// Identity used to resume the agent's conversational memory. Seeded
    /// from the first message's platform ID, cleared on new-chat.
    pub thread_id: Option<String>,
    /// Display label derived from the first message.
    pub title: String,
    /// Turns processed so far, starting at 1.
    pub message_count: u32,
    /// Not-yet-processed message bodies, arrival order.
    pub queue: VecDeque<String>,
    /// Cancellation token for the turn in flight (or the next one).
    /// Replaced with a fresh token after every turn.
    pub interrupt: CancellationToken,
    /// True exactly while one queued message is being processed.
    pub busy: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            thread_id: None,
            title: DEFAULT_TITLE.to_string(),
            message_count: 1,
            queue: VecDeque::new(),
            interrupt: CancellationToken::new(),
            busy: false,
        }
    }

    /// Records an inbound message: enqueues the body and, on first contact,
    /// seeds the thread identity and title.
    pub fn note_message(&mut self, content: &str, message_id: &str) {
        self.queue.push_back(content.to_string());
        if self.thread_id.is_none() {
            self.thread_id = Some(message_id.to_string());
            self.title = format!("**{content}**");
        }
    }

    /// Advances past the head message after its turn finished (normally,
    /// interrupted, or failed). The interrupt token is replaced so a stop
    /// request cannot leak into the next turn.
    pub fn finish_turn(&mut self) {
        self.message_count += 1;
        self.queue.pop_front();
        self.interrupt = CancellationToken::new();
    }

    /// Resets the session to its initial state.
    ///
    /// `busy` is deliberately left alone: it belongs to the processing pass
    /// that owns the key, and clearing it here could start a second
    /// overlapping pass for the same conversation.
    pub fn reset(&mut self) {
        self.thread_id = None;
        self.title = DEFAULT_TITLE.to_string();
        self.message_count = 1;
        self.queue.clear();
        self.interrupt = CancellationToken::new();
    }

    /// Snapshot handed to the card pipeline alongside the chunk stream.
    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            title: self.title.clone(),
            thread_id: self.thread_id.clone(),
            message_count: self.message_count,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
