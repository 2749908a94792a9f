//! Rendering collaborator contract.
//!
//! The chat platform's card pipeline (create card, stream updates into it)
//! lives behind [`CardRenderer`]. The runtime hands it a lazy chunk stream
//! and a snapshot of the session; how chunks become card edits is the
//! renderer's business.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::chunker::CardChunk;
use crate::types::RecipientKind;

/// Where a reply card is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub open_id: String,
    pub chat_id: String,
    pub kind: RecipientKind,
}

/// Per-turn session snapshot injected into the card pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderContext {
    pub title: String,
    pub thread_id: Option<String>,
    pub message_count: u32,
}

/// Card rendering service.
///
/// Implementations consume the chunk stream until it ends or they choose to
/// abandon it; dropping the receiver early stops the chunker cleanly.
pub trait CardRenderer: Send + Sync + 'static {
    /// Renders one turn's chunk stream to the recipient.
    fn render(
        &self,
        chunks: mpsc::Receiver<CardChunk>,
        recipient: Recipient,
        context: RenderContext,
    ) -> impl Future<Output = Result<()>> + Send;
}
