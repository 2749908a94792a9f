//! Reshapes the agent's token-level event stream into card-sized chunks.
//!
//! Incremental text and reasoning deltas accumulate in a buffer that is
//! flushed once it reaches `chunk_size` characters. Tool requests and tool
//! results force a flush so text never straddles a tool boundary. The
//! interrupt token is polled before every event; an interrupted turn
//! abandons the stream without flushing the partial buffer.

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use taro_core::core::agent::AgentEventRx;
use taro_core::core::events::AgentEvent;

/// The unit handed to the card rendering pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardChunk {
    Text { content: String },
    ToolCall { name: String },
    ToolResult { content: String },
}

/// Capacity of the chunk channel toward the renderer. Sends await capacity,
/// which is the suspension point where a slow renderer back-pressures the
/// chunker.
const CHUNK_CHANNEL_CAPACITY: usize = 32;

/// Buffer state machine shared by the async driver and unit tests.
#[derive(Debug)]
pub struct ChunkAssembler {
    chunk_size: usize,
    buffer: String,
}

impl ChunkAssembler {
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            buffer: String::new(),
        }
    }

    /// Consumes one event and returns the chunks it made ready, in order.
    ///
    /// Event shapes the chunker does not understand are skipped without
    /// producing anything.
    pub fn push(&mut self, event: &AgentEvent) -> Vec<CardChunk> {
        match event {
            AgentEvent::AssistantDelta { text } | AgentEvent::ReasoningDelta { text } => {
                self.buffer.push_str(text);
                if self.buffer.chars().count() >= self.chunk_size {
                    self.take_buffer().into_iter().collect()
                } else {
                    Vec::new()
                }
            }
            AgentEvent::ToolRequested { calls } => {
                let mut chunks: Vec<CardChunk> = self.take_buffer().into_iter().collect();
                for call in calls {
                    if !call.name.is_empty() {
                        chunks.push(CardChunk::ToolCall {
                            name: call.name.clone(),
                        });
                    }
                }
                chunks
            }
            // Tool results only mark a text boundary; their payload is not
            // rendered.
            AgentEvent::ToolCompleted { .. } => self.take_buffer().into_iter().collect(),
            AgentEvent::TurnStarted
            | AgentEvent::Error { .. }
            | AgentEvent::TurnCompleted { .. } => Vec::new(),
        }
    }

    /// Flushes whatever text remains at stream end.
    pub fn finish(mut self) -> Option<CardChunk> {
        self.take_buffer()
    }

    fn take_buffer(&mut self) -> Option<CardChunk> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(CardChunk::Text {
            content: std::mem::take(&mut self.buffer),
        })
    }
}

/// Spawns the chunker driver for one turn.
///
/// Returns the chunk stream for the renderer and the driver handle. The
/// driver resolves to an error only when the event stream itself reported
/// one; interruption and renderer abandonment both end it cleanly.
pub(crate) fn spawn_chunk_stream(
    mut events: AgentEventRx,
    chunk_size: usize,
    interrupt: CancellationToken,
) -> (mpsc::Receiver<CardChunk>, JoinHandle<Result<()>>) {
    let (tx, rx) = mpsc::channel(CHUNK_CHANNEL_CAPACITY);

    let handle = tokio::spawn(async move {
        let mut assembler = ChunkAssembler::new(chunk_size);

        loop {
            // The interrupt branch is checked first so a stop request wins
            // over an already-buffered event.
            let event = tokio::select! {
                biased;
                () = interrupt.cancelled() => return Ok(()),
                event = events.recv() => event,
            };

            let Some(event) = event else {
                if let Some(chunk) = assembler.finish() {
                    let _ = tx.send(chunk).await;
                }
                return Ok(());
            };

            if let AgentEvent::Error { message } = event.as_ref() {
                bail!("agent stream error: {message}");
            }

            for chunk in assembler.push(&event) {
                if tx.send(chunk).await.is_err() {
                    // Renderer dropped the stream; nothing left to do.
                    return Ok(());
                }
            }
        }
    });

    (rx, handle)
}
