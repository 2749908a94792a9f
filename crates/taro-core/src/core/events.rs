//! Agent event types for streaming.
//!
//! This module defines the contract for events emitted by the agent engine
//! during a turn. Events are serializable so turns can be captured and
//! replayed in tests or dumped for debugging.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events emitted by the agent during a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// Turn has started processing.
    TurnStarted,

    /// Incremental text chunk from the assistant.
    AssistantDelta { text: String },

    /// Incremental reasoning chunk from the assistant (extended thinking).
    ReasoningDelta { text: String },

    /// The model has requested one or more tool invocations.
    ToolRequested { calls: Vec<ToolCallRequest> },

    /// A tool invocation has completed. The output is opaque to the
    /// session runtime; it only marks a boundary in the assistant text.
    ToolCompleted { id: String, output: Value },

    /// The underlying stream failed. Terminal; no further events follow.
    Error { message: String },

    /// Turn completed successfully with the final accumulated text.
    TurnCompleted { final_text: String },
}

/// A single tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub input: Value,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input: Value::Null,
        }
    }
}
