//! Session runtime for the Taro chat bot.
//!
//! Turns decoded transport events into ordered, streamed, interruptible
//! agent turns. The transport (WebSocket connection, card API), the agent
//! engine, and the knowledge base are collaborators behind the contracts in
//! `taro-core` and [`render`]; this crate owns the state machine between
//! them:
//!
//! - [`chunker`] reshapes agent events into card-sized chunks
//! - [`session`] and [`router`] hold per-conversation state
//! - [`runner`] serializes queued messages into one turn at a time
//! - [`dispatcher`] applies stop / retry / new-chat card actions

pub mod chunker;
pub mod dispatcher;
pub mod render;
pub mod router;
pub mod runner;
pub mod session;
pub mod types;

pub use chunker::CardChunk;
pub use dispatcher::{CardAction, Toast};
pub use render::{CardRenderer, Recipient, RenderContext};
pub use router::SessionRouter;
pub use runner::{Runner, RunnerBuilder};
pub use types::{IncomingMessage, RecipientKind, SessionKey};
