//! The per-conversation session runtime.
//!
//! One `Runner` serves every conversation: inbound messages are enqueued on
//! their session and drained one turn at a time, card actions mutate the
//! addressed session out of band. Turn failures are contained here; nothing
//! a single turn does can wedge its conversation or crash the runtime.

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use taro_core::config::Config;
use taro_core::core::agent::{TurnAgent, TurnRequest};

use crate::chunker::spawn_chunk_stream;
use crate::dispatcher::{self, Toast};
use crate::render::{CardRenderer, Recipient, RenderContext};
use crate::router::{SessionRouter, SharedSession};
use crate::types::{IncomingMessage, SessionKey};

/// Builds a [`Runner`], failing fast when a collaborator is missing.
///
/// A runner without an agent or renderer is a configuration bug, not a
/// runtime condition, so `build` refuses instead of deferring the error to
/// the first message.
pub struct RunnerBuilder<A, R> {
    config: Config,
    agent: Option<A>,
    renderer: Option<R>,
}

impl<A: TurnAgent, R: CardRenderer> RunnerBuilder<A, R> {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            agent: None,
            renderer: None,
        }
    }

    #[must_use]
    pub fn agent(mut self, agent: A) -> Self {
        self.agent = Some(agent);
        self
    }

    #[must_use]
    pub fn renderer(mut self, renderer: R) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// # Errors
    /// Returns an error if the agent or renderer was never set.
    pub fn build(self) -> Result<Runner<A, R>> {
        let Some(agent) = self.agent else {
            bail!("Set an agent before building the runner");
        };
        let Some(renderer) = self.renderer else {
            bail!("Set a renderer before building the runner");
        };
        Ok(Runner {
            inner: Arc::new(Inner {
                agent,
                renderer,
                router: SessionRouter::new(),
                chunk_size: self.config.chunk_size,
                recursion_limit: self.config.recursion_limit,
            }),
        })
    }
}

/// The session runtime. Cheap to clone; clones share all sessions.
pub struct Runner<A, R> {
    inner: Arc<Inner<A, R>>,
}

impl<A, R> fmt::Debug for Runner<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner").finish_non_exhaustive()
    }
}

impl<A, R> Clone for Runner<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<A, R> {
    agent: A,
    renderer: R,
    router: SessionRouter,
    chunk_size: usize,
    recursion_limit: u32,
}

impl<A: TurnAgent, R: CardRenderer> Runner<A, R> {
    pub fn builder(config: &Config) -> RunnerBuilder<A, R> {
        RunnerBuilder::new(config)
    }

    /// Handles one decoded inbound message.
    ///
    /// Enqueues the body on the conversation's session and, when no turn is
    /// in flight for that key, drains the queue before returning. When a
    /// turn is already in flight the message is left for the owning pass to
    /// pick up and this returns immediately.
    pub async fn handle_message(&self, message: IncomingMessage) {
        let key = message.session_key();
        let recipient = Recipient {
            open_id: message.open_id.clone(),
            chat_id: message.chat_id.clone(),
            kind: message.recipient_kind,
        };

        let session = self.inner.router.entry(&key).await;
        let owns_drain = {
            let mut session = session.lock().await;
            session.note_message(&message.content, &message.message_id);
            if session.busy {
                false
            } else {
                session.busy = true;
                true
            }
        };

        if owns_drain {
            info!(open_id = %key.open_id, chat_id = %key.chat_id, "processing message queue");
            self.drain_queue(&key, &session, &recipient).await;
        }
    }

    /// Handles an out-of-band card action, returning the toast to show.
    pub async fn handle_card_action(&self, key: &SessionKey, action_name: &str) -> Toast {
        dispatcher::dispatch(&self.inner.router, key, action_name).await
    }

    /// The session table this runner drives.
    pub fn router(&self) -> &SessionRouter {
        &self.inner.router
    }

    /// Processes queued messages for one key until the queue is empty.
    ///
    /// The caller must have claimed the session (`busy` set) under the
    /// session lock. An explicit loop rather than recursion: bursts of
    /// messages must not grow the stack.
    async fn drain_queue(&self, key: &SessionKey, session: &SharedSession, recipient: &Recipient) {
        loop {
            // Head snapshot and the busy hand-off are a single critical
            // section so an arriving message either sees busy or sees the
            // queue empty, never neither.
            let turn = {
                let mut session = session.lock().await;
                match session.queue.front() {
                    Some(content) => Some((
                        content.clone(),
                        session.thread_id.clone(),
                        session.interrupt.clone(),
                        session.render_context(),
                    )),
                    None => {
                        session.busy = false;
                        None
                    }
                }
            };
            let Some((content, thread_id, interrupt, context)) = turn else {
                return;
            };

            if let Err(err) = self
                .run_turn(content, thread_id, interrupt, recipient.clone(), context)
                .await
            {
                // A failed turn is logged and treated as complete; the
                // queue advances so one bad turn cannot wedge the
                // conversation.
                error!(open_id = %key.open_id, chat_id = %key.chat_id, "turn failed: {err:#}");
            }

            session.lock().await.finish_turn();
        }
    }

    async fn run_turn(
        &self,
        query: String,
        thread_id: Option<String>,
        interrupt: CancellationToken,
        recipient: Recipient,
        context: RenderContext,
    ) -> Result<()> {
        let events = self
            .inner
            .agent
            .start_turn(TurnRequest {
                query,
                thread_id,
                recursion_limit: self.inner.recursion_limit,
            })
            .context("start agent turn")?;

        let (chunks, chunker) = spawn_chunk_stream(events, self.inner.chunk_size, interrupt);
        self.inner
            .renderer
            .render(chunks, recipient, context)
            .await
            .context("render card stream")?;
        chunker.await.context("join chunker")??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use taro_core::core::agent::AgentEventRx;

    use crate::chunker::CardChunk;

    use super::*;

    struct NoAgent;

    impl TurnAgent for NoAgent {
        fn start_turn(&self, _request: TurnRequest) -> Result<AgentEventRx> {
            bail!("unused")
        }
    }

    struct NoRenderer;

    impl CardRenderer for NoRenderer {
        async fn render(
            &self,
            _chunks: mpsc::Receiver<CardChunk>,
            _recipient: Recipient,
            _context: RenderContext,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_build_without_agent_fails_fast() {
        let config = Config::default();
        let err = RunnerBuilder::<NoAgent, NoRenderer>::new(&config)
            .renderer(NoRenderer)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("agent"));
    }

    #[test]
    fn test_build_without_renderer_fails_fast() {
        let config = Config::default();
        let err = RunnerBuilder::<NoAgent, NoRenderer>::new(&config)
            .agent(NoAgent)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("renderer"));
    }
}
