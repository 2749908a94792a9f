//! Card-action dispatcher.
//!
//! Out-of-band control signals (the buttons on a reply card) mutate the
//! addressed session and answer with a toast. Nothing here renders to the
//! chat surface.

use serde::Serialize;
use tracing::warn;

use crate::router::SessionRouter;
use crate::types::SessionKey;

/// Control actions a card can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// Interrupt the in-flight generation.
    Stop,
    /// Acknowledged only; re-submission is the caller's business.
    Retry,
    /// Reset the conversation context.
    NewChat,
    /// Acknowledged, unimplemented.
    Setting,
    Unknown,
}

impl CardAction {
    pub fn parse(name: &str) -> Self {
        match name {
            "stop" => CardAction::Stop,
            "retry" => CardAction::Retry,
            "new_chat" => CardAction::NewChat,
            "setting" => CardAction::Setting,
            _ => CardAction::Unknown,
        }
    }
}

/// Toast acknowledgement returned to the transport for the action callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub toast: ToastBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToastBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

impl Toast {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            toast: ToastBody {
                kind: "info".to_string(),
                content: content.into(),
            },
        }
    }
}

/// Applies a card action to the addressed session.
///
/// A control action for a key with no session is a caller error; it is
/// acknowledged with a toast and mutates nothing.
pub(crate) async fn dispatch(router: &SessionRouter, key: &SessionKey, name: &str) -> Toast {
    let Some(session) = router.lookup(key).await else {
        warn!(open_id = %key.open_id, chat_id = %key.chat_id, "card action for unknown session");
        return Toast::info("Unknown session");
    };

    let mut session = session.lock().await;
    match CardAction::parse(name) {
        CardAction::Stop => {
            session.interrupt.cancel();
            Toast::info("Generation stopped")
        }
        CardAction::Retry => Toast::info("Retried"),
        CardAction::NewChat => {
            session.reset();
            Toast::info("Context cleared")
        }
        CardAction::Setting => Toast::info("Settings are not supported yet"),
        CardAction::Unknown => {
            warn!(action = name, "unknown card action");
            Toast::info("Unknown action")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_router(key: &SessionKey) -> SessionRouter {
        let router = SessionRouter::new();
        let session = router.entry(key).await;
        session.lock().await.note_message("hello", "om_1");
        router
    }

    #[tokio::test]
    async fn test_stop_cancels_the_interrupt_token() {
        let key = SessionKey::new("u1", "c1");
        let router = seeded_router(&key).await;

        let toast = dispatch(&router, &key, "stop").await;

        assert_eq!(toast, Toast::info("Generation stopped"));
        let session = router.lookup(&key).await.unwrap();
        assert!(session.lock().await.interrupt.is_cancelled());
    }

    #[tokio::test]
    async fn test_new_chat_clears_context() {
        let key = SessionKey::new("u1", "c1");
        let router = seeded_router(&key).await;

        let toast = dispatch(&router, &key, "new_chat").await;

        assert_eq!(toast, Toast::info("Context cleared"));
        let session = router.lookup(&key).await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.thread_id, None);
        assert!(session.queue.is_empty());
    }

    #[tokio::test]
    async fn test_retry_and_setting_mutate_nothing() {
        let key = SessionKey::new("u1", "c1");
        let router = seeded_router(&key).await;

        dispatch(&router, &key, "retry").await;
        dispatch(&router, &key, "setting").await;

        let session = router.lookup(&key).await.unwrap();
        let session = session.lock().await;
        assert_eq!(session.queue.len(), 1);
        assert!(!session.interrupt.is_cancelled());
    }

    #[tokio::test]
    async fn test_unknown_key_is_a_no_op() {
        let router = SessionRouter::new();
        let key = SessionKey::new("u1", "c1");

        let toast = dispatch(&router, &key, "stop").await;

        assert_eq!(toast, Toast::info("Unknown session"));
        assert!(router.lookup(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_unrecognized_action_name() {
        let key = SessionKey::new("u1", "c1");
        let router = seeded_router(&key).await;

        let toast = dispatch(&router, &key, "dance").await;
        assert_eq!(toast, Toast::info("Unknown action"));
    }

    #[test]
    fn test_toast_wire_shape() {
        let json = serde_json::to_value(Toast::info("Generation stopped")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"toast": {"type": "info", "content": "Generation stopped"}})
        );
    }
}
