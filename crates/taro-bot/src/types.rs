use serde::{Deserialize, Serialize};

/// Identifies one conversation: a user talking in a chat.
///
/// Direct messages and group chats both key on the pair, so the same user
/// gets independent sessions per chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub open_id: String,
    pub chat_id: String,
}

impl SessionKey {
    pub fn new(open_id: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            open_id: open_id.into(),
            chat_id: chat_id.into(),
        }
    }
}

/// Which identifier replies are addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientKind {
    OpenId,
    ChatId,
}

/// A decoded inbound chat message, as delivered by the transport.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub open_id: String,
    pub chat_id: String,
    /// Platform message ID; seeds the agent thread ID on first contact.
    pub message_id: String,
    pub content: String,
    pub recipient_kind: RecipientKind,
}

impl IncomingMessage {
    pub fn session_key(&self) -> SessionKey {
        SessionKey::new(self.open_id.clone(), self.chat_id.clone())
    }
}
