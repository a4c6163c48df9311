pub type ChatId = i64;

/// An inbound chat event the bot reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A `/command`, with the leading slash and any `@botname` suffix removed.
    Command { chat_id: ChatId, name: String },
    /// An inline button press carrying the button's payload.
    Callback {
        id: String,
        chat_id: ChatId,
        data: String,
    },
}

impl Event {
    pub fn chat_id(&self) -> ChatId {
        match self {
            Event::Command { chat_id, .. } | Event::Callback { chat_id, .. } => *chat_id,
        }
    }
}
