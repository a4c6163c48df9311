use async_trait::async_trait;
use tracing::warn;

use super::{keyboard::Keyboard, menu::Render};
use crate::{catalog::SearchResult, error::ChatError, event::events::ChatId};

/// Outbound side of the chat transport.
#[async_trait]
pub trait ChatSink: Send + Sync {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), ChatError>;

    async fn send_photo(&self, chat_id: ChatId, url: &str, caption: &str) -> Result<(), ChatError>;

    /// Closes the loading indicator on a pressed button.
    async fn answer_callback(&self, callback_id: &str) -> Result<(), ChatError>;
}

/// Delivers menu screens and search results. Failures are logged and
/// swallowed; the only recovery is falling back from a photo to plain text.
pub struct Responder<S> {
    sink: S,
}

impl<S: ChatSink> Responder<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub async fn show(&self, chat_id: ChatId, render: &Render) {
        if let Err(e) = self
            .sink
            .send_text(chat_id, &render.text, Some(&render.keyboard))
            .await
        {
            warn!(chat_id, "Error sending message: {e}");
        }
    }

    pub async fn deliver(&self, chat_id: ChatId, result: &SearchResult) {
        if let Some(url) = result.cover_url.as_deref() {
            match self.sink.send_photo(chat_id, url, &result.caption).await {
                Ok(()) => return,
                Err(e) => warn!(chat_id, url, "Error sending photo: {e}"),
            }
        }

        self.notify(chat_id, &result.caption).await;
    }

    pub async fn notify(&self, chat_id: ChatId, text: &str) {
        if let Err(e) = self.sink.send_text(chat_id, text, None).await {
            warn!(chat_id, "Error sending message: {e}");
        }
    }

    pub async fn acknowledge(&self, callback_id: &str) {
        if let Err(e) = self.sink.answer_callback(callback_id).await {
            warn!(callback_id, "Error answering callback: {e}");
        }
    }
}
