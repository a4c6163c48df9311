pub mod model;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::trace;

use self::model::{
    AnswerCallbackQuery, ApiResponse, GetUpdates, InlineKeyboardMarkup, Message, SendMessage,
    SendPhoto, Update, User,
};
use super::USER_AGENT;
use crate::{
    bot::{keyboard::Keyboard, responder::ChatSink},
    error::ChatError,
    event::events::ChatId,
};

const API_BASE: &str = "https://api.telegram.org";
const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Added on top of the long-poll timeout so a quiet poll is not cut short.
const REQUEST_SLACK: Duration = Duration::from_secs(15);

fn request_timeout(poll_timeout_secs: u64) -> Duration {
    Duration::from_secs(poll_timeout_secs).saturating_add(REQUEST_SLACK)
}

/// Minimal Bot API client: long polling plus the three calls the menu needs.
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    pub fn new(token: &str, poll_timeout_secs: u64) -> Result<Self, ChatError> {
        Self::with_base_url(API_BASE, token, poll_timeout_secs)
    }

    pub fn with_base_url(
        base_url: &str,
        token: &str,
        poll_timeout_secs: u64,
    ) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout(poll_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base: format!("{}/bot{token}", base_url.trim_end_matches('/')),
            poll_timeout_secs,
        })
    }

    pub async fn get_me(&self) -> Result<User, ChatError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, ChatError> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: self.poll_timeout_secs,
                allowed_updates: ALLOWED_UPDATES,
            },
        )
        .await
    }

    pub async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<Message, ChatError> {
        self.call(
            "sendMessage",
            &SendMessage {
                chat_id,
                text,
                reply_markup: keyboard.map(InlineKeyboardMarkup::from),
            },
        )
        .await
    }

    pub async fn send_photo(
        &self,
        chat_id: ChatId,
        photo: &str,
        caption: &str,
    ) -> Result<Message, ChatError> {
        self.call(
            "sendPhoto",
            &SendPhoto {
                chat_id,
                photo,
                caption,
            },
        )
        .await
    }

    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<bool, ChatError> {
        self.call("answerCallbackQuery", &AnswerCallbackQuery { callback_query_id })
            .await
    }

    async fn call<P, T>(&self, method: &str, params: &P) -> Result<T, ChatError>
    where
        P: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        trace!(method, "bot_api_call");
        // reqwest errors carry the request URL, which embeds the bot token
        let response: ApiResponse<T> = self
            .http
            .post(format!("{}/{method}", self.base))
            .json(params)
            .send()
            .await
            .map_err(|e| ChatError::Http(e.without_url()))?
            .json()
            .await
            .map_err(|e| ChatError::Http(e.without_url()))?;

        response.into_result()
    }
}

#[async_trait]
impl ChatSink for TelegramClient {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), ChatError> {
        self.send_message(chat_id, text, keyboard).await.map(drop)
    }

    async fn send_photo(&self, chat_id: ChatId, url: &str, caption: &str) -> Result<(), ChatError> {
        TelegramClient::send_photo(self, chat_id, url, caption)
            .await
            .map(drop)
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), ChatError> {
        self.answer_callback_query(callback_id).await.map(drop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_timeout_covers_the_long_poll() {
        assert_eq!(request_timeout(60), Duration::from_secs(75));
        assert_eq!(request_timeout(0), REQUEST_SLACK);
    }

    #[test]
    fn huge_poll_timeout_saturates() {
        assert_eq!(request_timeout(u64::MAX), Duration::MAX);
        assert!(TelegramClient::new("123:abc", u64::MAX).is_ok());
    }
}
