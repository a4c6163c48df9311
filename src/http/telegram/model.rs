//! Bot API wire types, limited to the fields the bot reads or writes.

use serde::{Deserialize, Serialize};

use crate::{
    bot::keyboard::Keyboard,
    error::ChatError,
    event::events::{ChatId, Event},
};

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i32>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T, ChatError> {
        if self.ok {
            if let Some(result) = self.result {
                return Ok(result);
            }
        }

        let mut description = self
            .description
            .unwrap_or_else(|| "no description".to_string());
        if let Some(secs) = self.parameters.and_then(|p| p.retry_after) {
            description.push_str(&format!(" (retry after {secs}s)"));
        }
        Err(ChatError::Api {
            code: self.error_code.unwrap_or_default(),
            description,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
    #[serde(default)]
    pub entities: Vec<MessageEntity>,
}

impl Message {
    /// Command name if the message starts with a bot command, without the
    /// leading slash and without an `@botname` suffix.
    pub fn command(&self) -> Option<&str> {
        let text = self.text.as_deref()?;
        let entity = self.entities.first()?;
        if entity.kind != "bot_command" || entity.offset != 0 {
            return None;
        }

        let command = text.get(1..entity.length)?;
        command.split('@').next().filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

impl Update {
    pub fn into_event(self) -> Option<Event> {
        if let Some(message) = self.message {
            return message.command().map(|name| Event::Command {
                chat_id: message.chat.id,
                name: name.to_string(),
            });
        }

        let query = self.callback_query?;
        let data = query.data?;
        let chat_id = query
            .message
            .map(|message| message.chat.id)
            .unwrap_or(query.from.id);

        Some(Event::Callback {
            id: query.id,
            chat_id,
            data,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

impl From<&Keyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| InlineKeyboardButton {
                            text: button.text.clone(),
                            callback_data: button.payload.clone(),
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GetUpdates<'a> {
    pub offset: i64,
    pub timeout: u64,
    pub allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: ChatId,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
pub struct SendPhoto<'a> {
    pub chat_id: ChatId,
    pub photo: &'a str,
    pub caption: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AnswerCallbackQuery<'a> {
    pub callback_query_id: &'a str,
}
