//! In-memory doubles for the catalog and the chat transport.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    bot::{keyboard::Keyboard, responder::ChatSink},
    catalog::{Catalog, CatalogItem, Category},
    error::{CatalogError, ChatError},
    event::events::ChatId,
};

pub fn item(id: &str, name: &str) -> CatalogItem {
    CatalogItem {
        id: id.into(),
        name: name.into(),
        artist: None,
        images: Vec::new(),
        link: format!("https://open.spotify.com/album/{id}"),
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    items: Vec<CatalogItem>,
    failure: Option<String>,
    calls: Mutex<Vec<(String, Category)>>,
}

impl FakeCatalog {
    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, Category)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn search(
        &self,
        query: &str,
        category: Category,
    ) -> Result<Vec<CatalogItem>, CatalogError> {
        self.calls.lock().unwrap().push((query.to_string(), category));
        match &self.failure {
            Some(message) => Err(CatalogError::Api {
                status: 503,
                message: message.clone(),
            }),
            None => Ok(self.items.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
        keyboard: Option<Keyboard>,
    },
    Photo {
        chat_id: ChatId,
        url: String,
        caption: String,
    },
}

/// Records every outbound attempt, including the ones it is told to fail.
#[derive(Default)]
pub struct RecordingSink {
    pub fail_texts: bool,
    pub fail_photos: bool,
    pub sent: Mutex<Vec<Sent>>,
    pub acks: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn failing_photos() -> Self {
        Self {
            fail_photos: true,
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn acks(&self) -> Vec<String> {
        self.acks.lock().unwrap().clone()
    }

    fn rejected() -> ChatError {
        ChatError::Api {
            code: 400,
            description: "Bad Request: wrong file identifier/HTTP URL specified".into(),
        }
    }
}

#[async_trait]
impl ChatSink for RecordingSink {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), ChatError> {
        self.sent.lock().unwrap().push(Sent::Text {
            chat_id,
            text: text.into(),
            keyboard: keyboard.cloned(),
        });
        if self.fail_texts { Err(Self::rejected()) } else { Ok(()) }
    }

    async fn send_photo(&self, chat_id: ChatId, url: &str, caption: &str) -> Result<(), ChatError> {
        self.sent.lock().unwrap().push(Sent::Photo {
            chat_id,
            url: url.into(),
            caption: caption.into(),
        });
        if self.fail_photos { Err(Self::rejected()) } else { Ok(()) }
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), ChatError> {
        self.acks.lock().unwrap().push(callback_id.into());
        Ok(())
    }
}
