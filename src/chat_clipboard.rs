//! Copy targets inside a chat. Telegram clients copy `<code>` spans with a
//! single tap, so that is tried first; a plain message is the fallback.

use async_trait::async_trait;
use teloxide::{prelude::*, types::ParseMode, utils::html::escape};

use crate::share::clipboard::{ClipboardError, ClipboardProvider};

pub struct TapToCopy {
    pub bot: Bot,
    pub chat_id: ChatId,
}

#[async_trait]
impl ClipboardProvider for TapToCopy {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.bot
            .send_message(self.chat_id, format!("<code>{}</code>", escape(text)))
            .parse_mode(ParseMode::Html)
            .disable_web_page_preview(true)
            .await
            .map_err(|err| ClipboardError::Rejected(err.to_string()))?;
        Ok(())
    }
}

pub struct PlainText {
    pub bot: Bot,
    pub chat_id: ChatId,
}

#[async_trait]
impl ClipboardProvider for PlainText {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.bot
            .send_message(self.chat_id, text)
            .await
            .map_err(|err| ClipboardError::Unavailable(err.to_string()))?;
        Ok(())
    }
}
