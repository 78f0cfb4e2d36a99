//! Telegram adapter (teloxide).
//!
//! Implements the `logrelay-core` ChatSession over the Telegram Bot API. Group
//! destinations are forum supergroups addressed by chat id + topic thread id; direct
//! destinations are user chat ids.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;

use teloxide::prelude::*;

use logrelay_core::{
    domain::{GroupTarget, RecipientId},
    errors::Error,
    messaging::port::ChatSession,
    Result,
};

/// Telegram's hard limit for one text message, in UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 4096;

pub struct TelegramSession {
    bot: Bot,
    identity: AtomicI64,
    connected: AtomicBool,
}

impl TelegramSession {
    pub fn new(bot: Bot) -> Self {
        Self {
            bot,
            identity: AtomicI64::new(0),
            connected: AtomicBool::new(false),
        }
    }

    pub fn from_token(token: impl Into<String>) -> Self {
        Self::new(Bot::new(token))
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    /// Log on: resolve the bot's own user id and mark the session usable.
    pub async fn connect(&self) -> Result<RecipientId> {
        let me = self.bot.get_me().await.map_err(map_err)?;
        let id = i64::try_from(me.user.id.0)
            .map_err(|_| Error::External(format!("bot id out of range: {}", me.user.id.0)))?;

        self.identity.store(id, Ordering::SeqCst);
        self.connected.store(true, Ordering::SeqCst);
        tracing::info!(bot_id = id, username = ?me.user.username, "telegram session connected");
        Ok(RecipientId(id))
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }
}

fn map_err(e: teloxide::RequestError) -> Error {
    Error::External(format!("telegram error: {e}"))
}

fn truncate(text: &str) -> String {
    let mut units = 0usize;
    for (idx, c) in text.char_indices() {
        units += c.len_utf16();
        if units > MAX_MESSAGE_LEN {
            return text[..idx].to_string();
        }
    }
    text.to_string()
}

#[async_trait]
impl ChatSession for TelegramSession {
    fn identity(&self) -> RecipientId {
        RecipientId(self.identity.load(Ordering::SeqCst))
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn send_group_message(&self, target: GroupTarget, text: &str) -> Result<()> {
        let thread = i32::try_from(target.channel.0)
            .map_err(|_| Error::External(format!("topic id out of range: {}", target.channel.0)))?;

        self.bot
            .send_message(teloxide::types::ChatId(target.group.0), truncate(text))
            .message_thread_id(thread)
            .await
            .map_err(map_err)?;
        Ok(())
    }

    async fn send_direct_message(&self, recipient: RecipientId, text: &str) -> Result<()> {
        self.bot
            .send_message(teloxide::types::ChatId(recipient.0), truncate(text))
            .await
            .map_err(map_err)?;
        Ok(())
    }
}
