//! Chat-command listener worker.
//!
//! Long-polls the Bot API for updates and answers a small command set, but
//! only for the configured chat. With privacy mode on, traffic from other
//! chats is dropped without logging identifiers.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::config::WorkersConfig;
use crate::store::book::Book;
use crate::store::settings::ForwarderSettings;
use crate::system::battery;
use crate::telegram::{BotClient, Update};
use crate::workers::Worker;

const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

pub struct ChatCommandListener {
    book: Arc<Book>,
    config: WorkersConfig,
    api_base: String,
}

impl ChatCommandListener {
    pub fn new(book: Arc<Book>, config: WorkersConfig, api_base: String) -> Self {
        Self { book, config, api_base }
    }

    async fn handle_update(&self, client: &BotClient, settings: &ForwarderSettings, update: &Update) {
        let Some(message) = &update.message else {
            return;
        };
        let chat_id = message.chat.id.to_string();
        if chat_id != settings.chat_id {
            if settings.privacy_mode {
                debug!("update from unconfigured chat dropped");
            } else {
                debug!(chat_id = %chat_id, "update from unconfigured chat dropped");
            }
            return;
        }
        let Some(text) = message.text.as_deref() else {
            return;
        };

        let reply = match text.trim() {
            "/ping" => Some("pong".to_string()),
            "/status" => Some(match battery::read_battery().and_then(|r| r.percent()) {
                Some(percent) => format!("Battery: {percent}%"),
                None => "Battery: unavailable".to_string(),
            }),
            other => {
                debug!(command = other, "unrecognized chat command ignored");
                None
            }
        };

        if let Some(reply) = reply {
            info!(command = text, "chat command answered");
            if let Err(e) = client.send_message(&settings.chat_id, &reply).await {
                warn!(error = %e, "chat command reply not delivered");
            }
        }
    }
}

#[async_trait]
impl Worker for ChatCommandListener {
    fn name(&self) -> &'static str {
        super::CHAT_COMMAND
    }

    async fn run(&self, mut stop: watch::Receiver<bool>) {
        let settings = ForwarderSettings::load(&self.book);
        if settings.bot_token.is_empty() {
            info!("chat-command listener idle: no bot token configured");
            while stop.changed().await.is_ok() {
                if *stop.borrow() {
                    break;
                }
            }
            return;
        }

        let client = match BotClient::new(&self.api_base, &settings.bot_token) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "chat-command listener not started");
                return;
            }
        };

        let poll_timeout = self.config.chat_poll_timeout_secs;
        let mut offset = 0i64;

        loop {
            tokio::select! {
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
                polled = client.get_updates(offset, poll_timeout) => {
                    match polled {
                        Ok(updates) => {
                            for update in &updates {
                                offset = offset.max(update.update_id + 1);
                                self.handle_update(&client, &settings, update).await;
                            }
                        }
                        Err(e) => {
                            warn!(error = %e, "getUpdates poll failed, backing off");
                            sleep(POLL_ERROR_BACKOFF).await;
                        }
                    }
                }
            }
        }
        debug!("chat-command listener wound down");
    }
}
