//! Battery monitor worker.
//!
//! Samples the battery on an interval and forwards noteworthy transitions to
//! the configured chat: a low-battery crossing, and charger plug/unplug when
//! the charger-status flag is set. Without a bot token the events are logged
//! locally instead of sent.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::WorkersConfig;
use crate::store::book::Book;
use crate::store::settings::ForwarderSettings;
use crate::system::battery;
use crate::telegram::BotClient;
use crate::workers::Worker;

pub struct BatteryMonitor {
    book: Arc<Book>,
    config: WorkersConfig,
    api_base: String,
}

impl BatteryMonitor {
    pub fn new(book: Arc<Book>, config: WorkersConfig, api_base: String) -> Self {
        Self { book, config, api_base }
    }

    async fn notify(&self, client: Option<&BotClient>, chat_id: &str, text: &str) {
        match client {
            Some(client) => {
                if let Err(e) = client.send_message(chat_id, text).await {
                    warn!(error = %e, "battery notification not delivered");
                }
            }
            None => info!(event = text, "battery event (no bot token configured)"),
        }
    }
}

#[async_trait]
impl Worker for BatteryMonitor {
    fn name(&self) -> &'static str {
        super::BATTERY_MONITOR
    }

    async fn run(&self, mut stop: watch::Receiver<bool>) {
        // Settings are read once: a configuration change restarts this worker
        // through the supervisor.
        let settings = ForwarderSettings::load(&self.book);
        let client = if settings.bot_token.is_empty() {
            None
        } else {
            match BotClient::new(&self.api_base, &settings.bot_token) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(error = %e, "bot client unavailable, logging battery events instead");
                    None
                }
            }
        };

        let mut ticker = interval(Duration::from_secs(self.config.battery_poll_secs.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut charger_was_online = battery::charger_online();
        let mut low_notified = false;
        let threshold = self.config.low_battery_percent;

        loop {
            tokio::select! {
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let percent = battery::read_battery().and_then(|r| r.percent());

                    if let Some(percent) = percent {
                        debug!(percent, "battery sampled");
                        if percent <= threshold && !low_notified {
                            low_notified = true;
                            self.notify(
                                client.as_ref(),
                                &settings.chat_id,
                                &format!("Battery low: {percent}%"),
                            )
                            .await;
                        } else if percent > threshold.saturating_add(5) {
                            // Hysteresis so a level bouncing on the threshold
                            // does not spam notifications.
                            low_notified = false;
                        }
                    }

                    if settings.charger_status {
                        let charger_online = battery::charger_online();
                        if charger_online != charger_was_online {
                            if let Some(online) = charger_online {
                                let text = if online {
                                    "Charger connected"
                                } else {
                                    "Charger disconnected"
                                };
                                self.notify(client.as_ref(), &settings.chat_id, text).await;
                            }
                            charger_was_online = charger_online;
                        }
                    }
                }
            }
        }
        debug!("battery monitor wound down");
    }
}
