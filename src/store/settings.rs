//! The relay configuration document and its typed store accessors.
//!
//! Field names on the wire are camelCase to match the web UI. Two default
//! policies apply and they are intentionally different:
//!
//! - Reading from the store: each field falls back to its documented default
//!   (`verificationCode` is true, everything else false/empty).
//! - Deserializing a save request: an absent or wrongly-typed boolean is
//!   `false`, an absent or wrongly-typed string is `""`. Per-field coercion
//!   never aborts the whole save.

use serde::{Deserialize, Deserializer, Serialize};

use crate::store::book::Book;

/// Storage keys, flat within the book.
mod keys {
    pub const BOT_TOKEN: &str = "bot_token";
    pub const CHAT_ID: &str = "chat_id";
    pub const TRUSTED_NUMBER: &str = "trusted_number";
    pub const CHAT_COMMAND: &str = "chat_command";
    pub const BATTERY_MONITORING: &str = "battery_monitoring";
    pub const CHARGER_STATUS: &str = "charger_status";
    pub const FALLBACK_SMS: &str = "fallback_sms";
    pub const VERIFICATION_CODE: &str = "verification_code";
    pub const PRIVACY_MODE: &str = "privacy_mode";
    pub const DOH_SWITCH: &str = "doh_switch";
    pub const INITIALIZED: &str = "initialized";
}

/// The full configuration document exposed over `/api/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwarderSettings {
    #[serde(default, deserialize_with = "lenient_string")]
    pub bot_token: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub chat_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub trusted_number: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub chat_command: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub battery_monitoring: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub charger_status: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub fallback_sms: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub verification_code: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub privacy_mode: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub doh_switch: bool,
}

impl Default for ForwarderSettings {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            trusted_number: String::new(),
            chat_command: false,
            battery_monitoring: false,
            charger_status: false,
            fallback_sms: false,
            verification_code: true,
            privacy_mode: false,
            doh_switch: false,
        }
    }
}

impl ForwarderSettings {
    /// Read the document from the store, applying per-field defaults.
    pub fn load(book: &Book) -> Self {
        Self {
            bot_token: book.read(keys::BOT_TOKEN, String::new()),
            chat_id: book.read(keys::CHAT_ID, String::new()),
            trusted_number: book.read(keys::TRUSTED_NUMBER, String::new()),
            chat_command: book.read(keys::CHAT_COMMAND, false),
            battery_monitoring: book.read(keys::BATTERY_MONITORING, false),
            charger_status: book.read(keys::CHARGER_STATUS, false),
            fallback_sms: book.read(keys::FALLBACK_SMS, false),
            verification_code: book.read(keys::VERIFICATION_CODE, true),
            privacy_mode: book.read(keys::PRIVACY_MODE, false),
            doh_switch: book.read(keys::DOH_SWITCH, false),
        }
    }

    /// Write the full document plus `initialized = true` as one batch, so a
    /// concurrent save cannot observe a half-written document.
    pub fn save(&self, book: &Book) {
        let mut batch = book.batch();
        batch.put(keys::BOT_TOKEN, &self.bot_token);
        batch.put(keys::CHAT_ID, &self.chat_id);
        batch.put(keys::TRUSTED_NUMBER, &self.trusted_number);
        batch.put(keys::CHAT_COMMAND, &self.chat_command);
        batch.put(keys::BATTERY_MONITORING, &self.battery_monitoring);
        batch.put(keys::CHARGER_STATUS, &self.charger_status);
        batch.put(keys::FALLBACK_SMS, &self.fallback_sms);
        batch.put(keys::VERIFICATION_CODE, &self.verification_code);
        batch.put(keys::PRIVACY_MODE, &self.privacy_mode);
        batch.put(keys::DOH_SWITCH, &self.doh_switch);
        batch.put(keys::INITIALIZED, &true);
        batch.commit();
    }
}

/// True once the first successful save has happened.
pub fn initialized(book: &Book) -> bool {
    book.read(keys::INITIALIZED, false)
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_bool().unwrap_or(false))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_owned).unwrap_or_default())
}
