//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the daemon.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the relay daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Web configuration server settings.
    pub server: ServerConfig,

    /// Durable key/value storage settings.
    pub storage: StorageConfig,

    /// Background worker settings.
    pub workers: WorkersConfig,

    /// Telegram Bot API settings.
    pub telegram: TelegramConfig,
}

/// Web configuration server settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080"). Loopback/LAN only, plain HTTP.
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Durable key/value storage settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON file per book.
    pub data_dir: PathBuf,

    /// Book (namespace) name for the relay configuration document.
    pub book: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            book: "data".to_string(),
        }
    }
}

/// Background worker settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkersConfig {
    /// Pause between stopping old workers and starting new ones, in
    /// milliseconds. Lets in-flight teardown complete.
    pub settle_ms: u64,

    /// Battery sampling interval in seconds.
    pub battery_poll_secs: u64,

    /// Battery percentage at or below which a low-battery notification is
    /// sent.
    pub low_battery_percent: u8,

    /// Long-poll timeout for the chat-command listener in seconds.
    pub chat_poll_timeout_secs: u64,
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            settle_ms: 500,
            battery_poll_secs: 60,
            low_battery_percent: 20,
            chat_poll_timeout_secs: 25,
        }
    }
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API base URL. Overridable for self-hosted bot API servers.
    pub api_base: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
        }
    }
}
