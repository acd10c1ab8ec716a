//! Minimal Telegram Bot API client.
//!
//! Covers exactly what the workers need: `getMe`, `sendMessage`, and
//! `getUpdates` long-polling. Errors are typed and propagated; callers decide
//! whether to log and continue.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum TelegramError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid api base: {0}")]
    BadBase(#[from] url::ParseError),
    #[error("api error: {0}")]
    Api(String),
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Chat {
    pub id: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Message {
    pub chat: Chat,
    pub from: Option<User>,
    pub text: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

pub struct BotClient {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl BotClient {
    pub fn new(api_base: &str, token: &str) -> Result<Self, TelegramError> {
        // Url::join treats a base without a trailing slash as a file path
        // and would drop the last segment.
        let normalized = if api_base.ends_with('/') {
            api_base.to_string()
        } else {
            format!("{api_base}/")
        };
        Ok(Self {
            http: reqwest::Client::new(),
            base: Url::parse(&normalized)?,
            token: token.to_string(),
        })
    }

    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &json!({}), Duration::from_secs(10)).await
    }

    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<Message, TelegramError> {
        self.call(
            "sendMessage",
            &json!({ "chat_id": chat_id, "text": text }),
            Duration::from_secs(10),
        )
        .await
    }

    /// Long-poll for updates. The HTTP timeout is padded past the server-side
    /// poll timeout so the request is not cut off mid-poll.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &json!({ "offset": offset, "timeout": timeout_secs }),
            Duration::from_secs(timeout_secs + 10),
        )
        .await
    }

    fn method_url(&self, method: &str) -> Result<Url, TelegramError> {
        Ok(self.base.join(&format!("bot{}/{}", self.token, method))?)
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: &serde_json::Value,
        timeout: Duration,
    ) -> Result<T, TelegramError> {
        let response: ApiResponse<T> = self
            .http
            .post(self.method_url(method)?)
            .timeout(timeout)
            .json(params)
            .send()
            .await?
            .json()
            .await?;

        match (response.ok, response.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TelegramError::Api(
                response
                    .description
                    .unwrap_or_else(|| "unknown api error".to_string()),
            )),
        }
    }
}
