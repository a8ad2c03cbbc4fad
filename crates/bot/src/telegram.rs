use crate::error::BotError;
use configuration::TelegramConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How long the server may hold a `getUpdates` call open.
const LONG_POLL_SECS: u64 = 30;

/// The JSON payload for the Telegram `sendMessage` endpoint.
#[derive(Debug, Serialize)]
struct SendMessagePayload<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A client for the Telegram Bot API: long-polled updates in, replies out.
pub struct TelegramApi {
    client: Client,
    token: String,
}

impl TelegramApi {
    pub fn new(config: &TelegramConfig) -> Result<Self, BotError> {
        // Read timeout must outlast the long-poll hold.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(LONG_POLL_SECS + 10))
            .build()?;
        Ok(Self {
            client,
            token: config.token.clone(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{}", self.token, method)
    }

    /// Fetches the next batch of updates at or after `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, BotError> {
        let envelope = self
            .client
            .get(self.url("getUpdates"))
            .query(&[
                ("offset", offset.to_string()),
                ("timeout", LONG_POLL_SECS.to_string()),
            ])
            .send()
            .await?
            .json::<ApiEnvelope<Vec<Update>>>()
            .await?;

        if !envelope.ok {
            return Err(BotError::Api(
                envelope
                    .description
                    .unwrap_or_else(|| "getUpdates rejected".to_string()),
            ));
        }
        Ok(envelope.result.unwrap_or_default())
    }

    /// Sends a plain-text message to a chat.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), BotError> {
        let payload = SendMessagePayload { chat_id, text };

        let response = self
            .client
            .post(self.url("sendMessage"))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to decode error response".to_string());
            return Err(BotError::Api(error_text));
        }

        Ok(())
    }
}
