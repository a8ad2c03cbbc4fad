use crate::error::ConfigError;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub catalog: CatalogConfig,
    pub media: MediaConfig,
    pub telegram: TelegramConfig,
    pub autopilot: AutopilotConfig,
}

/// Credentials and endpoint for the affiliate catalog API.
///
/// The keys and tag are opaque to the rest of the system: they are passed
/// into the request signer and never logged or persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Host of the catalog web service (e.g. "webservices.amazon.com").
    pub host: String,
    /// Request path on that host (e.g. "/onca/xml").
    pub path: String,
    pub access_key: String,
    pub secret_key: String,
    /// The affiliate/associate tag credited on generated links.
    pub associate_tag: String,
}

impl CatalogConfig {
    /// The full endpoint URL the signed query string is appended to.
    pub fn endpoint(&self) -> String {
        format!("https://{}{}", self.host, self.path)
    }
}

/// Credentials for the two-phase media publish API.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaConfig {
    /// Base URL of the graph API (e.g. "https://graph.facebook.com/v12.0").
    pub graph_base_url: String,
    /// The media account the bot posts on behalf of.
    pub user_id: String,
    pub access_token: String,
}

/// Credentials for the Telegram Bot API.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub token: String,
    /// Chat that receives autopilot notifications.
    pub chat_id: String,
}

/// Parameters for the periodic autonomous-posting task.
#[derive(Debug, Clone, Deserialize)]
pub struct AutopilotConfig {
    /// Seconds between autopilot cycles.
    pub interval_secs: u64,
    /// Keywords searched each cycle.
    pub keywords: String,
}

impl Settings {
    /// Rejects configurations that would only fail later at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.host.is_empty() || self.catalog.path.is_empty() {
            return Err(ConfigError::ValidationError(
                "catalog.host and catalog.path must be set".to_string(),
            ));
        }
        if self.autopilot.interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "autopilot.interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
