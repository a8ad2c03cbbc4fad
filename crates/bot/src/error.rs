use catalog_client::CatalogError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Telegram API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Telegram API returned an error: {0}")]
    Api(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
