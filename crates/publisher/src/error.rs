use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublisherError {
    #[error("Media API request failed: {0}")]
    Request(#[from] reqwest::Error),
}
