use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read settings from config.toml or the environment: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Rejected settings: {0}")]
    ValidationError(String),
}
