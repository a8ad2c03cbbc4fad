use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AutopilotConfig, CatalogConfig, MediaConfig, Settings, TelegramConfig,
};

/// Loads the application configuration from `config.toml`, with environment
/// overrides.
///
/// Environment variables use the `PROMOBOT` prefix and `__` as the section
/// separator, e.g. `PROMOBOT__CATALOG__SECRET_KEY` overrides
/// `catalog.secret_key`. Secrets are normally supplied this way so the file
/// on disk never has to contain them.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml"))
        .add_source(
            config::Environment::with_prefix("PROMOBOT")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
