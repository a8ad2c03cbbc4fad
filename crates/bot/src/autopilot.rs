use crate::error::BotError;
use crate::telegram::TelegramApi;
use crate::BotState;
use catalog_client::{CatalogClient, DEFAULT_CATEGORY};
use configuration::AutopilotConfig;
use core_types::Mode;
use publisher::MediaPublisher;
use std::sync::Arc;
use tokio::time::{interval, Duration};

/// The periodic promotion task.
///
/// Runs in a background tokio task. Each tick, when the bot is in autonomous
/// mode, it searches the catalog and publishes the top-ranked result to the
/// media account, then notifies the configured chat. Cycles run one at a
/// time within the single task, so runs never overlap.
pub struct Autopilot {
    catalog: Arc<CatalogClient>,
    publisher: Arc<MediaPublisher>,
    telegram: Arc<TelegramApi>,
    state: Arc<BotState>,
    config: AutopilotConfig,
    chat_id: String,
}

impl Autopilot {
    pub fn new(
        catalog: Arc<CatalogClient>,
        publisher: Arc<MediaPublisher>,
        telegram: Arc<TelegramApi>,
        state: Arc<BotState>,
        config: AutopilotConfig,
        chat_id: String,
    ) -> Self {
        Self {
            catalog,
            publisher,
            telegram,
            state,
            config,
            chat_id,
        }
    }

    /// One search-and-publish cycle. Skips silently in manual mode.
    pub async fn run_cycle(&self) -> Result<(), BotError> {
        if self.state.mode().await != Mode::Autonomous {
            return Ok(());
        }

        let products = self
            .catalog
            .search(&self.config.keywords, DEFAULT_CATEGORY)
            .await?;
        let Some(top) = products.first() else {
            tracing::info!(keywords = %self.config.keywords, "autopilot found no products to promote");
            return Ok(());
        };

        let result = self.publisher.publish(top).await;
        if result.succeeded {
            tracing::info!(product = %top.name, "autopilot published promotion");
            let note = format!("Posted a promotion for {}.", top.name);
            if let Err(e) = self.telegram.send_message(&self.chat_id, &note).await {
                tracing::error!(error = %e, "failed to notify chat about published promotion");
            }
        } else if let Some(staging_id) = &result.staging_id {
            // Staged but never published; the identifier is the handle for
            // manual remediation on the media account.
            tracing::warn!(product = %top.name, %staging_id, "promotion staged but not published");
        } else {
            tracing::warn!(product = %top.name, "promotion could not be staged");
        }

        Ok(())
    }

    /// Runs the fixed-interval loop forever. Errors are logged, never fatal.
    pub async fn start(self) {
        tracing::info!(
            interval_secs = self.config.interval_secs,
            "autopilot task started"
        );
        let mut timer = interval(Duration::from_secs(self.config.interval_secs));

        loop {
            timer.tick().await;

            if let Err(e) = self.run_cycle().await {
                tracing::error!(error = %e, "autopilot cycle failed");
            }
        }
    }
}
