use crate::commands::Command;
use catalog_client::CatalogClient;
use core_types::Mode;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::{sleep, Duration};

pub mod autopilot;
pub mod commands;
pub mod error;
pub mod telegram;

// --- Public API ---
pub use autopilot::Autopilot;
pub use telegram::{TelegramApi, Update};

/// Shared runtime state, passed explicitly to whoever needs to branch on it.
///
/// An explicit object rather than a process-wide flag so concurrent command
/// handling and the autopilot task cannot race on unsynchronized state.
pub struct BotState {
    mode: RwLock<Mode>,
}

impl BotState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode: RwLock::new(mode),
        }
    }

    pub async fn mode(&self) -> Mode {
        *self.mode.read().await
    }

    pub async fn set_mode(&self, mode: Mode) {
        *self.mode.write().await = mode;
    }
}

impl Default for BotState {
    fn default() -> Self {
        Self::new(Mode::Manual)
    }
}

/// The long-polling command loop.
///
/// Fetches updates, routes each command to the core operations and replies
/// in the originating chat. Update-fetch failures back off briefly and the
/// loop continues; a failed reply is logged and dropped.
pub async fn run_bot(
    telegram: Arc<TelegramApi>,
    catalog: Arc<CatalogClient>,
    state: Arc<BotState>,
) {
    tracing::info!("command loop started");
    let mut offset = 0i64;

    loop {
        let updates = match telegram.get_updates(offset).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch updates");
                sleep(Duration::from_secs(5)).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);

            let Some(message) = update.message else {
                continue;
            };
            let Some(text) = message.text.as_deref() else {
                continue;
            };
            let Some(command) = Command::parse(text) else {
                continue;
            };

            let reply = commands::respond(command, &catalog, &state).await;
            let chat_id = message.chat.id.to_string();
            if let Err(e) = telegram.send_message(&chat_id, &reply).await {
                tracing::error!(error = %e, chat_id = %chat_id, "failed to send reply");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn state_defaults_to_manual() {
        let state = BotState::default();
        assert_eq!(state.mode().await, Mode::Manual);
    }

    #[tokio::test]
    async fn set_mode_is_visible_through_clones_of_the_arc() {
        let state = Arc::new(BotState::default());
        let other = state.clone();

        state.set_mode(Mode::Autonomous).await;
        assert_eq!(other.mode().await, Mode::Autonomous);
    }
}
