use serde::{Deserialize, Serialize};

/// Whether the bot posts promotions on its own schedule or only on command.
///
/// Held in an explicit shared state object owned by the bot crate, never in
/// a process-wide global, so concurrent command handling stays race-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    Autonomous,
    Manual,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Autonomous => "autonomous",
            Mode::Manual => "manual",
        }
    }
}
