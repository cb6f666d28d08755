//! Table configuration, persisted as JSON.

use crate::agents::{BotProfile, Difficulty};
use crate::game::GameState;
use crate::rules::GameRules;
use crate::seat::PlayerPosition;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Environment variable naming a settings file to load at startup.
pub const SETTINGS_ENV: &str = "SCHAFKOPF_SETTINGS";

const MAX_BOT_DELAY_MS: u64 = 10_000;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("settings i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings are not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    Human,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatSettings {
    pub kind: SeatKind,
    pub difficulty: Difficulty,
    /// Phase from which a bot agrees to the next game; `None` agrees at any time.
    pub accept_at: Option<GameState>,
}

impl SeatSettings {
    pub fn human() -> Self {
        Self { kind: SeatKind::Human, ..Self::default() }
    }

    pub fn bot(difficulty: Difficulty) -> Self {
        Self { kind: SeatKind::Bot, difficulty, accept_at: Some(GameState::Finished) }
    }
}

impl Default for SeatSettings {
    fn default() -> Self {
        Self::bot(Difficulty::Medium)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub rules: GameRules,
    /// Fixed table seed for reproducible deals; random when absent.
    pub seed: Option<u64>,
    pub bot_delay_ms: u64,
    /// Indexed by `PlayerPosition::index`.
    pub seats: [SeatSettings; 4],
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            rules: GameRules::default(),
            seed: None,
            bot_delay_ms: 400,
            seats: [
                SeatSettings::human(),
                SeatSettings::default(),
                SeatSettings::default(),
                SeatSettings::default(),
            ],
        }
    }
}

impl GameSettings {
    /// Four bots, no delays.
    pub fn all_bots() -> Self {
        Self { bot_delay_ms: 0, seats: std::array::from_fn(|_| SeatSettings::default()), ..Self::default() }
    }

    pub fn from_json(input: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(input)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let settings = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        self.validate()?;
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from the file named by `SCHAFKOPF_SETTINGS`, or fall back to defaults.
    pub fn from_env() -> Result<Self, SettingsError> {
        match std::env::var_os(SETTINGS_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let humans = self.seats.iter().filter(|s| s.kind == SeatKind::Human).count();
        if humans > 1 {
            return Err(SettingsError::Invalid(format!(
                "at most one human seat is supported, found {humans}"
            )));
        }
        if self.rules.raising && self.rules.raise_limit == 0 {
            return Err(SettingsError::Invalid("raising is enabled with a raise limit of 0".into()));
        }
        if self.bot_delay_ms > MAX_BOT_DELAY_MS {
            return Err(SettingsError::Invalid(format!(
                "bot delay {}ms exceeds {MAX_BOT_DELAY_MS}ms",
                self.bot_delay_ms
            )));
        }
        Ok(())
    }

    pub fn human_seat(&self) -> Option<PlayerPosition> {
        PlayerPosition::ALL.into_iter().find(|p| self.seats[p.index()].kind == SeatKind::Human)
    }

    /// The configured seed, or a fresh random one.
    pub fn table_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }

    /// Profile for the bot at `position`, seeded from the table seed when one is fixed.
    pub fn bot_profile(&self, position: PlayerPosition) -> BotProfile {
        let seat = &self.seats[position.index()];
        let profile = BotProfile::for_difficulty(seat.difficulty)
            .with_delay_ms(self.bot_delay_ms / 2, self.bot_delay_ms)
            .with_accept_at(seat.accept_at);
        match self.seed {
            Some(seed) => profile.with_seed(seed ^ (position.index() as u64 + 1)),
            None => profile,
        }
    }
}
