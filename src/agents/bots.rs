use crate::action::{ActionKind, ActionValidationCode};
use crate::game::GameState;
use crate::rules::GameType;
use crate::view::RestrictedView;
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::general::{GeneralAi, HeuristicGeneralAi};
use super::strategies::{SpecializedAi, StrategyRegistry};
use super::{AgentKind, PlayerAgent};

/// Difficulty tiers for bot play style and mistake rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentError {
    #[error("strategy registry has no strategies")]
    EmptyRegistry,
}

/// Configuration for a bot's play style and randomness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct BotProfile {
    pub difficulty: Difficulty,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub rng_seed: Option<u64>,
    /// Phase from which the bot agrees to the next game; `None` agrees at any time.
    pub accept_at: Option<GameState>,
}

impl BotProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self { difficulty, min_delay_ms: 0, max_delay_ms: 0, rng_seed: None, accept_at: Some(GameState::Finished) }
    }

    /// Set a deterministic RNG seed for reproducible decisions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_delay_ms(mut self, min: u64, max: u64) -> Self {
        self.min_delay_ms = min;
        self.max_delay_ms = max;
        self
    }

    pub fn with_accept_at(mut self, accept_at: Option<GameState>) -> Self {
        self.accept_at = accept_at;
        self
    }

    /// Chance of playing a random legal card instead of the strategy's pick.
    fn mistake_rate(&self) -> f64 {
        match self.difficulty {
            Difficulty::Easy => 0.25,
            Difficulty::Medium => 0.1,
            Difficulty::Hard => 0.04,
            Difficulty::Expert => 0.0,
        }
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::Medium)
    }
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(v) => StdRng::seed_from_u64(v),
        None => {
            let mut seed = [0u8; 32];
            rand::rng().fill_bytes(&mut seed);
            StdRng::from_seed(seed)
        }
    }
}

/// The specialized strategy currently bound, and what it was bound for.
struct Binding {
    key: Option<(u32, Option<GameType>)>,
    strategy: Option<Box<dyn SpecializedAi>>,
}

impl Binding {
    /// Re-resolve only when the bound game (or its type) changed.
    fn refresh(&mut self, registry: &StrategyRegistry, view: &RestrictedView) -> bool {
        let key = (view.game_no, view.game_type);
        if self.key == Some(key) {
            return false;
        }
        self.strategy = registry.resolve(view.game_type);
        self.key = Some(key);
        true
    }
}

/// Autonomous player: a general AI for game-independent choices plus a
/// specialized strategy resolved per game type.
pub struct AiAgent {
    general: Box<dyn GeneralAi>,
    registry: Arc<StrategyRegistry>,
    binding: Binding,
    resolutions: usize,
    profile: BotProfile,
    rng: StdRng,
    next_action_at: Option<Instant>,
}

impl std::fmt::Debug for AiAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiAgent")
            .field("profile", &self.profile)
            .field("registry", &self.registry)
            .field("resolutions", &self.resolutions)
            .finish()
    }
}

impl AiAgent {
    pub fn try_new(
        general: Box<dyn GeneralAi>,
        registry: Arc<StrategyRegistry>,
        profile: BotProfile,
    ) -> Result<Self, AgentError> {
        if registry.is_empty() {
            return Err(AgentError::EmptyRegistry);
        }
        let rng = seeded(profile.rng_seed);
        Ok(Self {
            general,
            registry,
            binding: Binding { key: None, strategy: None },
            resolutions: 0,
            profile,
            rng,
            next_action_at: None,
        })
    }

    /// A bot with the heuristic general AI and the standard strategies.
    pub fn standard(profile: BotProfile) -> Self {
        let mut rng = seeded(profile.rng_seed);
        let general = HeuristicGeneralAi::new(
            profile.difficulty,
            profile.accept_at,
            StdRng::seed_from_u64(rng.next_u64()),
        );
        Self {
            general: Box::new(general),
            registry: Arc::new(StrategyRegistry::standard()),
            binding: Binding { key: None, strategy: None },
            resolutions: 0,
            profile,
            rng,
            next_action_at: None,
        }
    }

    /// How many times the specialized strategy was looked up.
    pub fn resolutions(&self) -> usize {
        self.resolutions
    }

    fn specialized(&mut self, view: &RestrictedView) -> Option<&mut Box<dyn SpecializedAi>> {
        if self.binding.refresh(&self.registry, view) {
            self.resolutions += 1;
        }
        self.binding.strategy.as_mut()
    }

    /// Best card for the seat, or `None` when no strategy is bound.
    pub fn best_card(&mut self, view: &RestrictedView) -> Option<crate::cards::Card> {
        let mistake = self.profile.mistake_rate();
        let pick = self.specialized(view)?.best_card(view);
        if pick.is_some() && mistake > 0.0 && self.rng.random_bool(mistake) {
            let legal = view.legal_plays();
            if !legal.is_empty() {
                return Some(legal[self.rng.random_range(0..legal.len())]);
            }
        }
        pick
    }

    pub fn strike(&mut self, view: &RestrictedView) -> bool {
        self.specialized(view).is_some_and(|s| s.strike(view))
    }

    pub fn strike_back(&mut self, view: &RestrictedView) -> bool {
        self.specialized(view).is_some_and(|s| s.strike_back(view))
    }

    /// Wait out a randomized thinking delay; true once the bot may act.
    fn ready(&mut self) -> bool {
        let min = self.profile.min_delay_ms;
        let max = self.profile.max_delay_ms.max(min);
        if max == 0 {
            return true;
        }
        let now = Instant::now();
        match self.next_action_at {
            None => {
                let delay = if max == min { min } else { self.rng.random_range(min..=max) };
                self.next_action_at = Some(now + Duration::from_millis(delay));
                false
            }
            Some(next) if now < next => false,
            Some(_) => {
                self.next_action_at = None;
                true
            }
        }
    }
}

impl PlayerAgent for AiAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }

    fn decide(&mut self, view: &RestrictedView) -> Option<ActionKind> {
        if view.state == GameState::Finished {
            if view.is_accepting(view.me) || !self.general.accept_restart(view) {
                return None;
            }
            return Some(ActionKind::StartNextGame);
        }
        if !view.is_my_turn() || !self.ready() {
            return None;
        }
        let intent = match view.state {
            GameState::ChoosingGame => ActionKind::ChooseGame(self.general.best_game(view)),
            GameState::Raising => ActionKind::Raise(self.general.raise(view)),
            GameState::Striking => ActionKind::Strike(self.strike(view)),
            GameState::StrikingBack => ActionKind::StrikeBack(self.strike_back(view)),
            GameState::Playing => ActionKind::PlayCard(self.best_card(view)?),
            GameState::Finished => return None,
        };
        trace!(seat = %view.me, %intent, "bot decided");
        Some(intent)
    }

    fn rejected(&mut self, intent: ActionKind, code: ActionValidationCode) {
        debug!(%intent, ?code, "bot intent rejected; forcing strategy refresh");
        self.binding.key = None;
    }
}
