use super::bots::Difficulty;
use crate::cards::Rank;
use crate::game::GameState;
use crate::rules::{GameKind, GameType};
use crate::view::RestrictedView;
use rand::{rngs::StdRng, Rng};

/// Game-independent decisions: restarting, announcing and raising.
pub trait GeneralAi: Send {
    fn accept_restart(&mut self, view: &RestrictedView) -> bool;
    /// Game to announce, or `None` to pass.
    fn best_game(&mut self, view: &RestrictedView) -> Option<GameType>;
    fn raise(&mut self, view: &RestrictedView) -> bool;
}

/// Trump-counting heuristics shared by all bot difficulties.
#[derive(Debug)]
pub struct HeuristicGeneralAi {
    accept_at: Option<GameState>,
    difficulty: Difficulty,
    rng: StdRng,
    accepted: Option<(u32, GameState)>,
}

impl HeuristicGeneralAi {
    pub fn new(difficulty: Difficulty, accept_at: Option<GameState>, rng: StdRng) -> Self {
        Self { accept_at, difficulty, rng, accepted: None }
    }

    /// Trumps needed before a game of this kind is announced.
    fn threshold(&self, kind: GameKind) -> usize {
        let base: usize = match kind {
            GameKind::Call => 4,
            GameKind::Wenz | GameKind::Geier => 3,
            GameKind::Solo => 6,
        };
        match self.difficulty {
            Difficulty::Easy => base.saturating_sub(1),
            Difficulty::Medium | Difficulty::Hard => base,
            Difficulty::Expert => base + usize::from(kind == GameKind::Call),
        }
    }

    fn score(game: GameType, view: &RestrictedView) -> usize {
        let trumps = view.hand.iter().filter(|&&c| game.is_trump(c)).count();
        let aces = view
            .hand
            .iter()
            .filter(|&&c| c.rank() == Rank::Ace && !game.is_trump(c))
            .count();
        trumps * 2 + aces
    }
}

impl GeneralAi for HeuristicGeneralAi {
    fn accept_restart(&mut self, view: &RestrictedView) -> bool {
        let Some(at) = self.accept_at else {
            return true;
        };
        if view.is_accepting(view.me) {
            return false;
        }
        let key = (view.game_no, view.state);
        if self.accepted == Some(key) {
            return false;
        }
        if view.state >= at || view.state == GameState::Finished {
            self.accepted = Some(key);
            return true;
        }
        false
    }

    fn best_game(&mut self, view: &RestrictedView) -> Option<GameType> {
        let candidates = view.legal_games().into_iter().filter(|&g| {
            let trumps = view.hand.iter().filter(|&&c| g.is_trump(c)).count();
            trumps >= self.threshold(g.kind())
        });
        let best = candidates.max_by_key(|&g| (Self::score(g, view), g.kind()));
        // Easy bots sometimes lose their nerve.
        if best.is_some() && self.difficulty == Difficulty::Easy && self.rng.random_bool(0.2) {
            return None;
        }
        best
    }

    fn raise(&mut self, view: &RestrictedView) -> bool {
        if view.raises.contains(&view.me) || view.raises.len() >= usize::from(view.rules.raise_limit) {
            return false;
        }
        let Some(game) = view.game_type else {
            return false;
        };
        let trumps = view.hand.iter().filter(|&&c| game.is_trump(c)).count();
        let needed = match self.difficulty {
            Difficulty::Easy => 7,
            Difficulty::Medium => 6,
            Difficulty::Hard | Difficulty::Expert => 5,
        };
        trumps >= needed
    }
}
