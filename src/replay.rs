//! Replayable action stacks.
//!
//! A [`ReplayLog`] captures the deal and every accepted action of one game.
//! Re-executing the steps against a fresh [`GameData`] reproduces the game;
//! a step that no longer validates stops the replay with its code.

use crate::action::{Action, ActionKind, ActionValidationCode, Executable};
use crate::cards::Card;
use crate::game::GameData;
use crate::rules::GameRules;
use crate::seat::{PlayerId, PlayerPosition};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ReplayError {
    #[error("replay i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("replay log is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("step {index} ({position} {kind}) was rejected: {code}")]
    Rejected {
        index: usize,
        position: PlayerPosition,
        kind: ActionKind,
        code: ActionValidationCode,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayStep {
    pub position: PlayerPosition,
    pub kind: ActionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayLog {
    pub rules: GameRules,
    pub table_seed: u64,
    pub game_no: u32,
    pub dealer: PlayerPosition,
    pub hands: [Vec<Card>; 4],
    pub steps: Vec<ReplayStep>,
}

// Replayed actions bypass the controller, so no subscription id is checked.
const REPLAY_PLAYER: PlayerId = PlayerId::new(0);

impl ReplayLog {
    pub fn from_game(game: &GameData) -> Self {
        Self {
            rules: game.rules().clone(),
            table_seed: game.table_seed(),
            game_no: game.game_no(),
            dealer: game.dealer(),
            hands: game.initial_hands().clone(),
            steps: game
                .history()
                .iter()
                .map(|h| ReplayStep { position: h.position, kind: h.kind })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(input: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReplayError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Re-apply every step to a fresh deal.
    pub fn replay(&self) -> Result<GameData, ReplayError> {
        let mut game = GameData::with_hands(
            self.rules.clone(),
            self.dealer,
            self.hands.clone(),
            self.table_seed,
            self.game_no,
        );
        for (index, step) in self.steps.iter().enumerate() {
            let code = Action::new(REPLAY_PLAYER, step.position, step.kind).execute(&mut game);
            if !code.is_success() {
                return Err(ReplayError::Rejected {
                    index,
                    position: step.position,
                    kind: step.kind,
                    code,
                });
            }
        }
        Ok(game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;
    use crate::rules::GameType;

    fn choose(game: &mut GameData, pos: PlayerPosition, kind: ActionKind) {
        let code = Action::new(REPLAY_PLAYER, pos, kind).execute(game);
        assert!(code.is_success(), "{pos} {kind}: {code}");
    }

    #[test]
    fn json_round_trip_and_replay_reproduce_state() {
        let mut game = GameData::new(GameRules::default(), PlayerPosition::Right, 5, 0);
        choose(&mut game, PlayerPosition::Bottom, ActionKind::ChooseGame(Some(GameType::Wenz)));
        for p in PlayerPosition::Bottom.rotation() {
            choose(&mut game, p, ActionKind::Raise(false));
        }
        let log = ReplayLog::from_game(&game);
        let json = log.to_json().unwrap();
        let back = ReplayLog::from_json(&json).unwrap();
        assert_eq!(back, log);

        let replayed = back.replay().unwrap();
        assert_eq!(replayed.state(), GameState::Striking);
        assert_eq!(replayed.history(), game.history());
        assert_eq!(replayed.initial_hands(), game.initial_hands());
    }

    #[test]
    fn tampered_step_is_reported_with_its_code() {
        let game = GameData::new(GameRules::default(), PlayerPosition::Right, 5, 0);
        let mut log = ReplayLog::from_game(&game);
        log.steps.push(ReplayStep { position: PlayerPosition::Top, kind: ActionKind::ChooseGame(None) });
        match log.replay() {
            Err(ReplayError::Rejected { index: 0, code, .. }) => {
                assert_eq!(code, ActionValidationCode::WrongTurn)
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
