//! The single serialization point for a table.
//!
//! Every submission takes the controller lock, is validated and applied to
//! the live [`GameData`], and the resulting per-seat snapshots are published
//! on watch channels before the lock is released. Subscribers therefore never
//! observe a half-applied action, and two racing submissions for the same
//! turn resolve to exactly one success.

use crate::action::{Action, ActionValidationCode, Executable};
use crate::engine::{GameEngine, Notifier, TurnSource};
use crate::game::{GameData, GameState};
use crate::replay::ReplayLog;
use crate::rules::GameRules;
use crate::seat::{PlayerId, PlayerPosition};
use crate::view::RestrictedView;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ControllerError {
    #[error("all four seats are taken")]
    TableFull,
    #[error("seat {0} is already taken")]
    SeatTaken(PlayerPosition),
    #[error("player {0} is not subscribed")]
    UnknownPlayer(PlayerId),
}

/// A subscribed seat: its identity plus a stream of fresh views.
#[derive(Debug, Clone)]
pub struct SeatHandle {
    id: PlayerId,
    position: PlayerPosition,
    updates: watch::Receiver<Arc<RestrictedView>>,
}

impl SeatHandle {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn position(&self) -> PlayerPosition {
        self.position
    }

    /// The most recently published view for this seat.
    pub fn latest(&self) -> Arc<RestrictedView> {
        self.updates.borrow().clone()
    }

    pub fn updates(&mut self) -> &mut watch::Receiver<Arc<RestrictedView>> {
        &mut self.updates
    }
}

struct Subscription {
    id: PlayerId,
    sender: watch::Sender<Arc<RestrictedView>>,
}

struct Inner {
    game: GameData,
    seats: [Option<Subscription>; 4],
    next_id: u64,
    completed: Vec<ReplayLog>,
    wins: [u32; 4],
}

impl Inner {
    fn publish(&self) {
        for (idx, sub) in self.seats.iter().enumerate() {
            if let Some(sub) = sub {
                let view = RestrictedView::project(&self.game, PlayerPosition::from_index(idx));
                sub.sender.send_replace(Arc::new(view));
            }
        }
    }

    /// Archive the finished game and deal the next one.
    fn restart(&mut self) {
        if let Some(result) = self.game.result() {
            for p in result.winners() {
                self.wins[p.index()] += 1;
            }
        }
        self.completed.push(ReplayLog::from_game(&self.game));
        self.game = self.game.next_game();
        info!(game_no = self.game.game_no(), dealer = %self.game.dealer(), "next game started");
    }
}

/// Owns the authoritative game and the seat subscriptions.
pub struct Controller {
    inner: Mutex<Inner>,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("Controller")
            .field("game_no", &inner.game.game_no())
            .field("state", &inner.game.state())
            .field("turn", &inner.game.turn())
            .finish()
    }
}

impl Controller {
    /// A table whose first dealer is `Right`, so `Bottom` opens the first game.
    pub fn new(rules: GameRules, table_seed: u64) -> Self {
        Self::with_game(GameData::new(rules, PlayerPosition::Right, table_seed, 0))
    }

    pub fn with_game(game: GameData) -> Self {
        Self {
            inner: Mutex::new(Inner {
                game,
                seats: [None, None, None, None],
                next_id: 1,
                completed: Vec::new(),
                wins: [0; 4],
            }),
        }
    }

    /// Take a seat (the given one, or the first free one).
    pub fn subscribe_player(
        &self,
        position: Option<PlayerPosition>,
    ) -> Result<SeatHandle, ControllerError> {
        let mut inner = self.inner.lock();
        let position = match position {
            Some(p) if inner.seats[p.index()].is_some() => {
                return Err(ControllerError::SeatTaken(p))
            }
            Some(p) => p,
            None => PlayerPosition::ALL
                .into_iter()
                .find(|p| inner.seats[p.index()].is_none())
                .ok_or(ControllerError::TableFull)?,
        };
        let id = PlayerId::new(inner.next_id);
        inner.next_id += 1;
        let (sender, updates) =
            watch::channel(Arc::new(RestrictedView::project(&inner.game, position)));
        inner.seats[position.index()] = Some(Subscription { id, sender });
        info!(player = %id, seat = %position, "player subscribed");
        Ok(SeatHandle { id, position, updates })
    }

    /// Free the seat held by `id`.
    pub fn unsubscribe(&self, id: PlayerId) -> Result<PlayerPosition, ControllerError> {
        let mut inner = self.inner.lock();
        let idx = inner
            .seats
            .iter()
            .position(|s| s.as_ref().is_some_and(|s| s.id == id))
            .ok_or(ControllerError::UnknownPlayer(id))?;
        inner.seats[idx] = None;
        let position = PlayerPosition::from_index(idx);
        info!(player = %id, seat = %position, "player left");
        Ok(position)
    }

    /// Number of actions applied to the current game.
    pub fn history_len(&self) -> usize {
        self.inner.lock().game.history().len()
    }

    /// Replay log of the current game so far.
    pub fn replay_log(&self) -> ReplayLog {
        ReplayLog::from_game(&self.inner.lock().game)
    }

    /// Logs of every game that was restarted past.
    pub fn completed_games(&self) -> Vec<ReplayLog> {
        self.inner.lock().completed.clone()
    }

    /// Number of games restarted past so far.
    pub fn games_played(&self) -> usize {
        self.inner.lock().completed.len()
    }

    /// Games won per seat, counted when a finished game is restarted.
    pub fn wins(&self) -> [u32; 4] {
        self.inner.lock().wins
    }

    /// A full-access copy of the live game.
    pub fn snapshot(&self) -> GameData {
        self.inner.lock().game.clone()
    }

    /// Run `f` against the live game under the lock.
    pub fn with_game_data<R>(&self, f: impl FnOnce(&GameData) -> R) -> R {
        f(&self.inner.lock().game)
    }
}

impl TurnSource for Controller {
    fn state(&self) -> GameState {
        self.inner.lock().game.state()
    }

    fn turn(&self) -> Option<PlayerPosition> {
        self.inner.lock().game.turn()
    }

    fn view(&self, pos: PlayerPosition) -> RestrictedView {
        RestrictedView::project(&self.inner.lock().game, pos)
    }
}

impl Notifier for Controller {
    fn notify(&self) {
        self.inner.lock().publish();
    }
}

impl GameEngine for Controller {
    fn submit(&self, action: Action) -> ActionValidationCode {
        let mut inner = self.inner.lock();
        let seated = inner.seats[action.position().index()]
            .as_ref()
            .is_some_and(|s| s.id == action.player());
        if !seated {
            warn!(player = %action.player(), seat = %action.position(), "submission from unseated player");
            return ActionValidationCode::UnknownPlayer;
        }
        let code = action.execute(&mut inner.game);
        if !code.is_success() {
            return code;
        }
        debug!(seat = %action.position(), action = %action.kind(), "action applied");
        if inner.game.state() == GameState::Finished && inner.game.all_accepting() {
            inner.restart();
        }
        inner.publish();
        code
    }
}
