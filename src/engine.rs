// Capability boundary between the authoritative game and whatever drives it.
// Agents, the seat tasks and the TUI only need these traits, never the
// controller's internals.

use crate::action::{Action, ActionValidationCode};
use crate::game::{GameData, GameState};
use crate::seat::PlayerPosition;
use crate::view::RestrictedView;

/// Read side: the phase, whose turn it is, and per-seat snapshots.
pub trait TurnSource {
    fn state(&self) -> GameState;
    fn turn(&self) -> Option<PlayerPosition>;
    fn view(&self, pos: PlayerPosition) -> RestrictedView;
}

/// Pushes fresh snapshots to every subscribed seat.
pub trait Notifier {
    fn notify(&self);
}

/// The single mutation entry point.
pub trait GameEngine: TurnSource {
    fn submit(&self, action: Action) -> ActionValidationCode;
}

impl TurnSource for GameData {
    fn state(&self) -> GameState {
        GameData::state(self)
    }
    fn turn(&self) -> Option<PlayerPosition> {
        GameData::turn(self)
    }
    fn view(&self, pos: PlayerPosition) -> RestrictedView {
        RestrictedView::project(self, pos)
    }
}
