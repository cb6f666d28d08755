//! Agents: pluggable players (bots, or humans via a frontend).
//!
//! A `PlayerAgent` turns a seat's `RestrictedView` into an intent. The
//! `AgentTable` binds agents to subscribed seats and drives whichever seat
//! may act, so frontends stay thin and never touch game internals.

use crate::action::{Action, ActionKind, ActionValidationCode};
use crate::engine::GameEngine;
use crate::game::GameState;
use crate::seat::{PlayerId, PlayerPosition};
use crate::view::RestrictedView;
use core::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// Kinds of agents attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentKind {
    Human,
    Bot,
}

/// A seat controller that can act for a player when the view allows it.
pub trait PlayerAgent: Send {
    /// Produce an intent for the seat, or `None` to wait.
    fn decide(&mut self, view: &RestrictedView) -> Option<ActionKind>;
    /// The kind of this agent (human, bot, etc.).
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    /// Optionally receive an intent from a frontend; default is to ignore and return false.
    fn receive(&mut self, _intent: ActionKind) -> bool {
        false
    }
    /// Called when a submitted intent came back rejected.
    fn rejected(&mut self, _intent: ActionKind, _code: ActionValidationCode) {}
}

mod bots;
mod general;
mod strategies;

pub use bots::{AgentError, AiAgent, BotProfile, Difficulty};
pub use general::{GeneralAi, HeuristicGeneralAi};
pub use strategies::{CallStrategy, SpecializedAi, StrategyRegistry, TrumpStrategy};

/// A simple agent that submits user-intended actions when it's their turn.
pub struct HumanAgent {
    pending: Option<ActionKind>,
}

impl HumanAgent {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn pending(&self) -> Option<ActionKind> {
        self.pending
    }
}

impl Default for HumanAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerAgent for HumanAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    fn receive(&mut self, intent: ActionKind) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(intent);
        true
    }
    fn decide(&mut self, view: &RestrictedView) -> Option<ActionKind> {
        let intent = self.pending?;
        if view.is_my_turn() || intent.turn_independent() {
            self.pending = None;
            return Some(intent);
        }
        None
    }
    fn rejected(&mut self, _intent: ActionKind, _code: ActionValidationCode) {
        self.pending = None;
    }
}

struct SeatBinding {
    id: PlayerId,
    agent: Box<dyn PlayerAgent>,
}

/// Binds agents to subscribed seats and drives the seat(s) that may act.
pub struct AgentTable {
    seats: [Option<SeatBinding>; 4],
    min_action_delay: Duration,
    next_action_at: Option<Instant>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self
            .seats
            .iter()
            .map(|s| match s.as_ref().map(|b| b.agent.kind()) {
                Some(AgentKind::Bot) => 'B',
                Some(AgentKind::Human) => 'H',
                None => '-',
            })
            .collect();
        write!(f, "AgentTable({flags})")
    }
}

impl Default for AgentTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentTable {
    pub fn new() -> Self {
        Self { seats: [None, None, None, None], min_action_delay: Duration::ZERO, next_action_at: None }
    }

    /// Assign an agent to a subscribed seat (or remove when `None`).
    pub fn set_agent(
        &mut self,
        position: PlayerPosition,
        id: PlayerId,
        agent: Option<Box<dyn PlayerAgent>>,
    ) {
        self.seats[position.index()] = agent.map(|agent| SeatBinding { id, agent });
    }

    /// Return the kind of agent at a seat, if any.
    pub fn agent_kind(&self, position: PlayerPosition) -> Option<AgentKind> {
        self.seats[position.index()].as_ref().map(|b| b.agent.kind())
    }

    /// Send an intent to a specific seat agent, if any.
    pub fn receive(&mut self, position: PlayerPosition, intent: ActionKind) -> bool {
        match self.seats[position.index()].as_mut() {
            Some(binding) => binding.agent.receive(intent),
            None => false,
        }
    }

    /// Whether any non-human (bot) agents are assigned.
    pub fn any_bots(&self) -> bool {
        self.seats.iter().flatten().any(|b| matches!(b.agent.kind(), AgentKind::Bot))
    }

    /// Set a global minimum delay between bot actions at the table.
    pub fn set_min_action_delay_ms(&mut self, delay_ms: u64) {
        self.min_action_delay = Duration::from_millis(delay_ms);
    }

    /// Let the seat(s) that may act decide and submit; returns the code of the
    /// first submission made, or `None` if no agent acted.
    pub fn on_turn(&mut self, engine: &dyn GameEngine) -> Option<ActionValidationCode> {
        let candidates: Vec<PlayerPosition> = match engine.state() {
            GameState::Finished => PlayerPosition::ALL.to_vec(),
            _ => engine.turn().into_iter().collect(),
        };
        let now = Instant::now();
        for position in candidates {
            let Some(binding) = self.seats[position.index()].as_mut() else {
                continue;
            };
            let is_bot = matches!(binding.agent.kind(), AgentKind::Bot);
            if is_bot && self.next_action_at.is_some_and(|next| now < next) {
                continue;
            }
            let view = engine.view(position);
            let Some(intent) = binding.agent.decide(&view) else {
                continue;
            };
            let code = engine.submit(Action::new(binding.id, position, intent));
            if !code.is_success() {
                debug!(seat = %position, intent = %intent, code = ?code, "agent intent rejected");
                binding.agent.rejected(intent, code);
            }
            if is_bot && !self.min_action_delay.is_zero() {
                self.next_action_at = Some(now + self.min_action_delay);
            }
            return Some(code);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Controller;
    use crate::engine::TurnSource;
    use crate::rules::GameRules;

    #[test]
    fn human_intent_waits_for_turn() {
        let controller = Controller::new(GameRules::default(), 3);
        let seat = controller.subscribe_player(Some(PlayerPosition::Top)).unwrap();
        let mut table = AgentTable::new();
        table.set_agent(seat.position(), seat.id(), Some(Box::new(HumanAgent::new())));
        assert!(table.receive(PlayerPosition::Top, ActionKind::ChooseGame(None)));

        // Bottom opens (dealer is Right), so the pending pass must not be sent yet.
        assert_eq!(table.on_turn(&controller), None);
        assert_eq!(controller.history_len(), 0);
    }

    #[test]
    fn human_submits_pending_intent_on_turn() {
        let controller = Controller::new(GameRules::default(), 3);
        let seat = controller.subscribe_player(Some(PlayerPosition::Bottom)).unwrap();
        let mut table = AgentTable::new();
        table.set_agent(seat.position(), seat.id(), Some(Box::new(HumanAgent::new())));
        table.receive(PlayerPosition::Bottom, ActionKind::ChooseGame(None));
        assert_eq!(table.on_turn(&controller), Some(ActionValidationCode::Success));
        assert_eq!(controller.turn(), Some(PlayerPosition::Left));
    }
}
