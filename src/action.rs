//! Player intents and their two-step validate/execute contract.
//!
//! An [`Action`] is checked with [`Validatable::validate`] against the
//! submitting seat's [`RestrictedView`], which is pure and may be called any
//! number of times. [`Executable::execute`] re-checks against the live
//! [`GameData`] before mutating it, so a stale or replayed action is
//! rejected rather than applied twice.

use crate::cards::Card;
use crate::game::{GameData, GameState};
use crate::rules::{GameType, Group};
use crate::seat::{PlayerId, PlayerPosition};
use crate::view::RestrictedView;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The payload of a player's intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ActionKind {
    /// Claim a game (`Some`) or pass (`None`).
    ChooseGame(Option<GameType>),
    Raise(bool),
    Strike(bool),
    StrikeBack(bool),
    PlayCard(Card),
    StartNextGame,
}

impl ActionKind {
    /// Whether the action may be submitted regardless of whose turn it is.
    pub const fn turn_independent(self) -> bool {
        matches!(self, ActionKind::StartNextGame)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::ChooseGame(Some(g)) => write!(f, "plays {g}"),
            ActionKind::ChooseGame(None) => f.write_str("passes"),
            ActionKind::Raise(true) => f.write_str("raises"),
            ActionKind::Raise(false) => f.write_str("does not raise"),
            ActionKind::Strike(true) => f.write_str("strikes"),
            ActionKind::Strike(false) => f.write_str("does not strike"),
            ActionKind::StrikeBack(true) => f.write_str("strikes back"),
            ActionKind::StrikeBack(false) => f.write_str("does not strike back"),
            ActionKind::PlayCard(c) => write!(f, "plays {c}"),
            ActionKind::StartNextGame => f.write_str("is ready for the next game"),
        }
    }
}

/// An immutable intent bound to the seat and identity that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    player: PlayerId,
    position: PlayerPosition,
    kind: ActionKind,
}

impl Action {
    pub const fn new(player: PlayerId, position: PlayerPosition, kind: ActionKind) -> Self {
        Self { player, position, kind }
    }

    pub const fn player(&self) -> PlayerId {
        self.player
    }

    pub const fn position(&self) -> PlayerPosition {
        self.position
    }

    pub const fn kind(&self) -> ActionKind {
        self.kind
    }
}

/// Result of checking an action. Every submission yields exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ActionValidationCode {
    Success,
    WrongPhase,
    WrongTurn,
    UnknownPlayer,
    CardNotInHand,
    MustFollow,
    MustPlayCalledAce,
    MustLeadCalledAce,
    CannotDiscardCalledAce,
    GameTypeNotPermitted,
    GameTypeNotSupportedByHand,
    RaiseNotPermitted,
    NotOpposingTeam,
    NotDeclarerTeam,
    NoStrikeRecorded,
    AlreadyStruck,
    AlreadyStruckBack,
    AlreadyAccepting,
}

impl ActionValidationCode {
    pub const fn is_success(self) -> bool {
        matches!(self, ActionValidationCode::Success)
    }

    pub const fn message(self) -> &'static str {
        match self {
            ActionValidationCode::Success => "ok",
            ActionValidationCode::WrongPhase => "not allowed in the current phase",
            ActionValidationCode::WrongTurn => "not your turn",
            ActionValidationCode::UnknownPlayer => "player is not seated at this position",
            ActionValidationCode::CardNotInHand => "card is not in your hand",
            ActionValidationCode::MustFollow => "you must follow the led suit or trump",
            ActionValidationCode::MustPlayCalledAce => "the called Ace must be played",
            ActionValidationCode::MustLeadCalledAce => "lead the called Ace or run away with four",
            ActionValidationCode::CannotDiscardCalledAce => "the called Ace may not be discarded",
            ActionValidationCode::GameTypeNotPermitted => "game type not permitted by the rules",
            ActionValidationCode::GameTypeNotSupportedByHand => "your hand cannot call this game",
            ActionValidationCode::RaiseNotPermitted => "no more raises permitted",
            ActionValidationCode::NotOpposingTeam => "only the defenders may strike",
            ActionValidationCode::NotDeclarerTeam => "only the declarer's team may strike back",
            ActionValidationCode::NoStrikeRecorded => "nothing to strike back against",
            ActionValidationCode::AlreadyStruck => "a strike was already made",
            ActionValidationCode::AlreadyStruckBack => "already struck back",
            ActionValidationCode::AlreadyAccepting => "already accepted the next game",
        }
    }
}

impl fmt::Display for ActionValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Side-effect free legality check against a point-of-view snapshot.
pub trait Validatable {
    fn validate(&self, view: &RestrictedView) -> ActionValidationCode;
}

/// Application to the authoritative game data.
pub trait Executable {
    fn execute(&self, data: &mut GameData) -> ActionValidationCode;
}

macro_rules! reject_unless {
    ($cond:expr, $code:expr) => {
        if !$cond {
            return $code;
        }
    };
}

impl Validatable for Action {
    fn validate(&self, view: &RestrictedView) -> ActionValidationCode {
        use ActionValidationCode as V;
        reject_unless!(self.position == view.me, V::UnknownPlayer);
        let my_turn = view.turn == Some(self.position);
        match self.kind {
            ActionKind::ChooseGame(game) => {
                reject_unless!(view.state == GameState::ChoosingGame, V::WrongPhase);
                reject_unless!(my_turn, V::WrongTurn);
                if let Some(g) = game {
                    reject_unless!(view.rules.permits(g), V::GameTypeNotPermitted);
                    reject_unless!(g.supported_by(&view.hand), V::GameTypeNotSupportedByHand);
                }
                V::Success
            }
            ActionKind::Raise(raise) => {
                reject_unless!(view.state == GameState::Raising, V::WrongPhase);
                reject_unless!(my_turn, V::WrongTurn);
                if raise {
                    reject_unless!(
                        view.raises.len() < usize::from(view.rules.raise_limit),
                        V::RaiseNotPermitted
                    );
                }
                V::Success
            }
            ActionKind::Strike(strike) => {
                reject_unless!(view.struck_by.is_none(), V::AlreadyStruck);
                reject_unless!(view.state == GameState::Striking, V::WrongPhase);
                reject_unless!(my_turn, V::WrongTurn);
                if strike {
                    reject_unless!(!view.on_declarer_team(), V::NotOpposingTeam);
                }
                V::Success
            }
            ActionKind::StrikeBack(_) => {
                reject_unless!(!view.struck_back, V::AlreadyStruckBack);
                reject_unless!(view.struck_by.is_some(), V::NoStrikeRecorded);
                reject_unless!(view.state == GameState::StrikingBack, V::WrongPhase);
                reject_unless!(view.on_declarer_team(), V::NotDeclarerTeam);
                reject_unless!(my_turn, V::WrongTurn);
                V::Success
            }
            ActionKind::PlayCard(card) => {
                reject_unless!(view.state == GameState::Playing, V::WrongPhase);
                reject_unless!(my_turn, V::WrongTurn);
                reject_unless!(view.hand.contains(&card), V::CardNotInHand);
                play_violation(view, card).unwrap_or(V::Success)
            }
            ActionKind::StartNextGame => {
                reject_unless!(view.state == GameState::Finished, V::WrongPhase);
                reject_unless!(!view.is_accepting(self.position), V::AlreadyAccepting);
                V::Success
            }
        }
    }
}

impl Executable for Action {
    fn execute(&self, data: &mut GameData) -> ActionValidationCode {
        let view = RestrictedView::project(data, self.position);
        let code = self.validate(&view);
        if !code.is_success() {
            debug!(seat = %self.position, action = %self.kind, code = ?code, "execute rejected");
            return code;
        }
        data.record_history(self.position, self.kind);
        match self.kind {
            ActionKind::ChooseGame(game) => data.apply_choose(self.position, game),
            ActionKind::Raise(raise) => data.apply_raise(self.position, raise),
            ActionKind::Strike(strike) => data.apply_strike(self.position, strike),
            ActionKind::StrikeBack(strike_back) => data.apply_strike_back(strike_back),
            ActionKind::PlayCard(card) => data.apply_play(self.position, card),
            ActionKind::StartNextGame => data.apply_accept(self.position),
        }
        ActionValidationCode::Success
    }
}

/// Why `card` (known to be in hand) may not be played now, if it may not.
pub(crate) fn play_violation(view: &RestrictedView, card: Card) -> Option<ActionValidationCode> {
    use ActionValidationCode as V;
    let game = view.game_type?;
    let hand = &view.hand;
    // Once the holder has run away the Ace is free.
    let called_ace = game
        .called_ace()
        .filter(|ace| hand.contains(ace))
        .filter(|_| !view.called_suit_searched());

    let Some(&(_, lead)) = view.trick.first() else {
        // Leading: the called suit must be opened with its Ace unless running away.
        if let (Some(ace), Some(suit)) = (called_ace, game.called_suit()) {
            let plain_of_suit = hand.iter().filter(|&&c| game.group_of(c) == Group::Plain(suit));
            if game.group_of(card) == Group::Plain(suit) && card != ace && plain_of_suit.count() < 4 {
                return Some(V::MustLeadCalledAce);
            }
        }
        return None;
    };

    let required = game.group_of(lead);
    if let Some(ace) = called_ace {
        if Group::Plain(ace.suit()) == required && card != ace {
            return Some(V::MustPlayCalledAce);
        }
    }
    let can_follow = hand.iter().any(|&c| game.group_of(c) == required);
    if can_follow {
        if game.group_of(card) != required {
            return Some(V::MustFollow);
        }
        return None;
    }
    if Some(card) == called_ace && hand.len() > 1 {
        return Some(V::CannotDiscardCalledAce);
    }
    None
}
