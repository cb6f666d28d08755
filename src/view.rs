//! Point-of-view projection of the authoritative game data.
//!
//! A [`RestrictedView`] is a detached snapshot: it owns copies of everything
//! it exposes, so agents can inspect it on any thread while the controller
//! keeps mutating the live game. Other seats' hands are reduced to card
//! counts, and the partner of a call game is only revealed once the called
//! Ace has been played (or to the partner themself).

use crate::action::play_violation;
use crate::cards::Card;
use crate::game::{CompletedTrick, GameData, GameResult, GameState};
use crate::rules::{GameRules, GameType, Group};
use crate::seat::PlayerPosition;
use serde::{Deserialize, Serialize};

/// Everything one seat may legally know at the current point of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct RestrictedView {
    /// The seat this view was projected for.
    pub me: PlayerPosition,
    pub state: GameState,
    pub turn: Option<PlayerPosition>,
    pub dealer: PlayerPosition,
    pub rules: GameRules,
    pub game_no: u32,

    /// Own cards, sorted.
    pub hand: Vec<Card>,
    /// Number of cards each seat still holds, indexed by seat.
    pub hand_sizes: [usize; 4],
    pub trick: Vec<(PlayerPosition, Card)>,
    pub tricks: Vec<CompletedTrick>,

    /// Announcements made while choosing, in order.
    pub announcements: Vec<(PlayerPosition, Option<GameType>)>,
    pub game_type: Option<GameType>,
    pub declarer: Option<PlayerPosition>,
    /// The declarer's partner, once publicly known.
    pub known_partner: Option<PlayerPosition>,
    pub raises: Vec<PlayerPosition>,
    pub struck_by: Option<PlayerPosition>,
    pub struck_back: bool,
    pub accepting: [bool; 4],
    pub result: Option<GameResult>,
}

impl RestrictedView {
    /// Snapshot `data` as seen from `me`.
    pub fn project(data: &GameData, me: PlayerPosition) -> Self {
        let hand = data.hand(me).to_vec();
        let called_ace = data.game_type().and_then(GameType::called_ace);
        let played_ace_by = called_ace.and_then(|ace| {
            data.tricks()
                .iter()
                .flat_map(|t| t.cards.iter())
                .chain(data.trick().iter())
                .find(|&&(_, c)| c == ace)
                .map(|&(p, _)| p)
        });
        let known_partner = if data.state() == GameState::Finished {
            data.partner()
        } else if called_ace.is_some_and(|ace| hand.contains(&ace)) {
            Some(me)
        } else {
            played_ace_by
        };
        Self {
            me,
            state: data.state(),
            turn: data.turn(),
            dealer: data.dealer(),
            rules: data.rules().clone(),
            game_no: data.game_no(),
            hand,
            hand_sizes: PlayerPosition::ALL.map(|p| data.hand(p).len()),
            trick: data.trick().to_vec(),
            tricks: data.tricks().to_vec(),
            announcements: data.announcements.clone(),
            game_type: data.game_type(),
            declarer: data.declarer(),
            known_partner,
            raises: data.raises().to_vec(),
            struck_by: data.struck_by(),
            struck_back: data.struck_back(),
            accepting: data.accepting,
            result: data.result().cloned(),
        }
    }

    pub fn is_my_turn(&self) -> bool {
        self.turn == Some(self.me)
    }

    pub fn is_accepting(&self, pos: PlayerPosition) -> bool {
        self.accepting[pos.index()]
    }

    /// Whether this seat plays with the declarer (declarer or holder of the called Ace).
    pub fn on_declarer_team(&self) -> bool {
        Some(self.me) == self.declarer || Some(self.me) == self.known_partner
    }

    /// Group the current trick obliges, if a card was led.
    pub fn lead_group(&self) -> Option<Group> {
        let game = self.game_type?;
        self.trick.first().map(|&(_, c)| game.group_of(c))
    }

    /// Whether the called suit has been led in an earlier trick.
    pub fn called_suit_searched(&self) -> bool {
        let Some(game) = self.game_type else {
            return false;
        };
        let Some(suit) = game.called_suit() else {
            return false;
        };
        self.tricks.iter().any(|t| {
            t.cards.first().is_some_and(|&(_, lead)| game.group_of(lead) == Group::Plain(suit))
        })
    }

    /// Cards from the own hand that may be played right now.
    pub fn legal_plays(&self) -> Vec<Card> {
        if self.state != GameState::Playing || !self.is_my_turn() {
            return Vec::new();
        }
        self.hand.iter().copied().filter(|&c| play_violation(self, c).is_none()).collect()
    }

    /// Game types this seat could announce now.
    pub fn legal_games(&self) -> Vec<GameType> {
        GameType::all()
            .into_iter()
            .filter(|&g| self.rules.permits(g) && g.supported_by(&self.hand))
            .collect()
    }

    /// Number of trumps in the own hand for the bound game type.
    pub fn trump_count(&self) -> usize {
        match self.game_type {
            Some(g) => self.hand.iter().filter(|&&c| g.is_trump(c)).count(),
            None => 0,
        }
    }

    pub fn multiplier(&self) -> u32 {
        let doublings = self.raises.len() as u32
            + u32::from(self.struck_by.is_some())
            + u32::from(self.struck_back);
        1u32 << doublings.min(16)
    }

    /// Tricks taken so far, indexed by seat.
    pub fn tricks_won(&self) -> [usize; 4] {
        let mut won = [0; 4];
        for t in &self.tricks {
            won[t.winner.index()] += 1;
        }
        won
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::rules::GameRules;
    use crate::cards::Suit;

    fn fixed_game() -> GameData {
        let hands = [
            parse_cards("Oa Ol Ua Ah Xh 9l 7l Kb").unwrap(),
            parse_cards("Oh Ob Ul Kh 9h Aa Xa Ka").unwrap(),
            parse_cards("Uh Ub 8h 7h Al Xl Kl 8b").unwrap(),
            parse_cards("9a 8a 7a 8l Ab Xb 9b 7b").unwrap(),
        ];
        GameData::with_hands(GameRules::straight_to_play(), PlayerPosition::Right, hands, 1, 0)
    }

    #[test]
    fn other_hands_are_reduced_to_counts() {
        let g = fixed_game();
        let v = RestrictedView::project(&g, PlayerPosition::Left);
        assert_eq!(v.hand, g.hand(PlayerPosition::Left));
        assert_eq!(v.hand_sizes, [8, 8, 8, 8]);
        assert!(v.hand.iter().all(|c| !g.hand(PlayerPosition::Bottom).contains(c)));
    }

    #[test]
    fn partner_is_only_known_to_the_ace_holder() {
        let mut g = fixed_game();
        g.apply_choose(PlayerPosition::Bottom, Some(GameType::Call(Suit::Leaves)));
        assert_eq!(g.partner(), Some(PlayerPosition::Top));
        let top = RestrictedView::project(&g, PlayerPosition::Top);
        assert_eq!(top.known_partner, Some(PlayerPosition::Top));
        assert!(top.on_declarer_team());
        let right = RestrictedView::project(&g, PlayerPosition::Right);
        assert_eq!(right.known_partner, None);
        assert!(!right.on_declarer_team());
    }

    #[test]
    fn snapshot_is_detached_from_live_state() {
        let mut g = fixed_game();
        let before = RestrictedView::project(&g, PlayerPosition::Top);
        g.apply_choose(PlayerPosition::Bottom, Some(GameType::Wenz));
        assert_eq!(before.state, GameState::ChoosingGame);
        assert_eq!(before.game_type, None);
    }
}
