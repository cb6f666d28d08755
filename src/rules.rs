//! Game types, trump order and the trick rules that depend on them.

use crate::cards::{Card, Rank, Suit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The variant contested in one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    /// Partner game: the declarer calls the Ace of a non-Hearts suit.
    Call(Suit),
    /// Only Unders are trump.
    Wenz,
    /// Only Overs are trump.
    Geier,
    /// Overs, Unders and the named suit are trump.
    Solo(Suit),
}

/// A game type without its suit payload; used as a strategy key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Call,
    Geier,
    Wenz,
    Solo,
}

impl GameType {
    pub const fn kind(self) -> GameKind {
        match self {
            GameType::Call(_) => GameKind::Call,
            GameType::Wenz => GameKind::Wenz,
            GameType::Geier => GameKind::Geier,
            GameType::Solo(_) => GameKind::Solo,
        }
    }

    /// The suit whose Ace is called, for partner games.
    pub const fn called_suit(self) -> Option<Suit> {
        match self {
            GameType::Call(s) => Some(s),
            _ => None,
        }
    }

    pub fn called_ace(self) -> Option<Card> {
        self.called_suit().map(|s| Card::new(Rank::Ace, s))
    }

    /// The suit that is trump besides Overs/Unders, if any.
    pub const fn trump_suit(self) -> Option<Suit> {
        match self {
            GameType::Call(_) => Some(Suit::Hearts),
            GameType::Solo(s) => Some(s),
            GameType::Wenz | GameType::Geier => None,
        }
    }

    pub fn is_trump(self, card: Card) -> bool {
        match self {
            GameType::Wenz => card.rank() == Rank::Under,
            GameType::Geier => card.rank() == Rank::Over,
            GameType::Call(_) | GameType::Solo(_) => {
                matches!(card.rank(), Rank::Over | Rank::Under)
                    || Some(card.suit()) == self.trump_suit()
            }
        }
    }

    /// Strength of a trump card; only meaningful when `is_trump(card)`.
    fn trump_strength(self, card: Card) -> u8 {
        match card.rank() {
            Rank::Over if self != GameType::Wenz => 40 + card.suit().trump_order(),
            Rank::Under if self != GameType::Geier => 30 + card.suit().trump_order(),
            r => r.plain_strength(),
        }
    }

    pub fn group_of(self, card: Card) -> Group {
        if self.is_trump(card) {
            Group::Trump
        } else {
            Group::Plain(card.suit())
        }
    }

    /// Whether `a` beats `b` once both are on a trick led with `lead`.
    pub fn beats(self, a: Card, b: Card, lead: Group) -> bool {
        match (self.is_trump(a), self.is_trump(b)) {
            (true, false) => true,
            (false, true) => false,
            (true, true) => self.trump_strength(a) > self.trump_strength(b),
            (false, false) => {
                let a_follows = Group::Plain(a.suit()) == lead;
                let b_follows = Group::Plain(b.suit()) == lead;
                match (a_follows, b_follows) {
                    (true, false) => true,
                    (false, _) => false,
                    (true, true) => a.rank().plain_strength() > b.rank().plain_strength(),
                }
            }
        }
    }

    /// Index into `cards` of the winning card. `cards[0]` is the lead.
    pub fn trick_winner(self, cards: &[Card]) -> Option<usize> {
        let lead = self.group_of(*cards.first()?);
        let mut best = 0;
        for (i, &c) in cards.iter().enumerate().skip(1) {
            if self.beats(c, cards[best], lead) {
                best = i;
            }
        }
        Some(best)
    }

    /// Whether a hand may announce this game.
    pub fn supported_by(self, hand: &[Card]) -> bool {
        match self {
            GameType::Call(suit) => {
                suit != Suit::Hearts
                    && !hand.contains(&Card::new(Rank::Ace, suit))
                    && hand.iter().any(|&c| c.suit() == suit && !self.is_trump(c))
            }
            GameType::Wenz | GameType::Geier | GameType::Solo(_) => true,
        }
    }

    pub fn label(self) -> String {
        match self {
            GameType::Call(s) => format!("Call the {} Ace", s.name()),
            GameType::Wenz => "Wenz".to_string(),
            GameType::Geier => "Geier".to_string(),
            GameType::Solo(s) => format!("{} Solo", s.name()),
        }
    }

    /// Every game type, in a stable order.
    pub fn all() -> Vec<GameType> {
        let mut out: Vec<GameType> = Suit::CALLABLE.iter().map(|&s| GameType::Call(s)).collect();
        out.push(GameType::Geier);
        out.push(GameType::Wenz);
        out.extend(Suit::ALL.iter().map(|&s| GameType::Solo(s)));
        out
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// The group a led card obliges others to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Trump,
    Plain(Suit),
}

/// Configured rule set: which optional phases run and which games may be announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub raising: bool,
    pub striking: bool,
    pub striking_back: bool,
    /// Maximum number of raises per game.
    pub raise_limit: u8,
    pub allow_wenz: bool,
    pub allow_geier: bool,
}

impl GameRules {
    /// Rules with every optional phase skipped.
    pub fn straight_to_play() -> Self {
        Self { raising: false, striking: false, striking_back: false, ..Self::default() }
    }

    pub fn permits(&self, game: GameType) -> bool {
        match game {
            GameType::Wenz => self.allow_wenz,
            GameType::Geier => self.allow_geier,
            GameType::Call(s) => s != Suit::Hearts,
            GameType::Solo(_) => true,
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            raising: true,
            striking: true,
            striking_back: true,
            raise_limit: 4,
            allow_wenz: true,
            allow_geier: false,
        }
    }
}
