use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card ranks of the 32-card Bavarian deck, in deck order (not trick strength).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Seven,
    Eight,
    Nine,
    Ten,
    Under,
    Over,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Under,
        Rank::Over,
        Rank::King,
        Rank::Ace,
    ];

    /// Card points counted towards the 120 in a game.
    pub const fn points(self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Ten => 10,
            Rank::King => 4,
            Rank::Over => 3,
            Rank::Under => 2,
            Rank::Nine | Rank::Eight | Rank::Seven => 0,
        }
    }

    /// Strength among plain (non-trump) cards of one suit.
    pub const fn plain_strength(self) -> u8 {
        match self {
            Rank::Ace => 7,
            Rank::Ten => 6,
            Rank::King => 5,
            Rank::Over => 4,
            Rank::Under => 3,
            Rank::Nine => 2,
            Rank::Eight => 1,
            Rank::Seven => 0,
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'X',
            Rank::Under => 'U',
            Rank::Over => 'O',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RankParseError {
    #[error("invalid rank: '{0}'")]
    Invalid(String),
}

impl FromStr for Rank {
    type Err = RankParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t == "10" {
            return Ok(Rank::Ten);
        }
        let mut chars = t.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Rank::try_from(c),
            _ => Err(RankParseError::Invalid(s.to_string())),
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = RankParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'X' | 'T' => Ok(Rank::Ten),
            'U' => Ok(Rank::Under),
            'O' => Ok(Rank::Over),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(RankParseError::Invalid(c.to_string())),
        }
    }
}

/// Four suits. Declaration order is the Over/Under trump order: Acorns > Leaves > Hearts > Bells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Acorns,
    Leaves,
    Hearts,
    Bells,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Acorns, Suit::Leaves, Suit::Hearts, Suit::Bells];

    /// Suits whose Ace may be called in a partner game.
    pub const CALLABLE: [Suit; 3] = [Suit::Acorns, Suit::Leaves, Suit::Bells];

    /// Rank among Overs (or among Unders) when those are trump; higher wins.
    pub const fn trump_order(self) -> u8 {
        match self {
            Suit::Acorns => 3,
            Suit::Leaves => 2,
            Suit::Hearts => 1,
            Suit::Bells => 0,
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            Suit::Acorns => 'a',
            Suit::Leaves => 'l',
            Suit::Hearts => 'h',
            Suit::Bells => 'b',
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Suit::Acorns => "Acorns",
            Suit::Leaves => "Leaves",
            Suit::Hearts => "Hearts",
            Suit::Bells => "Bells",
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SuitParseError {
    #[error("invalid suit: '{0}'")]
    Invalid(String),
}

impl FromStr for Suit {
    type Err = SuitParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let mut chars = t.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Suit::try_from(c);
        }
        match t.to_ascii_lowercase().as_str() {
            "acorns" | "eichel" => Ok(Suit::Acorns),
            "leaves" | "gras" => Ok(Suit::Leaves),
            "hearts" | "herz" => Ok(Suit::Hearts),
            "bells" | "schellen" => Ok(Suit::Bells),
            _ => Err(SuitParseError::Invalid(s.to_string())),
        }
    }
}

impl TryFrom<char> for Suit {
    type Error = SuitParseError;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_lowercase() {
            'a' | 'e' => Ok(Suit::Acorns),
            'l' | 'g' => Ok(Suit::Leaves),
            'h' => Ok(Suit::Hearts),
            'b' | 's' => Ok(Suit::Bells),
            _ => Err(SuitParseError::Invalid(c.to_string())),
        }
    }
}

/// A playing card: rank + suit.
///
/// ```
/// use schafkopf_rs::cards::{Card, Rank, Suit};
///
/// let card = Card::new(Rank::Over, Suit::Acorns);
/// assert_eq!(card.to_string(), "Oa");
/// assert_eq!(card.points(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub const fn rank(self) -> Rank {
        self.rank
    }
    pub const fn suit(self) -> Suit {
        self.suit
    }

    pub const fn points(self) -> u8 {
        self.rank.points()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardParseError {
    #[error("invalid card: '{0}'")]
    Invalid(String),
    #[error(transparent)]
    Rank(#[from] RankParseError),
    #[error(transparent)]
    Suit(#[from] SuitParseError),
}

impl FromStr for Card {
    type Err = CardParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        // suit is always the last char; rank is everything before it ("10" allowed)
        let Some(suit_ch) = t.chars().last() else {
            return Err(CardParseError::Invalid(s.to_string()));
        };
        let rank_str = &t[..t.len() - suit_ch.len_utf8()];
        if rank_str.is_empty() {
            return Err(CardParseError::Invalid(s.to_string()));
        }
        let rank = Rank::from_str(rank_str)?;
        let suit = Suit::try_from(suit_ch)?;
        Ok(Card::new(rank, suit))
    }
}

/// Parse multiple cards separated by whitespace or commas.
///
/// ```
/// use schafkopf_rs::cards::{parse_cards, Card, Rank, Suit};
///
/// let cards = parse_cards("Oa, Xh 10b").unwrap();
/// assert_eq!(cards[0], Card::new(Rank::Over, Suit::Acorns));
/// assert_eq!(cards[1], Card::new(Rank::Ten, Suit::Hearts));
/// assert_eq!(cards[2], Card::new(Rank::Ten, Suit::Bells));
/// ```
pub fn parse_cards(input: &str) -> Result<Vec<Card>, CardParseError> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(Card::from_str)
        .collect()
}

/// Sum of card points.
pub fn points_of<'a>(cards: impl IntoIterator<Item = &'a Card>) -> u32 {
    cards.into_iter().map(|c| u32::from(c.points())).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_display_and_from_str() {
        assert_eq!(Rank::Ace.to_string(), "A");
        assert_eq!(Rank::from_str("X").unwrap(), Rank::Ten);
        assert_eq!(Rank::from_str("10").unwrap(), Rank::Ten);
        assert_eq!(Rank::from_str("u").unwrap(), Rank::Under);
        assert!(Rank::from_str("2").is_err());
        assert!(Rank::from_str("").is_err());
    }

    #[test]
    fn suit_display_and_from_str() {
        assert_eq!(Suit::Bells.to_string(), "b");
        assert_eq!(Suit::from_str("a").unwrap(), Suit::Acorns);
        assert_eq!(Suit::from_str("Eichel").unwrap(), Suit::Acorns);
        assert_eq!(Suit::from_str("Hearts").unwrap(), Suit::Hearts);
        assert!(Suit::from_str("x").is_err());
    }

    #[test]
    fn card_display_and_from_str() {
        let oa = Card::new(Rank::Over, Suit::Acorns);
        assert_eq!(oa.to_string(), "Oa");
        assert_eq!(Card::from_str("Oa").unwrap(), oa);
        assert_eq!(Card::from_str("10h").unwrap(), Card::new(Rank::Ten, Suit::Hearts));
        assert_eq!(Card::from_str("ab").unwrap(), Card::new(Rank::Ace, Suit::Bells));
        assert!(Card::from_str("a").is_err());
        assert!(Card::from_str("").is_err());
    }

    #[test]
    fn deck_points_total_120() {
        let all: Vec<Card> =
            Suit::ALL.iter().flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s))).collect();
        assert_eq!(points_of(&all), 120);
    }
}
