use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Number of cards in the Bavarian deck.
pub const DECK_SIZE: usize = 32;

/// Cards dealt to each of the four seats.
pub const HAND_SIZE: usize = 8;

/// A 32-card Bavarian deck.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use schafkopf_rs::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 32);
    /// ```
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for &s in &Suit::ALL {
            for &r in &Rank::ALL {
                cards.push(Card::new(r, s));
            }
        }
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
    }

    /// Draw `n` cards from the top of the deck.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).filter_map(|_| self.cards.pop()).collect()
    }

    /// Deal the whole deck into four hands of eight, in seat order.
    pub fn deal(mut self) -> [Vec<Card>; 4] {
        [
            self.draw_n(HAND_SIZE),
            self.draw_n(HAND_SIZE),
            self.draw_n(HAND_SIZE),
            self.draw_n(HAND_SIZE),
        ]
    }
}
