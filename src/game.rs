use crate::action::ActionKind;
use crate::cards::{points_of, Card};
use crate::deck::{Deck, DECK_SIZE, HAND_SIZE};
use crate::rules::{GameRules, GameType};
use crate::seat::PlayerPosition;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Phases of one game, in the order they are entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GameState {
    ChoosingGame,
    Raising,
    Striking,
    StrikingBack,
    Playing,
    Finished,
}

impl GameState {
    pub fn label(self) -> &'static str {
        match self {
            GameState::ChoosingGame => "Choosing game",
            GameState::Raising => "Raising",
            GameState::Striking => "Striking",
            GameState::StrikingBack => "Striking back",
            GameState::Playing => "Playing",
            GameState::Finished => "Finished",
        }
    }
}

/// A trick that has been fully played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTrick {
    pub cards: Vec<(PlayerPosition, Card)>,
    pub winner: PlayerPosition,
}

impl CompletedTrick {
    pub fn points(&self) -> u32 {
        points_of(self.cards.iter().map(|(_, c)| c))
    }
}

/// Outcome of a finished game that was actually played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct GameResult {
    pub game_type: GameType,
    pub declarer_team: Vec<PlayerPosition>,
    pub declarer_points: u32,
    pub defender_points: u32,
    pub declarer_won: bool,
    /// Stake multiplier from raises, strike and strike-back.
    pub multiplier: u32,
}

impl GameResult {
    pub fn winners(&self) -> Vec<PlayerPosition> {
        PlayerPosition::ALL
            .into_iter()
            .filter(|p| self.declarer_team.contains(p) == self.declarer_won)
            .collect()
    }
}

/// One accepted action, in application order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub position: PlayerPosition,
    pub kind: ActionKind,
    pub state: GameState,
}

/// The authoritative, full-access state of one game instance.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct GameData {
    pub(crate) rules: GameRules,
    pub(crate) table_seed: u64,
    pub(crate) game_no: u32,
    pub(crate) dealer: PlayerPosition,

    pub(crate) state: GameState,
    pub(crate) turn: Option<PlayerPosition>,
    pub(crate) phase_moves: u8,
    pub(crate) hands: [Vec<Card>; 4],
    initial_hands: [Vec<Card>; 4],
    pub(crate) trick: Vec<(PlayerPosition, Card)>,
    pub(crate) tricks: Vec<CompletedTrick>,

    pub(crate) announcements: Vec<(PlayerPosition, Option<GameType>)>,
    pub(crate) game_type: Option<GameType>,
    pub(crate) declarer: Option<PlayerPosition>,
    pub(crate) partner: Option<PlayerPosition>,
    pub(crate) raises: Vec<PlayerPosition>,
    pub(crate) struck_by: Option<PlayerPosition>,
    pub(crate) struck_back: bool,
    pub(crate) accepting: [bool; 4],
    pub(crate) result: Option<GameResult>,
    /// Every phase entered, including optional phases passed through with no actions.
    pub(crate) phase_trail: Vec<GameState>,
    history: Vec<HistoryEntry>,
}

/// Deal seed for one game of a table session.
pub fn derive_dealing_seed(table_seed: u64, game_no: u32) -> u64 {
    table_seed.wrapping_add(u64::from(game_no).wrapping_mul(1_000_000)).wrapping_add(2)
}

impl GameData {
    /// Deal a fresh game at CHOOSING_GAME.
    pub fn new(rules: GameRules, dealer: PlayerPosition, table_seed: u64, game_no: u32) -> Self {
        let mut deck = Deck::standard();
        deck.shuffle_seeded(derive_dealing_seed(table_seed, game_no));
        Self::with_hands(rules, dealer, deck.deal(), table_seed, game_no)
    }

    /// Start a game from fixed hands (indexed by `PlayerPosition::index`).
    pub fn with_hands(
        rules: GameRules,
        dealer: PlayerPosition,
        mut hands: [Vec<Card>; 4],
        table_seed: u64,
        game_no: u32,
    ) -> Self {
        for h in &mut hands {
            h.sort();
        }
        let first = dealer.next();
        info!(dealer = %dealer, game_no, "dealt new game");
        Self {
            rules,
            table_seed,
            game_no,
            dealer,
            state: GameState::ChoosingGame,
            turn: Some(first),
            phase_moves: 0,
            initial_hands: hands.clone(),
            hands,
            trick: Vec::with_capacity(4),
            tricks: Vec::with_capacity(HAND_SIZE),
            announcements: Vec::with_capacity(4),
            game_type: None,
            declarer: None,
            partner: None,
            raises: Vec::new(),
            struck_by: None,
            struck_back: false,
            accepting: [false; 4],
            result: None,
            phase_trail: vec![GameState::ChoosingGame],
            history: Vec::new(),
        }
    }

    /// The instance that replaces this one once every seat accepted a restart.
    pub fn next_game(&self) -> Self {
        Self::new(self.rules.clone(), self.dealer.next(), self.table_seed, self.game_no + 1)
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn table_seed(&self) -> u64 {
        self.table_seed
    }

    pub fn game_no(&self) -> u32 {
        self.game_no
    }

    pub fn dealer(&self) -> PlayerPosition {
        self.dealer
    }

    /// Seat that opens bidding and leads the first trick.
    pub fn first_actor(&self) -> PlayerPosition {
        self.dealer.next()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Seat expected to act; `None` once finished.
    pub fn turn(&self) -> Option<PlayerPosition> {
        self.turn
    }

    pub fn hand(&self, pos: PlayerPosition) -> &[Card] {
        &self.hands[pos.index()]
    }

    /// Hands as dealt, before any card was played.
    pub fn initial_hands(&self) -> &[Vec<Card>; 4] {
        &self.initial_hands
    }

    pub fn trick(&self) -> &[(PlayerPosition, Card)] {
        &self.trick
    }

    pub fn tricks(&self) -> &[CompletedTrick] {
        &self.tricks
    }

    pub fn game_type(&self) -> Option<GameType> {
        self.game_type
    }

    pub fn declarer(&self) -> Option<PlayerPosition> {
        self.declarer
    }

    /// Holder of the called Ace in a partner game.
    pub fn partner(&self) -> Option<PlayerPosition> {
        self.partner
    }

    pub fn raises(&self) -> &[PlayerPosition] {
        &self.raises
    }

    pub fn struck_by(&self) -> Option<PlayerPosition> {
        self.struck_by
    }

    pub fn struck_back(&self) -> bool {
        self.struck_back
    }

    pub fn is_accepting(&self, pos: PlayerPosition) -> bool {
        self.accepting[pos.index()]
    }

    pub fn all_accepting(&self) -> bool {
        self.accepting.iter().all(|&a| a)
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn phase_trail(&self) -> &[GameState] {
        &self.phase_trail
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Stake multiplier: doubled for each raise, the strike and the strike-back.
    pub fn multiplier(&self) -> u32 {
        let doublings = self.raises.len() as u32
            + u32::from(self.struck_by.is_some())
            + u32::from(self.struck_back);
        1u32 << doublings.min(16)
    }

    /// Cards across all hands, the current trick and completed tricks.
    pub fn card_count(&self) -> usize {
        self.hands.iter().map(Vec::len).sum::<usize>()
            + self.trick.len()
            + self.tricks.iter().map(|t| t.cards.len()).sum::<usize>()
    }

    pub fn is_declarer_team(&self, pos: PlayerPosition) -> bool {
        Some(pos) == self.declarer || Some(pos) == self.partner
    }

    pub(crate) fn record_history(&mut self, position: PlayerPosition, kind: ActionKind) {
        self.history.push(HistoryEntry { position, kind, state: self.state });
    }

    fn enter(&mut self, mut next: GameState) {
        loop {
            self.phase_trail.push(next);
            let enabled = match next {
                GameState::Raising => self.rules.raising,
                GameState::Striking => self.rules.striking,
                GameState::StrikingBack => self.rules.striking_back,
                _ => true,
            };
            if enabled {
                break;
            }
            debug!(phase = ?next, "optional phase disabled, passing through");
            next = match next {
                GameState::Raising => GameState::Striking,
                GameState::Striking | GameState::StrikingBack => GameState::Playing,
                other => other,
            };
        }
        self.state = next;
        self.phase_moves = 0;
        self.turn = match next {
            GameState::StrikingBack => self.declarer,
            GameState::Finished => None,
            _ => Some(self.first_actor()),
        };
        info!(phase = ?next, turn = ?self.turn, "phase entered");
    }

    /// Count a decision in a rotation phase; true once all four seats decided.
    fn rotate(&mut self) -> bool {
        self.phase_moves += 1;
        self.turn = self.turn.map(PlayerPosition::next);
        self.phase_moves >= 4
    }

    pub(crate) fn apply_choose(&mut self, pos: PlayerPosition, game: Option<GameType>) {
        self.announcements.push((pos, game));
        match game {
            Some(g) => {
                self.game_type = Some(g);
                self.declarer = Some(pos);
                self.partner = g.called_ace().and_then(|ace| {
                    PlayerPosition::ALL.into_iter().find(|p| self.hands[p.index()].contains(&ace))
                });
                info!(declarer = %pos, game = %g, "game type chosen");
                self.enter(GameState::Raising);
            }
            None => {
                if self.rotate() {
                    info!("all seats passed, game thrown in");
                    self.enter(GameState::Finished);
                }
            }
        }
    }

    pub(crate) fn apply_raise(&mut self, pos: PlayerPosition, raise: bool) {
        if raise {
            self.raises.push(pos);
        }
        if self.rotate() {
            self.enter(GameState::Striking);
        }
    }

    pub(crate) fn apply_strike(&mut self, pos: PlayerPosition, strike: bool) {
        if strike {
            self.struck_by = Some(pos);
            self.enter(GameState::StrikingBack);
        } else if self.rotate() {
            self.enter(GameState::Playing);
        }
    }

    pub(crate) fn apply_strike_back(&mut self, strike_back: bool) {
        self.struck_back = strike_back;
        self.enter(GameState::Playing);
    }

    pub(crate) fn apply_play(&mut self, pos: PlayerPosition, card: Card) {
        let hand = &mut self.hands[pos.index()];
        if let Some(i) = hand.iter().position(|&c| c == card) {
            hand.remove(i);
        }
        self.trick.push((pos, card));
        if self.trick.len() < 4 {
            self.turn = Some(pos.next());
            return;
        }
        let Some(game) = self.game_type else {
            return;
        };
        let cards: Vec<Card> = self.trick.iter().map(|&(_, c)| c).collect();
        let winner = game.trick_winner(&cards).map(|i| self.trick[i].0).unwrap_or(pos);
        let trick = CompletedTrick { cards: std::mem::take(&mut self.trick), winner };
        debug!(winner = %winner, points = trick.points(), "trick complete");
        self.tricks.push(trick);
        if self.tricks.len() == HAND_SIZE {
            self.result = self.compute_result();
            self.enter(GameState::Finished);
        } else {
            self.turn = Some(winner);
        }
    }

    pub(crate) fn apply_accept(&mut self, pos: PlayerPosition) {
        self.accepting[pos.index()] = true;
    }

    fn compute_result(&self) -> Option<GameResult> {
        let game_type = self.game_type?;
        let declarer_team: Vec<PlayerPosition> =
            PlayerPosition::ALL.into_iter().filter(|&p| self.is_declarer_team(p)).collect();
        let declarer_points: u32 = self
            .tricks
            .iter()
            .filter(|t| declarer_team.contains(&t.winner))
            .map(CompletedTrick::points)
            .sum();
        let defender_points = 120 - declarer_points;
        Some(GameResult {
            game_type,
            declarer_won: declarer_points >= 61,
            declarer_team,
            declarer_points,
            defender_points,
            multiplier: self.multiplier(),
        })
    }

    /// Whether no card was lost or duplicated.
    pub fn cards_conserved(&self) -> bool {
        let mut all: Vec<Card> = self
            .hands
            .iter()
            .flatten()
            .copied()
            .chain(self.trick.iter().map(|&(_, c)| c))
            .chain(self.tricks.iter().flat_map(|t| t.cards.iter().map(|&(_, c)| c)))
            .collect();
        all.sort();
        all.dedup();
        all.len() == DECK_SIZE && self.card_count() == DECK_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_game(rules: GameRules) -> GameData {
        GameData::new(rules, PlayerPosition::Right, 11, 0)
    }

    #[test]
    fn fresh_game_is_dealt_and_waits_for_first_actor() {
        let g = mk_game(GameRules::default());
        assert_eq!(g.state(), GameState::ChoosingGame);
        assert_eq!(g.turn(), Some(PlayerPosition::Bottom));
        assert!(g.cards_conserved());
        assert!(PlayerPosition::ALL.iter().all(|&p| g.hand(p).len() == HAND_SIZE));
    }

    #[test]
    fn disabled_phases_are_passed_through() {
        let mut g = mk_game(GameRules::straight_to_play());
        g.apply_choose(PlayerPosition::Bottom, Some(GameType::Wenz));
        assert_eq!(g.state(), GameState::Playing);
        assert_eq!(
            g.phase_trail(),
            &[
                GameState::ChoosingGame,
                GameState::Raising,
                GameState::Striking,
                GameState::Playing
            ]
        );
    }

    #[test]
    fn four_passes_throw_the_game_in() {
        let mut g = mk_game(GameRules::default());
        for p in PlayerPosition::Bottom.rotation() {
            g.apply_choose(p, None);
        }
        assert_eq!(g.state(), GameState::Finished);
        assert!(g.result().is_none());
        assert_eq!(g.turn(), None);
    }

    #[test]
    fn multiplier_doubles_per_declaration() {
        let mut g = mk_game(GameRules::default());
        g.raises = vec![PlayerPosition::Top];
        g.struck_by = Some(PlayerPosition::Left);
        g.struck_back = true;
        assert_eq!(g.multiplier(), 8);
    }

    #[test]
    fn next_game_rotates_dealer_and_redeals() {
        let g = mk_game(GameRules::default());
        let n = g.next_game();
        assert_eq!(n.dealer(), PlayerPosition::Bottom);
        assert_eq!(n.game_no(), 1);
        assert_eq!(n.state(), GameState::ChoosingGame);
        assert_ne!(n.hands, g.hands);
    }
}
