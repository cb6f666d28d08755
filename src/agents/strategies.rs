use crate::cards::{Card, Rank, Suit};
use crate::rules::{GameKind, GameType, Group};
use crate::seat::PlayerPosition;
use crate::view::RestrictedView;
use tracing::debug;

/// In-game decisions that depend on the game type being played.
pub trait SpecializedAi: Send {
    /// Card to play, or `None` to abstain.
    fn best_card(&mut self, view: &RestrictedView) -> Option<Card>;
    fn strike(&mut self, view: &RestrictedView) -> bool;
    fn strike_back(&mut self, view: &RestrictedView) -> bool;
}

/// Constructor for one strategy.
pub type StrategyMaker = fn() -> Box<dyn SpecializedAi>;

/// Resolves the strategy for a game type.
///
/// An unregistered kind (or no game type at all) resolves to `None`; callers
/// treat that as an abstention, not a fault.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    makers: Vec<(GameKind, &'static str, StrategyMaker)>,
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.makers.iter().map(|(_, name, _)| *name).collect();
        f.debug_struct("StrategyRegistry").field("strategies", &names).finish()
    }
}

impl StrategyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategies for every game kind.
    pub fn standard() -> Self {
        Self::new()
            .register(GameKind::Call, CallStrategy::NAME, make_call)
            .register(GameKind::Wenz, TrumpStrategy::NAME, make_trump)
            .register(GameKind::Geier, TrumpStrategy::NAME, make_trump)
            .register(GameKind::Solo, TrumpStrategy::NAME, make_trump)
    }

    /// Add (or replace) the strategy for `kind`.
    pub fn register(mut self, kind: GameKind, name: &'static str, make: StrategyMaker) -> Self {
        self.makers.retain(|(k, _, _)| *k != kind);
        self.makers.push((kind, name, make));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.makers.is_empty()
    }

    pub fn supports(&self, kind: GameKind) -> bool {
        self.makers.iter().any(|(k, _, _)| *k == kind)
    }

    pub fn resolve(&self, game: Option<GameType>) -> Option<Box<dyn SpecializedAi>> {
        let kind = game?.kind();
        let found = self.makers.iter().find(|(k, _, _)| *k == kind);
        match found {
            Some((_, name, make)) => {
                debug!(?kind, strategy = name, "resolved specialized strategy");
                Some(make())
            }
            None => {
                debug!(?kind, "no specialized strategy registered");
                None
            }
        }
    }
}

fn make_call() -> Box<dyn SpecializedAi> {
    Box::new(CallStrategy)
}

fn make_trump() -> Box<dyn SpecializedAi> {
    Box::new(TrumpStrategy)
}

/// Partner games: search for the called Ace as a defender, pull trumps as the declarer's team.
#[derive(Debug, Default)]
pub struct CallStrategy;

impl CallStrategy {
    pub const NAME: &'static str = "call";
}

impl SpecializedAi for CallStrategy {
    fn best_card(&mut self, view: &RestrictedView) -> Option<Card> {
        let legal = view.legal_plays();
        let game = view.game_type?;
        if view.trick.is_empty() {
            if view.on_declarer_team() {
                return highest_trump(game, &legal).or_else(|| lowest_value(game, &legal));
            }
            // Search: lead the called suit so the partner has to show the Ace.
            if let Some(suit) = game.called_suit() {
                let searching = legal
                    .iter()
                    .copied()
                    .filter(|&c| game.group_of(c) == Group::Plain(suit))
                    .min_by_key(|c| c.rank().plain_strength());
                if searching.is_some() {
                    return searching;
                }
            }
            return plain_ace(game, &legal).or_else(|| lowest_value(game, &legal));
        }
        follow(view, game, &legal)
    }

    fn strike(&mut self, view: &RestrictedView) -> bool {
        !view.on_declarer_team() && view.trump_count() >= 5 && ace_count(view) >= 1
    }

    fn strike_back(&mut self, view: &RestrictedView) -> bool {
        view.trump_count() >= 6
    }
}

/// Single-declarer games (solo, Wenz, Geier): the declarer pulls trumps, defenders cash Aces.
#[derive(Debug, Default)]
pub struct TrumpStrategy;

impl TrumpStrategy {
    pub const NAME: &'static str = "trump";
}

impl SpecializedAi for TrumpStrategy {
    fn best_card(&mut self, view: &RestrictedView) -> Option<Card> {
        let legal = view.legal_plays();
        let game = view.game_type?;
        if view.trick.is_empty() {
            if Some(view.me) == view.declarer {
                return highest_trump(game, &legal)
                    .or_else(|| plain_ace(game, &legal))
                    .or_else(|| lowest_value(game, &legal));
            }
            return plain_ace(game, &legal).or_else(|| lowest_value(game, &legal));
        }
        follow(view, game, &legal)
    }

    fn strike(&mut self, view: &RestrictedView) -> bool {
        Some(view.me) != view.declarer && view.trump_count() >= 3 && ace_count(view) >= 2
    }

    fn strike_back(&mut self, view: &RestrictedView) -> bool {
        view.trump_count() >= 6
    }
}

fn ace_count(view: &RestrictedView) -> usize {
    view.hand.iter().filter(|c| c.rank() == Rank::Ace).count()
}

/// Seats known to play on the same side as the viewer.
fn teammates(view: &RestrictedView, game: GameType) -> Vec<PlayerPosition> {
    let others = PlayerPosition::ALL.into_iter().filter(|&p| p != view.me);
    if view.on_declarer_team() {
        return others.filter(|&p| Some(p) == view.declarer || Some(p) == view.known_partner).collect();
    }
    match game {
        GameType::Call(_) if view.known_partner.is_none() => Vec::new(),
        _ => others
            .filter(|&p| Some(p) != view.declarer && Some(p) != view.known_partner)
            .collect(),
    }
}

fn follow(view: &RestrictedView, game: GameType, legal: &[Card]) -> Option<Card> {
    let lead = view.lead_group()?;
    let played: Vec<Card> = view.trick.iter().map(|&(_, c)| c).collect();
    let best_idx = game.trick_winner(&played)?;
    let (winning_seat, winning_card) = view.trick[best_idx];
    let mate_winning = teammates(view, game).contains(&winning_seat);
    let last_to_play = view.trick.len() == 3;

    if mate_winning && (last_to_play || game.is_trump(winning_card)) {
        // Add points to a trick the team already holds.
        return legal
            .iter()
            .copied()
            .filter(|&c| !game.is_trump(c) || legal.iter().all(|&x| game.is_trump(x)))
            .max_by_key(|c| (c.points(), std::cmp::Reverse(strength(game, *c))));
    }
    let winners: Vec<Card> =
        legal.iter().copied().filter(|&c| game.beats(c, winning_card, lead)).collect();
    if !winners.is_empty() {
        // Cheapest card that takes the trick.
        return winners.into_iter().min_by_key(|&c| strength(game, c));
    }
    lowest_value(game, legal)
}

fn strength(game: GameType, card: Card) -> u8 {
    if game.is_trump(card) {
        let beaten = Suit::ALL
            .iter()
            .flat_map(|&s| Rank::ALL.iter().map(move |&r| Card::new(r, s)))
            .filter(|&o| game.is_trump(o) && game.beats(card, o, Group::Trump))
            .count();
        20 + beaten as u8
    } else {
        card.rank().plain_strength()
    }
}

fn highest_trump(game: GameType, legal: &[Card]) -> Option<Card> {
    legal.iter().copied().filter(|&c| game.is_trump(c)).max_by_key(|&c| strength(game, c))
}

fn plain_ace(game: GameType, legal: &[Card]) -> Option<Card> {
    legal.iter().copied().find(|&c| c.rank() == Rank::Ace && !game.is_trump(c))
}

fn lowest_value(game: GameType, legal: &[Card]) -> Option<Card> {
    legal.iter().copied().min_by_key(|&c| (c.points(), strength(game, c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_covers_every_kind() {
        let reg = StrategyRegistry::standard();
        for g in GameType::all() {
            assert!(reg.resolve(Some(g)).is_some(), "{g}");
        }
        assert!(reg.resolve(None).is_none());
    }

    #[test]
    fn unregistered_kind_resolves_to_none() {
        let reg = StrategyRegistry::new().register(GameKind::Call, CallStrategy::NAME, make_call);
        assert!(reg.resolve(Some(GameType::Call(Suit::Bells))).is_some());
        assert!(reg.resolve(Some(GameType::Wenz)).is_none());
        assert!(!reg.supports(GameKind::Solo));
    }

    #[test]
    fn trump_strength_orders_overs_above_unders() {
        let g = GameType::Solo(Suit::Bells);
        let oa = Card::new(Rank::Over, Suit::Acorns);
        let ub = Card::new(Rank::Under, Suit::Bells);
        let ab = Card::new(Rank::Ace, Suit::Bells);
        assert!(strength(g, oa) > strength(g, ub));
        assert!(strength(g, ub) > strength(g, ab));
    }
}
