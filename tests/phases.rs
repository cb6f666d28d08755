mod common;

use common::*;
use schafkopf_rs::action::{ActionKind, ActionValidationCode as V, Validatable};
use schafkopf_rs::cards::Suit;
use schafkopf_rs::engine::{GameEngine, TurnSource};
use schafkopf_rs::game::GameState;
use schafkopf_rs::rules::{GameRules, GameType};

const LEAVES: Option<GameType> = Some(GameType::Call(Suit::Leaves));

#[test]
fn announcing_a_call_game_enters_raising() {
    let t = Fixture::new(GameRules::default());
    assert_eq!(t.act(Bottom, ActionKind::ChooseGame(LEAVES)), V::Success);
    assert_eq!(t.controller.state(), GameState::Raising);
    assert_eq!(t.controller.turn(), Some(Bottom));
    let game = t.controller.snapshot();
    assert_eq!(game.declarer(), Some(Bottom));
    assert_eq!(game.partner(), Some(Top));
}

#[test]
fn announcing_without_optional_phases_goes_straight_to_play() {
    let t = Fixture::new(GameRules::straight_to_play());
    assert_eq!(t.act(Bottom, ActionKind::ChooseGame(LEAVES)), V::Success);
    assert_eq!(t.controller.state(), GameState::Playing);
    assert_eq!(
        t.controller.snapshot().phase_trail(),
        &[GameState::ChoosingGame, GameState::Raising, GameState::Striking, GameState::Playing]
    );
}

#[test]
fn playing_a_card_while_choosing_is_wrong_phase() {
    let t = Fixture::new(GameRules::default());
    assert_eq!(t.play(Left, "Aa"), V::WrongPhase);
    assert_eq!(t.controller.history_len(), 0);
}

#[test]
fn acting_out_of_turn_is_wrong_turn() {
    let t = Fixture::new(GameRules::default());
    assert_eq!(t.act(Left, ActionKind::ChooseGame(None)), V::WrongTurn);
    assert_eq!(t.act(Top, ActionKind::ChooseGame(LEAVES)), V::WrongTurn);
    assert_eq!(t.controller.turn(), Some(Bottom));
}

#[test]
fn game_type_checks_follow_rules_then_hand() {
    let t = Fixture::new(GameRules::default());
    assert_eq!(t.act(Bottom, ActionKind::ChooseGame(Some(GameType::Geier))), V::GameTypeNotPermitted);
    assert_eq!(
        t.act(Bottom, ActionKind::ChooseGame(Some(GameType::Call(Suit::Hearts)))),
        V::GameTypeNotPermitted
    );
    // Bottom holds no plain Acorns.
    assert_eq!(
        t.act(Bottom, ActionKind::ChooseGame(Some(GameType::Call(Suit::Acorns)))),
        V::GameTypeNotSupportedByHand
    );
    assert_eq!(t.act(Bottom, ActionKind::ChooseGame(Some(GameType::Wenz))), V::Success);
}

#[test]
fn validation_is_pure_and_repeatable() {
    let t = Fixture::new(GameRules::default());
    let view = t.controller.view(Bottom);
    let before = view.clone();
    let action = t.action(Bottom, ActionKind::ChooseGame(LEAVES));
    let codes: Vec<_> = (0..3).map(|_| action.validate(&view)).collect();
    assert_eq!(codes, vec![V::Success; 3]);
    assert_eq!(view, before);
    assert_eq!(t.controller.history_len(), 0);
}

#[test]
fn validating_against_another_seats_view_is_unknown_player() {
    let t = Fixture::new(GameRules::default());
    let action = t.action(Bottom, ActionKind::ChooseGame(None));
    assert_eq!(action.validate(&t.controller.view(Left)), V::UnknownPlayer);
}

#[test]
fn resubmitting_an_applied_action_is_rejected() {
    let t = Fixture::new(GameRules::default());
    let pass = t.action(Bottom, ActionKind::ChooseGame(None));
    assert_eq!(t.controller.submit(pass), V::Success);
    assert_eq!(t.controller.submit(pass), V::WrongTurn);
    assert_eq!(t.controller.history_len(), 1);
}

#[test]
fn four_passes_throw_the_game_in() {
    let t = Fixture::new(GameRules::default());
    t.all_pass();
    assert_eq!(t.controller.state(), GameState::Finished);
    assert_eq!(t.controller.turn(), None);
    assert!(t.controller.snapshot().result().is_none());
}

#[test]
fn raises_stop_at_the_limit() {
    let rules = GameRules { raise_limit: 1, ..GameRules::default() };
    let t = Fixture::new(rules);
    t.act(Bottom, ActionKind::ChooseGame(LEAVES));
    assert_eq!(t.act(Bottom, ActionKind::Raise(true)), V::Success);
    assert_eq!(t.act(Left, ActionKind::Raise(true)), V::RaiseNotPermitted);
    assert_eq!(t.act(Left, ActionKind::Raise(false)), V::Success);
    assert_eq!(t.controller.view(Left).multiplier(), 2);
}

/// Choose Leaves and let nobody raise; leaves the table in STRIKING.
fn to_striking() -> Fixture {
    let t = Fixture::new(GameRules::default());
    t.act(Bottom, ActionKind::ChooseGame(LEAVES));
    for p in [Bottom, Left, Top, Right] {
        assert_eq!(t.act(p, ActionKind::Raise(false)), V::Success);
    }
    assert_eq!(t.controller.state(), GameState::Striking);
    t
}

#[test]
fn second_strike_is_already_struck() {
    let t = to_striking();
    for p in [Bottom, Left, Top] {
        assert_eq!(t.act(p, ActionKind::Strike(false)), V::Success);
    }
    assert_eq!(t.act(Right, ActionKind::Strike(true)), V::Success);
    assert_eq!(t.controller.state(), GameState::StrikingBack);
    assert_eq!(t.act(Right, ActionKind::Strike(true)), V::AlreadyStruck);
}

#[test]
fn the_hidden_partner_may_not_strike() {
    let t = to_striking();
    t.act(Bottom, ActionKind::Strike(false));
    t.act(Left, ActionKind::Strike(false));
    assert_eq!(t.act(Top, ActionKind::Strike(true)), V::NotOpposingTeam);
    assert_eq!(t.act(Top, ActionKind::Strike(false)), V::Success);
}

#[test]
fn strike_back_belongs_to_the_declarer() {
    let t = to_striking();
    assert_eq!(t.act(Bottom, ActionKind::Strike(false)), V::Success);
    assert_eq!(t.act(Left, ActionKind::Strike(true)), V::Success);
    assert_eq!(t.controller.turn(), Some(Bottom));

    assert_eq!(t.act(Left, ActionKind::StrikeBack(true)), V::NotDeclarerTeam);
    assert_eq!(t.act(Top, ActionKind::StrikeBack(true)), V::WrongTurn);
    assert_eq!(t.act(Bottom, ActionKind::StrikeBack(true)), V::Success);
    assert_eq!(t.controller.state(), GameState::Playing);
    assert_eq!(t.act(Bottom, ActionKind::StrikeBack(true)), V::AlreadyStruckBack);
    assert_eq!(t.controller.view(Right).multiplier(), 4);
}

#[test]
fn strike_back_without_a_strike_is_rejected() {
    let t = to_striking();
    for p in [Bottom, Left, Top, Right] {
        assert_eq!(t.act(p, ActionKind::Strike(false)), V::Success);
    }
    assert_eq!(t.controller.state(), GameState::Playing);
    assert_eq!(t.act(Bottom, ActionKind::StrikeBack(true)), V::NoStrikeRecorded);
}

#[test]
fn restart_needs_every_seat_once() {
    let t = Fixture::new(GameRules::default());
    t.all_pass();
    assert_eq!(t.act(Top, ActionKind::StartNextGame), V::Success);
    assert_eq!(t.act(Top, ActionKind::StartNextGame), V::AlreadyAccepting);
    assert_eq!(t.act(Right, ActionKind::StartNextGame), V::Success);
    assert_eq!(t.act(Bottom, ActionKind::StartNextGame), V::Success);
    assert_eq!(t.controller.state(), GameState::Finished);
    assert!(t.controller.view(Left).is_accepting(Top));

    assert_eq!(t.act(Left, ActionKind::StartNextGame), V::Success);
    assert_eq!(t.controller.state(), GameState::ChoosingGame);
    let next = t.controller.snapshot();
    assert_eq!(next.game_no(), 1);
    assert_eq!(next.dealer(), Bottom);
    assert_eq!(next.turn(), Some(Left));
    assert!(next.history().is_empty());
    assert_eq!(t.controller.games_played(), 1);
    assert_eq!(t.controller.wins(), [0; 4]);
}

#[test]
fn start_next_game_is_only_for_finished_games() {
    let t = Fixture::new(GameRules::default());
    assert_eq!(t.act(Left, ActionKind::StartNextGame), V::WrongPhase);
}
