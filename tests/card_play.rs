mod common;

use common::*;
use schafkopf_rs::action::{ActionKind, ActionValidationCode as V};
use schafkopf_rs::cards::parse_cards;
use schafkopf_rs::cards::Suit;
use schafkopf_rs::engine::TurnSource;
use schafkopf_rs::seat::PlayerPosition;
use schafkopf_rs::game::GameState;
use schafkopf_rs::rules::{GameRules, GameType};

/// Bottom calls the Leaves Ace with every optional phase disabled.
fn leaves_called() -> Fixture {
    let t = Fixture::new(GameRules::straight_to_play());
    let call = ActionKind::ChooseGame(Some(GameType::Call(Suit::Leaves)));
    assert_eq!(t.act(Bottom, call), V::Success);
    assert_eq!(t.controller.state(), GameState::Playing);
    t
}

/// First trick: Bells led, Right takes it with the Ace.
fn after_first_trick() -> Fixture {
    let t = leaves_called();
    assert_eq!(t.play(Bottom, "Kb"), V::Success);
    assert_eq!(t.play(Left, "Aa"), V::Success);
    assert_eq!(t.play(Top, "8b"), V::Success);
    assert_eq!(t.play(Right, "Ab"), V::Success);
    t
}

#[test]
fn holder_of_led_suit_must_follow() {
    let t = leaves_called();
    t.play(Bottom, "Kb");
    t.play(Left, "Aa");
    assert_eq!(t.play(Top, "Xl"), V::MustFollow);
    assert_eq!(t.play(Top, "Uh"), V::MustFollow, "trump does not follow a plain suit");
    assert_eq!(t.play(Top, "8b"), V::Success);
    assert_eq!(t.play(Right, "9a"), V::MustFollow);
}

#[test]
fn card_must_be_in_hand() {
    let t = leaves_called();
    assert_eq!(t.play(Bottom, "Ab"), V::CardNotInHand);
    assert_eq!(t.play(Left, "Aa"), V::WrongTurn);
}

#[test]
fn trick_winner_leads_next() {
    let t = after_first_trick();
    let game = t.controller.snapshot();
    assert_eq!(game.tricks().len(), 1);
    assert_eq!(game.tricks()[0].winner, Right);
    assert_eq!(game.tricks()[0].points(), 4 + 11 + 11);
    assert_eq!(t.controller.turn(), Some(Right));
    assert_eq!(t.controller.view(Right).tricks_won(), [0, 0, 0, 1]);
}

#[test]
fn void_seat_may_discard_freely() {
    let t = after_first_trick();
    assert_eq!(t.play(Right, "Xb"), V::Success);
    assert_eq!(t.play(Bottom, "9l"), V::Success);
    assert_eq!(t.play(Left, "Xa"), V::Success);
    // Top has no Bells left; anything but the called Ace goes.
    assert_eq!(t.play(Top, "Al"), V::CannotDiscardCalledAce);
    assert_eq!(t.play(Top, "Kl"), V::Success);
}

#[test]
fn called_ace_must_answer_the_search() {
    let t = after_first_trick();
    for (p, c) in [(Right, "Xb"), (Bottom, "9l"), (Left, "Xa"), (Top, "Kl")] {
        assert_eq!(t.play(p, c), V::Success);
    }
    assert_eq!(t.controller.turn(), Some(Right));
    assert_eq!(t.controller.view(Left).known_partner, None);

    assert_eq!(t.play(Right, "8l"), V::Success);
    assert_eq!(t.play(Bottom, "7l"), V::Success);
    assert_eq!(t.play(Left, "Ka"), V::Success);
    assert_eq!(t.play(Top, "Xl"), V::MustPlayCalledAce);
    assert_eq!(t.play(Top, "Al"), V::Success);

    assert_eq!(t.controller.view(Left).known_partner, Some(Top));
    assert_eq!(t.controller.turn(), Some(Top));
}

#[test]
fn partner_is_hidden_until_the_ace_shows() {
    let t = leaves_called();
    assert_eq!(t.controller.view(Left).known_partner, None);
    assert_eq!(t.controller.view(Right).known_partner, None);
    assert_eq!(t.controller.view(Top).known_partner, Some(Top));
    assert!(t.controller.view(Top).on_declarer_team());
    assert!(!t.controller.view(Right).on_declarer_team());
}

#[test]
fn other_hands_are_reduced_to_counts() {
    let t = after_first_trick();
    let view = t.controller.view(Left);
    assert_eq!(view.hand.len(), 7);
    assert_eq!(view.hand_sizes, [7, 7, 7, 7]);
    assert!(!view.hand.contains(&card("Oa")));
    assert!(view.legal_plays().is_empty(), "not Left's turn");
    assert!(!t.controller.view(Right).legal_plays().is_empty());
}

#[test]
fn view_survives_json() {
    let t = after_first_trick();
    let view = t.controller.view(Top);
    let json = serde_json::to_string(&view).unwrap();
    let back: schafkopf_rs::view::RestrictedView = serde_json::from_str(&json).unwrap();
    assert_eq!(back, view);
}

#[test]
fn unrelated_action_only_moves_turn_and_trick() {
    let t = leaves_called();
    let before = t.controller.view(Right);
    assert_eq!(t.play(Bottom, "Kb"), V::Success);
    let after = t.controller.view(Right);

    assert_eq!(after.hand, before.hand);
    assert_eq!(after.known_partner, None);
    assert_eq!(after.announcements, before.announcements);
    assert_eq!(after.declarer, Some(Bottom));
    assert_eq!(before.hand_sizes, [8, 8, 8, 8]);
    assert_eq!(after.hand_sizes, [7, 8, 8, 8]);
    assert_eq!(after.trick, vec![(Bottom, card("Kb"))]);
    assert_eq!(after.turn, Some(Left));

    let mut rest = after.clone();
    rest.trick = before.trick.clone();
    rest.turn = before.turn;
    rest.hand_sizes = before.hand_sizes;
    assert_eq!(rest, before, "nothing else may change");

    let game = t.controller.snapshot();
    for p in PlayerPosition::ALL.into_iter().filter(|&p| p != Right) {
        for c in game.hand(p) {
            assert!(!after.hand.contains(c));
            assert!(after.trick.iter().all(|(_, played)| played != c));
        }
    }
}

/// Top holds four Leaves with the Ace and wins the lead twice.
fn runaway_hands() -> [Vec<schafkopf_rs::cards::Card>; 4] {
    [
        parse_cards("8l 7b Oa Ol Oh Ob Ua Ul").unwrap(),
        parse_cards("8b Aa Xa Ka Uh Ah Xh Kh").unwrap(),
        parse_cards("Al Xl Kl 9l Ab Xb Kb 9b").unwrap(),
        parse_cards("9a 8a 7a 7l Ub 9h 8h 7h").unwrap(),
    ]
}

#[test]
fn running_away_frees_the_called_ace() {
    let t = Fixture::with_hands(GameRules::straight_to_play(), runaway_hands());
    let call = ActionKind::ChooseGame(Some(GameType::Call(Suit::Leaves)));
    assert_eq!(t.act(Bottom, call), V::Success);
    for (p, c) in [(Bottom, "7b"), (Left, "8b"), (Top, "Ab"), (Right, "7a")] {
        assert_eq!(t.play(p, c), V::Success);
    }
    assert_eq!(t.controller.turn(), Some(Top));

    // Four Leaves: Top may open the suit without the Ace.
    assert_eq!(t.play(Top, "Xl"), V::Success);
    for (p, c) in [(Right, "7l"), (Bottom, "8l"), (Left, "Ka")] {
        assert_eq!(t.play(p, c), V::Success);
    }
    assert_eq!(t.controller.turn(), Some(Top));
    assert_eq!(t.controller.view(Left).known_partner, None);

    // Three Leaves left, but the suit has been searched.
    assert_eq!(t.play(Top, "Kl"), V::Success);
}
