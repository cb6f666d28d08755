#![allow(dead_code)]

use schafkopf_rs::action::{Action, ActionKind, ActionValidationCode};
use schafkopf_rs::cards::{parse_cards, Card};
use schafkopf_rs::controller::{Controller, SeatHandle};
use schafkopf_rs::engine::GameEngine;
use schafkopf_rs::game::GameData;
use schafkopf_rs::rules::GameRules;
use schafkopf_rs::seat::PlayerPosition;

pub use PlayerPosition::{Bottom, Left, Right, Top};

/// Bottom, Left, Top, Right. With Leaves called by Bottom, Top holds the Ace.
pub fn fixed_hands() -> [Vec<Card>; 4] {
    [
        parse_cards("Oa Ol Ua Ah Xh 9l 7l Kb").unwrap(),
        parse_cards("Oh Ob Ul Kh 9h Aa Xa Ka").unwrap(),
        parse_cards("Uh Ub 8h 7h Al Xl Kl 8b").unwrap(),
        parse_cards("9a 8a 7a 8l Ab Xb 9b 7b").unwrap(),
    ]
}

pub fn card(s: &str) -> Card {
    s.parse().unwrap()
}

/// A controller over the fixed deal (dealer Right) with all four seats taken.
pub struct Fixture {
    pub controller: Controller,
    pub seats: Vec<SeatHandle>,
}

impl Fixture {
    pub fn new(rules: GameRules) -> Self {
        Self::with_hands(rules, fixed_hands())
    }

    pub fn with_hands(rules: GameRules, hands: [Vec<Card>; 4]) -> Self {
        let game = GameData::with_hands(rules, Right, hands, 0, 0);
        let controller = Controller::with_game(game);
        let seats = PlayerPosition::ALL
            .into_iter()
            .map(|p| controller.subscribe_player(Some(p)).unwrap())
            .collect();
        Self { controller, seats }
    }

    pub fn seat(&self, pos: PlayerPosition) -> &SeatHandle {
        &self.seats[pos.index()]
    }

    pub fn action(&self, pos: PlayerPosition, kind: ActionKind) -> Action {
        Action::new(self.seat(pos).id(), pos, kind)
    }

    pub fn act(&self, pos: PlayerPosition, kind: ActionKind) -> ActionValidationCode {
        self.controller.submit(self.action(pos, kind))
    }

    pub fn play(&self, pos: PlayerPosition, c: &str) -> ActionValidationCode {
        self.act(pos, ActionKind::PlayCard(card(c)))
    }

    /// Everyone passes in seat order starting with Bottom.
    pub fn all_pass(&self) {
        for p in [Bottom, Left, Top, Right] {
            assert_eq!(self.act(p, ActionKind::ChooseGame(None)), ActionValidationCode::Success);
        }
    }
}
