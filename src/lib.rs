//! schafkopf-rs: action validation and turn sequencing for Schafkopf
//!
//! Goals:
//! - One authoritative game state, mutated only through validated actions
//! - Point-of-view snapshots for every seat; other hands stay hidden
//! - Pluggable bots whose in-game strategy is chosen per game type
//! - No panics for illegal moves; every submission yields a validation code
//!
//! ## Quick start: validate and apply an action
//! ```
//! use schafkopf_rs::action::{ActionKind, ActionValidationCode};
//! use schafkopf_rs::controller::Controller;
//! use schafkopf_rs::engine::{GameEngine, TurnSource};
//! use schafkopf_rs::game::GameState;
//! use schafkopf_rs::rules::GameRules;
//! use schafkopf_rs::seat::PlayerPosition;
//! use schafkopf_rs::action::Action;
//!
//! let table = Controller::new(GameRules::default(), 7);
//! let bottom = table.subscribe_player(Some(PlayerPosition::Bottom)).unwrap();
//! let left = table.subscribe_player(Some(PlayerPosition::Left)).unwrap();
//!
//! // Left may not act before Bottom, who sits after the dealer.
//! let early = Action::new(left.id(), PlayerPosition::Left, ActionKind::ChooseGame(None));
//! assert_eq!(table.submit(early), ActionValidationCode::WrongTurn);
//!
//! let pass = Action::new(bottom.id(), PlayerPosition::Bottom, ActionKind::ChooseGame(None));
//! assert_eq!(table.submit(pass), ActionValidationCode::Success);
//! assert_eq!(table.state(), GameState::ChoosingGame);
//! assert_eq!(table.turn(), Some(PlayerPosition::Left));
//! ```
//!
//! ## TUI
//! Run the interactive TUI with:
//! ```sh
//! cargo run --bin schafkopf
//! ```
//! or let four bots play with `cargo run --bin schafkopf -- --autoplay 10`.

pub mod action;
pub mod agents;
pub mod cards;
pub mod controller;
pub mod deck;
pub mod engine;
pub mod game;
pub mod replay;
pub mod rules;
pub mod seat;
pub mod settings;
pub mod table;
pub mod telemetry;
pub mod tui;
pub mod view;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
