use schafkopf_rs::agents::{AgentTable, AiAgent, BotProfile, Difficulty};
use schafkopf_rs::controller::Controller;
use schafkopf_rs::engine::TurnSource;
use schafkopf_rs::game::GameState;
use schafkopf_rs::replay::ReplayLog;
use schafkopf_rs::rules::GameRules;
use schafkopf_rs::seat::PlayerPosition;

fn bot_table(rules: GameRules, seed: u64, difficulty: Difficulty) -> (Controller, AgentTable) {
    let controller = Controller::new(rules, seed);
    let mut agents = AgentTable::new();
    for pos in PlayerPosition::ALL {
        let seat = controller.subscribe_player(Some(pos)).unwrap();
        let profile =
            BotProfile::for_difficulty(difficulty).with_seed(seed + pos.index() as u64).with_delay_ms(0, 0);
        agents.set_agent(pos, seat.id(), Some(Box::new(AiAgent::standard(profile))));
    }
    (controller, agents)
}

/// Drive the agents until `games` games were restarted past.
fn play(controller: &Controller, agents: &mut AgentTable, games: usize) {
    for _ in 0..games * 200 {
        if controller.games_played() >= games {
            return;
        }
        let code = agents.on_turn(controller).expect("some bot can always act");
        assert!(code.is_success(), "bot submitted a rejected intent: {code:?}");
    }
    panic!("bots did not finish {games} games");
}

#[test]
fn bots_play_whole_games() {
    schafkopf_rs::telemetry::init_test_tracing();
    let (controller, mut agents) = bot_table(GameRules::default(), 21, Difficulty::Medium);
    play(&controller, &mut agents, 4);

    let logs = controller.completed_games();
    assert_eq!(logs.len(), 4);
    let dealers: Vec<_> = logs.iter().map(|l| l.dealer).collect();
    assert_eq!(
        dealers,
        vec![PlayerPosition::Right, PlayerPosition::Bottom, PlayerPosition::Left, PlayerPosition::Top]
    );
    for log in &logs {
        let game = log.replay().unwrap();
        assert_eq!(game.state(), GameState::Finished);
        assert!(game.cards_conserved());
        if let Some(result) = game.result() {
            assert_eq!(result.declarer_points + result.defender_points, 120);
            assert_eq!(result.declarer_won, result.declarer_points >= 61);
        }
    }
    let winners_per_game = |l: &ReplayLog| l.replay().unwrap().result().map_or(0, |r| r.winners().len());
    let total_wins: usize = logs.iter().map(winners_per_game).sum();
    assert_eq!(controller.wins().iter().sum::<u32>() as usize, total_wins);
}

#[test]
fn finished_game_log_survives_a_file_round_trip() {
    let (controller, mut agents) = bot_table(GameRules::straight_to_play(), 5, Difficulty::Expert);
    play(&controller, &mut agents, 1);
    let log = &controller.completed_games()[0];

    let path = std::env::temp_dir().join(format!("schafkopf-replay-{}.json", std::process::id()));
    log.save(&path).unwrap();
    let loaded = ReplayLog::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(&loaded, log);
    let original = log.replay().unwrap();
    let again = loaded.replay().unwrap();
    assert_eq!(again.history(), original.history());
    assert_eq!(again.result(), original.result());
}

#[test]
fn bots_wait_for_their_turn() {
    let (controller, mut agents) = bot_table(GameRules::default(), 8, Difficulty::Hard);
    assert_eq!(controller.turn(), Some(PlayerPosition::Bottom));
    agents.on_turn(&controller);
    assert_eq!(controller.history_len(), 1);
    let first = controller.snapshot().history()[0].clone();
    assert_eq!(first.position, PlayerPosition::Bottom);
}
